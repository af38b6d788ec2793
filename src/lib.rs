//! poker_odds computes exact Texas hold'em equity.
//!
//! Hands are ranked by a total order of `(category, tiebreak)` and the
//! equity of a hero against a fixed set of opponents is found by walking
//! every way the rest of the board can come, memoized on the exact set of
//! cards already on the board.
//!
//! ```
//! use poker_odds::holdem::equity;
//!
//! // Aces against kings on a board of three jacks. Only a king saves the kings.
//! let result = equity(&["AcAd", "KcKd"], "JsJdJc").unwrap();
//! assert!(result.win > 0.9);
//! ```

/// Allow all the core poker functionality to be used
/// externally. Everything in core should be agnostic
/// to how the cards are dealt.
pub mod core;
/// Allow all the holdem specific code to be used externally.
pub mod holdem;
