//! This is the core module. It exports the card plumbing and hand strength
//! code that doesn't depend on how a game is dealt.

/// card.rs has the rank and suit.
pub(crate) mod card;
/// Re-export Card and Suit
pub use self::card::{Card, MAX_RANK, MIN_RANK, Suit, rank_from_char, rank_to_char};

/// The error type shared by the whole crate.
mod error;
/// Export the error enums.
pub use self::error::{Invariant, PokerOddsError};

/// Fixed universe set of cards.
mod card_bit_set;
/// Export `CardBitSet` and its iterator.
pub use self::card_bit_set::{CardBitSet, CardBitSetIter};

/// Code related to a player's hole cards.
mod hand;
/// Everything in there should be public.
pub use self::hand::*;

/// Deck is the normal 52 card deck.
mod deck;
/// Export `Deck`
pub use self::deck::Deck;

/// Flattened deck
mod flat_deck;
/// Export the shuffled deck.
pub use self::flat_deck::FlatDeck;

/// Hand strength classification.
mod rank;
/// Export the trait and the results.
pub use self::rank::{Category, Rankable, Strength, evaluate};
