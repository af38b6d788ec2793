/// Community cards and the street they make.
mod board;
/// Export `Board`
pub use self::board::{BOARD_SIZE, Board, Street};

/// Exhaustive, memoized equity enumeration.
mod brancher;
/// Export the enumerator, its builder and the result type.
pub use self::brancher::{Brancher, BrancherBuilder, Equity};

/// One card look ahead.
mod outs;
/// Export `Outs`
pub use self::outs::{Outs, OutsCalculator};

/// Module for `Game` that will hold the current state of the game.
mod game;
/// Export `Game` and the string based entry point.
pub use self::game::{Game, equity};
