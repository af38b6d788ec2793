use thiserror::Error;

use super::Card;

/// Broken caller contracts. These are never recovered from locally; they
/// mean the enumerator or a card set was driven in a way it does not support.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invariant {
    #[error("a board holds at most five cards, tried to grow past {0}")]
    BoardOverflow(usize),
    #[error("no undealt cards left to complete a board of {0} cards")]
    DeckExhausted(usize),
    #[error("card {0} is not in the set")]
    CardNotInSet(Card),
    #[error("equity needs at least one opponent")]
    NoOpponents,
    #[error("no hero hand was given")]
    NoHero,
    #[error("hero seat {0} is not at the table")]
    HeroOutOfRange(usize),
}

/// This is the core error type for the poker_odds library.
/// It uses `thiserror` to provide readable error messages.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokerOddsError {
    #[error("Card rank {0} is outside of 2..=14")]
    InvalidCard(u8),
    #[error("Card index {0} is outside of 0..52")]
    InvalidCardIndex(u8),
    #[error("Unable to parse value")]
    UnexpectedValueChar,
    #[error("Unable to parse suit")]
    UnexpectedSuitChar,
    #[error("Error reading characters while parsing")]
    TooFewChars,
    #[error("Extra un-used characters found after parsing")]
    UnparsedCharsRemaining,
    #[error("Card {0} appears more than once")]
    DuplicateCardInPool(Card),
    #[error("Invariant violated: {0}")]
    InvariantViolation(#[from] Invariant),
    #[error("Enumeration ran past its deadline")]
    DeadlineExceeded,
}
