use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::card::parse_cards;
use super::{Card, CardBitSet, PokerOddsError, Rankable, Strength};

/// Two hole cards belonging to one player.
///
/// A hand doesn't own a board. Its strength is a function of whatever board
/// it is evaluated against, which is how the enumerator can grow and shrink
/// one shared board underneath every hand during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hand {
    hole: (Card, Card),
}

impl Hand {
    /// Create a hand from two distinct hole cards.
    ///
    /// ```
    /// use poker_odds::core::{Card, Hand, PokerOddsError};
    ///
    /// let ace: Card = "Ac".parse().unwrap();
    /// let king: Card = "Kc".parse().unwrap();
    /// assert!(Hand::new(ace, king).is_ok());
    /// assert_eq!(Err(PokerOddsError::DuplicateCardInPool(ace)), Hand::new(ace, ace));
    /// ```
    pub fn new(first: Card, second: Card) -> Result<Self, PokerOddsError> {
        if first == second {
            return Err(PokerOddsError::DuplicateCardInPool(first));
        }
        Ok(Self {
            hole: (first, second),
        })
    }

    pub fn hole(&self) -> (Card, Card) {
        self.hole
    }

    /// The hole cards as a set.
    pub fn cards(&self) -> CardBitSet {
        [self.hole.0, self.hole.1].into_iter().collect()
    }

    /// Given a card, is it one of the hole cards?
    pub fn contains(&self, c: &Card) -> bool {
        self.hole.0 == *c || self.hole.1 == *c
    }

    /// Evaluate the hole cards together with `board`.
    ///
    /// Fails with `DuplicateCardInPool` if the board repeats a card or shares
    /// one with the hole.
    pub fn strength(&self, board: &[Card]) -> Result<Strength, PokerOddsError> {
        self.strength_on(board.pool()?)
    }

    /// Same as `strength` against a board that is already a set.
    pub fn strength_on(&self, board: CardBitSet) -> Result<Strength, PokerOddsError> {
        let mut pool = board;
        for card in [self.hole.0, self.hole.1] {
            if !pool.insert(card) {
                return Err(PokerOddsError::DuplicateCardInPool(card));
            }
        }
        pool.strength()
    }

    /// Compare two hands at a fixed board.
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use poker_odds::core::{Card, Hand};
    ///
    /// let hero: Hand = "AcAd".parse().unwrap();
    /// let villain: Hand = "KcKd".parse().unwrap();
    /// let board: Vec<Card> = ["Js", "Jd", "Jc"].iter().map(|s| s.parse().unwrap()).collect();
    ///
    /// assert_eq!(Ordering::Greater, hero.cmp_at(&villain, &board).unwrap());
    /// ```
    pub fn cmp_at(&self, other: &Hand, board: &[Card]) -> Result<Ordering, PokerOddsError> {
        let board = board.pool()?;
        if let Some(card) = (self.cards() & other.cards()).into_iter().next() {
            return Err(PokerOddsError::DuplicateCardInPool(card));
        }
        Ok(self.strength_on(board)?.cmp(&other.strength_on(board)?))
    }
}

impl FromStr for Hand {
    type Err = PokerOddsError;

    /// Parse exactly two concatenated cards, `"AcKd"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_cards(s)?.as_slice() {
            [first, second] => Hand::new(*first, *second),
            [] | [_] => Err(PokerOddsError::TooFewChars),
            _ => Err(PokerOddsError::UnparsedCharsRemaining),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.hole.0, self.hole.1)
    }
}
