use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::core::card::parse_cards;
use crate::core::{Card, CardBitSet, Invariant, PokerOddsError};

/// Number of community cards on a complete board.
pub const BOARD_SIZE: usize = 5;

/// How far the community cards have come.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

/// The community cards, in the order they were dealt.
///
/// A board is a stack: `push` deals the next card and `pop` takes the last
/// one back. The set of cards on the board is kept alongside so the
/// enumerator can key its memo table on it without walking the cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
    set: CardBitSet,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(BOARD_SIZE),
            set: CardBitSet::new(),
        }
    }

    /// Build a board from already dealt cards.
    ///
    /// ```
    /// use poker_odds::core::Card;
    /// use poker_odds::holdem::Board;
    ///
    /// let cards: Vec<Card> = ["Js", "Jd", "Jc"].iter().map(|s| s.parse().unwrap()).collect();
    /// let board = Board::from_cards(cards).unwrap();
    /// assert_eq!(3, board.len());
    /// ```
    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Result<Self, PokerOddsError> {
        let mut board = Self::new();
        for card in cards {
            board.push(card)?;
        }
        Ok(board)
    }

    /// Deal one more card onto the board.
    pub fn push(&mut self, card: Card) -> Result<(), PokerOddsError> {
        if self.cards.len() >= BOARD_SIZE {
            return Err(Invariant::BoardOverflow(self.cards.len()).into());
        }
        if !self.set.insert(card) {
            return Err(PokerOddsError::DuplicateCardInPool(card));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Take back the last card dealt.
    pub fn pop(&mut self) -> Result<Option<Card>, PokerOddsError> {
        match self.cards.pop() {
            Some(card) => {
                self.set.remove(card)?;
                Ok(Some(card))
            }
            None => Ok(None),
        }
    }

    /// Drop cards off the end until only `len` remain.
    pub fn truncate(&mut self, len: usize) -> Result<(), PokerOddsError> {
        while self.cards.len() > len {
            self.pop()?;
        }
        Ok(())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The board as a set. Equal for any two boards with the same cards.
    pub fn set(&self) -> CardBitSet {
        self.set
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == BOARD_SIZE
    }

    /// Which street a board of this length belongs to. Partial flops count
    /// as preflop.
    pub fn street(&self) -> Street {
        match self.cards.len() {
            0..=2 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Board {
    type Target = [Card];

    fn deref(&self) -> &[Card] {
        &self.cards
    }
}

impl FromStr for Board {
    type Err = PokerOddsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_cards(parse_cards(s)?)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_keeps_set_in_step() {
        let mut board: Board = "JsJd".parse().unwrap();
        let card: Card = "Jc".parse().unwrap();

        board.push(card).unwrap();
        assert!(board.set().contains(card));
        assert_eq!(3, board.set().count());

        assert_eq!(Some(card), board.pop().unwrap());
        assert!(!board.set().contains(card));
        assert_eq!(2, board.len());
    }

    #[test]
    fn test_overflow() {
        let mut board: Board = "2c3c4c5c6c".parse().unwrap();
        assert!(board.is_complete());
        assert_eq!(
            Err(PokerOddsError::InvariantViolation(Invariant::BoardOverflow(5))),
            board.push("7c".parse().unwrap())
        );
        assert_eq!(5, board.len());
        assert!("2c3c4c5c6c7c".parse::<Board>().is_err());
    }

    #[test]
    fn test_duplicate() {
        let mut board: Board = "JsJd".parse().unwrap();
        assert_eq!(
            Err(PokerOddsError::DuplicateCardInPool("Js".parse().unwrap())),
            board.push("Js".parse().unwrap())
        );
        assert_eq!(2, board.len());
    }

    #[test]
    fn test_pop_empty() {
        let mut board = Board::new();
        assert_eq!(None, board.pop().unwrap());
    }

    #[test]
    fn test_truncate() {
        let mut board: Board = "2c3c4c5c6c".parse().unwrap();
        board.truncate(3).unwrap();
        assert_eq!("2c3c4c", board.to_string());
        assert_eq!(3, board.set().count());
    }

    #[test]
    fn test_street() {
        let mut board = Board::new();
        assert_eq!(Street::Preflop, board.street());
        for (card, street) in [
            ("Ah", Street::Preflop),
            ("Kh", Street::Preflop),
            ("Qh", Street::Flop),
            ("Jh", Street::Turn),
            ("Th", Street::River),
        ] {
            board.push(card.parse().unwrap()).unwrap();
            assert_eq!(street, board.street());
        }
    }

    #[test]
    fn test_set_ignores_deal_order() {
        let one: Board = "AhKhQh".parse().unwrap();
        let two: Board = "QhAhKh".parse().unwrap();
        assert_ne!(one, two);
        assert_eq!(one.set().bits(), two.set().bits());
    }
}
