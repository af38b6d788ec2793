use std::fmt;

use crate::core::{CardBitSet, Hand, Invariant, PokerOddsError};

use super::Board;
use super::brancher::{Equity, committed_cards, showdown};

/// The cards that decide the next street.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outs {
    /// Cards that leave the hero alone at the top.
    pub wins: CardBitSet,
    /// Cards that leave the hero tied for the best hand. These are not outs.
    pub ties: CardBitSet,
    /// How many cards could have come.
    pub remaining: usize,
}

impl Outs {
    /// No outs out of no cards.
    pub fn empty() -> Self {
        Self {
            wins: CardBitSet::new(),
            ties: CardBitSet::new(),
            remaining: 0,
        }
    }

    /// Chance the next card is an out.
    pub fn win_fraction(&self) -> f64 {
        if self.remaining == 0 {
            0.0
        } else {
            self.wins.count() as f64 / self.remaining as f64
        }
    }
}

impl fmt::Display for Outs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} outs of {}:", self.wins.count(), self.remaining)?;
        for card in self.wins {
            write!(f, " {card}")?;
        }
        Ok(())
    }
}

/// Looks exactly one card ahead.
///
/// ```
/// use poker_odds::holdem::OutsCalculator;
///
/// let outs = OutsCalculator::new(
///     "KcKd".parse().unwrap(),
///     vec!["AcAd".parse().unwrap()],
///     "JsJdJc".parse().unwrap(),
/// )
/// .unwrap()
/// .outs()
/// .unwrap();
///
/// // Kings need one of the two kings left.
/// assert_eq!(2, outs.wins.count());
/// assert_eq!(45, outs.remaining);
/// ```
#[derive(Debug, Clone)]
pub struct OutsCalculator {
    hero: Hand,
    opponents: Vec<Hand>,
    board: Board,
    deck: CardBitSet,
}

impl OutsCalculator {
    pub fn new(hero: Hand, opponents: Vec<Hand>, board: Board) -> Result<Self, PokerOddsError> {
        if opponents.is_empty() {
            return Err(Invariant::NoOpponents.into());
        }
        committed_cards(std::iter::once(&hero).chain(&opponents), &board)?;
        Ok(Self {
            hero,
            opponents,
            board,
            deck: CardBitSet::default(),
        })
    }

    /// Only consider cards in `deck` as the next card.
    pub fn with_deck(mut self, deck: CardBitSet) -> Self {
        self.deck = deck;
        self
    }

    /// Try every card that could come next.
    ///
    /// A complete board has no next card, so the result is empty.
    pub fn outs(&self) -> Result<Outs, PokerOddsError> {
        if self.board.is_complete() {
            return Ok(Outs::empty());
        }
        let hands = std::iter::once(&self.hero).chain(&self.opponents);
        let committed = committed_cards(hands, &self.board)?;
        let candidates = self.deck & !committed;

        let mut outs = Outs {
            remaining: candidates.count(),
            ..Outs::empty()
        };
        let board = self.board.set();
        for card in candidates {
            let result = showdown(&self.hero, &self.opponents, board | card)?;
            if result == Equity::WIN {
                outs.wins.insert(card);
            } else if result == Equity::TIE {
                outs.ties.insert(card);
            }
        }
        Ok(outs)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::core::Card;
    use crate::holdem::BrancherBuilder;

    fn calc(hero: &str, villain: &str, board: &str) -> OutsCalculator {
        OutsCalculator::new(
            hero.parse().unwrap(),
            vec![villain.parse().unwrap()],
            board.parse().unwrap(),
        )
        .unwrap()
    }

    fn cards(s: &str) -> CardBitSet {
        crate::core::card::parse_cards(s).unwrap().into_iter().collect()
    }

    #[test]
    fn test_turn_outs() {
        let outs = calc("AcAd", "KcKd", "JsJdJcKh").outs().unwrap();
        assert_eq!(cards("AhAsJh"), outs.wins);
        assert!(outs.ties.is_empty());
        assert_eq!(44, outs.remaining);
        assert_relative_eq!(3.0 / 44.0, outs.win_fraction());
    }

    #[test]
    fn test_river_outs_match_brancher() {
        let board = "Ts9s2sKd";
        let outs = calc("AsQh", "KcKh", board).outs().unwrap();
        let equity = BrancherBuilder::default()
            .hero("AsQh".parse().unwrap())
            .opponent("KcKh".parse().unwrap())
            .board(board.parse().unwrap())
            .build()
            .unwrap()
            .equity()
            .unwrap();

        assert_relative_eq!(equity.win, outs.win_fraction(), epsilon = 1e-12);
        assert_relative_eq!(
            equity.tie,
            outs.ties.count() as f64 / outs.remaining as f64,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_ties_are_not_outs() {
        let outs = calc("2c3d", "2h4d", "AsKsQdJdTc").outs();
        assert_eq!(Outs::empty(), outs.unwrap());

        let outs = calc("2c3d", "2h4d", "AsKcQdJd").outs().unwrap();
        // Any ten makes the same straight for both.
        for ten in ["Ts", "Th", "Tc"] {
            let card: Card = ten.parse().unwrap();
            assert!(outs.ties.contains(card));
            assert!(!outs.wins.contains(card));
        }
        assert!((outs.wins & outs.ties).is_empty());
    }

    #[test]
    fn test_outs_in_uncommitted_deck() {
        let c = calc("8h8d", "AsKc", "2d7cJh");
        let outs = c.outs().unwrap();
        let committed = cards("8h8dAsKc2d7cJh");

        assert!((outs.wins & committed).is_empty());
        assert!((outs.ties & committed).is_empty());
        assert_eq!(45, outs.remaining);
        let fraction = outs.win_fraction();
        assert!((0.0..=1.0).contains(&fraction));
    }

    #[test]
    fn test_restricted_deck() {
        let outs = calc("AcAd", "KcKd", "JsJdJcKh")
            .with_deck(cards("AhKs2c"))
            .outs()
            .unwrap();
        assert_eq!(cards("Ah"), outs.wins);
        assert_eq!(3, outs.remaining);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Some(PokerOddsError::InvariantViolation(Invariant::NoOpponents)),
            OutsCalculator::new("AcAd".parse().unwrap(), vec![], Board::new()).err()
        );
        assert!(
            OutsCalculator::new(
                "AcAd".parse().unwrap(),
                vec!["KcKd".parse().unwrap()],
                "AcJdJs".parse().unwrap()
            )
            .is_err()
        );
    }
}
