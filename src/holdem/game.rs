use rand::Rng;
use rand::rng;
use tracing::event;

use crate::core::{Card, Deck, FlatDeck, Hand, Invariant, PokerOddsError, Strength};

use super::brancher::committed_cards;
use super::{Board, Brancher, BrancherBuilder, Equity, Outs, OutsCalculator, Street};

/// Current state of a game.
///
/// The game deals the board from a shuffled deck. It never looks at the
/// order of that deck when computing equity: the calculators it hands out
/// consider every card nobody can see.
#[derive(Debug, Clone)]
pub struct Game {
    /// Hands still playing.
    hands: Vec<Hand>,
    /// Which of the hands the calculators are run for.
    hero: usize,
    /// Community cards.
    board: Board,
    /// Flatten deck
    deck: FlatDeck,
}

impl Game {
    /// Start a game from hands that are already dealt, shuffling the rest of
    /// the deck with the thread rng.
    pub fn new(hands: Vec<Hand>, hero: usize, board: Board) -> Result<Self, PokerOddsError> {
        let mut rng = rng();
        Self::with_rng(hands, hero, board, &mut rng)
    }

    /// Same as `new` with a caller supplied rng, for repeatable deals.
    pub fn with_rng<R: Rng>(
        hands: Vec<Hand>,
        hero: usize,
        board: Board,
        rng: &mut R,
    ) -> Result<Self, PokerOddsError> {
        if hero >= hands.len() {
            return Err(Invariant::HeroOutOfRange(hero).into());
        }
        if hands.len() < 2 {
            return Err(Invariant::NoOpponents.into());
        }
        let committed = committed_cards(&hands, &board)?;

        let mut deck: FlatDeck = Deck::without(committed).into();
        deck.shuffle(rng);
        Ok(Self {
            hands,
            hero,
            board,
            deck,
        })
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn street(&self) -> Street {
        self.board.street()
    }

    /// Burn a card then deal the next street: the flop from preflop, one
    /// card after that. Nothing happens once the river is out.
    ///
    /// If the deck can't cover the burn and the whole street nothing is
    /// dealt and the board is left as it was.
    pub fn deal_street(&mut self) -> Result<Street, PokerOddsError> {
        if self.board.is_complete() {
            return Ok(Street::River);
        }
        let count = if self.board.len() < 3 {
            3 - self.board.len()
        } else {
            1
        };
        if self.deck.len() < count + 1 {
            return Err(Invariant::DeckExhausted(self.board.len()).into());
        }

        self.deal_card()?;
        for _ in 0..count {
            let card = self.deal_card()?;
            self.board.push(card)?;
        }
        event!(tracing::Level::TRACE, board = %self.board, "Dealt street");
        Ok(self.board.street())
    }

    /// Every hand's strength at the current board, strongest first. Equal
    /// hands keep their seat order.
    pub fn showdown(&self) -> Result<Vec<(usize, Strength)>, PokerOddsError> {
        let board = self.board.set();
        let mut ranked = self
            .hands
            .iter()
            .map(|hand| hand.strength_on(board))
            .enumerate()
            .map(|(idx, strength)| strength.map(|s| (idx, s)))
            .collect::<Result<Vec<_>, _>>()?;
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(ranked)
    }

    /// The seats holding the best hand at the current board.
    pub fn winners(&self) -> Result<Vec<usize>, PokerOddsError> {
        let ranked = self.showdown()?;
        let best = match ranked.first() {
            Some((_, strength)) => *strength,
            None => return Ok(vec![]),
        };
        Ok(ranked
            .into_iter()
            .take_while(|(_, strength)| *strength == best)
            .map(|(idx, _)| idx)
            .collect())
    }

    /// An enumerator for the hero against every other hand at the current
    /// board.
    pub fn brancher(&self) -> Result<Brancher, PokerOddsError> {
        BrancherBuilder::default()
            .hero(self.hands[self.hero])
            .opponents(self.opponents())
            .board(self.board.clone())
            .build()
    }

    /// The hero's outs to the next street.
    pub fn outs(&self) -> Result<Outs, PokerOddsError> {
        OutsCalculator::new(self.hands[self.hero], self.opponents(), self.board.clone())?.outs()
    }

    fn opponents(&self) -> Vec<Hand> {
        self.hands
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != self.hero)
            .map(|(_, hand)| *hand)
            .collect()
    }

    fn deal_card(&mut self) -> Result<Card, PokerOddsError> {
        self.deck
            .deal()
            .ok_or_else(|| Invariant::DeckExhausted(self.board.len()).into())
    }
}

/// Exact equity for the first hand against all the others.
///
/// Hands and board use the concatenated card form, `"AcAd"` and `"JsJdJc"`.
/// An empty board string is preflop.
///
/// ```
/// use poker_odds::holdem::equity;
///
/// let result = equity(&["AcAd", "KcKd"], "JsJdJcKh").unwrap();
/// assert_eq!(3.0 / 44.0, result.win);
/// ```
pub fn equity(hands: &[&str], board: &str) -> Result<Equity, PokerOddsError> {
    let (hero, opponents) = match hands.split_first() {
        Some(split) => split,
        None => return Err(Invariant::NoHero.into()),
    };
    let hero: Hand = hero.parse()?;
    let opponents = opponents
        .iter()
        .map(|s| s.parse())
        .collect::<Result<Vec<Hand>, _>>()?;

    BrancherBuilder::default()
        .hero(hero)
        .opponents(opponents)
        .board(board.parse()?)
        .build()?
        .equity()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::core::Category;

    fn game(hands: &[&str], board: &str) -> Game {
        let hands = hands.iter().map(|s| s.parse().unwrap()).collect();
        let mut rng = StdRng::seed_from_u64(420);
        Game::with_rng(hands, 0, board.parse().unwrap(), &mut rng).unwrap()
    }

    #[test_log::test]
    fn test_deal_streets() {
        let mut g = game(&["AcAd", "KcKd"], "");
        assert_eq!(Street::Preflop, g.street());

        assert_eq!(Street::Flop, g.deal_street().unwrap());
        assert_eq!(3, g.board().len());
        assert_eq!(Street::Turn, g.deal_street().unwrap());
        assert_eq!(Street::River, g.deal_street().unwrap());
        assert_eq!(5, g.board().len());

        // Nothing more to deal.
        assert_eq!(Street::River, g.deal_street().unwrap());
        assert_eq!(5, g.board().len());

        // Three burns and five board cards came out of the 48 left.
        assert_eq!(40, g.deck.len());
        for card in g.board().iter() {
            assert!(!g.hands().iter().any(|h| h.contains(card)));
        }
    }

    #[test]
    fn test_short_deck_deals_nothing() {
        // 25 hands leave two cards, not enough for a burn and a flop.
        let cards: Vec<Card> = Deck::default().into_iter().take(50).collect();
        let hands: Vec<Hand> = cards
            .chunks(2)
            .map(|pair| Hand::new(pair[0], pair[1]).unwrap())
            .collect();
        let mut rng = StdRng::seed_from_u64(420);
        let mut g = Game::with_rng(hands, 0, Board::new(), &mut rng).unwrap();

        assert_eq!(
            Err(PokerOddsError::InvariantViolation(Invariant::DeckExhausted(0))),
            g.deal_street()
        );
        assert!(g.board().is_empty());
        assert_eq!(2, g.deck.len());
    }

    #[test]
    fn test_same_seed_same_board() {
        let mut one = game(&["AcAd", "KcKd"], "");
        let mut two = game(&["AcAd", "KcKd"], "");
        one.deal_street().unwrap();
        two.deal_street().unwrap();
        assert_eq!(one.board(), two.board());
    }

    #[test]
    fn test_showdown_order() {
        let g = game(&["KcKd", "AcAd", "2h3h"], "JsJdJc");
        let ranked = g.showdown().unwrap();

        assert_eq!(vec![1, 0, 2], ranked.iter().map(|(i, _)| *i).collect::<Vec<_>>());
        assert_eq!(Category::FullHouse, ranked[0].1.category);
        assert_eq!(Category::Trips, ranked[2].1.category);
        assert_eq!(vec![1], g.winners().unwrap());
    }

    #[test]
    fn test_split_winners() {
        let g = game(&["2c3d", "2h3h", "4c4d"], "AsKsQdJdTc");
        assert_eq!(vec![0, 1, 2], g.winners().unwrap());
    }

    #[test]
    fn test_calculators_follow_board() {
        let g = game(&["AcAd", "KcKd"], "JsJdJcKh");
        assert_relative_eq!(3.0 / 44.0, g.brancher().unwrap().branch().unwrap());
        assert_eq!(3, g.outs().unwrap().wins.count());
    }

    #[test]
    fn test_hero_seat() {
        let hands: Vec<Hand> = vec!["AcAd".parse().unwrap(), "KcKd".parse().unwrap()];
        let mut rng = StdRng::seed_from_u64(420);
        let g = Game::with_rng(hands.clone(), 1, "JsJdJcKh".parse().unwrap(), &mut rng).unwrap();
        assert_relative_eq!(41.0 / 44.0, g.brancher().unwrap().branch().unwrap());

        assert_eq!(
            Some(PokerOddsError::InvariantViolation(Invariant::HeroOutOfRange(2))),
            Game::with_rng(hands, 2, Board::new(), &mut rng).err()
        );
    }

    #[test]
    fn test_new_rejects_shared_cards() {
        let hands = vec!["AcAd".parse().unwrap(), "AcKd".parse().unwrap()];
        assert_eq!(
            Some(PokerOddsError::DuplicateCardInPool("Ac".parse().unwrap())),
            Game::new(hands, 0, Board::new()).err()
        );
        let hands = vec!["AcAd".parse().unwrap()];
        assert_eq!(
            Some(PokerOddsError::InvariantViolation(Invariant::NoOpponents)),
            Game::new(hands, 0, Board::new()).err()
        );
    }

    #[test_log::test]
    fn test_equity() {
        let result = equity(&["AcAd", "KcKd"], "JsJdJc").unwrap();
        assert_relative_eq!(907.0 / 990.0, result.win, epsilon = 1e-12);
        assert_relative_eq!(2.0 / 990.0, result.tie, epsilon = 1e-12);

        let result = equity(&["AcAd", "KcKd", "QcQd"], "JsJdJcKh").unwrap();
        assert_relative_eq!(3.0 / 42.0, result.win, epsilon = 1e-12);
    }

    #[test]
    fn test_equity_errors() {
        assert_eq!(
            Err(PokerOddsError::InvariantViolation(Invariant::NoHero)),
            equity(&[], "")
        );
        assert_eq!(
            Err(PokerOddsError::InvariantViolation(Invariant::NoOpponents)),
            equity(&["AcAd"], "")
        );
        assert_eq!(
            Err(PokerOddsError::UnexpectedValueChar),
            equity(&["AcAd", "XcKd"], "")
        );
        assert_eq!(
            Err(PokerOddsError::DuplicateCardInPool("Jc".parse().unwrap())),
            equity(&["AcJc", "KcKd"], "JsJdJc")
        );
    }
}
