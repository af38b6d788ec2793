use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, AddAssign, Div};
use std::time::Instant;

use tracing::{event, trace_span};

use crate::core::{Card, CardBitSet, Hand, Invariant, PokerOddsError};

use super::Board;

/// Share of runouts the hero wins outright, ties for best, or loses.
///
/// The three fields always add up to one for a finished enumeration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Equity {
    pub win: f64,
    pub tie: f64,
    pub lose: f64,
}

impl Equity {
    pub const WIN: Equity = Equity {
        win: 1.0,
        tie: 0.0,
        lose: 0.0,
    };
    pub const TIE: Equity = Equity {
        win: 0.0,
        tie: 1.0,
        lose: 0.0,
    };
    pub const LOSE: Equity = Equity {
        win: 0.0,
        tie: 0.0,
        lose: 1.0,
    };
}

impl Add for Equity {
    type Output = Equity;

    fn add(self, rhs: Equity) -> Equity {
        Equity {
            win: self.win + rhs.win,
            tie: self.tie + rhs.tie,
            lose: self.lose + rhs.lose,
        }
    }
}

impl AddAssign for Equity {
    fn add_assign(&mut self, rhs: Equity) {
        *self = *self + rhs;
    }
}

impl Div<f64> for Equity {
    type Output = Equity;

    fn div(self, rhs: f64) -> Equity {
        Equity {
            win: self.win / rhs,
            tie: self.tie / rhs,
            lose: self.lose / rhs,
        }
    }
}

impl fmt::Display for Equity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Win {:.2}% | Tie {:.2}% | Lose {:.2}%",
            self.win * 100.0,
            self.tie * 100.0,
            self.lose * 100.0,
        )
    }
}

/// Every card held by a player or on the board, failing on the first repeat.
pub(crate) fn committed_cards<'a>(
    hands: impl IntoIterator<Item = &'a Hand>,
    board: &Board,
) -> Result<CardBitSet, PokerOddsError> {
    let mut committed = board.set();
    for hand in hands {
        let (first, second) = hand.hole();
        for card in [first, second] {
            if !committed.insert(card) {
                return Err(PokerOddsError::DuplicateCardInPool(card));
            }
        }
    }
    Ok(committed)
}

/// Compare the hero to every opponent at a fixed board.
///
/// Any opponent ahead is a loss. Otherwise any opponent level is a tie.
pub(crate) fn showdown(
    hero: &Hand,
    opponents: &[Hand],
    board: CardBitSet,
) -> Result<Equity, PokerOddsError> {
    let hero = hero.strength_on(board)?;
    let mut tied = false;
    for opponent in opponents {
        match opponent.strength_on(board)?.cmp(&hero) {
            Ordering::Greater => return Ok(Equity::LOSE),
            Ordering::Equal => tied = true,
            Ordering::Less => {}
        }
    }
    Ok(if tied { Equity::TIE } else { Equity::WIN })
}

/// # BrancherBuilder
///
/// Configures a `Brancher`. A hero and at least one opponent are required,
/// everything else is optional.
///
/// ## Setters
///
/// - `board` starts from a partial board. Defaults to preflop.
/// - `deck` restricts which cards can still come. Defaults to the whole
///   deck; cards already held or on the board are always skipped.
/// - `memoize` turns the per board memo table on or off. On by default.
/// - `deadline` aborts the enumeration once the instant has passed.
///
/// ## Examples
///
/// ```
/// use poker_odds::holdem::BrancherBuilder;
///
/// let mut brancher = BrancherBuilder::default()
///     .hero("AcAd".parse().unwrap())
///     .opponents(vec!["KcKd".parse().unwrap()])
///     .board("JsJdJcKh".parse().unwrap())
///     .build()
///     .unwrap();
///
/// // Only Ah, As and Jh save the aces on the river.
/// assert_eq!(3.0 / 44.0, brancher.branch().unwrap());
/// ```
#[derive(Debug, Default)]
pub struct BrancherBuilder {
    hero: Option<Hand>,
    opponents: Vec<Hand>,
    board: Option<Board>,
    deck: Option<CardBitSet>,
    memoize: Option<bool>,
    deadline: Option<Instant>,
}

impl BrancherBuilder {
    /// Set the hand whose equity is computed.
    pub fn hero(mut self, hero: Hand) -> Self {
        self.hero = Some(hero);
        self
    }

    /// Set the hands the hero has to beat.
    pub fn opponents(mut self, opponents: Vec<Hand>) -> Self {
        self.opponents = opponents;
        self
    }

    /// Add one more hand the hero has to beat.
    pub fn opponent(mut self, opponent: Hand) -> Self {
        self.opponents.push(opponent);
        self
    }

    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    /// Set the cards that may still be dealt.
    pub fn deck(mut self, deck: CardBitSet) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = Some(memoize);
        self
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Validate the configuration and create the `Brancher`.
    ///
    /// Fails with `NoHero`, `NoOpponents` or `DuplicateCardInPool`.
    pub fn build(self) -> Result<Brancher, PokerOddsError> {
        let hero = self.hero.ok_or(Invariant::NoHero)?;
        if self.opponents.is_empty() {
            return Err(Invariant::NoOpponents.into());
        }
        let board = self.board.unwrap_or_default();
        let committed = committed_cards(std::iter::once(&hero).chain(&self.opponents), &board)?;
        let memo = if self.memoize.unwrap_or(true) {
            Some(HashMap::new())
        } else {
            None
        };

        Ok(Brancher {
            hero,
            opponents: self.opponents,
            board,
            committed,
            deck: self.deck.unwrap_or_default(),
            memo,
            deadline: self.deadline,
        })
    }
}

/// Exhaustive equity of one hand against a fixed set of opponents.
///
/// The brancher owns the board and grows it one card at a time, trying
/// every card that is not yet committed, until it holds five cards. Each
/// complete board is a showdown. Each partial board is the uniform average
/// of the boards one card further on. Results are memoized on the set of
/// cards on the board, so every ordering of the same cards is only
/// computed once.
///
/// The memo is only valid for this hero, these opponents and this deck, so
/// it lives and dies with the brancher.
#[derive(Debug, Clone)]
pub struct Brancher {
    hero: Hand,
    opponents: Vec<Hand>,
    board: Board,
    /// Hole cards of every hand plus the board.
    committed: CardBitSet,
    deck: CardBitSet,
    memo: Option<HashMap<u64, Equity>>,
    deadline: Option<Instant>,
}

impl Brancher {
    /// Probability that the hero ends up with the single best hand.
    /// Ties count against the hero.
    pub fn branch(&mut self) -> Result<f64, PokerOddsError> {
        Ok(self.equity()?.win)
    }

    /// Enumerate every runout of the current board.
    ///
    /// The board is back to where it started when this returns, error or
    /// not.
    pub fn equity(&mut self) -> Result<Equity, PokerOddsError> {
        let span = trace_span!("Brancher::equity", board = %self.board);
        let _enter = span.enter();

        let result = self.expand()?;
        event!(
            tracing::Level::DEBUG,
            hero = %self.hero,
            memo_len = self.memo_len(),
            %result,
            "Enumeration finished"
        );
        Ok(result)
    }

    /// Same result as `equity`, with the first card of the runout spread
    /// across the rayon pool. Each worker gets its own board and memo.
    #[cfg(feature = "parallel")]
    pub fn equity_parallel(&mut self) -> Result<Equity, PokerOddsError> {
        use rayon::prelude::*;

        if self.board.is_complete() {
            return self.equity();
        }
        let candidates: Vec<Card> = self.candidates().into_iter().collect();
        if candidates.is_empty() {
            return Err(Invariant::DeckExhausted(self.board.len()).into());
        }

        let span = trace_span!("Brancher::equity_parallel", board = %self.board);
        let _enter = span.enter();
        event!(
            tracing::Level::INFO,
            branches = candidates.len(),
            "Splitting enumeration across workers"
        );

        let template: &Brancher = self;
        let total = candidates
            .par_iter()
            .map(|card| template.worker().deal_and_expand(*card))
            .try_reduce(Equity::default, |a, b| Ok(a + b))?;
        Ok(total / candidates.len() as f64)
    }

    /// `branch` on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn branch_parallel(&mut self) -> Result<f64, PokerOddsError> {
        Ok(self.equity_parallel()?.win)
    }

    /// Deal a card onto the board. Later calls to `branch` start from the
    /// longer board and reuse whatever the memo already holds.
    pub fn push(&mut self, card: Card) -> Result<(), PokerOddsError> {
        if self.committed.contains(card) {
            return Err(PokerOddsError::DuplicateCardInPool(card));
        }
        self.board.push(card)?;
        self.committed.insert(card);
        Ok(())
    }

    /// Take the last card back off the board.
    pub fn pop(&mut self) -> Result<Option<Card>, PokerOddsError> {
        match self.board.pop()? {
            Some(card) => {
                self.committed.remove(card)?;
                Ok(Some(card))
            }
            None => Ok(None),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hero(&self) -> &Hand {
        &self.hero
    }

    pub fn opponents(&self) -> &[Hand] {
        &self.opponents
    }

    /// Number of board states memoized so far.
    pub fn memo_len(&self) -> usize {
        self.memo.as_ref().map_or(0, HashMap::len)
    }

    /// Cards that can come next.
    fn candidates(&self) -> CardBitSet {
        self.deck & !self.committed
    }

    fn check_deadline(&self) -> Result<(), PokerOddsError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(PokerOddsError::DeadlineExceeded)
            }
            _ => Ok(()),
        }
    }

    /// A copy that shares nothing mutable with `self`.
    #[cfg(feature = "parallel")]
    fn worker(&self) -> Brancher {
        Brancher {
            hero: self.hero,
            opponents: self.opponents.clone(),
            board: self.board.clone(),
            committed: self.committed,
            deck: self.deck,
            memo: self.memo.as_ref().map(|_| HashMap::new()),
            deadline: self.deadline,
        }
    }

    fn expand(&mut self) -> Result<Equity, PokerOddsError> {
        let key = self.board.set().bits();
        if let Some(hit) = self.memo.as_ref().and_then(|memo| memo.get(&key)) {
            return Ok(*hit);
        }

        let result = if self.board.is_complete() {
            showdown(&self.hero, &self.opponents, self.board.set())?
        } else {
            self.check_deadline()?;
            let candidates = self.candidates();
            if candidates.is_empty() {
                return Err(Invariant::DeckExhausted(self.board.len()).into());
            }
            let mut total = Equity::default();
            for card in candidates {
                total += self.deal_and_expand(card)?;
            }
            total / candidates.count() as f64
        };

        if let Some(memo) = self.memo.as_mut() {
            memo.insert(key, result);
        }
        Ok(result)
    }

    fn deal_and_expand(&mut self, card: Card) -> Result<Equity, PokerOddsError> {
        self.board.push(card)?;
        self.committed.insert(card);
        let result = self.expand();
        self.committed.remove(card)?;
        self.board.pop()?;
        result
    }
}
