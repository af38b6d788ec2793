use std::fmt;

use super::{Card, CardBitSet, PokerOddsError};

/// All the different possible hand categories, weakest first.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Category {
    /// The lowest rank.
    /// No matches
    HighCard,
    /// One Card matches another.
    Pair,
    /// Two different pair of matching cards.
    TwoPair,
    /// Three of the same value.
    Trips,
    /// Five cards in a sequence
    Straight,
    /// Five cards of the same suit
    Flush,
    /// Three of one value and two of another value
    FullHouse,
    /// Four of the same value.
    Quads,
    /// Five cards in a sequence all for the same suit.
    StraightFlush,
    /// Ten through ace of one suit.
    RoyalFlush,
}

/// The evaluated strength of a pool of cards.
///
/// Ordering is by category first, then tiebreak. A tiebreak only means
/// something when compared against another strength of the same category.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Strength {
    pub category: Category,
    pub tiebreak: u32,
}

impl Strength {
    pub fn new(category: Category, tiebreak: u32) -> Self {
        Self { category, tiebreak }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.category, self.tiebreak)
    }
}

/// Ten through ace, as a rank mask.
const BROADWAY: u16 = 0b11111 << 10;
/// Bits of one rank inside a card set, before shifting.
const RANK_NIBBLE: u64 = 0xF;
/// Every card of one suit inside a card set, before shifting by the suit.
const SUIT_STRIPE: u64 = 0x1111_1111_1111_1;

/// How many of each rank are in the pool, indexed by rank `0..=14`.
/// Slots 0 and 1 are always zero.
fn rank_counts(cards: u64) -> [u8; 15] {
    let mut counts = [0u8; 15];
    for (i, count) in counts.iter_mut().enumerate().skip(2) {
        *count = ((cards >> ((i - 2) * 4)) & RANK_NIBBLE).count_ones() as u8;
    }
    counts
}

/// The ranks present, as a mask with bit `r` set for rank `r`.
fn rank_mask(counts: &[u8; 15]) -> u16 {
    counts
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > 0)
        .fold(0, |mask, (r, _)| mask | (1 << r))
}

/// The ranks held in one suit, as a mask with bit `r` set for rank `r`.
fn suit_mask(cards: u64, suit: u8) -> u16 {
    let stripe = (cards >> suit) & SUIT_STRIPE;
    let mut mask = 0u16;
    for r in 0..13 {
        if stripe & (1 << (r * 4)) != 0 {
            mask |= 1 << (r + 2);
        }
    }
    mask
}

/// Find the best run of five in a rank mask.
///
/// The ace also plays as rank one, and runs are scanned from the top so the
/// first hit is the highest straight. Returns the run's top rank.
fn top_straight(mask: u16) -> Option<u8> {
    let mut mask = mask;
    if mask & (1 << 14) != 0 {
        mask |= 1 << 1;
    }
    (5..=14u8).rev().find(|high| {
        let run = 0b11111u16 << (high - 4);
        mask & run == run
    })
}

/// The highest rank set in `mask`.
fn highest(mask: u16) -> u8 {
    (15 - mask.leading_zeros()) as u8
}

/// The highest rank other than `skip` whose count satisfies `pred`.
fn find_rank(counts: &[u8; 15], skip: u8, pred: impl Fn(u8) -> bool) -> Option<u8> {
    (2..=14u8)
        .rev()
        .find(|&r| r != skip && pred(counts[usize::from(r)]))
}

/// Pack ranks radix-100, strongest group first.
///
/// Ranks are ordered by multiplicity, then by rank, both descending. The
/// first `bound` groups are folded in as `kicker * 100 + rank`.
fn compute_kicker_as_best_five(bound: usize, counts: &[u8; 15]) -> u32 {
    let mut groups = [(0u8, 0u8); 13];
    let mut len = 0;
    for (rank, &count) in counts.iter().enumerate() {
        if count > 0 {
            groups[len] = (count, rank as u8);
            len += 1;
        }
    }
    let groups = &mut groups[..len];
    groups.sort_unstable_by(|a, b| b.cmp(a));

    groups
        .iter()
        .take(bound)
        .fold(0, |kicker, &(_, rank)| kicker * 100 + u32::from(rank))
}

/// Classify a pool of distinct cards.
///
/// Works for anything from two to seven cards. Categories are checked
/// strongest first and the first match wins.
fn rank_cards(cards: CardBitSet) -> Strength {
    let bits = cards.bits();
    let counts = rank_counts(bits);
    let suits: [u16; 4] = [0, 1, 2, 3].map(|s| suit_mask(bits, s));

    if suits.iter().any(|s| s & BROADWAY == BROADWAY) {
        return Strength::new(Category::RoyalFlush, 14);
    }

    if let Some(high) = suits
        .iter()
        .filter(|s| s.count_ones() >= 5)
        .filter_map(|s| top_straight(*s))
        .max()
    {
        return Strength::new(Category::StraightFlush, u32::from(high));
    }

    if let Some(quad) = find_rank(&counts, 0, |c| c == 4) {
        let kicker = find_rank(&counts, quad, |c| c > 0).unwrap_or(0);
        return Strength::new(
            Category::Quads,
            u32::from(quad) * 100 + u32::from(kicker),
        );
    }

    if let Some(trips) = find_rank(&counts, 0, |c| c >= 3) {
        if let Some(pair) = find_rank(&counts, trips, |c| c >= 2) {
            return Strength::new(
                Category::FullHouse,
                u32::from(trips) * 100 + u32::from(pair),
            );
        }
    }

    if let Some(high) = suits
        .iter()
        .filter(|s| s.count_ones() >= 5)
        .map(|s| highest(*s))
        .max()
    {
        return Strength::new(Category::Flush, u32::from(high));
    }

    if let Some(high) = top_straight(rank_mask(&counts)) {
        return Strength::new(Category::Straight, u32::from(high));
    }

    if find_rank(&counts, 0, |c| c >= 3).is_some() {
        return Strength::new(Category::Trips, compute_kicker_as_best_five(3, &counts));
    }

    if let Some(high_pair) = find_rank(&counts, 0, |c| c == 2) {
        if let Some(low_pair) = find_rank(&counts, high_pair, |c| c == 2) {
            return Strength::new(
                Category::TwoPair,
                u32::from(high_pair) * 100 + u32::from(low_pair),
            );
        }
        return Strength::new(Category::Pair, compute_kicker_as_best_five(4, &counts));
    }

    Strength::new(Category::HighCard, compute_kicker_as_best_five(5, &counts))
}

/// Can this turn into a hand strength?
pub trait Rankable {
    /// The cards in play, failing if any card shows up twice.
    fn pool(&self) -> Result<CardBitSet, PokerOddsError>;

    /// Rank the pool. It doesn't do any caching so it's left up to the user
    /// to understand that duplicate work will be done if this is called more
    /// than once.
    fn strength(&self) -> Result<Strength, PokerOddsError> {
        Ok(rank_cards(self.pool()?))
    }
}

/// A set can never hold a card twice.
impl Rankable for CardBitSet {
    fn pool(&self) -> Result<CardBitSet, PokerOddsError> {
        Ok(*self)
    }
}

impl Rankable for [Card] {
    fn pool(&self) -> Result<CardBitSet, PokerOddsError> {
        let mut set = CardBitSet::new();
        for card in self {
            if !set.insert(*card) {
                return Err(PokerOddsError::DuplicateCardInPool(*card));
            }
        }
        Ok(set)
    }
}

impl Rankable for Vec<Card> {
    fn pool(&self) -> Result<CardBitSet, PokerOddsError> {
        self.as_slice().pool()
    }
}

/// Evaluate two hole cards against a board of zero to five cards.
///
/// ```
/// use poker_odds::core::{evaluate, Card, Category};
///
/// let ace_c: Card = "Ac".parse().unwrap();
/// let ace_d: Card = "Ad".parse().unwrap();
/// let board: Vec<Card> = ["Js", "Jd", "Jc"].iter().map(|s| s.parse().unwrap()).collect();
///
/// let strength = evaluate((ace_c, ace_d), &board).unwrap();
/// assert_eq!(Category::FullHouse, strength.category);
/// assert_eq!(1114, strength.tiebreak);
/// ```
pub fn evaluate(hole: (Card, Card), board: &[Card]) -> Result<Strength, PokerOddsError> {
    let mut pool = board.pool()?;
    for card in [hole.0, hole.1] {
        if !pool.insert(card) {
            return Err(PokerOddsError::DuplicateCardInPool(card));
        }
    }
    pool.strength()
}
