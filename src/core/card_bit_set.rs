use std::fmt::Debug;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not};

#[cfg(feature = "serde")]
use serde::ser::SerializeSeq;

use super::{Card, Invariant, PokerOddsError};

/// This struct is a bitset for cards.
/// Each card is represented by the bit at its index in a 64 bit integer;
/// only the low 52 bits are ever used.
///
/// It is used both for "cards already committed" and, through `bits()`, as
/// the key the enumerator memoizes board states on.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardBitSet {
    cards: u64,
}

const FIFTY_TWO_ONES: u64 = (1 << 52) - 1;

impl CardBitSet {
    /// Create a new empty bitset
    ///
    /// ```
    /// use poker_odds::core::CardBitSet;
    /// let cards = CardBitSet::new();
    /// assert!(cards.is_empty());
    /// ```
    pub const fn new() -> Self {
        Self { cards: 0 }
    }

    /// Insert a card. Inserting a card twice is a no-op.
    ///
    /// Returns true if the card was not already present.
    ///
    /// ```
    /// use poker_odds::core::{Card, CardBitSet, Suit};
    /// let mut cards = CardBitSet::new();
    ///
    /// let ace = Card::new(14, Suit::Club).unwrap();
    /// assert!(cards.insert(ace));
    /// assert!(!cards.insert(ace));
    /// assert_eq!(1, cards.count());
    /// ```
    pub fn insert(&mut self, card: Card) -> bool {
        let bit: u64 = 1 << u8::from(card);
        let fresh = self.cards & bit == 0;
        self.cards |= bit;
        fresh
    }

    /// Remove a card from the bitset.
    ///
    /// Callers only remove cards they put there, so an absent card is a
    /// broken invariant rather than a no-op.
    ///
    /// ```
    /// use poker_odds::core::{Card, CardBitSet, Suit};
    /// let mut cards = CardBitSet::new();
    /// let six = Card::new(6, Suit::Club).unwrap();
    ///
    /// cards.insert(six);
    /// assert!(cards.remove(six).is_ok());
    /// assert!(!cards.contains(six));
    /// assert!(cards.remove(six).is_err());
    /// ```
    pub fn remove(&mut self, card: Card) -> Result<(), PokerOddsError> {
        if !self.contains(card) {
            return Err(Invariant::CardNotInSet(card).into());
        }
        self.cards &= !(1 << u8::from(card));
        Ok(())
    }

    /// Is the card in the bitset ?
    pub fn contains(&self, card: Card) -> bool {
        (self.cards & (1 << u8::from(card))) != 0
    }

    /// Is the bitset empty ?
    pub fn is_empty(&self) -> bool {
        self.cards == 0
    }

    /// How many cards are in the bitset ?
    ///
    /// ```
    /// use poker_odds::core::{Card, CardBitSet};
    /// let mut cards = CardBitSet::new();
    ///
    /// assert_eq!(0, cards.count());
    /// for idx in 0..13u8 {
    ///    cards.insert(Card::try_from(idx).unwrap());
    ///    assert_eq!(idx as usize + 1, cards.count());
    /// }
    /// ```
    pub fn count(&self) -> usize {
        self.cards.count_ones() as usize
    }

    /// The raw 52 bit value. Two sets holding the same cards always give
    /// the same value, whatever order the cards went in.
    pub fn bits(&self) -> u64 {
        self.cards
    }
}

impl Default for CardBitSet {
    /// Create a new bitset with all the cards in it
    /// ```
    /// use poker_odds::core::CardBitSet;
    ///
    /// let cards = CardBitSet::default();
    ///
    /// assert_eq!(52, cards.count());
    /// ```
    fn default() -> Self {
        Self {
            cards: FIFTY_TWO_ONES,
        }
    }
}

impl Debug for CardBitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(*self).finish()
    }
}

impl From<CardBitSet> for u64 {
    fn from(value: CardBitSet) -> Self {
        value.cards
    }
}

impl FromIterator<Card> for CardBitSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let mut set = CardBitSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Card> for CardBitSet {
    fn extend<T: IntoIterator<Item = Card>>(&mut self, iter: T) {
        for card in iter {
            self.insert(card);
        }
    }
}

impl BitOr<CardBitSet> for CardBitSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            cards: self.cards | rhs.cards,
        }
    }
}

impl BitOr<Card> for CardBitSet {
    type Output = Self;

    fn bitor(self, rhs: Card) -> Self::Output {
        Self {
            cards: self.cards | (1 << u8::from(rhs)),
        }
    }
}

impl BitOrAssign<CardBitSet> for CardBitSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.cards |= rhs.cards;
    }
}

impl BitOrAssign<Card> for CardBitSet {
    fn bitor_assign(&mut self, rhs: Card) {
        self.cards |= 1 << u8::from(rhs);
    }
}

impl BitXor for CardBitSet {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self {
            cards: self.cards ^ rhs.cards,
        }
    }
}

impl BitAnd for CardBitSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            cards: self.cards & rhs.cards,
        }
    }
}

impl BitAndAssign for CardBitSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.cards &= rhs.cards;
    }
}

impl Not for CardBitSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self {
            cards: !self.cards & FIFTY_TWO_ONES, // Ensure we only keep the first 52 bits
        }
    }
}

/// The iterator for the CardBitSet
/// It walks the cards in index order, lowest first.
pub struct CardBitSetIter(u64);

impl IntoIterator for CardBitSet {
    type Item = Card;
    type IntoIter = CardBitSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CardBitSetIter(self.cards)
    }
}

impl Iterator for CardBitSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Self::Item> {
        while self.0 != 0 {
            let idx = self.0.trailing_zeros();
            self.0 &= !(1 << idx);
            // Bits above 51 are never set, so this only skips on corruption.
            if let Ok(card) = Card::try_from(idx as u8) {
                return Some(card);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (0, Some(n))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CardBitSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.count()))?;
        for card in (*self).into_iter() {
            seq.serialize_element(&card)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct CardBitSetVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for CardBitSetVisitor {
    type Value = CardBitSet;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of cards")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = CardBitSet::new();
        while let Some(card) = seq.next_element()? {
            set.insert(card);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CardBitSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(CardBitSetVisitor)
    }
}
