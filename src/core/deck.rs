use super::{Card, CardBitSet, CardBitSetIter};

/// Deck struct that can tell quickly if a card is in the deck.
///
/// This is the unordered view of the cards nobody holds yet. For dealing in
/// a random order flatten it into a `FlatDeck`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deck(CardBitSet);

impl Deck {
    /// Create a new empty deck
    ///
    /// ```
    /// use poker_odds::core::Deck;
    ///
    /// let deck = Deck::new();
    /// assert!(deck.is_empty());
    /// assert_eq!(0, deck.len());
    /// ```
    pub fn new() -> Self {
        Self(CardBitSet::new())
    }

    /// The full 52 card deck minus everything in `dead`.
    ///
    /// ```
    /// use poker_odds::core::{Card, CardBitSet, Deck};
    ///
    /// let dead: CardBitSet = ["Ac", "Ad"].iter().map(|s| s.parse::<Card>().unwrap()).collect();
    /// assert_eq!(50, Deck::without(dead).len());
    /// ```
    pub fn without(dead: CardBitSet) -> Self {
        Self(!dead)
    }

    /// How many cards are there in the deck.
    pub fn len(&self) -> usize {
        self.0.count()
    }

    /// Have all of the cards been dealt from this deck?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Create the default 52 card deck
///
/// ```
/// use poker_odds::core::Deck;
///
/// assert_eq!(52, Deck::default().len());
/// ```
impl Default for Deck {
    fn default() -> Self {
        Self(CardBitSet::default())
    }
}

impl From<CardBitSet> for Deck {
    fn from(value: CardBitSet) -> Self {
        Self(value)
    }
}

impl From<Deck> for CardBitSet {
    fn from(value: Deck) -> Self {
        value.0
    }
}

/// Turn a deck into an iterator
impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = CardBitSetIter;

    fn into_iter(self) -> CardBitSetIter {
        self.0.into_iter()
    }
}
