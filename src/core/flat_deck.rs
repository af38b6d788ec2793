use std::ops::{Index, RangeFull};

use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use super::{Card, Deck};

/// `FlatDeck` is a deck of cards that allows easy
/// indexing into the cards. Dealing pops from the end.
///
/// This is the dealing side of the library, it never takes part in the
/// equity math. Callers shuffle, deal hole cards and boards from it, then
/// hand the dealt cards to the calculators.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatDeck {
    /// Card storage.
    cards: Vec<Card>,
}

impl FlatDeck {
    /// How many cards are there in the deck ?
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Have all cards been dealt ?
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Randomly shuffle the flat deck.
    /// This will ensure the there's no order to the deck.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng)
    }

    /// Deal a card if there is one there to deal.
    /// None if the deck is empty
    ///
    /// ```
    /// use poker_odds::core::{Card, FlatDeck};
    ///
    /// let ace: Card = "Ac".parse().unwrap();
    /// let mut deck: FlatDeck = vec![ace].into();
    /// assert_eq!(Some(ace), deck.deal());
    /// assert_eq!(None, deck.deal());
    /// ```
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

}

impl Index<usize> for FlatDeck {
    type Output = Card;
    fn index(&self, index: usize) -> &Card {
        &self.cards[index]
    }
}

impl Index<RangeFull> for FlatDeck {
    type Output = [Card];
    fn index(&self, index: RangeFull) -> &[Card] {
        &self.cards[index]
    }
}

impl From<Vec<Card>> for FlatDeck {
    fn from(value: Vec<Card>) -> Self {
        Self { cards: value }
    }
}

/// Allow creating a flat deck from a Deck
impl From<Deck> for FlatDeck {
    /// Flatten this deck, consuming it to produce a `FlatDeck` that's
    /// easier to get random access to.
    fn from(value: Deck) -> Self {
        // Bitset iteration is in index order so the same input
        // cards always result in the same starting flat deck
        Self {
            cards: value.into_iter().collect(),
        }
    }
}

impl Default for FlatDeck {
    /// A full, shuffled 52 card deck.
    fn default() -> Self {
        let mut deck: FlatDeck = Deck::default().into();
        deck.shuffle(&mut rng());
        deck
    }
}
