use std::fmt;
use std::str::FromStr;

use super::PokerOddsError;

/// Lowest card rank, a deuce.
pub const MIN_RANK: u8 = 2;
/// Highest card rank, an ace.
pub const MAX_RANK: u8 = 14;

/// Enum for the four different suits.
///
/// The discriminant is the suit's ordinal inside a card index. Suits are
/// never ranked against each other.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
pub enum Suit {
    /// Clubs
    Club = 0,
    /// Hearts
    Heart = 1,
    /// Spades
    Spade = 2,
    /// Diamonds
    Diamond = 3,
}

/// All of the `Suit`'s, in ordinal order.
const SUITS: [Suit; 4] = [Suit::Club, Suit::Heart, Suit::Spade, Suit::Diamond];

impl Suit {
    /// The suit's position inside a card index.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(s: u8) -> Option<Suit> {
        SUITS.get(usize::from(s)).copied()
    }

    pub fn from_char(s: char) -> Option<Suit> {
        match s {
            'c' => Some(Suit::Club),
            'h' => Some(Suit::Heart),
            's' => Some(Suit::Spade),
            'd' => Some(Suit::Diamond),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Club => 'c',
            Suit::Heart => 'h',
            Suit::Spade => 's',
            Suit::Diamond => 'd',
        }
    }
}

/// Parse a rank character. `T` is ten, `A` is fourteen.
pub fn rank_from_char(c: char) -> Option<u8> {
    match c {
        'A' => Some(14),
        'K' => Some(13),
        'Q' => Some(12),
        'J' => Some(11),
        'T' => Some(10),
        '2'..='9' => c.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}

/// The character used to print a rank. Out of range ranks print as `?`.
pub fn rank_to_char(rank: u8) -> char {
    match rank {
        14 => 'A',
        13 => 'K',
        12 => 'Q',
        11 => 'J',
        10 => 'T',
        2..=9 => char::from(b'0' + rank),
        _ => '?',
    }
}

/// A single playing card.
///
/// The rank is the plain face value in `2..=14` with the ace high. Every
/// card maps onto a dense index in `0..52`, `(rank - 2) * 4 + suit`, which
/// is what card sets and memo keys are built from.
///
/// Ordering is rank major. The suit only breaks ties so that `Ord` agrees
/// with `Eq`; it carries no poker meaning.
#[derive(PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    /// Build a card, checking the rank.
    ///
    /// ```
    /// use poker_odds::core::{Card, PokerOddsError, Suit};
    ///
    /// let card = Card::new(14, Suit::Spade).unwrap();
    /// assert_eq!(14, card.rank());
    /// assert_eq!(Err(PokerOddsError::InvalidCard(15)), Card::new(15, Suit::Spade));
    /// ```
    pub fn new(rank: u8, suit: Suit) -> Result<Self, PokerOddsError> {
        if (MIN_RANK..=MAX_RANK).contains(&rank) {
            Ok(Self { rank, suit })
        } else {
            Err(PokerOddsError::InvalidCard(rank))
        }
    }

    /// Face value, `2..=14`.
    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Dense index in `0..52`.
    ///
    /// ```
    /// use poker_odds::core::{Card, Suit};
    ///
    /// assert_eq!(0, Card::new(2, Suit::Club).unwrap().index());
    /// assert_eq!(51, Card::new(14, Suit::Diamond).unwrap().index());
    /// ```
    pub fn index(&self) -> u8 {
        (self.rank - MIN_RANK) * 4 + self.suit.ordinal()
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.index()
    }
}

impl TryFrom<u8> for Card {
    type Error = PokerOddsError;

    fn try_from(idx: u8) -> Result<Self, Self::Error> {
        if idx >= 52 {
            return Err(PokerOddsError::InvalidCardIndex(idx));
        }
        let suit = Suit::from_ordinal(idx % 4).ok_or(PokerOddsError::InvalidCardIndex(idx))?;
        Card::new(idx / 4 + MIN_RANK, suit)
    }
}

impl FromStr for Card {
    type Err = PokerOddsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let card = parse_card(&mut chars)?;
        if chars.next().is_some() {
            return Err(PokerOddsError::UnparsedCharsRemaining);
        }
        Ok(card)
    }
}

/// Pull one two character card off of `chars`.
pub(crate) fn parse_card(chars: &mut impl Iterator<Item = char>) -> Result<Card, PokerOddsError> {
    let rank = chars
        .next()
        .ok_or(PokerOddsError::TooFewChars)
        .and_then(|c| rank_from_char(c).ok_or(PokerOddsError::UnexpectedValueChar))?;
    let suit = chars
        .next()
        .ok_or(PokerOddsError::TooFewChars)
        .and_then(|c| Suit::from_char(c).ok_or(PokerOddsError::UnexpectedSuitChar))?;
    Card::new(rank, suit)
}

/// Split a run of concatenated cards like `"AcKdTh"`.
pub(crate) fn parse_cards(s: &str) -> Result<Vec<Card>, PokerOddsError> {
    let mut chars = s.chars().filter(|c| !c.is_whitespace()).peekable();
    let mut cards = Vec::new();
    while chars.peek().is_some() {
        cards.push(parse_card(&mut chars)?);
    }
    Ok(cards)
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", rank_to_char(self.rank), self.suit.to_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({self})")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::mem;

    #[test]
    fn test_constructor() {
        let c = Card::new(3, Suit::Spade).unwrap();
        assert_eq!(Suit::Spade, c.suit());
        assert_eq!(3, c.rank());
    }

    #[test]
    fn test_invalid_rank() {
        assert_eq!(Err(PokerOddsError::InvalidCard(1)), Card::new(1, Suit::Club));
        assert_eq!(Err(PokerOddsError::InvalidCard(0)), Card::new(0, Suit::Club));
        assert_eq!(Err(PokerOddsError::InvalidCard(15)), Card::new(15, Suit::Heart));
    }

    #[test]
    fn test_index_layout() {
        // Deuces fill the bottom four slots, suit is the low part.
        assert_eq!(0, Card::new(2, Suit::Club).unwrap().index());
        assert_eq!(1, Card::new(2, Suit::Heart).unwrap().index());
        assert_eq!(2, Card::new(2, Suit::Spade).unwrap().index());
        assert_eq!(3, Card::new(2, Suit::Diamond).unwrap().index());
        assert_eq!(32, Card::new(10, Suit::Club).unwrap().index());
        assert_eq!(48, Card::new(14, Suit::Club).unwrap().index());
    }

    #[test]
    fn test_index_round_trips_every_card() {
        let mut seen = HashSet::new();
        for idx in 0..52u8 {
            let card = Card::try_from(idx).unwrap();
            assert_eq!(idx, u8::from(card));
            assert!(seen.insert(card));
        }
        assert_eq!(Err(PokerOddsError::InvalidCardIndex(52)), Card::try_from(52));
    }

    #[test]
    fn test_compare() {
        let c1 = Card::new(3, Suit::Spade).unwrap();
        let c2 = Card::new(4, Suit::Spade).unwrap();
        let c3 = Card::new(4, Suit::Club).unwrap();

        assert!(c1 < c2);
        assert!(c1 < c3);
        // Same rank, different suit are still different cards.
        assert_ne!(c2, c3);
        assert_eq!(c2.rank(), c3.rank());
    }

    #[test]
    fn test_parse() {
        let c: Card = "Td".parse().unwrap();
        assert_eq!(Card::new(10, Suit::Diamond).unwrap(), c);
        let c: Card = "Ac".parse().unwrap();
        assert_eq!(Card::new(14, Suit::Club).unwrap(), c);
        let c: Card = "7h".parse().unwrap();
        assert_eq!(Card::new(7, Suit::Heart).unwrap(), c);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Err(PokerOddsError::UnexpectedValueChar), "1c".parse::<Card>());
        assert_eq!(Err(PokerOddsError::UnexpectedSuitChar), "Ax".parse::<Card>());
        assert_eq!(Err(PokerOddsError::TooFewChars), "A".parse::<Card>());
        assert_eq!(Err(PokerOddsError::TooFewChars), "".parse::<Card>());
        assert_eq!(
            Err(PokerOddsError::UnparsedCharsRemaining),
            "AcK".parse::<Card>()
        );
    }

    #[test]
    fn test_parse_cards() {
        let cards = parse_cards("Js Jd Jc").unwrap();
        assert_eq!(3, cards.len());
        assert!(cards.iter().all(|c| c.rank() == 11));
        assert!(parse_cards("").unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        for idx in 0..52u8 {
            let card = Card::try_from(idx).unwrap();
            assert_eq!(card, card.to_string().parse().unwrap());
        }
        assert_eq!("Card(Kh)", format!("{:?}", Card::new(13, Suit::Heart).unwrap()));
    }

    #[test]
    fn test_size() {
        // Card should be really small. Hopefully just two u8's
        assert!(mem::size_of::<Card>() <= 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let card = Card::new(12, Suit::Spade).unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!("\"Qs\"", json);
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
        assert!(serde_json::from_str::<Card>("\"Zs\"").is_err());
    }
}
