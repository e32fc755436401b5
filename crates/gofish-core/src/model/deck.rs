use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeckError {
    #[error("requested {requested} cards with {remaining} remaining")]
    InsufficientCards { requested: usize, remaining: usize },
}

/// Ordered card stock. The "top" is the end of the sequence, so every draw
/// is a pop regardless of how the deck was shuffled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// Deterministic build order; Jokers, when present, sit on top.
    pub fn build(with_jokers: bool) -> Self {
        let mut deck = Self::standard();
        if with_jokers {
            deck.cards.push(Card::Joker);
            deck.cards.push(Card::Joker);
        }
        deck
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(with_jokers: bool, rng: &mut R) -> Self {
        let mut deck = Self::build(with_jokers);
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(with_jokers: bool, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(with_jokers, &mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Removes and returns `n` cards from the top. On failure the deck is
    /// left untouched.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::InsufficientCards {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        let at = self.cards.len() - n;
        Ok(self.cards.split_off(at))
    }

    pub fn draw_one(&mut self) -> Result<Card, DeckError> {
        match self.cards.pop() {
            Some(card) => Ok(card),
            None => Err(DeckError::InsufficientCards {
                requested: 1,
                remaining: 0,
            }),
        }
    }

    pub fn peek(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    /// Removes one instance of `card`, searching from the top.
    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().rposition(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::{Deck, DeckError};
    use crate::model::card::Card;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = Deck::standard();
        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(deck.len(), 52);
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn joker_deck_has_54_cards_with_jokers_on_top() {
        let deck = Deck::build(true);
        assert_eq!(deck.len(), 54);
        assert_eq!(deck.cards()[52], Card::Joker);
        assert_eq!(deck.cards()[53], Card::Joker);
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let mut deck = Deck::build(true);
        let mut before = deck.cards().to_vec();
        deck.shuffle_in_place(&mut StdRng::seed_from_u64(7));
        let mut after = deck.cards().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(false, 42);
        let deck_b = Deck::shuffled_with_seed(false, 42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(false, 1);
        let deck_b = Deck::shuffled_with_seed(false, 2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn draw_removes_from_the_top() {
        let mut deck = Deck::standard();
        let top = deck.peek().unwrap();
        let drawn = deck.draw(3).unwrap();
        assert_eq!(drawn.len(), 3);
        assert_eq!(deck.len(), 49);
        assert!(drawn.contains(&top));
        for card in &drawn {
            assert!(!deck.contains(*card));
        }
    }

    #[test]
    fn overdraw_fails_and_leaves_deck_untouched() {
        let mut deck = Deck::standard();
        let before = deck.cards().to_vec();
        let err = deck.draw(53).unwrap_err();
        assert_eq!(
            err,
            DeckError::InsufficientCards {
                requested: 53,
                remaining: 52
            }
        );
        assert_eq!(deck.cards(), before.as_slice());
    }

    #[test]
    fn remove_takes_one_instance_by_identity() {
        let mut deck = Deck::build(true);
        assert!(deck.remove(Card::Joker));
        assert_eq!(deck.len(), 53);
        assert!(deck.contains(Card::Joker));
        assert!(deck.remove(Card::Joker));
        assert!(!deck.contains(Card::Joker));
        assert!(!deck.remove(Card::Joker));
    }
}
