//! The closed vocabulary of state transitions.
//!
//! Rule-driving collaborators decide what happens, encode the decision as
//! one of these values, and submit it through `GameState::update`. Events
//! are immutable records of already-decided changes, not requests.

use crate::model::card::Card;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};

/// Where a drawn card came from. Only the deck today; the field keeps the
/// event shape stable if a variant with a discard pile ever lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawSource {
    Deck,
}

/// A player gained one card from the deck. The card identity is part of
/// the record, but observation spaces treat it as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawEvent {
    pub player: usize,
    pub card: Card,
    pub source: DrawSource,
}

impl DrawEvent {
    pub const fn from_deck(player: usize, card: Card) -> Self {
        Self {
            player,
            card,
            source: DrawSource::Deck,
        }
    }
}

/// Cards of one rank moved between two hands. An empty `cards` list is a
/// failed request: nothing moved, but the asked player is now known to
/// hold none of the rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeEvent {
    pub from_player: usize,
    pub to_player: usize,
    pub rank: Rank,
    pub cards: Vec<Card>,
}

impl ExchangeEvent {
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

/// A player completed all four cards of a rank into a scored book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEvent {
    pub player: usize,
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Draw(DrawEvent),
    Exchange(ExchangeEvent),
    Book(BookEvent),
}

impl From<DrawEvent> for GameEvent {
    fn from(event: DrawEvent) -> Self {
        GameEvent::Draw(event)
    }
}

impl From<ExchangeEvent> for GameEvent {
    fn from(event: ExchangeEvent) -> Self {
        GameEvent::Exchange(event)
    }
}

impl From<BookEvent> for GameEvent {
    fn from(event: BookEvent) -> Self {
        GameEvent::Book(event)
    }
}
