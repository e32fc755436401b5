use crate::game::event::{DrawEvent, GameEvent};
use crate::game::observer::{SharedObserver, StateView, Subject};
use crate::model::card::Card;
use crate::model::deck::{Deck, DeckError};
use crate::model::hand::Hand;
use crate::model::player::Player;
use crate::model::rank::Rank;
use crate::observe::ObservationSpace;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a table is put together. Passed explicitly to the constructor; no
/// shared builder state exists between game instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub num_players: usize,
    pub with_jokers: bool,
    pub seed: Option<u64>,
}

impl GameConfig {
    pub const fn new(num_players: usize) -> Self {
        Self {
            num_players,
            with_jokers: false,
            seed: None,
        }
    }

    pub const fn with_jokers(mut self) -> Self {
        self.with_jokers = true;
        self
    }

    pub const fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    InProgress,
    Terminal,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("a game needs at least two players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("player index {0} is out of range")]
    UnknownPlayer(usize),
    #[error("player {0} cannot exchange cards with itself")]
    SelfExchange(usize),
    #[error("card {card} does not carry the exchanged rank {rank}")]
    RankMismatch { rank: Rank, card: Card },
    #[error("player {player} does not hold {card}")]
    InconsistentHand { player: usize, card: Card },
    #[error("a book of {rank}s needs four cards, player {player} holds {held}")]
    IncompleteBook {
        player: usize,
        rank: Rank,
        held: usize,
    },
    #[error("card {0} is not in the deck")]
    CardNotInDeck(Card),
    #[error("no attached observer has id {0:?}")]
    ObserverNotFound(String),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Authoritative table state: deck, hands, per-player observation spaces,
/// and the attached observer list.
///
/// Every mutation goes through [`GameState::update`], which applies exactly
/// one event: physical state first, then every observation space, then a
/// synchronous fan-out to observers. An event that fails validation leaves
/// the state untouched.
pub struct GameState {
    config: GameConfig,
    seed: u64,
    rng: StdRng,
    deck: Deck,
    players: Vec<Player>,
    opponents_map: Vec<Vec<usize>>,
    observations: Vec<ObservationSpace>,
    observers: Vec<SharedObserver>,
    phase: GamePhase,
}

impl GameState {
    pub fn new(config: GameConfig) -> Result<Self, StateError> {
        if config.num_players < 2 {
            return Err(StateError::InvalidPlayerCount(config.num_players));
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::shuffled(config.with_jokers, &mut rng);

        let players = (0..config.num_players)
            .map(|index| Player::new(index, format!("player {index}")))
            .collect();
        let opponents_map = build_opponents_map(config.num_players);
        let observations = build_observations(&opponents_map);

        Ok(Self {
            config,
            seed,
            rng,
            deck,
            players,
            opponents_map,
            observations,
            observers: Vec::new(),
            phase: GamePhase::Setup,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Result<&Player, StateError> {
        self.players
            .get(index)
            .ok_or(StateError::UnknownPlayer(index))
    }

    pub fn opponents(&self, index: usize) -> Result<&[usize], StateError> {
        self.opponents_map
            .get(index)
            .map(Vec::as_slice)
            .ok_or(StateError::UnknownPlayer(index))
    }

    pub fn observation(&self, index: usize) -> Result<&ObservationSpace, StateError> {
        self.observations
            .get(index)
            .ok_or(StateError::UnknownPlayer(index))
    }

    pub fn hands(&self) -> impl Iterator<Item = (usize, &Hand)> {
        self.players.iter().map(|p| (p.index(), p.hand()))
    }

    /// Completed books across all players.
    pub fn book_count(&self) -> usize {
        self.players.iter().map(|p| p.books().len()).sum()
    }

    /// Applies one event: mutate deck and hands, bring every observation
    /// space up to date, then notify observers. Validation happens up
    /// front, so a rejected event mutates nothing.
    pub fn update(&mut self, event: GameEvent) -> Result<(), StateError> {
        self.validate(&event)?;
        self.apply(&event);
        for space in &mut self.observations {
            space.update(&event);
        }
        if matches!(self.phase, GamePhase::Setup) {
            self.phase = GamePhase::InProgress;
        }
        self.fan_out(Some(&event));
        Ok(())
    }

    /// Moves `count` cards from the deck into every hand, round-robin, one
    /// draw event at a time.
    pub fn deal(&mut self, count: usize) -> Result<(), StateError> {
        let needed = count * self.players.len();
        if needed > self.deck.len() {
            return Err(DeckError::InsufficientCards {
                requested: needed,
                remaining: self.deck.len(),
            }
            .into());
        }
        for _ in 0..count {
            for index in 0..self.players.len() {
                let Some(card) = self.deck.peek() else {
                    return Err(DeckError::InsufficientCards {
                        requested: 1,
                        remaining: 0,
                    }
                    .into());
                };
                self.update(DrawEvent::from_deck(index, card).into())?;
            }
        }
        Ok(())
    }

    /// Rebuilds deck, hands, books, and observation spaces to initial
    /// conditions. Observers and player identities survive.
    pub fn reset(&mut self) {
        self.deck = Deck::shuffled(self.config.with_jokers, &mut self.rng);
        for player in &mut self.players {
            player.clear_for_new_game();
        }
        self.observations = build_observations(&self.opponents_map);
        self.phase = GamePhase::Setup;
    }

    /// A rule collaborator declares the game over; the core records the
    /// phase and nothing else.
    pub fn mark_terminal(&mut self) {
        self.phase = GamePhase::Terminal;
    }

    fn validate(&self, event: &GameEvent) -> Result<(), StateError> {
        match event {
            GameEvent::Draw(draw) => {
                self.player(draw.player)?;
                if !self.deck.contains(draw.card) {
                    return Err(StateError::CardNotInDeck(draw.card));
                }
                Ok(())
            }
            GameEvent::Exchange(exchange) => {
                self.player(exchange.to_player)?;
                let giver = self.player(exchange.from_player)?;
                if exchange.from_player == exchange.to_player {
                    return Err(StateError::SelfExchange(exchange.from_player));
                }
                for &card in &exchange.cards {
                    if !card.matches_rank(exchange.rank) {
                        return Err(StateError::RankMismatch {
                            rank: exchange.rank,
                            card,
                        });
                    }
                }
                for &card in &exchange.cards {
                    let listed = exchange.cards.iter().filter(|&&c| c == card).count();
                    if giver.hand().count_of(card) < listed {
                        return Err(StateError::InconsistentHand {
                            player: exchange.from_player,
                            card,
                        });
                    }
                }
                Ok(())
            }
            GameEvent::Book(book) => {
                let player = self.player(book.player)?;
                let held = player.hand().rank_count(book.rank);
                if held < 4 {
                    return Err(StateError::IncompleteBook {
                        player: book.player,
                        rank: book.rank,
                        held,
                    });
                }
                Ok(())
            }
        }
    }

    // Infallible once `validate` has passed.
    fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Draw(draw) => {
                let _ = self.deck.remove(draw.card);
                self.players[draw.player].hand_mut().add(draw.card);
            }
            GameEvent::Exchange(exchange) => {
                for &card in &exchange.cards {
                    let _ = self.players[exchange.from_player].hand_mut().remove(card);
                    self.players[exchange.to_player].hand_mut().add(card);
                }
            }
            GameEvent::Book(book) => {
                let player = &mut self.players[book.player];
                for card in player.hand().cards_of_rank(book.rank) {
                    let _ = player.hand_mut().remove(card);
                }
                player.record_book(book.rank);
            }
        }
    }

    fn fan_out(&self, last_event: Option<&GameEvent>) {
        let view = StateView {
            phase: self.phase,
            deck_size: self.deck.len(),
            players: &self.players,
            observations: &self.observations,
            last_event,
        };
        for observer in &self.observers {
            observer.borrow_mut().update(&view);
        }
    }
}

impl Subject for GameState {
    fn attach(&mut self, observer: SharedObserver) {
        self.observers.push(observer);
    }

    fn detach(&mut self, id: &str) -> Result<SharedObserver, StateError> {
        match self
            .observers
            .iter()
            .position(|observer| observer.borrow().id() == id)
        {
            Some(index) => Ok(self.observers.remove(index)),
            None => Err(StateError::ObserverNotFound(id.to_string())),
        }
    }

    fn notify(&mut self) {
        self.fan_out(None);
    }
}

fn build_opponents_map(num_players: usize) -> Vec<Vec<usize>> {
    (0..num_players)
        .map(|i| (0..num_players).filter(|&j| j != i).collect())
        .collect()
}

fn build_observations(opponents_map: &[Vec<usize>]) -> Vec<ObservationSpace> {
    opponents_map
        .iter()
        .enumerate()
        .map(|(owner, opponents)| ObservationSpace::new(owner, opponents))
        .collect()
}
