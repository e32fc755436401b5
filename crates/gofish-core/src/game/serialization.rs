use super::state::{GamePhase, GameState};
use crate::model::card::Card;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};

/// Serializable capture of the observable table state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateSnapshot {
    pub seed: u64,
    pub phase: GamePhase,
    pub deck_size: usize,
    pub hands: Vec<Vec<Card>>,
    pub books: Vec<Vec<Rank>>,
}

impl StateSnapshot {
    pub fn capture(state: &GameState) -> Self {
        StateSnapshot {
            seed: state.seed(),
            phase: state.phase(),
            deck_size: state.deck().len(),
            hands: state
                .players()
                .iter()
                .map(|p| p.hand().cards().to_vec())
                .collect(),
            books: state.players().iter().map(|p| p.books().to_vec()).collect(),
        }
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::StateSnapshot;
    use crate::game::state::{GameConfig, GameState};

    #[test]
    fn snapshot_serializes_to_json() {
        let state = GameState::new(GameConfig::new(4).seeded(99)).unwrap();
        let json = StateSnapshot::to_json(&state).unwrap();
        assert!(json.contains("\"seed\": 99"));
        assert!(json.contains("\"deck_size\": 52"));
    }

    #[test]
    fn snapshot_roundtrip_preserves_hands() {
        let mut state = GameState::new(GameConfig::new(3).seeded(123)).unwrap();
        state.deal(2).unwrap();
        let snapshot = StateSnapshot::capture(&state);
        let json = StateSnapshot::to_json(&state).unwrap();
        let back = StateSnapshot::from_json(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.deck_size, 46);
        assert!(back.hands.iter().all(|hand| hand.len() == 2));
    }
}
