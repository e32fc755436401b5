use crate::library::{Library, LibraryError};
use gofish_core::game::event::GameEvent;
use gofish_core::game::observer::{StateObserver, StateView};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sequence: u64,
    pub event: Option<GameEvent>,
    pub deck_size: usize,
    pub hand_sizes: Vec<usize>,
    pub book_count: usize,
}

#[derive(Debug, Serialize)]
struct HistoryDocument<'a> {
    game: &'a str,
    tag: Option<&'a str>,
    entries: &'a [HistoryEntry],
}

/// Observer that archives every state change it witnesses and can hand the
/// accumulated history to a [`Library`] as an opaque JSON blob.
#[derive(Debug, Clone)]
pub struct GameScribe {
    id: String,
    entries: Vec<HistoryEntry>,
}

impl GameScribe {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
        }
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Persists the recorded history under `game_name` and this scribe's
    /// id, with an optional metadata tag embedded in the blob.
    pub fn write_to_library(
        &self,
        library: &dyn Library,
        game_name: &str,
        tag: Option<&str>,
    ) -> Result<PathBuf, LibraryError> {
        let document = HistoryDocument {
            game: game_name,
            tag,
            entries: &self.entries,
        };
        let blob = serde_json::to_vec_pretty(&document)?;
        let path = library.save(game_name, &self.id, &blob)?;
        tracing::debug!(
            game = game_name,
            scribe = %self.id,
            entries = self.entries.len(),
            "history written to library"
        );
        Ok(path)
    }
}

impl Default for GameScribe {
    fn default() -> Self {
        Self::new("0000")
    }
}

impl StateObserver for GameScribe {
    fn id(&self) -> &str {
        &self.id
    }

    fn update(&mut self, view: &StateView<'_>) {
        let entry = HistoryEntry {
            sequence: self.entries.len() as u64,
            event: view.last_event.cloned(),
            deck_size: view.deck_size,
            hand_sizes: view.players.iter().map(|p| p.hand().len()).collect(),
            book_count: view.players.iter().map(|p| p.books().len()).sum(),
        };
        self.entries.push(entry);
    }
}
