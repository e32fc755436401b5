use gofish_core::game::observer::{StateObserver, StateView};

/// Observer that emits one structured log line per notification. Useful as
/// a lightweight tap on a running game; it holds no state of its own.
#[derive(Debug, Clone)]
pub struct TraceObserver {
    id: String,
}

impl TraceObserver {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl StateObserver for TraceObserver {
    fn id(&self) -> &str {
        &self.id
    }

    fn update(&mut self, view: &StateView<'_>) {
        tracing::debug!(
            observer = %self.id,
            phase = ?view.phase,
            deck = view.deck_size,
            event = ?view.last_event,
            "state changed"
        );
    }
}
