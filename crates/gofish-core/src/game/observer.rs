use crate::game::event::GameEvent;
use crate::game::state::{GamePhase, StateError};
use crate::model::player::Player;
use crate::observe::ObservationSpace;
use std::cell::RefCell;
use std::rc::Rc;

/// Read-only view of the table handed to observers on each notification.
///
/// `last_event` is the event whose application triggered the callback, or
/// `None` for a bare `notify`.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    pub phase: GamePhase,
    pub deck_size: usize,
    pub players: &'a [Player],
    pub observations: &'a [ObservationSpace],
    pub last_event: Option<&'a GameEvent>,
}

/// External subscriber to state changes.
///
/// Callbacks run synchronously on the game loop, once per applied event,
/// in attachment order. Observers must not touch the attachment list from
/// inside their own callback.
pub trait StateObserver {
    /// Stable identifier; used for detachment and as a persistence key.
    fn id(&self) -> &str;

    fn update(&mut self, view: &StateView<'_>);
}

/// Handle under which observers are attached. The caller keeps a clone, so
/// recorded state (histories, counters) stays reachable while the game
/// state drives the callback.
pub type SharedObserver = Rc<RefCell<dyn StateObserver>>;

pub fn shared<O: StateObserver + 'static>(observer: O) -> Rc<RefCell<O>> {
    Rc::new(RefCell::new(observer))
}

/// Capability contract of an observable game state.
pub trait Subject {
    fn attach(&mut self, observer: SharedObserver);

    /// Removes the observer with the given id, returning its handle.
    fn detach(&mut self, id: &str) -> Result<SharedObserver, StateError>;

    /// Synchronously fans the current state out to every attached observer.
    fn notify(&mut self);
}
