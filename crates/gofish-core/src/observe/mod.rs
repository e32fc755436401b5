//! Event-derived belief tracking over opponents' hands.
//!
//! One [`ObservationSpace`] per player, owned by the game state and updated
//! from events only — never from hidden deck contents.

mod space;

pub use space::{ObservationSpace, OpponentBelief, RankMask};
