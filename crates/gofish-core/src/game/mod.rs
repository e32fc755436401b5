pub mod event;
pub mod observer;
pub mod serialization;
pub mod state;
