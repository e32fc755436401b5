#![deny(warnings)]
//! Observer implementations for the gofish engine: history scribes, a
//! tracing observer, and the persistence library boundary.

pub mod library;
pub mod scribe;
pub mod trace;

pub use library::{FileLibrary, Library, LibraryError};
pub use scribe::{GameScribe, HistoryEntry};
pub use trace::TraceObserver;
