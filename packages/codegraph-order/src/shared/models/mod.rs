//! Shared models used by every feature

mod occurrence;
mod occurrence_arena;
mod operation;
mod span;

pub use occurrence::{Argument, Base, Occurrence, OccurrenceId};
pub use occurrence_arena::{ArenaStats, OccurrenceArena};
pub use operation::{ArgumentPattern, Operation, OperationTable};
pub use span::Span;
