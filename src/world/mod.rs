//! World simulation: NPC title bouts, ranking drift and the news log

pub mod events;
pub mod simulation;

pub use events::{ShiftCause, WorldBout, WorldEvent, WorldEventKind, WorldLog};
pub use simulation::{is_available, simulate_month, PlayerContext};
