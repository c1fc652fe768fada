//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (all randomness enters at match construction)
//! - No rendering, audio-device, or platform dependencies
//! - Side effects leave as `AudioEvent`s drained by the caller

pub mod maze;
pub mod pulse;
pub mod state;
pub mod tick;

pub use maze::{Cell, Maze};
pub use pulse::{Pulse, PulseQueue, PulseStatus};
pub use state::{AudioEvent, Direction, Feedback, MatchState, Player, PlayerId};
pub use tick::{press, tick};
