//! Pulse Maze - a two-player rhythm maze race
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, pulse ring, judgment)
//! - `render`: Terminal renderer (crossterm)
//! - `audio`: Event-driven audio output (synthesized, silent-mode capable)
//! - `tuning`: Data-driven game balance
//! - `settings`: User preferences

pub mod audio;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;
