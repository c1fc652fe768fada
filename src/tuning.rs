//! Data-driven game balance
//!
//! Every gameplay constant lives here with the values the game ships
//! with. A JSON file can override any subset of fields; anything missing
//! or malformed falls back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Gameplay balance parameters, read-only to the sim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Maze grid size in cells
    pub maze_width: usize,
    pub maze_height: usize,

    /// Seconds around the judgment line that still count as a hit
    pub judgment_window: f32,
    /// Tier thresholds on the absolute offset
    pub perfect_window: f32,
    pub excellent_window: f32,

    /// Award at a dead-center hit
    pub score_scale: f32,
    /// Award lost per second of offset (linear falloff, clamped at zero)
    pub score_slope: f32,
    /// Points lost per miss or bad press
    pub miss_penalty: u32,

    /// Pulse scroll speed at zero score, in timer units per second
    pub base_scroll_speed: f32,
    /// Score at which the scroll speed has doubled
    pub speed_ramp_divisor: f32,

    /// Head pulses past this timer are recycled to the tail
    pub expire_threshold: f32,
    /// Timer gap between the tail and a recycled pulse
    pub recycle_gap: f32,
    /// Every `wide_gap_every`-th pulse id gets `wide_gap_extra` more gap
    pub wide_gap_every: u32,
    pub wide_gap_extra: f32,

    /// Opening pattern: beats 0..=beat_count, resting every
    /// `rest_every`-th beat
    pub beat_count: u32,
    pub rest_every: u32,

    /// Win overlay duration in seconds
    pub win_animation_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            maze_width: 6,
            maze_height: 4,
            judgment_window: 0.25,
            perfect_window: 0.05,
            excellent_window: 0.15,
            score_scale: 100.0,
            score_slope: 400.0,
            miss_penalty: 50,
            base_scroll_speed: 1.1,
            speed_ramp_divisor: 20_000.0,
            expire_threshold: -5.0,
            recycle_gap: 1.0,
            wide_gap_every: 3,
            wide_gap_extra: 1.0,
            beat_count: 10,
            rest_every: 4,
            win_animation_secs: 1.5,
        }
    }
}

impl Tuning {
    /// Load balance overrides from a JSON file, falling back to the
    /// shipped defaults when the file is absent or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!(
                        "Ignoring malformed tuning file {}: {}",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
