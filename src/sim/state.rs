//! Match state and core simulation types
//!
//! Everything a match needs lives here, seeded and reproducible. Audio
//! side effects leave as `AudioEvent`s; the frontend drains them each
//! frame and owns every device concern.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::maze::Maze;
use super::pulse::PulseQueue;
use crate::tuning::Tuning;

/// The four directional inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid delta for one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Facing angle in radians; right is zero and angles grow clockwise,
    /// matching screen coordinates with y pointing down.
    pub fn facing_angle(self) -> f32 {
        use std::f32::consts::PI;
        match self {
            Direction::Right => 0.0,
            Direction::Down => 0.5 * PI,
            Direction::Left => PI,
            Direction::Up => 1.5 * PI,
        }
    }
}

/// Which side of the screen a player occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerId {
    Left,
    Right,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::Left => PlayerId::Right,
            PlayerId::Right => PlayerId::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::Left => 0,
            PlayerId::Right => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerId::Left => "Left",
            PlayerId::Right => "Right",
        }
    }
}

/// Feedback tier shown after a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    Perfect,
    Excellent,
    Good,
    Bad,
    TooLate,
}

impl Feedback {
    pub fn text(self) -> &'static str {
        match self {
            Feedback::None => "",
            Feedback::Perfect => "Perfect!",
            Feedback::Excellent => "Excellent!",
            Feedback::Good => "Good!",
            Feedback::Bad => "Bad!",
            Feedback::TooLate => "Too Late!",
        }
    }
}

/// Audio side effects emitted by the sim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    /// Hit confirmation, pitched by accuracy (rate 1.0 = dead center)
    Ding { side: PlayerId, rate: f32 },
    /// Re-pace one player's loop track; tempo rises with score
    MusicRate { side: PlayerId, rate: f32 },
    /// Stop both loop tracks at match end
    MusicStop,
    /// Winner stinger
    Fanfare { side: PlayerId },
    /// Loser stinger
    Lost { side: PlayerId },
}

/// One racing player.
#[derive(Debug, Clone)]
pub struct Player {
    /// Cell position in the shared maze
    pub x: usize,
    pub y: usize,
    /// Facing angle in radians, updated on every legal move
    pub angle: f32,
    pub score: u32,
    pub feedback: Feedback,
    /// Last loop rate sent out, so `MusicRate` fires only on change
    pub music_rate: f32,
    pub pulses: PulseQueue,
}

impl Player {
    fn new(start: (usize, usize), tuning: &Tuning) -> Self {
        Self {
            x: start.0,
            y: start.1,
            angle: Direction::Down.facing_angle(),
            score: 0,
            feedback: Feedback::None,
            music_rate: 1.0,
            pulses: PulseQueue::seeded(tuning.beat_count, tuning.rest_every),
        }
    }

    /// Score penalty with a hard floor at zero.
    pub fn penalize(&mut self, amount: u32) {
        self.score = self.score.saturating_sub(amount);
    }
}

/// Complete match state (deterministic, seed-reproducible).
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Match seed, kept for reproduction and the rematch log line
    pub seed: u64,
    pub maze: Maze,
    /// Shared goal tile; the first player to stand on it wins
    pub goal: (usize, usize),
    /// Indexed by `PlayerId::index`
    pub players: [Player; 2],
    pub ended: bool,
    pub winner: Option<PlayerId>,
    /// Counts down while the win overlay animates
    pub win_timer: f32,
    /// Side effects accumulated since the last drain
    pub events: Vec<AudioEvent>,
}

impl MatchState {
    /// Create a match from a seed. Identical seeds produce identical
    /// mazes, goals, and pulse patterns.
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let maze = Maze::generate(tuning.maze_width, tuning.maze_height, &mut rng);
        let goal = maze.find_goal();
        Self {
            seed,
            maze,
            goal,
            players: [
                Player::new(Maze::ENTRANCE, tuning),
                Player::new(Maze::ENTRANCE, tuning),
            ],
            ended: false,
            winner: None,
            win_timer: 0.0,
            events: Vec::new(),
        }
    }

    pub fn player(&self, side: PlayerId) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: PlayerId) -> &mut Player {
        &mut self.players[side.index()]
    }

    /// Take this frame's audio side effects.
    pub fn drain_events(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.events)
    }

    /// Win-overlay progress in 0..=1 once the match has ended.
    pub fn win_progress(&self, tuning: &Tuning) -> f32 {
        if tuning.win_animation_secs <= 0.0 {
            return 1.0;
        }
        1.0 - (self.win_timer / tuning.win_animation_secs).clamp(0.0, 1.0)
    }
}
