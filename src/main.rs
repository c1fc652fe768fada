//! Pulse Maze entry point
//!
//! Terminal setup, the frame loop, and input routing. The sim stays pure;
//! everything platform-flavored (clock, keyboard, audio device, files)
//! lives out here.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::ExecutableCommand;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use pulse_maze::audio::AudioOutput;
use pulse_maze::render::Renderer;
use pulse_maze::settings::Settings;
use pulse_maze::sim::{self, Direction, Feedback, MatchState, PlayerId};
use pulse_maze::tuning::Tuning;

/// Render cadence; the sim is advanced with the measured frame delta.
const FRAME_RATE: u64 = 60;

fn main() -> io::Result<()> {
    env_logger::init();

    let settings_path = config_path("PULSE_MAZE_SETTINGS", "pulse-maze-settings.json");
    let settings = Settings::load(&settings_path);
    if !settings_path.exists() {
        settings.save(&settings_path);
    }
    let tuning = Tuning::load(&config_path("PULSE_MAZE_TUNING", "pulse-maze-tuning.json"));

    let seed = initial_seed();
    log::info!("match seed {seed}");

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, seed, &settings, &tuning);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, seed: u64, settings: &Settings, tuning: &Tuning) -> io::Result<()> {
    let mut state = MatchState::new(seed, tuning);
    let mut audio = AudioOutput::new(settings);
    audio.start_loops();
    let mut renderer = Renderer::new();

    let frame_time = Duration::from_micros(1_000_000 / FRAME_RATE);
    let mut last_frame = Instant::now();
    stdout.execute(Clear(ClearType::All))?;

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Discrete presses only; held-key repeats are not judgments.
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('r') if state.ended => {
                        let next_seed = state.seed.wrapping_add(1);
                        log::info!("rematch, seed {next_seed}");
                        state = MatchState::new(next_seed, tuning);
                        audio.start_loops();
                        stdout.execute(Clear(ClearType::All))?;
                    }
                    code => {
                        if let Some((side, direction)) = route_key(code) {
                            let before = state.player(side).feedback;
                            sim::press(&mut state, side, direction, tuning);
                            narrate(settings, &state, side, before);
                        }
                    }
                }
            }
        }

        let dt = last_frame.elapsed().as_secs_f32().min(0.1);
        last_frame = Instant::now();
        sim::tick(&mut state, dt, tuning);

        for event in state.drain_events() {
            audio.handle(&event);
        }

        let fps = settings
            .show_fps
            .then(|| (1.0 / dt.max(1e-6)).round() as u32);
        renderer.draw(stdout, &state, tuning, fps)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

/// WASD drives the left player, the arrow keys the right one.
fn route_key(code: KeyCode) -> Option<(PlayerId, Direction)> {
    match code {
        KeyCode::Char('w') => Some((PlayerId::Left, Direction::Up)),
        KeyCode::Char('s') => Some((PlayerId::Left, Direction::Down)),
        KeyCode::Char('a') => Some((PlayerId::Left, Direction::Left)),
        KeyCode::Char('d') => Some((PlayerId::Left, Direction::Right)),
        KeyCode::Up => Some((PlayerId::Right, Direction::Up)),
        KeyCode::Down => Some((PlayerId::Right, Direction::Down)),
        KeyCode::Left => Some((PlayerId::Right, Direction::Left)),
        KeyCode::Right => Some((PlayerId::Right, Direction::Right)),
        _ => None,
    }
}

/// Screen-reader-style narration through the log output.
fn narrate(settings: &Settings, state: &MatchState, side: PlayerId, before: Feedback) {
    if !settings.narration {
        return;
    }
    let feedback = state.player(side).feedback;
    if feedback != before && feedback != Feedback::None {
        log::info!("{} player: {}", side.label(), feedback.text());
    }
    if state.ended && state.winner == Some(side) {
        log::info!("{} player wins", side.label());
    }
}

fn config_path(env_key: &str, default_name: &str) -> PathBuf {
    std::env::var_os(env_key)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_name))
}

/// Seed from the environment for reproducible matches, entropy otherwise.
fn initial_seed() -> u64 {
    std::env::var("PULSE_MAZE_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or_else(rand::random)
}
