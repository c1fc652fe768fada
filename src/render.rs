//! Terminal renderer
//!
//! Queued crossterm drawing of the fixed layout: a maze viewport per
//! player, two pulse lanes flowing toward the judgment line, scores and
//! feedback, and the win overlay. Every cell of the layout is redrawn
//! each frame with padded strings, so no explicit clearing is needed
//! after the first frame.

use std::io::{self, Stdout, Write};

use crossterm::QueueableCommand;
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use crate::sim::{MatchState, Player, PlayerId, PulseStatus};
use crate::tuning::Tuning;

/// Cells visible around a player in each direction (the viewport spans
/// `-VIEW_RADIUS..VIEW_RADIUS`).
const VIEW_RADIUS: isize = 3;
/// Character width of one maze cell.
const CELL_W: u16 = 2;
/// Pulse lane rows above and below the judgment line.
const LANE_SPAN: i32 = 8;
/// Terminal rows per timer unit in the pulse lanes.
const LANE_SCALE: f32 = 3.0;

/// Column layout.
const LEFT_VIEW_X: u16 = 3;
const RIGHT_VIEW_X: u16 = 33;
const LEFT_LANE_X: u16 = 20;
const RIGHT_LANE_X: u16 = 26;
const VIEW_Y: u16 = 3;
const LANE_TOP_Y: u16 = 1;
const HUD_Y: u16 = 12;

pub struct Renderer {
    /// Frame counter, used for the blinking rematch prompt
    frame: u64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { frame: 0 }
    }

    pub fn draw(
        &mut self,
        stdout: &mut Stdout,
        state: &MatchState,
        tuning: &Tuning,
        fps: Option<u32>,
    ) -> io::Result<()> {
        self.frame = self.frame.wrapping_add(1);

        put(stdout, LEFT_VIEW_X, 1, Color::Grey, "LEFT  [WASD]")?;
        put(stdout, RIGHT_VIEW_X, 1, Color::Grey, "RIGHT [Arrows]")?;

        self.draw_viewport(stdout, state, PlayerId::Left, LEFT_VIEW_X)?;
        self.draw_viewport(stdout, state, PlayerId::Right, RIGHT_VIEW_X)?;
        self.draw_lane(stdout, state.player(PlayerId::Left), LEFT_LANE_X)?;
        self.draw_lane(stdout, state.player(PlayerId::Right), RIGHT_LANE_X)?;
        self.draw_hud(stdout, state, fps)?;

        if state.ended {
            self.draw_win_overlay(stdout, state, tuning)?;
        }

        stdout.queue(ResetColor)?;
        stdout.flush()
    }

    /// A window of the maze centered on one player. The other player is
    /// drawn dimmed when inside the window; the goal tile always shows.
    fn draw_viewport(
        &self,
        stdout: &mut Stdout,
        state: &MatchState,
        side: PlayerId,
        origin_x: u16,
    ) -> io::Result<()> {
        let me = state.player(side);
        let other = state.player(side.other());
        let (goal_x, goal_y) = state.goal;

        for j in -VIEW_RADIUS..VIEW_RADIUS {
            let row = VIEW_Y + (j + VIEW_RADIUS) as u16;
            for i in -VIEW_RADIUS..VIEW_RADIUS {
                let col = origin_x + (i + VIEW_RADIUS) as u16 * CELL_W;
                let cx = me.x as isize + i;
                let cy = me.y as isize + j;

                let in_bounds = cx >= 0
                    && cy >= 0
                    && (cx as usize) < state.maze.width()
                    && (cy as usize) < state.maze.height();
                let (color, glyph) = if !in_bounds {
                    (Color::Reset, "  ")
                } else if (cx as usize, cy as usize) == (me.x, me.y) {
                    (side_color(side), arrow(me.angle))
                } else if (cx as usize, cy as usize) == (other.x, other.y) {
                    (Color::DarkGrey, arrow(other.angle))
                } else if (cx as usize, cy as usize) == (goal_x, goal_y) {
                    (Color::Green, "<>")
                } else if state.maze.is_wall(cx as usize, cy as usize) {
                    (Color::DarkBlue, "[]")
                } else {
                    (Color::Reset, "  ")
                };
                put(stdout, col, row, color, glyph)?;
            }
        }
        Ok(())
    }

    /// One pulse lane: pulses scroll upward toward the judgment line.
    fn draw_lane(&self, stdout: &mut Stdout, player: &Player, x: u16) -> io::Result<()> {
        let line_row = LANE_TOP_Y as i32 + LANE_SPAN;
        for lane_row in 0..=(2 * LANE_SPAN) {
            let row = (LANE_TOP_Y as i32 + lane_row) as u16;
            let mut color = Color::DarkGrey;
            let mut glyph = if lane_row == LANE_SPAN { "==" } else { "  " };
            for pulse in player.pulses.iter() {
                let pulse_row = line_row + (pulse.timer * LANE_SCALE).round() as i32;
                if pulse_row == LANE_TOP_Y as i32 + lane_row {
                    let (c, g) = match pulse.status {
                        PulseStatus::Pending => (Color::White, "()"),
                        PulseStatus::HitGood => (Color::Green, "**"),
                        PulseStatus::HitBad => (Color::Red, "xx"),
                        PulseStatus::Missed => (Color::DarkRed, "--"),
                    };
                    color = c;
                    glyph = g;
                    break;
                }
            }
            put(stdout, x, row, color, glyph)?;
        }
        Ok(())
    }

    fn draw_hud(
        &self,
        stdout: &mut Stdout,
        state: &MatchState,
        fps: Option<u32>,
    ) -> io::Result<()> {
        for side in [PlayerId::Left, PlayerId::Right] {
            let player = state.player(side);
            let x = match side {
                PlayerId::Left => LEFT_VIEW_X,
                PlayerId::Right => RIGHT_VIEW_X,
            };
            put(
                stdout,
                x,
                HUD_Y,
                Color::White,
                &format!("{:<12}", player.feedback.text()),
            )?;
            put(
                stdout,
                x,
                HUD_Y + 2,
                side_color(side),
                &format!("Score {:<8}", player.score),
            )?;
        }

        put(
            stdout,
            LEFT_VIEW_X,
            HUD_Y + 4,
            Color::DarkGrey,
            &format!("seed {:<22}", state.seed),
        )?;
        let fps_text = match fps {
            Some(fps) => format!("{fps:>4} fps"),
            None => "        ".to_string(),
        };
        put(stdout, RIGHT_VIEW_X + 6, HUD_Y + 4, Color::DarkGrey, &fps_text)?;
        put(
            stdout,
            LEFT_VIEW_X,
            HUD_Y + 5,
            Color::DarkGrey,
            "Esc quit",
        )?;
        Ok(())
    }

    /// Match-end banner: the winner line drops into place over the
    /// animation, then the rematch prompt blinks.
    fn draw_win_overlay(
        &self,
        stdout: &mut Stdout,
        state: &MatchState,
        tuning: &Tuning,
    ) -> io::Result<()> {
        let Some(winner) = state.winner else {
            return Ok(());
        };
        let progress = state.win_progress(tuning);
        // Ease-out drop from the top of the band.
        let eased = 1.0 - (1.0 - progress) * (1.0 - progress);
        let banner_row = 3 + (eased * 3.0) as u16;

        for row in 2..9 {
            put(stdout, 12, row, Color::Reset, &" ".repeat(24))?;
        }
        let text = format!("{} player wins!", winner.label());
        let x = 12 + (24 - text.len() as u16) / 2;
        put(stdout, x, banner_row, side_color(winner), &text)?;

        if state.win_timer <= 0.0 && self.frame / 30 % 2 == 0 {
            put(stdout, 13, 8, Color::White, "<R> rematch   <Esc> quit")?;
        }
        Ok(())
    }
}

fn side_color(side: PlayerId) -> Color {
    match side {
        PlayerId::Left => Color::Yellow,
        PlayerId::Right => Color::Cyan,
    }
}

/// Facing arrow for a player's angle (right, down, left, up).
fn arrow(angle: f32) -> &'static str {
    use std::f32::consts::PI;
    if (angle - 0.5 * PI).abs() < 0.01 {
        "v "
    } else if (angle - PI).abs() < 0.01 {
        "< "
    } else if (angle - 1.5 * PI).abs() < 0.01 {
        "^ "
    } else {
        "> "
    }
}

fn put(stdout: &mut Stdout, x: u16, y: u16, color: Color, text: &str) -> io::Result<()> {
    stdout
        .queue(MoveTo(x, y))?
        .queue(SetForegroundColor(color))?
        .queue(Print(text))?;
    Ok(())
}
