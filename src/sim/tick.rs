//! Per-frame advance and press judgment
//!
//! The two entry points the frontend drives: `tick` once per logic frame,
//! `press` once per qualifying discrete key-down. Timing and movement are
//! judged independently: a well-timed press into a wall still scores but
//! does not advance the player.

use super::pulse::PulseStatus;
use super::state::{AudioEvent, Direction, Feedback, MatchState, PlayerId};
use crate::tuning::Tuning;

/// Advance the match by `dt` seconds of wall time.
pub fn tick(state: &mut MatchState, dt: f32, tuning: &Tuning) {
    if state.ended {
        state.win_timer = (state.win_timer - dt).max(0.0);
        return;
    }

    for side in [PlayerId::Left, PlayerId::Right] {
        let player = &mut state.players[side.index()];

        // Tempo ramps with score; the loop track follows the same rate.
        let ramp = 1.0 + player.score as f32 / tuning.speed_ramp_divisor;
        let rate = tuning.base_scroll_speed * ramp;
        if (rate - player.music_rate).abs() > f32::EPSILON {
            player.music_rate = rate;
            state.events.push(AudioEvent::MusicRate { side, rate });
        }

        let missed = player
            .pulses
            .advance(dt * rate, tuning.judgment_window);
        if missed > 0 {
            player.feedback = Feedback::TooLate;
            for _ in 0..missed {
                player.penalize(tuning.miss_penalty);
            }
        }

        player.pulses.recycle_expired(
            tuning.expire_threshold,
            tuning.recycle_gap,
            tuning.wide_gap_every,
            tuning.wide_gap_extra,
        );
    }
}

/// Judge one directional key press for `side`.
///
/// Walks the ring head to tail: pulses that have fully passed are skipped
/// (a press reaches through them to the next one), the first pulse inside
/// the window is judged, and a pulse that has not arrived yet ends the
/// walk with no effect at all.
pub fn press(state: &mut MatchState, side: PlayerId, direction: Direction, tuning: &Tuning) {
    if state.ended {
        return;
    }

    let window = tuning.judgment_window;
    let idx = side.index();

    for i in 0..state.players[idx].pulses.len() {
        let Some(pulse) = state.players[idx].pulses.get(i) else {
            break;
        };
        let offset = pulse.timer;

        if offset <= -window {
            continue;
        }
        if offset > window {
            break;
        }

        if pulse.status == PulseStatus::Pending {
            judge_hit(state, side, i, offset, direction, tuning);
        } else {
            // A second press on an already resolved pulse is an incorrect
            // judgment: feedback, penalty, and the pulse is marked bad.
            let player = &mut state.players[idx];
            if let Some(pulse) = player.pulses.get_mut(i) {
                pulse.status = PulseStatus::HitBad;
            }
            player.feedback = Feedback::Bad;
            player.penalize(tuning.miss_penalty);
        }
        break;
    }
}

/// Award a pending pulse hit at `offset` and resolve its consequences:
/// score, feedback tier, movement, the hit sound, and the win check.
fn judge_hit(
    state: &mut MatchState,
    side: PlayerId,
    pulse_index: usize,
    offset: f32,
    direction: Direction,
    tuning: &Tuning,
) {
    let accuracy = offset.abs();
    let award = (tuning.score_scale - accuracy * tuning.score_slope).max(0.0) as u32;
    let tier = if accuracy <= tuning.perfect_window {
        Feedback::Perfect
    } else if accuracy <= tuning.excellent_window {
        Feedback::Excellent
    } else {
        Feedback::Good
    };

    let player = &mut state.players[side.index()];
    player.score += award;
    player.feedback = tier;
    if let Some(pulse) = player.pulses.get_mut(pulse_index) {
        pulse.status = PulseStatus::HitGood;
    }

    let (dx, dy) = direction.delta();
    let tx = player.x as isize + dx;
    let ty = player.y as isize + dy;
    if state.maze.walkable(tx, ty) {
        player.x = tx as usize;
        player.y = ty as usize;
        player.angle = direction.facing_angle();
    }

    state.events.push(AudioEvent::Ding {
        side,
        rate: 1.0 - accuracy,
    });

    if (player.x, player.y) == state.goal {
        state.ended = true;
        state.winner = Some(side);
        state.win_timer = tuning.win_animation_secs;
        state.events.push(AudioEvent::MusicStop);
        state.events.push(AudioEvent::Fanfare { side });
        state.events.push(AudioEvent::Lost { side: side.other() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::Maze;
    use crate::sim::pulse::{Pulse, PulseQueue};

    /// A 4x4 fully open room; goal pinned to the far corner, both players
    /// parked mid-room so every direction has a legal target.
    fn open_room() -> (MatchState, Tuning) {
        let tuning = Tuning::default();
        let mut state = MatchState::new(7, &tuning);
        let mut maze = Maze::walled(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                maze.open(x, y);
            }
        }
        state.maze = maze;
        state.goal = (3, 3);
        for player in &mut state.players {
            player.x = 1;
            player.y = 1;
        }
        (state, tuning)
    }

    fn queue_of(timers: &[f32]) -> PulseQueue {
        let mut queue = PulseQueue::new();
        for (i, &timer) in timers.iter().enumerate() {
            queue.push(Pulse::new(i as u32, timer));
        }
        queue
    }

    fn head_status(state: &MatchState, side: PlayerId) -> PulseStatus {
        state.player(side).pulses.front().map(|p| p.status).unwrap()
    }

    #[test]
    fn test_press_perfect_tier_scores_and_moves() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[0.04, 1.0]);

        press(&mut state, PlayerId::Left, Direction::Right, &tuning);

        let player = state.player(PlayerId::Left);
        assert_eq!(player.feedback, Feedback::Perfect);
        // 100 * (1 - 0.04 / 0.25) = 84
        assert_eq!(player.score, 84);
        assert_eq!((player.x, player.y), (2, 1));
        assert_eq!(player.angle, Direction::Right.facing_angle());
        assert_eq!(head_status(&state, PlayerId::Left), PulseStatus::HitGood);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, AudioEvent::Ding { side: PlayerId::Left, .. })));
    }

    #[test]
    fn test_press_excellent_tier() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[0.10]);
        press(&mut state, PlayerId::Left, Direction::Down, &tuning);
        let player = state.player(PlayerId::Left);
        assert_eq!(player.feedback, Feedback::Excellent);
        assert_eq!(player.score, 60);
    }

    #[test]
    fn test_press_good_tier() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[0.20]);
        press(&mut state, PlayerId::Left, Direction::Down, &tuning);
        let player = state.player(PlayerId::Left);
        assert_eq!(player.feedback, Feedback::Good);
        assert_eq!(player.score, 20);
    }

    #[test]
    fn test_press_outside_window_has_no_effect() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[0.30, 1.0]);
        press(&mut state, PlayerId::Left, Direction::Right, &tuning);
        let player = state.player(PlayerId::Left);
        assert_eq!(player.feedback, Feedback::None);
        assert_eq!(player.score, 0);
        assert_eq!((player.x, player.y), (1, 1));
        assert_eq!(head_status(&state, PlayerId::Left), PulseStatus::Pending);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_press_reaches_past_expired_pulses() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[-0.50, 0.10]);
        press(&mut state, PlayerId::Left, Direction::Right, &tuning);
        let player = state.player(PlayerId::Left);
        assert_eq!(player.feedback, Feedback::Excellent);
        assert_eq!(
            player.pulses.get(1).map(|p| p.status),
            Some(PulseStatus::HitGood)
        );
        // The passed-by head is left alone for the frame update to handle.
        assert_eq!(head_status(&state, PlayerId::Left), PulseStatus::Pending);
    }

    #[test]
    fn test_wall_blocked_press_scores_without_moving() {
        let tuning = Tuning::default();
        let mut state = MatchState::new(7, &tuning);
        // Only the player's own cell is open; every direction is a wall.
        let mut maze = Maze::walled(4, 4);
        maze.open(1, 1);
        state.maze = maze;
        state.goal = (3, 3);
        state.players[0].x = 1;
        state.players[0].y = 1;
        let facing_before = state.players[0].angle;
        state.players[0].pulses = queue_of(&[0.04]);

        press(&mut state, PlayerId::Left, Direction::Right, &tuning);

        let player = state.player(PlayerId::Left);
        assert_eq!((player.x, player.y), (1, 1));
        assert_eq!(player.score, 84);
        assert_eq!(player.angle, facing_before);
        assert_eq!(head_status(&state, PlayerId::Left), PulseStatus::HitGood);
    }

    #[test]
    fn test_press_on_resolved_pulse_is_penalized() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[0.0]);
        state.players[0].score = 100;
        if let Some(pulse) = state.players[0].pulses.get_mut(0) {
            pulse.status = PulseStatus::HitGood;
        }

        press(&mut state, PlayerId::Left, Direction::Right, &tuning);

        let player = state.player(PlayerId::Left);
        assert_eq!(player.feedback, Feedback::Bad);
        assert_eq!(player.score, 50);
        assert_eq!((player.x, player.y), (1, 1));
        assert_eq!(head_status(&state, PlayerId::Left), PulseStatus::HitBad);
    }

    #[test]
    fn test_repeated_penalties_never_go_negative() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[0.0]);
        state.players[0].score = 30;
        if let Some(pulse) = state.players[0].pulses.get_mut(0) {
            pulse.status = PulseStatus::HitGood;
        }

        press(&mut state, PlayerId::Left, Direction::Right, &tuning);
        press(&mut state, PlayerId::Left, Direction::Right, &tuning);
        press(&mut state, PlayerId::Left, Direction::Right, &tuning);

        assert_eq!(state.player(PlayerId::Left).score, 0);
    }

    #[test]
    fn test_win_fires_once_and_silences_input() {
        let (mut state, tuning) = open_room();
        state.players[0].x = 2;
        state.players[0].y = 3;
        state.players[0].pulses = queue_of(&[0.0]);
        state.players[1].pulses = queue_of(&[0.0]);

        press(&mut state, PlayerId::Left, Direction::Right, &tuning);

        assert!(state.ended);
        assert_eq!(state.winner, Some(PlayerId::Left));
        assert_eq!(state.win_timer, tuning.win_animation_secs);
        let events = state.drain_events();
        assert!(events.contains(&AudioEvent::MusicStop));
        assert!(events.contains(&AudioEvent::Fanfare { side: PlayerId::Left }));
        assert!(events.contains(&AudioEvent::Lost { side: PlayerId::Right }));

        // Input after the win changes nothing for either player.
        press(&mut state, PlayerId::Right, Direction::Down, &tuning);
        assert_eq!(state.winner, Some(PlayerId::Left));
        assert_eq!(state.player(PlayerId::Right).score, 0);
        assert_eq!(head_status(&state, PlayerId::Right), PulseStatus::Pending);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_end_to_end_head_then_next_pulse() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[0.04, 1.0]);

        press(&mut state, PlayerId::Left, Direction::Right, &tuning);
        assert_eq!(state.player(PlayerId::Left).score, 84);
        assert_eq!((state.players[0].x, state.players[0].y), (2, 1));
        assert_eq!(head_status(&state, PlayerId::Left), PulseStatus::HitGood);

        // Once the judged head has scrolled past the window, the next
        // press reaches the second pulse.
        if let Some(pulse) = state.players[0].pulses.get_mut(0) {
            pulse.timer = -0.50;
        }
        if let Some(pulse) = state.players[0].pulses.get_mut(1) {
            pulse.timer = 0.10;
        }
        press(&mut state, PlayerId::Left, Direction::Down, &tuning);
        assert_eq!(
            state.players[0].pulses.get(1).map(|p| p.status),
            Some(PulseStatus::HitGood)
        );
        assert_eq!(state.player(PlayerId::Left).score, 84 + 60);
        assert_eq!((state.players[0].x, state.players[0].y), (2, 2));
    }

    #[test]
    fn test_tick_marks_late_pulses_and_penalizes() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[0.05, 1.0]);
        state.players[0].score = 100;

        // Base speed 1.1 with a ~zero ramp: 0.3 s moves timers ~0.33.
        tick(&mut state, 0.3, &tuning);

        let player = state.player(PlayerId::Left);
        assert_eq!(player.feedback, Feedback::TooLate);
        assert_eq!(player.score, 50);
        assert_eq!(head_status(&state, PlayerId::Left), PulseStatus::Missed);
        assert_eq!(
            player.pulses.get(1).map(|p| p.status),
            Some(PulseStatus::Pending)
        );
    }

    #[test]
    fn test_tick_speed_ramps_with_score() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[10.0]);
        state.players[1].pulses = queue_of(&[10.0]);
        // A score equal to the ramp divisor doubles the scroll speed.
        state.players[0].score = 20_000;

        tick(&mut state, 0.1, &tuning);

        let fast = state.players[0].pulses.front().unwrap().timer;
        let slow = state.players[1].pulses.front().unwrap().timer;
        assert!(fast < slow);
        assert!((10.0 - fast - 0.22).abs() < 1e-3);
        assert!((10.0 - slow - 0.11).abs() < 1e-3);
        let events = state.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, AudioEvent::MusicRate { side: PlayerId::Left, rate } if (rate - 2.2).abs() < 1e-3)));
    }

    #[test]
    fn test_tick_music_rate_fires_only_on_change() {
        let (mut state, tuning) = open_room();
        tick(&mut state, 0.01, &tuning);
        let first = state.drain_events();
        assert!(first
            .iter()
            .any(|e| matches!(e, AudioEvent::MusicRate { .. })));

        // No score change, no new rate events.
        tick(&mut state, 0.01, &tuning);
        let second = state.drain_events();
        assert!(second
            .iter()
            .all(|e| !matches!(e, AudioEvent::MusicRate { .. })));
    }

    #[test]
    fn test_tick_recycles_expired_head() {
        let (mut state, tuning) = open_room();
        state.players[0].pulses = queue_of(&[-5.5, 0.0, 1.0]);

        tick(&mut state, 0.01, &tuning);

        let player = state.player(PlayerId::Left);
        assert_eq!(player.pulses.len(), 3);
        let tail = player.pulses.get(2).unwrap();
        assert_eq!(tail.status, PulseStatus::Pending);
        assert!(tail.timer > player.pulses.get(1).unwrap().timer);
    }

    #[test]
    fn test_tick_after_end_only_counts_down_the_overlay() {
        let (mut state, tuning) = open_room();
        state.ended = true;
        state.winner = Some(PlayerId::Right);
        state.win_timer = 1.5;
        state.players[0].pulses = queue_of(&[0.5]);

        tick(&mut state, 0.4, &tuning);

        assert!((state.win_timer - 1.1).abs() < 1e-6);
        assert_eq!(
            state.players[0].pulses.front().map(|p| p.timer),
            Some(0.5)
        );
        assert!(state.events.is_empty());

        tick(&mut state, 5.0, &tuning);
        assert_eq!(state.win_timer, 0.0);
        assert!((state.win_progress(&tuning) - 1.0).abs() < 1e-6);
    }
}
