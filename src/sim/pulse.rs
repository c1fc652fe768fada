//! Pulse ring: the scrolling rhythm cue
//!
//! A fixed population of timing markers flows toward the judgment line at
//! timer zero. Fully expired markers are recycled to the back of the ring
//! with a fresh timer, so a handful of pulses produces an endless track
//! with no allocation after match start. Scans are iterative and only ever
//! walk head to tail.

use std::collections::VecDeque;

/// Judgment outcome of a single pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseStatus {
    /// Not yet judged
    Pending,
    /// Hit inside the window
    HitGood,
    /// Pressed inside the window after the pulse was already resolved
    HitBad,
    /// Scrolled past the window without a press
    Missed,
}

/// A single timing marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Sequence number; recycling continues the count from the tail
    pub id: u32,
    /// Seconds until the pulse crosses the judgment line (negative = past)
    pub timer: f32,
    pub status: PulseStatus,
}

impl Pulse {
    pub fn new(id: u32, timer: f32) -> Self {
        Self {
            id,
            timer,
            status: PulseStatus::Pending,
        }
    }
}

/// Player-owned pulse ring, ordered soonest-due first.
#[derive(Debug, Clone, Default)]
pub struct PulseQueue {
    pulses: VecDeque<Pulse>,
}

impl PulseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The opening pattern: one pulse per beat in `0..=beats`, resting on
    /// every `rest_every`-th beat so the track starts with a phrase shape
    /// rather than a metronome wall.
    pub fn seeded(beats: u32, rest_every: u32) -> Self {
        let mut queue = Self::new();
        for beat in 0..=beats {
            if rest_every > 0 && beat % rest_every == rest_every - 1 {
                continue;
            }
            queue.push(Pulse::new(beat, beat as f32));
        }
        queue
    }

    pub fn push(&mut self, pulse: Pulse) {
        self.pulses.push_back(pulse);
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn front(&self) -> Option<&Pulse> {
        self.pulses.front()
    }

    pub fn get(&self, index: usize) -> Option<&Pulse> {
        self.pulses.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Pulse> {
        self.pulses.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pulse> {
        self.pulses.iter()
    }

    /// Advance every timer by `step` seconds. A pending pulse crossing
    /// `-window` during this step becomes `Missed`. Returns how many were
    /// missed so the caller can apply feedback and penalties.
    pub fn advance(&mut self, step: f32, window: f32) -> usize {
        let mut missed = 0;
        for pulse in &mut self.pulses {
            if pulse.status == PulseStatus::Pending
                && pulse.timer > -window
                && pulse.timer - step < -window
            {
                pulse.status = PulseStatus::Missed;
                missed += 1;
            }
            pulse.timer -= step;
        }
        missed
    }

    /// Recycle fully expired head pulses to the back of the ring. A
    /// recycled pulse resets to `Pending` one `gap` after the tail, with
    /// every `wide_every`-th id getting `extra` on top to vary the rhythm
    /// density. Returns the number recycled.
    pub fn recycle_expired(
        &mut self,
        threshold: f32,
        gap: f32,
        wide_every: u32,
        extra: f32,
    ) -> usize {
        let mut recycled = 0;
        while self.pulses.len() >= 2 {
            match self.pulses.front() {
                Some(head) if head.timer < threshold => {}
                _ => break,
            }
            let Some(mut pulse) = self.pulses.pop_front() else {
                break;
            };
            let Some(tail) = self.pulses.back() else {
                break;
            };
            let id = tail.id + 1;
            let mut offset = gap;
            if wide_every > 0 && id % wide_every == wide_every - 1 {
                offset += extra;
            }
            pulse.id = id;
            pulse.timer = tail.timer + offset;
            pulse.status = PulseStatus::Pending;
            self.pulses.push_back(pulse);
            recycled += 1;
        }
        recycled
    }
}
