//! Event-driven audio output
//!
//! Consumes the sim's `AudioEvent`s and turns them into sound. Everything
//! is synthesized from sine sources, so there are no asset files. With no
//! audio device present the game runs in silent mode.

use std::time::Duration;

use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use crate::settings::Settings;
use crate::sim::AudioEvent;

/// Per-player metronome click frequencies (left, right).
const LOOP_FREQS: [f32; 2] = [660.0, 440.0];
/// Metronome cycle: click length and the silence that pads it to one beat.
const CLICK_MS: u64 = 60;
const CLICK_REST_MS: u64 = 940;

/// Owns the output stream and the two per-player loop sinks.
pub struct AudioOutput {
    _stream: Option<OutputStream>,
    handle: Option<OutputStreamHandle>,
    loops: [Option<Sink>; 2],
    sfx_volume: f32,
    music_volume: f32,
}

impl AudioOutput {
    pub fn new(settings: &Settings) -> Self {
        match OutputStream::try_default() {
            Ok((stream, handle)) => {
                log::info!("audio: device found, audio enabled");
                Self {
                    _stream: Some(stream),
                    handle: Some(handle),
                    loops: [None, None],
                    sfx_volume: settings.effective_sfx(),
                    music_volume: settings.effective_music(),
                }
            }
            Err(e) => {
                log::warn!("audio: no device found ({e}), running in silent mode");
                Self {
                    _stream: None,
                    handle: None,
                    loops: [None, None],
                    sfx_volume: 0.0,
                    music_volume: 0.0,
                }
            }
        }
    }

    /// (Re)start both players' metronome loops at rate 1.0. `MusicRate`
    /// events re-pace them afterwards.
    pub fn start_loops(&mut self) {
        if self.music_volume <= 0.0 {
            return;
        }
        let Some(handle) = &self.handle else { return };
        for (slot, freq) in self.loops.iter_mut().zip(LOOP_FREQS) {
            if let Some(old) = slot.take() {
                old.stop();
            }
            let Ok(sink) = Sink::try_new(handle) else {
                log::error!("audio: failed to create loop sink");
                continue;
            };
            // One click per beat: a short tone padded with silence,
            // repeated forever. Tempo changes arrive via set_speed.
            let cycle = SineWave::new(freq)
                .take_duration(Duration::from_millis(CLICK_MS))
                .delay(Duration::from_millis(CLICK_REST_MS))
                .repeat_infinite();
            sink.set_volume(self.music_volume * 0.5);
            sink.append(cycle);
            *slot = Some(sink);
        }
    }

    /// Apply one sim event.
    pub fn handle(&mut self, event: &AudioEvent) {
        match *event {
            AudioEvent::Ding { rate, .. } => {
                // The hit click is pitched by accuracy: a centered press
                // plays at full rate.
                self.play_tone(1320.0, 90, self.sfx_volume, rate.max(0.1));
            }
            AudioEvent::MusicRate { side, rate } => {
                if let Some(sink) = &self.loops[side.index()] {
                    sink.set_speed(rate);
                }
            }
            AudioEvent::MusicStop => {
                for slot in &mut self.loops {
                    if let Some(sink) = slot.take() {
                        sink.stop();
                    }
                }
            }
            AudioEvent::Fanfare { .. } => {
                self.play_phrase(&[(523.25, 140), (659.25, 140), (783.99, 320)]);
            }
            AudioEvent::Lost { .. } => {
                self.play_phrase(&[(330.0, 200), (220.0, 360)]);
            }
        }
    }

    /// Fire-and-forget single tone on a detached sink.
    fn play_tone(&self, freq: f32, millis: u64, volume: f32, speed: f32) {
        if volume <= 0.0 {
            return;
        }
        let Some(handle) = &self.handle else { return };
        let Ok(sink) = Sink::try_new(handle) else {
            return;
        };
        sink.set_volume(volume);
        sink.set_speed(speed);
        sink.append(SineWave::new(freq).take_duration(Duration::from_millis(millis)));
        sink.detach();
    }

    /// Fire-and-forget tone sequence on a detached sink.
    fn play_phrase(&self, notes: &[(f32, u64)]) {
        if self.sfx_volume <= 0.0 {
            return;
        }
        let Some(handle) = &self.handle else { return };
        let Ok(sink) = Sink::try_new(handle) else {
            return;
        };
        sink.set_volume(self.sfx_volume);
        for &(freq, millis) in notes {
            sink.append(SineWave::new(freq).take_duration(Duration::from_millis(millis)));
        }
        sink.detach();
    }
}
