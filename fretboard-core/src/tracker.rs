//! # Pitch Tracker Module
//!
//! Runs one frame at a time through gate, estimator, smoother and note conversion.
//! The tracker owns all per-session mutable state and never blocks, so it can be
//! called directly from an audio or display loop.

use std::borrow::Cow;
use std::time::Duration;

use crate::config::TrainerConfig;
use crate::gate::{GateDecision, NoiseGate};
use crate::pitch::FrequencyEstimator;
use crate::smoothing::FrequencySmoother;
use crate::tuning::{NoteInfo, note_from_frequency};

pub struct PitchTracker<E> {
    estimator: E,
    gate: NoiseGate,
    smoother: FrequencySmoother,
    input_gain: f32,
}

impl<E: FrequencyEstimator> PitchTracker<E> {
    /// Creates a tracker for one listening session.
    pub fn new(config: &TrainerConfig, estimator: E) -> Self {
        Self {
            estimator,
            gate: NoiseGate::new(config.gate),
            smoother: FrequencySmoother::new(config.smoothing),
            input_gain: config.input_gain,
        }
    }

    /// Processes a frame captured at `now` (time since the session started).
    ///
    /// 1. Gate closed past the hold window: empty note. The smoothing window keeps
    ///    its contents so a quickly resumed note stays continuous.
    /// 2. Gate holding: the last valid note is replayed without a new estimate.
    /// 3. Gate open: estimate, smooth and convert. A missing estimate replays the
    ///    last valid note while it is recent, otherwise yields an empty note.
    pub fn process_frame(&mut self, samples: &[f32], sample_rate: u32, now: Duration) -> NoteInfo {
        let samples = self.apply_gain(samples);

        match self.gate.evaluate(&samples, now) {
            GateDecision::Closed => {
                self.gate.forget_note();
                NoteInfo::empty()
            }
            // the gate has already bounded the hold by its last open frame
            GateDecision::Holding => self.gate.last_note().unwrap_or_default(),
            GateDecision::Open => match self.estimator.estimate(&samples, sample_rate) {
                Some(raw) => {
                    let smoothed = self.smoother.push(raw);
                    let note = note_from_frequency(smoothed);
                    tracing::trace!(
                        "[TRACKER] raw {:.2} Hz -> smoothed {:.2} Hz ({}{})",
                        raw,
                        smoothed,
                        note.note_name(),
                        note.octave()
                    );
                    self.gate.remember(note, now);
                    note
                }
                None => self.gate.recent_note(now).unwrap_or_default(),
            },
        }
    }

    fn apply_gain<'a>(&self, samples: &'a [f32]) -> Cow<'a, [f32]> {
        if self.input_gain == 1.0 {
            Cow::Borrowed(samples)
        } else {
            Cow::Owned(samples.iter().map(|&s| s * self.input_gain).collect())
        }
    }

    /// Clears the smoothing window and gate state. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.smoother.clear();
        self.gate.reset();
        tracing::debug!("[TRACKER] Stopped, state reset");
    }

    pub fn gate(&self) -> &NoiseGate {
        &self.gate
    }

    pub fn smoother(&self) -> &FrequencySmoother {
        &self.smoother
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }
}
