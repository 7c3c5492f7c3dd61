//! # Noise Gate Module
//!
//! Volume-based decision on whether a frame contains a played note. The gate never
//! alters the signal; it only tells the tracker whether to run the estimator and
//! whether the previous note may still be shown.

use std::time::Duration;

use crate::config::GateConfig;
use crate::tuning::NoteInfo;

/// Outcome of gating one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The frame is loud enough to estimate a pitch from.
    Open,
    /// Below threshold, but the gate was open less than the hold time ago.
    /// The last valid note is surfaced; no new estimate is made.
    Holding,
    /// Below threshold and the hold window has run out.
    Closed,
}

/// Mutable state carried between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GateState {
    /// Time of the most recent open frame.
    pub last_open_timestamp: Option<Duration>,
    /// The last note the tracker accepted and when it was accepted.
    pub last_valid_note: Option<(NoteInfo, Duration)>,
}

/// Root mean square level of a frame. An empty frame has a level of 0.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

#[derive(Debug, Clone)]
pub struct NoiseGate {
    config: GateConfig,
    state: GateState,
}

impl NoiseGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            state: GateState::default(),
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Gates a frame captured at `now`.
    ///
    /// The hold window is measured from the last *open* frame, so it effectively
    /// counts time since the gate last closed.
    pub fn evaluate(&mut self, samples: &[f32], now: Duration) -> GateDecision {
        if rms(samples) > self.config.threshold {
            self.state.last_open_timestamp = Some(now);
            return GateDecision::Open;
        }
        match self.state.last_open_timestamp {
            Some(opened) if now.saturating_sub(opened) < self.config.hold() => {
                GateDecision::Holding
            }
            _ => GateDecision::Closed,
        }
    }

    /// Records a note accepted by the tracker.
    pub fn remember(&mut self, note: NoteInfo, now: Duration) {
        if !note.is_empty() {
            self.state.last_valid_note = Some((note, now));
        }
    }

    /// The last valid note, whenever it was accepted.
    pub fn last_note(&self) -> Option<NoteInfo> {
        self.state.last_valid_note.map(|(note, _)| note)
    }

    /// The last valid note, if it was accepted less than the hold time before `now`.
    pub fn recent_note(&self, now: Duration) -> Option<NoteInfo> {
        self.state
            .last_valid_note
            .filter(|&(_, at)| now.saturating_sub(at) < self.config.hold())
            .map(|(note, _)| note)
    }

    pub fn forget_note(&mut self) {
        self.state.last_valid_note = None;
    }

    pub fn reset(&mut self) {
        self.state = GateState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::note_from_frequency;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn loud() -> Vec<f32> {
        vec![0.5; 256]
    }

    fn quiet() -> Vec<f32> {
        vec![0.001; 256]
    }

    #[test]
    fn rms_of_constant_and_empty_frames() {
        assert!((rms(&[0.5; 8]) - 0.5).abs() < 1e-6);
        assert!((rms(&[0.5, -0.5]) - 0.5).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn never_opened_gate_is_closed() {
        let mut gate = NoiseGate::new(GateConfig::default());
        assert_eq!(gate.evaluate(&quiet(), ms(0)), GateDecision::Closed);
    }

    #[test]
    fn hold_bridges_short_dropouts() {
        let mut gate = NoiseGate::new(GateConfig::default());
        assert_eq!(gate.evaluate(&loud(), ms(0)), GateDecision::Open);
        assert_eq!(gate.evaluate(&quiet(), ms(50)), GateDecision::Holding);
        assert_eq!(gate.evaluate(&quiet(), ms(99)), GateDecision::Holding);
        assert_eq!(gate.evaluate(&quiet(), ms(100)), GateDecision::Closed);
    }

    #[test]
    fn hold_restarts_from_latest_open_frame() {
        let mut gate = NoiseGate::new(GateConfig::default());
        gate.evaluate(&loud(), ms(0));
        gate.evaluate(&loud(), ms(80));
        assert_eq!(gate.evaluate(&quiet(), ms(150)), GateDecision::Holding);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut gate = NoiseGate::new(GateConfig {
            threshold: 0.5,
            hold_ms: 0,
        });
        assert_eq!(gate.evaluate(&[0.5; 16], ms(0)), GateDecision::Closed);
    }

    #[test]
    fn recent_note_expires_and_reset_clears() {
        let mut gate = NoiseGate::new(GateConfig::default());
        let a4 = note_from_frequency(440.0);
        gate.remember(a4, ms(10));
        gate.remember(NoteInfo::empty(), ms(20));
        assert_eq!(gate.recent_note(ms(60)), Some(a4));
        assert_eq!(gate.recent_note(ms(110)), None);
        assert_eq!(gate.last_note(), Some(a4));

        gate.evaluate(&loud(), ms(120));
        gate.reset();
        assert_eq!(gate.state(), &GateState::default());
    }
}
