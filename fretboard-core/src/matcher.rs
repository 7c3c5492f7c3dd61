//! # Answer Matcher Module
//!
//! Debounces the detected note against the active question. A single matching frame
//! is not enough (pluck transients, harmonics, sliding through the target on the way
//! to another note): the target pitch class has to be held for the configured time.
//!
//! ```text
//! PENDING --match--> HOLDING --held long enough--> CONFIRMED
//!    ^                  |                              |
//!    +----mismatch------+          reset() ------------+
//! ```

use std::time::Duration;

use crate::config::MatchConfig;
use crate::guitar::{fret_from_midi, is_playable_fret};
use crate::question::Question;
use crate::tuning::NoteInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Pending,
    Holding { since: Duration },
    /// Terminal until [`AnswerMatcher::reset`].
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct AnswerMatcher {
    config: MatchConfig,
    phase: MatchPhase,
}

impl AnswerMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            phase: MatchPhase::Pending,
        }
    }

    /// Back to `Pending`; call when a new question starts.
    pub fn reset(&mut self) {
        self.phase = MatchPhase::Pending;
    }

    /// Feeds the note detected at `now` and reports whether the answer is confirmed.
    ///
    /// Only the pitch class is compared; the octave is ignored. Once confirmed, every
    /// later call returns `true` whatever the note, until [`reset`](Self::reset).
    pub fn check(&mut self, question: &Question, note: &NoteInfo, now: Duration) -> bool {
        if self.phase == MatchPhase::Confirmed {
            return true;
        }

        if note.pitch() != Some(question.target_note) {
            self.phase = MatchPhase::Pending;
            return false;
        }

        match self.phase {
            MatchPhase::Holding { since } if now.saturating_sub(since) >= self.config.required_hold() => {
                tracing::info!(
                    "[GAME] Confirmed {} after {:?}",
                    question.target_note,
                    now.saturating_sub(since)
                );
                self.phase = MatchPhase::Confirmed;
                true
            }
            MatchPhase::Holding { .. } => false,
            _ => {
                self.phase = MatchPhase::Holding { since: now };
                false
            }
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_correct(&self) -> bool {
        self.phase == MatchPhase::Confirmed
    }

    /// Start of the current run of matching frames, if one is in progress.
    pub fn correct_since(&self) -> Option<Duration> {
        match self.phase {
            MatchPhase::Holding { since } => Some(since),
            _ => None,
        }
    }

    /// Fret at which `note` lies on the given string, for feedback only.
    ///
    /// # Returns
    /// * `Some(fret)` - in `0..=24`
    /// * `None` - no note, unknown string, or a position off the fretboard
    pub fn detected_fret(note: &NoteInfo, target_string_index: usize) -> Option<u8> {
        let midi = note.midi()?;
        let fret = fret_from_midi(midi, target_string_index)?;
        is_playable_fret(fret).then_some(fret as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{PitchClass, note_from_frequency};

    const FRAME: u64 = 16;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn target(note: PitchClass) -> Question {
        Question {
            target_string_index: 5,
            target_note: note,
        }
    }

    #[test]
    fn single_frame_never_confirms() {
        let mut matcher = AnswerMatcher::new(MatchConfig::default());
        let e = note_from_frequency(82.41);
        assert!(!matcher.check(&target(PitchClass::E), &e, ms(0)));
        assert_eq!(matcher.correct_since(), Some(ms(0)));
    }

    #[test]
    fn confirms_once_hold_is_reached() {
        let mut matcher = AnswerMatcher::new(MatchConfig::default());
        let q = target(PitchClass::E);
        let e = note_from_frequency(82.41);
        let mut confirmed_at = None;
        for t in (0..=144).step_by(FRAME as usize) {
            if matcher.check(&q, &e, ms(t)) && confirmed_at.is_none() {
                confirmed_at = Some(t);
            }
        }
        assert_eq!(confirmed_at, Some(112));
        assert!(matcher.is_correct());
    }

    #[test]
    fn octave_is_ignored() {
        let mut matcher = AnswerMatcher::new(MatchConfig { required_hold_ms: 0 });
        let q = target(PitchClass::A);
        let a5 = note_from_frequency(880.0);
        assert!(!matcher.check(&q, &a5, ms(0)));
        assert!(matcher.check(&q, &a5, ms(1)));
    }

    #[test]
    fn mismatch_before_hold_resets() {
        let mut matcher = AnswerMatcher::new(MatchConfig::default());
        let q = target(PitchClass::E);
        let e = note_from_frequency(82.41);
        let f = note_from_frequency(87.31);
        for t in (0..96).step_by(FRAME as usize) {
            assert!(!matcher.check(&q, &e, ms(t)));
        }
        assert!(!matcher.check(&q, &f, ms(96)));
        assert_eq!(matcher.correct_since(), None);
        assert_eq!(matcher.phase(), MatchPhase::Pending);
        // the hold starts over
        assert!(!matcher.check(&q, &e, ms(112)));
        assert_eq!(matcher.correct_since(), Some(ms(112)));
    }

    #[test]
    fn empty_note_resets() {
        let mut matcher = AnswerMatcher::new(MatchConfig::default());
        let q = target(PitchClass::E);
        matcher.check(&q, &note_from_frequency(82.41), ms(0));
        assert!(!matcher.check(&q, &NoteInfo::empty(), ms(16)));
        assert_eq!(matcher.phase(), MatchPhase::Pending);
    }

    #[test]
    fn confirmed_is_sticky_until_reset() {
        let mut matcher = AnswerMatcher::new(MatchConfig { required_hold_ms: 0 });
        let q = target(PitchClass::E);
        let e = note_from_frequency(82.41);
        matcher.check(&q, &e, ms(0));
        assert!(matcher.check(&q, &e, ms(16)));

        assert!(matcher.check(&q, &NoteInfo::empty(), ms(32)));
        assert!(matcher.check(&q, &note_from_frequency(440.0), ms(48)));

        matcher.reset();
        matcher.reset();
        assert_eq!(matcher.phase(), MatchPhase::Pending);
        assert!(!matcher.check(&q, &NoteInfo::empty(), ms(64)));
    }

    #[test]
    fn detected_fret_on_target_string() {
        let e2 = note_from_frequency(82.41);
        assert_eq!(AnswerMatcher::detected_fret(&e2, 5), Some(0));
        // A2 is the 5th fret of the low E string
        assert_eq!(AnswerMatcher::detected_fret(&note_from_frequency(110.0), 5), Some(5));
        // E2 is below the open high E string
        assert_eq!(AnswerMatcher::detected_fret(&e2, 0), None);
        assert_eq!(AnswerMatcher::detected_fret(&NoteInfo::empty(), 5), None);
        assert_eq!(AnswerMatcher::detected_fret(&e2, 9), None);
    }
}
