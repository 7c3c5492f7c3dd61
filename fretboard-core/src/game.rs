//! # Practice Round Module
//!
//! Ties the question generator and the answer matcher together: one active
//! question, judged frame by frame, until the caller moves on.

use std::time::Duration;

use crate::config::{ConfigError, MatchConfig};
use crate::matcher::{AnswerMatcher, MatchPhase};
use crate::question::{Question, QuestionGenerator};
use crate::scales::NoteSet;
use crate::tuning::NoteInfo;

/// What the UI shows after each judged frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    /// Fret of the played note on the target string, if it is on the fretboard.
    pub detected_fret: Option<u8>,
}

pub struct PracticeRound {
    generator: QuestionGenerator,
    matcher: AnswerMatcher,
    confirmed_at: Option<Duration>,
}

impl PracticeRound {
    pub fn new(config: MatchConfig, generator: QuestionGenerator) -> Self {
        Self {
            generator,
            matcher: AnswerMatcher::new(config),
            confirmed_at: None,
        }
    }

    pub fn question(&self) -> Question {
        self.generator.current()
    }

    /// Draws the next question and starts judging it from scratch.
    pub fn next_question(&mut self) -> Question {
        self.matcher.reset();
        self.confirmed_at = None;
        self.generator.generate()
    }

    /// Keeps the active question but forgets any partial or confirmed match.
    /// Used when a new listening session (with a new clock) starts.
    pub fn restart(&mut self) {
        self.matcher.reset();
        self.confirmed_at = None;
    }

    /// Judges the note detected at `now` against the active question.
    pub fn submit(&mut self, note: &NoteInfo, now: Duration) -> Feedback {
        let question = self.generator.current();
        let correct = self.matcher.check(&question, note, now);
        if correct && self.confirmed_at.is_none() {
            self.confirmed_at = Some(now);
        }
        Feedback {
            correct,
            detected_fret: AnswerMatcher::detected_fret(note, question.target_string_index),
        }
    }

    /// When the active question was confirmed, if it has been.
    pub fn confirmed_at(&self) -> Option<Duration> {
        self.confirmed_at
    }

    pub fn phase(&self) -> MatchPhase {
        self.matcher.phase()
    }

    pub fn set_available_notes(&mut self, notes: NoteSet) {
        self.generator.set_available_notes(notes);
    }

    pub fn set_available_string(&mut self, index: Option<usize>) -> Result<(), ConfigError> {
        self.generator.set_available_string(index)
    }

    pub fn generator(&self) -> &QuestionGenerator {
        &self.generator
    }
}
