//! # Question Module
//!
//! Picks the next target (string, pitch class) for the practice game.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::ConfigError;
use crate::guitar::{self, GuitarString, MAX_FRET, STRING_COUNT};
use crate::scales::NoteSet;
use crate::tuning::PitchClass;

/// Pitch class used when the note filter is empty.
pub const FALLBACK_NOTE: PitchClass = PitchClass::G;

/// One round's target: find `target_note` on string `target_string_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub target_string_index: usize,
    pub target_note: PitchClass,
}

impl Question {
    pub fn target_string(&self) -> Option<&'static GuitarString> {
        guitar::guitar_string(self.target_string_index)
    }

    /// Frets in `0..=24` on the target string that sound the target pitch class.
    pub fn fret_positions(&self) -> Vec<u8> {
        let Some(string) = self.target_string() else {
            return Vec::new();
        };
        let first = (self.target_note.index() as i32 - string.open_note.index() as i32).rem_euclid(12);
        (first..=MAX_FRET).step_by(12).map(|f| f as u8).collect()
    }
}

impl Default for Question {
    /// Low E string, note G.
    fn default() -> Self {
        Self {
            target_string_index: STRING_COUNT - 1,
            target_note: FALLBACK_NOTE,
        }
    }
}

pub struct QuestionGenerator {
    available_notes: NoteSet,
    available_string: Option<usize>,
    current: Question,
    rng: StdRng,
}

impl QuestionGenerator {
    /// Generator over the full chromatic set and all strings, seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Generator with a fixed seed, for reproducible question sequences.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            available_notes: NoteSet::chromatic(),
            available_string: None,
            current: Question::default(),
            rng,
        }
    }

    /// Draws a new question and makes it the active one.
    ///
    /// The string is the fixed one if set, otherwise uniform over all six. The note
    /// is uniform over the available notes, or [`FALLBACK_NOTE`] if the set is empty.
    pub fn generate(&mut self) -> Question {
        let target_string_index = self
            .available_string
            .unwrap_or_else(|| self.rng.gen_range(0..STRING_COUNT));
        let target_note = match self.available_notes.as_slice().choose(&mut self.rng) {
            Some(&note) => note,
            None => {
                tracing::warn!("[GAME] Empty note set, falling back to {}", FALLBACK_NOTE);
                FALLBACK_NOTE
            }
        };

        self.current = Question {
            target_string_index,
            target_note,
        };
        tracing::debug!(
            "[GAME] New question: {} on string {}",
            target_note,
            target_string_index
        );
        self.current
    }

    pub fn current(&self) -> Question {
        self.current
    }

    /// Replaces the note filter. Takes effect on the next [`generate`](Self::generate).
    pub fn set_available_notes(&mut self, notes: NoteSet) {
        self.available_notes = notes;
    }

    pub fn available_notes(&self) -> &NoteSet {
        &self.available_notes
    }

    /// Fixes the target string, or `None` for a random string each round.
    ///
    /// An index outside `0..6` is rejected and the previous setting kept.
    pub fn set_available_string(&mut self, index: Option<usize>) -> Result<(), ConfigError> {
        if let Some(i) = index {
            if i >= STRING_COUNT {
                return Err(ConfigError::StringIndex(i));
            }
        }
        self.available_string = index;
        Ok(())
    }

    pub fn available_string(&self) -> Option<usize> {
        self.available_string
    }
}

impl Default for QuestionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::find_scale;
    use std::collections::HashSet;

    #[test]
    fn initial_question_is_g_on_low_e() {
        let generator = QuestionGenerator::with_seed(1);
        assert_eq!(generator.current(), Question::default());
        assert_eq!(generator.current().target_string_index, 5);
    }

    #[test]
    fn fixed_string_is_always_used() {
        let mut generator = QuestionGenerator::with_seed(7);
        generator.set_available_string(Some(2)).unwrap();
        for _ in 0..50 {
            assert_eq!(generator.generate().target_string_index, 2);
        }
    }

    #[test]
    fn notes_come_from_the_filter() {
        let mut generator = QuestionGenerator::with_seed(42);
        let scale = find_scale("D major").unwrap();
        generator.set_available_notes(scale.notes.clone());
        let mut seen = HashSet::new();
        for _ in 0..300 {
            let q = generator.generate();
            assert!(scale.notes.contains(q.target_note));
            assert!(q.target_string_index < STRING_COUNT);
            seen.insert(q.target_note);
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn random_strings_cover_the_neck() {
        let mut generator = QuestionGenerator::with_seed(3);
        let strings: HashSet<usize> = (0..300)
            .map(|_| generator.generate().target_string_index)
            .collect();
        assert_eq!(strings.len(), STRING_COUNT);
    }

    #[test]
    fn empty_filter_falls_back() {
        let mut generator = QuestionGenerator::with_seed(5);
        generator.set_available_notes(NoteSet::empty());
        assert_eq!(generator.generate().target_note, FALLBACK_NOTE);
    }

    #[test]
    fn settings_do_not_change_active_question() {
        let mut generator = QuestionGenerator::with_seed(9);
        let before = generator.generate();
        generator.set_available_notes(NoteSet::from_names(&["C"]).unwrap());
        generator.set_available_string(Some(0)).unwrap();
        assert_eq!(generator.current(), before);

        let after = generator.generate();
        assert_eq!(after.target_note, PitchClass::C);
        assert_eq!(after.target_string_index, 0);
    }

    #[test]
    fn bad_string_index_is_rejected() {
        let mut generator = QuestionGenerator::with_seed(11);
        generator.set_available_string(Some(1)).unwrap();
        assert_eq!(
            generator.set_available_string(Some(6)),
            Err(ConfigError::StringIndex(6))
        );
        assert_eq!(generator.available_string(), Some(1));
    }

    #[test]
    fn fret_positions_on_target_string() {
        let q = Question {
            target_string_index: 5,
            target_note: PitchClass::G,
        };
        assert_eq!(q.fret_positions(), vec![3, 15]);
        let open = Question {
            target_string_index: 0,
            target_note: PitchClass::E,
        };
        assert_eq!(open.fret_positions(), vec![0, 12, 24]);
    }
}
