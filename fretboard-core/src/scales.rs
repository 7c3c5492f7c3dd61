//! # Scales Module
//!
//! Note sets used to filter practice questions, and the static table of major and
//! natural minor scales. Scales authored with flats are normalized to sharp
//! spellings once, when the table is built, so every comparison downstream is
//! sharp against sharp.

use once_cell::sync::Lazy;

use crate::tuning::{NoteError, PitchClass};

/// Maps flat (and `E#`) spellings onto the sharp-spelled table.
/// Names not in the map are returned unchanged.
pub fn normalize_note_name(name: &str) -> &str {
    match name {
        "Db" => "C#",
        "Eb" => "D#",
        "Gb" => "F#",
        "Ab" => "G#",
        "Bb" => "A#",
        "E#" => "F",
        other => other,
    }
}

/// An ordered, duplicate-free set of pitch classes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteSet(Vec<PitchClass>);

impl NoteSet {
    /// All twelve pitch classes, starting at C.
    pub fn chromatic() -> Self {
        Self(PitchClass::ALL.to_vec())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Builds a set from note names, normalizing flat spellings first.
    ///
    /// # Returns
    /// * `Ok(NoteSet)` - in input order, later duplicates dropped
    /// * `Err(NoteError)` - if a name is not a known pitch class after normalization
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, NoteError> {
        let mut set = Self::empty();
        for name in names {
            let name = name.as_ref();
            let pitch = PitchClass::from_name(normalize_note_name(name))
                .ok_or_else(|| NoteError::UnknownName(name.to_string()))?;
            set.insert(pitch);
        }
        Ok(set)
    }

    /// Adds a pitch class if it is not already present.
    pub fn insert(&mut self, pitch: PitchClass) -> bool {
        if self.0.contains(&pitch) {
            return false;
        }
        self.0.push(pitch);
        true
    }

    pub fn contains(&self, pitch: PitchClass) -> bool {
        self.0.contains(&pitch)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[PitchClass] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = PitchClass> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<PitchClass> for NoteSet {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        let mut set = Self::empty();
        for pitch in iter {
            set.insert(pitch);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleCategory {
    Major,
    Minor,
}

/// A named scale usable as a question filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    pub name: &'static str,
    pub notes: NoteSet,
    pub category: Option<ScaleCategory>,
}

// Spellings as they appear in notation; flats and E# are normalized on build.
const MAJOR_SCALES: [(&str, [&str; 7]); 12] = [
    ("C major", ["C", "D", "E", "F", "G", "A", "B"]),
    ("G major", ["G", "A", "B", "C", "D", "E", "F#"]),
    ("D major", ["D", "E", "F#", "G", "A", "B", "C#"]),
    ("A major", ["A", "B", "C#", "D", "E", "F#", "G#"]),
    ("E major", ["E", "F#", "G#", "A", "B", "C#", "D#"]),
    ("B major", ["B", "C#", "D#", "E", "F#", "G#", "A#"]),
    ("F# major", ["F#", "G#", "A#", "B", "C#", "D#", "E#"]),
    ("Db major", ["Db", "Eb", "F", "Gb", "Ab", "Bb", "C"]),
    ("Ab major", ["Ab", "Bb", "C", "Db", "Eb", "F", "G"]),
    ("Eb major", ["Eb", "F", "G", "Ab", "Bb", "C", "D"]),
    ("Bb major", ["Bb", "C", "D", "Eb", "F", "G", "A"]),
    ("F major", ["F", "G", "A", "Bb", "C", "D", "E"]),
];

const MINOR_SCALES: [(&str, [&str; 7]); 12] = [
    ("A minor", ["A", "B", "C", "D", "E", "F", "G"]),
    ("E minor", ["E", "F#", "G", "A", "B", "C", "D"]),
    ("B minor", ["B", "C#", "D", "E", "F#", "G", "A"]),
    ("F# minor", ["F#", "G#", "A", "B", "C#", "D", "E"]),
    ("C# minor", ["C#", "D#", "E", "F#", "G#", "A", "B"]),
    ("G# minor", ["G#", "A#", "B", "C#", "D#", "E", "F#"]),
    ("D# minor", ["D#", "E#", "F#", "G#", "A#", "B", "C#"]),
    ("Bb minor", ["Bb", "C", "Db", "Eb", "F", "Gb", "Ab"]),
    ("F minor", ["F", "G", "Ab", "Bb", "C", "Db", "Eb"]),
    ("C minor", ["C", "D", "Eb", "F", "G", "Ab", "Bb"]),
    ("G minor", ["G", "A", "Bb", "C", "D", "Eb", "F"]),
    ("D minor", ["D", "E", "F", "G", "A", "Bb", "C"]),
];

fn build_scales(
    table: &[(&'static str, [&'static str; 7])],
    category: ScaleCategory,
) -> Vec<Scale> {
    table
        .iter()
        .filter_map(|&(name, ref notes)| match NoteSet::from_names(notes) {
            Ok(notes) => Some(Scale {
                name,
                notes,
                category: Some(category),
            }),
            Err(e) => {
                tracing::warn!("[SCALES] Skipping {}: {}", name, e);
                None
            }
        })
        .collect()
}

/// The twelve major scales in circle-of-fifths order.
pub static MAJOR: Lazy<Vec<Scale>> = Lazy::new(|| build_scales(&MAJOR_SCALES, ScaleCategory::Major));

/// The twelve natural minor scales in circle-of-fifths order.
pub static MINOR: Lazy<Vec<Scale>> = Lazy::new(|| build_scales(&MINOR_SCALES, ScaleCategory::Minor));

/// The default filter: every pitch class.
pub static ALL_NOTES: Lazy<Scale> = Lazy::new(|| Scale {
    name: "All notes",
    notes: NoteSet::chromatic(),
    category: None,
});

/// Looks up a scale by display name, including "All notes".
pub fn find_scale(name: &str) -> Option<&'static Scale> {
    std::iter::once(&*ALL_NOTES)
        .chain(MAJOR.iter())
        .chain(MINOR.iter())
        .find(|s| s.name == name)
}
