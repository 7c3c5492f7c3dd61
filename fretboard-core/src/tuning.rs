//! # Musical Tuning Module
//!
//! Pure conversions between frequency, MIDI number, pitch class/octave and cents
//! deviation, based on twelve-tone equal temperament with A4 = 440 Hz.
//!
//! ## Features
//! - Sharp-spelled pitch classes (`C`, `C#`, ... `B`)
//! - Frequency to nearest note with cents deviation
//! - Note name to MIDI and MIDI to frequency conversions
//! - A single "no pitch" value (`NoteInfo::empty`) shared by the whole pipeline

use std::fmt;

use thiserror::Error;

/// Reference pitch for A4 in Hz.
pub const A4_FREQUENCY: f32 = 440.0;

/// MIDI number of A4.
pub const A4_MIDI: i32 = 69;

/// Placeholder shown when no pitch is detected.
pub const NO_NOTE: &str = "-";

/// Sharp-spelled pitch class names, indexed by `midi % 12`.
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("unknown note name `{0}`")]
    UnknownName(String),
}

/// One of the twelve octave-independent note names.
///
/// Only sharp spellings exist; flat-spelled input is normalized by
/// [`crate::scales::normalize_note_name`] before it becomes a `PitchClass`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Position in the chromatic table, 0 for C up to 11 for B.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class of any MIDI number, negative values included.
    pub fn from_midi(midi: i32) -> Self {
        Self::ALL[midi.rem_euclid(12) as usize]
    }

    pub fn name(self) -> &'static str {
        PITCH_CLASS_NAMES[self.index()]
    }

    /// Looks up a sharp-spelled name exactly as it appears in the table.
    pub fn from_name(name: &str) -> Option<Self> {
        PITCH_CLASS_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| Self::ALL[i])
    }

    /// MIDI number of this pitch class in the given octave (C4 = 60).
    pub fn midi(self, octave: i32) -> i32 {
        (octave + 1) * 12 + self.index() as i32
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PitchClass {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| NoteError::UnknownName(s.to_string()))
    }
}

/// The pitch estimate for one frame, ready for display and answer matching.
///
/// The empty value (`note_name() == "-"`) always has a frequency of 0 and a
/// non-empty value always has a positive frequency. Both constructors uphold this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteInfo {
    pitch: Option<PitchClass>,
    octave: i32,
    cents_off: i32,
    frequency: f32,
}

impl NoteInfo {
    /// The "no pitch detected" value.
    pub const fn empty() -> Self {
        Self {
            pitch: None,
            octave: 0,
            cents_off: 0,
            frequency: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pitch.is_none()
    }

    pub fn pitch(&self) -> Option<PitchClass> {
        self.pitch
    }

    /// Pitch class name, or `"-"` when nothing was detected.
    pub fn note_name(&self) -> &'static str {
        self.pitch.map_or(NO_NOTE, PitchClass::name)
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn cents_off(&self) -> i32 {
        self.cents_off
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Nearest integer MIDI number, `None` for the empty value.
    pub fn midi(&self) -> Option<i32> {
        self.pitch.map(|p| p.midi(self.octave))
    }
}

impl Default for NoteInfo {
    fn default() -> Self {
        Self::empty()
    }
}

/// Converts a frequency to a continuous MIDI value: `69 + 12 * log2(f / 440)`.
///
/// # Returns
/// * `Some(midi)` - for any finite, positive frequency
/// * `None` - for zero, negative or non-finite input
pub fn frequency_to_midi(freq: f32) -> Option<f64> {
    if !freq.is_finite() || freq <= 0.0 {
        return None;
    }
    Some(A4_MIDI as f64 + 12.0 * (freq as f64 / A4_FREQUENCY as f64).log2())
}

/// Finds the nearest equal-tempered note to a frequency.
///
/// The continuous MIDI value is rounded to the nearest integer `m`, and the
/// deviation is truncated towards negative infinity: `floor((midi - m) * 100)`.
/// Invalid frequencies produce [`NoteInfo::empty`].
///
/// # Arguments
/// * `freq` - Measured frequency in Hz
///
/// # Returns
/// * `NoteInfo` - Pitch class, octave, cents deviation and the input frequency
pub fn note_from_frequency(freq: f32) -> NoteInfo {
    let Some(midi_float) = frequency_to_midi(freq) else {
        return NoteInfo::empty();
    };
    let midi = midi_float.round() as i32;
    let cents_off = ((midi_float - midi as f64) * 100.0).floor() as i32;

    NoteInfo {
        pitch: Some(PitchClass::from_midi(midi)),
        octave: midi.div_euclid(12) - 1,
        cents_off,
        frequency: freq,
    }
}

/// Converts a sharp-spelled note name and octave to a MIDI number.
///
/// Names outside the chromatic table give `None`; use [`PitchClass::midi`] when the
/// pitch class is already known.
pub fn note_to_midi(note: &str, octave: i32) -> Option<i32> {
    PitchClass::from_name(note).map(|p| p.midi(octave))
}

/// Frequency of an integer MIDI number: `440 * 2^((m - 69) / 12)`.
pub fn midi_to_frequency(midi: i32) -> f32 {
    (A4_FREQUENCY as f64 * 2.0_f64.powf((midi - A4_MIDI) as f64 / 12.0)) as f32
}
