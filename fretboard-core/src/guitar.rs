//! # Guitar Fretboard Module
//!
//! The standard-tuning string table and fret/MIDI conversions.
//! String 0 is the high E (E4), string 5 is the low E (E2).

use once_cell::sync::Lazy;

use crate::tuning::PitchClass;

/// Number of strings on the instrument.
pub const STRING_COUNT: usize = 6;

/// Highest fret considered playable; frets outside `0..=MAX_FRET` are "undetected".
pub const MAX_FRET: i32 = 24;

/// One open string of the instrument. Never mutated after the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuitarString {
    pub index: usize,
    pub label: &'static str,
    pub open_note: PitchClass,
    pub open_midi: i32,
}

/// Standard tuning E2 A2 D3 G3 B3 E4, ordered from the thinnest string.
pub static GUITAR_STRINGS: Lazy<[GuitarString; STRING_COUNT]> = Lazy::new(|| {
    const OPEN: [(&str, PitchClass, i32); STRING_COUNT] = [
        ("1st (E)", PitchClass::E, 4),
        ("2nd (B)", PitchClass::B, 3),
        ("3rd (G)", PitchClass::G, 3),
        ("4th (D)", PitchClass::D, 3),
        ("5th (A)", PitchClass::A, 2),
        ("6th (E)", PitchClass::E, 2),
    ];

    std::array::from_fn(|index| {
        let (label, open_note, octave) = OPEN[index];
        GuitarString {
            index,
            label,
            open_note,
            open_midi: open_note.midi(octave),
        }
    })
});

/// Returns the string at `index`, or `None` if it is not in `0..6`.
pub fn guitar_string(index: usize) -> Option<&'static GuitarString> {
    GUITAR_STRINGS.get(index)
}

/// Semitone offset of `midi` from the open pitch of a string.
///
/// The result is not clamped: it can be negative or beyond [`MAX_FRET`], and the
/// caller decides how to treat that. `None` only for an unknown string index.
pub fn fret_from_midi(midi: i32, string_index: usize) -> Option<i32> {
    guitar_string(string_index).map(|s| midi - s.open_midi)
}

/// MIDI number sounded by pressing `fret` on the given string.
pub fn midi_from_string_and_fret(string_index: usize, fret: i32) -> Option<i32> {
    guitar_string(string_index).map(|s| s.open_midi + fret)
}

pub fn is_playable_fret(fret: i32) -> bool {
    (0..=MAX_FRET).contains(&fret)
}
