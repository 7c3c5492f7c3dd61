use std::time::Duration;

use fretboard_core::{NoteInfo, PitchTracker, TrainerConfig, YinEstimator};
use fretboard_core::tuning::{midi_to_frequency, note_from_frequency, note_to_midi};
use pretty_assertions::assert_eq;

const RATE: u32 = 44_100;
const FRAME_MS: u64 = 16;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn loud() -> Vec<f32> {
    vec![0.2; 1024]
}

fn quiet() -> Vec<f32> {
    vec![0.0; 1024]
}

fn stub(freq: f32) -> impl Fn(&[f32], u32) -> Option<f32> {
    move |_: &[f32], _: u32| Some(freq)
}

fn sine(freq: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.4 * (2.0 * std::f32::consts::PI * freq * i as f32 / RATE as f32).sin())
        .collect()
}

#[test]
fn a440_reports_a4() {
    let note = note_from_frequency(440.0);
    assert_eq!(
        (note.note_name(), note.octave(), note.cents_off(), note.frequency()),
        ("A", 4, 0, 440.0)
    );
}

#[test]
fn round_trip_through_midi_and_frequency() {
    for octave in 1..=6 {
        for name in fretboard_core::tuning::PITCH_CLASS_NAMES {
            let midi = note_to_midi(name, octave).unwrap();
            let note = note_from_frequency(midi_to_frequency(midi));
            assert_eq!((note.note_name(), note.octave()), (name, octave));
        }
    }
}

#[test]
fn gate_hold_keeps_last_note_then_expires() {
    let mut tracker = PitchTracker::new(&TrainerConfig::default(), stub(440.0));
    let mut t = 0;
    while t <= 48 {
        assert_eq!(tracker.process_frame(&loud(), RATE, ms(t)).note_name(), "A");
        t += FRAME_MS;
    }
    let last_open = t - FRAME_MS;

    let held = tracker.process_frame(&quiet(), RATE, ms(last_open + 50));
    assert_eq!(held.note_name(), "A");
    assert_eq!(held.octave(), 4);

    let expired = tracker.process_frame(&quiet(), RATE, ms(last_open + 150));
    assert_eq!(expired, NoteInfo::empty());
}

#[test]
fn implausible_frequencies_never_produce_notes() {
    for freq in [0.0, 12.0, 39.0, 2001.0, 8000.0] {
        let mut tracker = PitchTracker::new(&TrainerConfig::default(), stub(freq));
        for i in 0..10 {
            let note = tracker.process_frame(&loud(), RATE, ms(i * FRAME_MS));
            assert!(note.is_empty(), "{freq} Hz gave {}", note.note_name());
            assert_eq!(note.frequency(), 0.0);
        }
    }
}

#[test]
fn missing_estimate_replays_recent_note() {
    let answers = std::cell::Cell::new(0);
    let flaky = |_: &[f32], _: u32| {
        answers.set(answers.get() + 1);
        if answers.get() == 1 { Some(196.0_f32) } else { None }
    };
    let mut tracker = PitchTracker::new(&TrainerConfig::default(), flaky);
    assert_eq!(tracker.process_frame(&loud(), RATE, ms(0)).note_name(), "G");
    assert_eq!(tracker.process_frame(&loud(), RATE, ms(16)).note_name(), "G");
    assert!(tracker.process_frame(&loud(), RATE, ms(200)).is_empty());
}

#[test]
fn gate_hold_counts_from_last_open_frame_not_last_estimate() {
    let answers = std::cell::Cell::new(0);
    let first_only = |_: &[f32], _: u32| {
        answers.set(answers.get() + 1);
        if answers.get() == 1 { Some(440.0_f32) } else { None }
    };
    let mut tracker = PitchTracker::new(&TrainerConfig::default(), first_only);
    assert_eq!(tracker.process_frame(&loud(), RATE, ms(0)).note_name(), "A");
    assert_eq!(tracker.process_frame(&loud(), RATE, ms(60)).note_name(), "A");
    assert_eq!(tracker.process_frame(&loud(), RATE, ms(90)).note_name(), "A");

    // 150 ms after the estimate, but only 60 ms after the gate was last open
    let held = tracker.process_frame(&quiet(), RATE, ms(150));
    assert_eq!((held.note_name(), held.octave()), ("A", 4));

    assert!(tracker.process_frame(&quiet(), RATE, ms(190)).is_empty());
}

#[test]
fn yin_tracker_follows_a_real_signal() {
    let config = TrainerConfig::default();
    let mut tracker = PitchTracker::new(&config, YinEstimator::default());
    let frame = sine(196.0, config.frame_size);
    let mut note = NoteInfo::empty();
    for i in 0..5 {
        note = tracker.process_frame(&frame, RATE, ms(i * FRAME_MS));
    }
    assert_eq!((note.note_name(), note.octave()), ("G", 3));
}
