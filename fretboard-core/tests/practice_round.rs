use std::time::Duration;

use fretboard_core::{
    MatchConfig, NoteSet, PitchClass, PitchTracker, PracticeRound, QuestionGenerator,
    TrainerConfig,
};
use pretty_assertions::assert_eq;

const RATE: u32 = 44_100;

fn low_e_round(config: &TrainerConfig) -> PracticeRound {
    let mut generator = QuestionGenerator::with_seed(2024);
    generator.set_available_notes(NoteSet::from_names(&["E"]).unwrap());
    generator.set_available_string(Some(5)).unwrap();
    let mut round = PracticeRound::new(config.matching, generator);
    round.next_question();
    round
}

#[test]
fn sustained_low_e_is_confirmed_after_hold() {
    let config = TrainerConfig::default();
    let mut tracker = PitchTracker::new(&config, |_: &[f32], _: u32| Some(82.41_f32));
    let mut round = low_e_round(&config);
    assert_eq!(round.question().target_note, PitchClass::E);
    assert_eq!(round.question().target_string_index, 5);

    let frame = vec![0.3; 1024];
    let mut results = Vec::new();
    for t in (0..150).step_by(16) {
        let now = Duration::from_millis(t);
        let note = tracker.process_frame(&frame, RATE, now);
        let feedback = round.submit(&note, now);
        assert_eq!(feedback.detected_fret, Some(0));
        results.push((t, feedback.correct));
    }

    let first_correct = results.iter().find(|(_, c)| *c).map(|(t, _)| *t);
    assert_eq!(first_correct, Some(112));
    assert!(results.iter().filter(|(t, _)| *t < 100).all(|(_, c)| !c));
    assert!(results.iter().filter(|(t, _)| *t >= 112).all(|(_, c)| *c));
    assert_eq!(round.confirmed_at(), Some(Duration::from_millis(112)));
}

#[test]
fn interruption_before_hold_restarts_the_clock() {
    let config = TrainerConfig::default();
    let mut round = low_e_round(&config);
    let e = fretboard_core::tuning::note_from_frequency(82.41);
    let f = fretboard_core::tuning::note_from_frequency(87.31);

    for t in [0, 16, 32, 48, 64, 80, 96] {
        assert!(!round.submit(&e, Duration::from_millis(t)).correct);
    }
    let feedback = round.submit(&f, Duration::from_millis(99));
    assert!(!feedback.correct);
    assert_eq!(feedback.detected_fret, Some(1));
    assert!(!round.submit(&e, Duration::from_millis(112)).correct);
    assert!(!round.submit(&e, Duration::from_millis(200)).correct);
    assert!(round.submit(&e, Duration::from_millis(212)).correct);
}

#[test]
fn zero_hold_confirms_on_second_matching_frame() {
    let mut config = TrainerConfig::default();
    config.matching = MatchConfig { required_hold_ms: 0 };
    let mut round = low_e_round(&config);
    let e = fretboard_core::tuning::note_from_frequency(329.63);
    assert!(!round.submit(&e, Duration::ZERO).correct);
    assert!(round.submit(&e, Duration::ZERO).correct);
    assert!(round.submit(&fretboard_core::NoteInfo::empty(), Duration::from_millis(5)).correct);
}
