use std::time::{Duration, Instant};

use fretboard_core::audio::CapturedFrame;
use fretboard_core::{PitchTracker, TrackedNote, TrackingWorker, TrainerConfig};

const TIMEOUT: Duration = Duration::from_secs(5);

fn frame(captured_at: Instant, level: f32) -> CapturedFrame {
    CapturedFrame {
        captured_at,
        samples: vec![level; 512],
    }
}

#[test]
fn frames_become_timestamped_notes() {
    let (frame_tx, frame_rx) = crossbeam_channel::bounded(4);
    let (note_tx, note_rx) = crossbeam_channel::unbounded::<TrackedNote>();
    let tracker = PitchTracker::new(&TrainerConfig::default(), |_: &[f32], _: u32| {
        Some(110.0_f32)
    });
    let mut worker = TrackingWorker::spawn(tracker, frame_rx, 44_100, note_tx).unwrap();

    let now = Instant::now();
    frame_tx.send(frame(now, 0.3)).unwrap();
    frame_tx.send(frame(now, 0.0)).unwrap();

    let first = note_rx.recv_timeout(TIMEOUT).unwrap();
    let second = note_rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(first.note.note_name(), "A");
    assert_eq!(first.note.octave(), 2);
    assert!(second.at >= first.at);

    worker.stop();
    worker.stop();
    assert!(!worker.is_running());
}

#[test]
fn queued_frames_keep_their_capture_spacing() {
    let (frame_tx, frame_rx) = crossbeam_channel::bounded(4);
    let (note_tx, note_rx) = crossbeam_channel::unbounded::<TrackedNote>();
    let tracker = PitchTracker::new(&TrainerConfig::default(), |_: &[f32], _: u32| {
        Some(82.41_f32)
    });
    let mut worker = TrackingWorker::spawn(tracker, frame_rx, 44_100, note_tx).unwrap();

    // both frames are already queued when the worker gets to them
    let captured = Instant::now();
    frame_tx.send(frame(captured, 0.3)).unwrap();
    frame_tx
        .send(frame(captured + Duration::from_millis(50), 0.3))
        .unwrap();

    let first = note_rx.recv_timeout(TIMEOUT).unwrap();
    let second = note_rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(second.at - first.at, Duration::from_millis(50));
    worker.stop();
}

#[test]
fn closing_the_frame_channel_ends_the_worker() {
    let (frame_tx, frame_rx) = crossbeam_channel::bounded::<CapturedFrame>(1);
    let (note_tx, note_rx) = crossbeam_channel::unbounded();
    let tracker = PitchTracker::new(&TrainerConfig::default(), |_: &[f32], _: u32| -> Option<f32> { None });
    let mut worker = TrackingWorker::spawn(tracker, frame_rx, 48_000, note_tx).unwrap();

    drop(frame_tx);
    // the note sender is dropped with the thread
    assert!(note_rx.recv_timeout(TIMEOUT).is_err());
    worker.stop();
}
