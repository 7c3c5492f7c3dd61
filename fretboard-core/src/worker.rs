//! # Tracking Worker Module
//!
//! A dedicated thread that owns the [`PitchTracker`], turns every captured frame
//! into a timestamped note and forwards it to the UI thread.
//!
//! ## Architecture
//! - **Capture**: CPAL callback, emits overlapping timestamped frames (see [`crate::audio`])
//! - **Worker thread**: single consumer of frames, single owner of tracker state
//! - **Communication**: crossbeam channels; shutdown is its own channel

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use cpal::traits::StreamTrait;
use crossbeam_channel::{Receiver, Sender};

use crate::audio::{self, CapturedFrame};
use crate::config::TrainerConfig;
use crate::pitch::FrequencyEstimator;
use crate::tracker::PitchTracker;
use crate::tuning::NoteInfo;

/// A tracked note and the session time of the frame it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedNote {
    pub note: NoteInfo,
    pub at: Duration,
}

/// Runs the tracker over incoming frames until shutdown or until a channel closes.
///
/// Each note is stamped with its frame's capture time relative to `session_start`,
/// so frames that waited in the queue keep their real spacing. The tracker is
/// stopped before returning.
pub fn run_tracking_loop<E: FrequencyEstimator>(
    tracker: &mut PitchTracker<E>,
    frames: &Receiver<CapturedFrame>,
    shutdown: &Receiver<()>,
    sample_rate: u32,
    session_start: Instant,
    notes: &Sender<TrackedNote>,
) {
    loop {
        crossbeam_channel::select! {
            recv(frames) -> msg => match msg {
                Ok(frame) => {
                    let at = frame.captured_at.saturating_duration_since(session_start);
                    let note = tracker.process_frame(&frame.samples, sample_rate, at);
                    if notes.send(TrackedNote { note, at }).is_err() {
                        tracing::debug!("[WORKER] Note receiver dropped");
                        break;
                    }
                }
                Err(_) => {
                    tracing::debug!("[WORKER] Frame channel closed");
                    break;
                }
            },
            recv(shutdown) -> _ => {
                tracing::debug!("[WORKER] Received shutdown signal");
                break;
            },
        }
    }
    tracker.stop();
}

/// Handle to a running tracking thread.
#[derive(Debug)]
pub struct TrackingWorker {
    shutdown_tx: Sender<()>,
    thread_handle: Option<JoinHandle<()>>,
    sample_rate: u32,
}

impl TrackingWorker {
    /// Spawns a worker over an existing frame channel.
    pub fn spawn<E>(
        mut tracker: PitchTracker<E>,
        frames: Receiver<CapturedFrame>,
        sample_rate: u32,
        notes: Sender<TrackedNote>,
    ) -> Result<Self>
    where
        E: FrequencyEstimator + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let session_start = Instant::now();
        let thread_handle = thread::Builder::new()
            .name("tracking".into())
            .spawn(move || {
                run_tracking_loop(
                    &mut tracker,
                    &frames,
                    &shutdown_rx,
                    sample_rate,
                    session_start,
                    &notes,
                );
            })
            .context("spawning tracking thread")?;

        Ok(Self {
            shutdown_tx,
            thread_handle: Some(thread_handle),
            sample_rate,
        })
    }

    /// Spawns a worker that opens the default microphone itself.
    ///
    /// The CPAL stream is created and dropped on the worker thread. Returns once
    /// capture is running, or with the capture error.
    pub fn spawn_with_capture<E>(
        config: TrainerConfig,
        estimator: E,
        notes: Sender<TrackedNote>,
    ) -> Result<Self>
    where
        E: FrequencyEstimator + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<u32>>(1);

        let thread_handle = thread::Builder::new()
            .name("tracking".into())
            .spawn(move || {
                tracing::info!("[WORKER] Starting audio capture...");
                let session_start = Instant::now();
                let (frame_tx, frame_rx) = crossbeam_channel::bounded(audio::FRAME_QUEUE_DEPTH);
                let (stream, sample_rate) =
                    match audio::start_audio_capture(frame_tx, config.frame_size) {
                        Ok(started) => started,
                        Err(e) => {
                            let _ = ready_tx.send(Err(e));
                            return;
                        }
                    };
                let _ = ready_tx.send(Ok(sample_rate));

                let mut tracker = PitchTracker::new(&config, estimator);
                run_tracking_loop(
                    &mut tracker,
                    &frame_rx,
                    &shutdown_rx,
                    sample_rate,
                    session_start,
                    &notes,
                );

                if let Err(e) = stream.pause() {
                    tracing::warn!("[WORKER] Error pausing stream: {}", e);
                }
                drop(stream);
                tracing::info!("[WORKER] Audio capture stopped");
            })
            .context("spawning tracking thread")?;

        let sample_rate = ready_rx
            .recv()
            .map_err(|_| anyhow!("tracking thread exited during startup"))??;

        Ok(Self {
            shutdown_tx,
            thread_handle: Some(thread_handle),
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Signals the thread and waits for it. Safe to call more than once.
    pub fn stop(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };
        let _ = self.shutdown_tx.try_send(());
        if handle.join().is_err() {
            tracing::warn!("[WORKER] Tracking thread panicked");
        }
    }
}

impl Drop for TrackingWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
