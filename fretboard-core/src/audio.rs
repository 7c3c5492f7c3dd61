//! # Audio Capture Module
//!
//! Microphone capture using CPAL (Cross-Platform Audio Library). Incoming audio is
//! down-mixed to mono into a sliding analysis window. A copy of the window is
//! handed to the tracking worker over a bounded channel once per display tick, so
//! consecutive frames overlap.
//!
//! ## Features
//! - Default input device selection
//! - f32 input at (or as close as the device allows to) 44.1 kHz
//! - Any channel count, averaged to mono
//! - Every frame carries the time it was captured
//! - Frames are dropped rather than queued when the consumer falls behind

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Sender, TrySendError};

/// Preferred capture sample rate.
pub const TARGET_SAMPLE_RATE: u32 = 44_100;

/// Frames allowed to wait in the channel before new ones are dropped.
pub const FRAME_QUEUE_DEPTH: usize = 5;

/// Analysis frames emitted per second of audio, one per 16 ms display tick.
pub const FRAMES_PER_SECOND: u32 = 60;

/// An analysis window and the moment its newest sample was captured.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub captured_at: Instant,
    pub samples: Vec<f32>,
}

/// Samples between two consecutive frames at `sample_rate`.
pub fn hop_size(sample_rate: u32) -> usize {
    (sample_rate / FRAMES_PER_SECOND).max(1) as usize
}

/// Starts audio capture from the default input device.
///
/// # Arguments
/// * `sender` - Channel for timestamped frames; use a bounded channel
/// * `frame_size` - Number of mono samples per analysis window
///
/// # Returns
/// * `Ok((stream, sample_rate))` - Running stream handle and its sample rate.
///   Capture stops when the stream is dropped.
/// * `Err(e)` - No device, no f32 input format, or the stream failed to start
pub fn start_audio_capture(
    sender: Sender<CapturedFrame>,
    frame_size: usize,
) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    tracing::info!("[AUDIO] Using input device: {}", device.name()?);

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(configs, TARGET_SAMPLE_RATE)
        .ok_or_else(|| anyhow!("No suitable f32 input format found"))?;

    let rate = TARGET_SAMPLE_RATE.clamp(
        supported_config.min_sample_rate().0,
        supported_config.max_sample_rate().0,
    );
    let config = supported_config.with_sample_rate(cpal::SampleRate(rate));
    let sample_rate = config.sample_rate().0;
    let channels = config.channels().max(1) as usize;
    let config: cpal::StreamConfig = config.into();
    let hop = hop_size(sample_rate);
    let hop_duration = Duration::from_secs_f64(hop as f64 / sample_rate as f64);

    tracing::info!(
        "[AUDIO] Capturing {} channel(s) at {} Hz, {} samples per frame, hop {}",
        channels,
        sample_rate,
        frame_size,
        hop
    );

    let err_fn = |err: cpal::StreamError| tracing::warn!("[AUDIO] Stream error: {}", err);

    let mut frame_buffer = FrameBuffer::new(frame_size, hop);

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let now = Instant::now();
            let mono = data
                .chunks(channels)
                .map(|c| c.iter().sum::<f32>() / c.len() as f32);
            let frames = frame_buffer.push(mono);
            let count = frames.len();
            for (i, samples) in frames.into_iter().enumerate() {
                // earlier frames of this callback ended one hop apart
                let age = hop_duration * (count - 1 - i) as u32;
                let captured_at = now.checked_sub(age).unwrap_or(now);
                match sender.try_send(CapturedFrame {
                    captured_at,
                    samples,
                }) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::trace!("[AUDIO] Consumer behind, frame dropped");
                    }
                    Err(TrySendError::Disconnected(_)) => return,
                }
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok((stream, sample_rate))
}

/// Sliding window over the most recent `frame_size` samples.
///
/// The window starts out filled with silence. A copy of it is taken every `hop`
/// samples, so frames overlap by `frame_size - hop` samples.
#[derive(Debug)]
pub struct FrameBuffer {
    window: VecDeque<f32>,
    hop: usize,
    since_last_frame: usize,
}

impl FrameBuffer {
    pub fn new(frame_size: usize, hop: usize) -> Self {
        Self {
            window: VecDeque::from(vec![0.0; frame_size.max(1)]),
            hop: hop.max(1),
            since_last_frame: 0,
        }
    }

    /// Slides the window over `samples` and returns a copy at every hop, oldest first.
    pub fn push(&mut self, samples: impl IntoIterator<Item = f32>) -> Vec<Vec<f32>> {
        let mut frames = Vec::new();
        for sample in samples {
            self.window.pop_front();
            self.window.push_back(sample);
            self.since_last_frame += 1;
            if self.since_last_frame == self.hop {
                self.since_last_frame = 0;
                frames.push(self.window.iter().copied().collect());
            }
        }
        frames
    }

    pub fn frame_size(&self) -> usize {
        self.window.len()
    }

    /// Samples received since the last frame was emitted.
    pub fn since_last_frame(&self) -> usize {
        self.since_last_frame
    }
}

/// Picks the f32 input configuration whose sample-rate range is closest to
/// `target_rate`, preferring fewer channels on ties.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let min = c.min_sample_rate().0;
            let max = c.max_sample_rate().0;
            let distance = if (min..=max).contains(&target_rate) {
                0
            } else {
                min.abs_diff(target_rate).min(max.abs_diff(target_rate))
            };
            (distance, c.channels())
        })
}
