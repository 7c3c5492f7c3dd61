//! # Pitch Detection Module
//!
//! The fundamental-frequency estimator used by the tracker, behind a one-method
//! trait so it can be swapped for a deterministic stub.
//!
//! ## Features
//! - `FrequencyEstimator` capability trait, implemented for plain closures
//! - YIN pitch detection with clarity checking and octave error prevention
//! - Parabolic interpolation for sub-sample accuracy
//! - Optional spectrum refinement for improved precision

use crate::fft;

/// Estimates the fundamental frequency of one frame.
///
/// Implementations must be deterministic for identical input and free of side
/// effects; the tracker may call them once per frame from a real-time loop.
pub trait FrequencyEstimator {
    /// Returns a positive frequency in Hz, or `None` if no pitch was found.
    fn estimate(&self, samples: &[f32], sample_rate: u32) -> Option<f32>;
}

impl<F> FrequencyEstimator for F
where
    F: Fn(&[f32], u32) -> Option<f32>,
{
    fn estimate(&self, samples: &[f32], sample_rate: u32) -> Option<f32> {
        self(samples, sample_rate)
    }
}

/// Default dip-depth requirement for accepting a YIN period.
const CLARITY_THRESHOLD: f32 = 0.1;

/// YIN-based estimator for plucked strings.
#[derive(Debug, Clone, Copy)]
pub struct YinEstimator {
    /// Largest normalized difference accepted at the chosen period.
    pub clarity_threshold: f32,
    /// Refine the YIN result on the magnitude spectrum of the frame.
    pub refine_with_spectrum: bool,
}

impl Default for YinEstimator {
    fn default() -> Self {
        Self {
            clarity_threshold: CLARITY_THRESHOLD,
            refine_with_spectrum: true,
        }
    }
}

impl FrequencyEstimator for YinEstimator {
    fn estimate(&self, samples: &[f32], sample_rate: u32) -> Option<f32> {
        let rough = detect_pitch_yin(samples, sample_rate, self.clarity_threshold)?;
        if !self.refine_with_spectrum {
            return Some(rough);
        }
        let magnitudes = fft::spectrum_to_magnitudes(&fft::perform_fft(samples));
        refine_from_spectrum(&magnitudes, rough, sample_rate).or(Some(rough))
    }
}

/// YIN pitch detection.
///
/// Loudness is not checked here; silence is handled by the noise gate before the
/// estimator runs.
///
/// # Arguments
/// * `signal` - Input audio signal
/// * `sample_rate` - Sample rate in Hz
/// * `clarity_threshold` - Largest normalized difference accepted at the period
///
/// # Returns
/// * `Some(frequency)` - Detected frequency in Hz
/// * `None` - No pitch detected (noise, too short, or invalid signal)
pub fn detect_pitch_yin(signal: &[f32], sample_rate: u32, clarity_threshold: f32) -> Option<f32> {
    let half = signal.len() / 2;
    if half < 3 || sample_rate == 0 {
        return None;
    }
    let mut yin_buffer = vec![0.0; half];

    // --- Difference function ---
    for tau in 1..half {
        let mut diff = 0.0;
        for i in 0..half {
            let delta = signal[i] - signal[i + tau];
            diff += delta * delta;
        }
        yin_buffer[tau] = diff;
    }

    // --- Cumulative mean normalized difference ---
    let mut running_sum = 0.0;
    yin_buffer[0] = 1.0;
    for tau in 1..half {
        running_sum += yin_buffer[tau];
        if running_sum != 0.0 {
            yin_buffer[tau] *= tau as f32 / running_sum;
        } else {
            yin_buffer[tau] = 1.0;
        }
    }

    // --- First significant dip, to avoid octave errors ---
    let min_val = yin_buffer
        .iter()
        .skip(1)
        .cloned()
        .fold(f32::INFINITY, f32::min);
    let threshold = min_val + 0.05;

    let period = (2..half)
        .find(|&tau| yin_buffer[tau] < threshold && yin_buffer[tau] < yin_buffer[tau - 1])?;

    // Not a clear tone: likely noise.
    if yin_buffer[period] > clarity_threshold {
        return None;
    }
    if period + 1 >= half {
        return None;
    }

    // --- Parabolic interpolation ---
    let y1 = yin_buffer[period - 1];
    let y2 = yin_buffer[period];
    let y3 = yin_buffer[period + 1];

    let period_float = if (y1 - 2.0 * y2 + y3) != 0.0 {
        let peak_shift = (y1 - y3) / (2.0 * (y1 - 2.0 * y2 + y3));
        period as f32 + peak_shift
    } else {
        period as f32
    };

    let frequency = sample_rate as f32 / period_float;
    if frequency.is_finite() && frequency > 20.0 {
        Some(frequency)
    } else {
        None
    }
}

/// Refines a frequency estimate using a magnitude spectrum.
///
/// Looks for the strongest bin within two bins of the estimate and interpolates
/// the log-magnitude peak for sub-bin accuracy.
///
/// # Returns
/// * `Some(refined_freq)` - Refined estimate, or `rough_freq` when no clean peak exists
/// * `None` - The rough estimate or spectrum is unusable
pub fn refine_from_spectrum(
    spectrum_magnitudes: &[f32],
    rough_freq: f32,
    sample_rate: u32,
) -> Option<f32> {
    if rough_freq <= 0.0 || spectrum_magnitudes.len() < 3 || sample_rate == 0 {
        return None;
    }
    let buffer_size = spectrum_magnitudes.len() * 2;
    let target_bin = (rough_freq * buffer_size as f32) / sample_rate as f32;
    let search_radius = 2.0;
    let start_bin = (target_bin - search_radius).max(0.0) as usize;
    let end_bin =
        (target_bin + search_radius).min((spectrum_magnitudes.len() - 1) as f32) as usize;
    if start_bin >= end_bin {
        return Some(rough_freq);
    }

    let Some((offset, _)) = spectrum_magnitudes[start_bin..=end_bin]
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
    else {
        return Some(rough_freq);
    };
    let peak_bin = start_bin + offset;

    if peak_bin == 0 || peak_bin >= spectrum_magnitudes.len() - 1 {
        return Some(rough_freq);
    }

    let y1 = spectrum_magnitudes[peak_bin - 1].ln();
    let y2 = spectrum_magnitudes[peak_bin].ln();
    let y3 = spectrum_magnitudes[peak_bin + 1].ln();
    if !y1.is_finite() || !y2.is_finite() || !y3.is_finite() {
        return Some(rough_freq);
    }

    let denominator = 2.0 * y2 - y1 - y3;
    if denominator.abs() < 1e-6 {
        return Some(rough_freq);
    }

    let peak_shift = (y3 - y1) / (2.0 * denominator);
    let interpolated_bin = peak_bin as f32 + peak_shift;
    let final_freq = (interpolated_bin * sample_rate as f32) / buffer_size as f32;

    if final_freq.is_finite() && final_freq > 0.0 {
        Some(final_freq)
    } else {
        Some(rough_freq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 44_100;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
            .collect()
    }

    #[test]
    fn yin_finds_a440() {
        let freq = detect_pitch_yin(&sine(440.0, 4096), SAMPLE_RATE, CLARITY_THRESHOLD).unwrap();
        assert!((freq - 440.0).abs() < 2.0, "{freq}");
    }

    #[test]
    fn estimator_finds_low_e() {
        let freq = YinEstimator::default()
            .estimate(&sine(82.41, 4096), SAMPLE_RATE)
            .unwrap();
        let note = crate::tuning::note_from_frequency(freq);
        assert_eq!(note.note_name(), "E", "{freq}");
        assert_eq!(note.octave(), 2, "{freq}");
    }

    #[test]
    fn silence_and_tiny_frames_have_no_pitch() {
        assert_eq!(detect_pitch_yin(&[0.0; 2048], SAMPLE_RATE, CLARITY_THRESHOLD), None);
        assert_eq!(detect_pitch_yin(&[0.1, 0.2], SAMPLE_RATE, CLARITY_THRESHOLD), None);
    }

    #[test]
    fn closures_are_estimators() {
        let stub = |_: &[f32], _: u32| Some(123.0_f32);
        assert_eq!(stub.estimate(&[], 48_000), Some(123.0));
    }

    #[test]
    fn refinement_rejects_bad_input() {
        assert_eq!(refine_from_spectrum(&[1.0; 16], 0.0, SAMPLE_RATE), None);
        assert_eq!(refine_from_spectrum(&[1.0], 100.0, SAMPLE_RATE), None);
    }
}
