//! # Frequency Smoothing Module
//!
//! Median filter over the last few accepted estimates. A median drops single-frame
//! spikes (octave jumps, pluck transients) without the lag a moving average would
//! add to real note changes.

use std::collections::VecDeque;

use crate::config::SmoothingConfig;

#[derive(Debug, Clone)]
pub struct FrequencySmoother {
    config: SmoothingConfig,
    buffer: VecDeque<f32>,
}

impl FrequencySmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        let capacity = config.window.max(1);
        Self {
            config,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// True for finite estimates inside the plausible instrument range.
    pub fn accepts(&self, freq: f32) -> bool {
        freq.is_finite()
            && freq > 0.0
            && freq >= self.config.min_frequency
            && freq <= self.config.max_frequency
    }

    /// Feeds one raw estimate and returns the current median.
    ///
    /// # Returns
    /// * `0.0` - the estimate was rejected; the buffer is left unchanged
    /// * otherwise the median of the buffer including the new estimate. For an
    ///   even number of entries the lower of the two middle values is returned.
    pub fn push(&mut self, freq: f32) -> f32 {
        if !self.accepts(freq) {
            return 0.0;
        }
        if self.buffer.len() >= self.config.window.max(1) {
            self.buffer.pop_front();
        }
        self.buffer.push_back(freq);
        self.median()
    }

    /// Median of the buffered estimates, 0 when the buffer is empty.
    pub fn median(&self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f32> = self.buffer.iter().copied().collect();
        sorted.sort_by(f32::total_cmp);
        sorted[(sorted.len() - 1) / 2]
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
