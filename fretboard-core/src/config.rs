//! # Configuration Module
//!
//! Tunable constants of the tracking pipeline, grouped per component so each
//! component can be constructed (and tested) with its own settings.
//! The whole structure round-trips through JSON for the settings file.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("gate threshold must be finite and non-negative, got {0}")]
    GateThreshold(f32),
    #[error("smoothing window must hold at least one estimate")]
    EmptyWindow,
    #[error("frequency range must satisfy 0 < min < max, got [{min}, {max}]")]
    FrequencyRange { min: f32, max: f32 },
    #[error("input gain must be finite and non-negative, got {0}")]
    InputGain(f32),
    #[error("frame size must be at least {min} samples, got {got}")]
    FrameSize { min: usize, got: usize },
    #[error("string index {0} is out of range 0..6")]
    StringIndex(usize),
}

/// Smallest capture frame the estimator can work with.
pub const MIN_FRAME_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// RMS level above which a frame counts as playing.
    pub threshold: f32,
    /// How long the last note keeps being reported after the gate closes.
    pub hold_ms: u64,
}

impl GateConfig {
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: 0.01,
            hold_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Number of accepted estimates the median is taken over.
    pub window: usize,
    pub min_frequency: f32,
    pub max_frequency: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        // Low E of a bass is ~41 Hz, the 24th fret of a guitar ~1319 Hz.
        Self {
            window: 5,
            min_frequency: 40.0,
            max_frequency: 2000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// How long the target pitch class must be held before the answer counts.
    pub required_hold_ms: u64,
}

impl MatchConfig {
    pub fn required_hold(&self) -> Duration {
        Duration::from_millis(self.required_hold_ms)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            required_hold_ms: 100,
        }
    }
}

/// Settings for a whole practice session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub gate: GateConfig,
    pub smoothing: SmoothingConfig,
    pub matching: MatchConfig,
    /// Fixed multiplier applied to every sample before gating and estimation.
    pub input_gain: f32,
    /// Samples per analysis frame delivered by the capture layer.
    pub frame_size: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            gate: GateConfig::default(),
            smoothing: SmoothingConfig::default(),
            matching: MatchConfig::default(),
            input_gain: 1.0,
            frame_size: 4096,
        }
    }
}

impl TrainerConfig {
    /// Checks every value against the range the pipeline can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.gate.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::GateThreshold(threshold));
        }
        if self.smoothing.window == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        let SmoothingConfig {
            min_frequency: min,
            max_frequency: max,
            ..
        } = self.smoothing;
        if !(min.is_finite() && max.is_finite() && 0.0 < min && min < max) {
            return Err(ConfigError::FrequencyRange { min, max });
        }
        if !self.input_gain.is_finite() || self.input_gain < 0.0 {
            return Err(ConfigError::InputGain(self.input_gain));
        }
        if self.frame_size < MIN_FRAME_SIZE {
            return Err(ConfigError::FrameSize {
                min: MIN_FRAME_SIZE,
                got: self.frame_size,
            });
        }
        Ok(())
    }

    /// Loads and validates settings from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file =
            File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut data = String::new();
        file.read_to_string(&mut data)?;
        let config: TrainerConfig = serde_json::from_str(&data)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json_string = serde_json::to_string_pretty(self)?;
        let mut file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        file.write_all(json_string.as_bytes())?;
        Ok(())
    }
}
