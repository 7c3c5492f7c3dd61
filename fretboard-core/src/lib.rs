// fretboard-core/src/lib.rs

//! The core logic for the fretboard ear-training game.
//! This crate is responsible for audio capture, pitch tracking, note math,
//! question generation and answer matching. It is completely headless
//! and contains no GUI code.
//!
//! Frame pipeline:
//! samples -> [`gate`] -> [`pitch`] estimator -> [`smoothing`] -> [`tuning`]
//! -> `NoteInfo` -> [`matcher`] against the [`question`] of the current round.

pub mod audio;
pub mod config;
pub mod fft;
pub mod game;
pub mod gate;
pub mod guitar;
pub mod matcher;
pub mod pitch;
pub mod question;
pub mod scales;
pub mod smoothing;
pub mod tracker;
pub mod tuning;
pub mod worker;

pub use config::{ConfigError, GateConfig, MatchConfig, SmoothingConfig, TrainerConfig};
pub use game::{Feedback, PracticeRound};
pub use matcher::{AnswerMatcher, MatchPhase};
pub use pitch::{FrequencyEstimator, YinEstimator};
pub use question::{Question, QuestionGenerator};
pub use scales::{NoteSet, Scale};
pub use tracker::PitchTracker;
pub use tuning::{NoteInfo, PitchClass};
pub use audio::CapturedFrame;
pub use worker::{TrackedNote, TrackingWorker};
