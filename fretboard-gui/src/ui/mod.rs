//! # UI Module
//!
//! All widgets and layout code of the trainer window.

pub mod cent_meter;
pub mod fretboard;
pub mod main_display;
