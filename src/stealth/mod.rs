//! Stealth and anti-detection module
//!
//! Timing distributions shared by the motion executor, the clicker and the
//! fidget scheduler:
//! - quantized short delays clustered near the game's script tick
//! - long idle intervals in narrow bands
//! - humanized click pre/hold/after timings

pub mod humanize;

pub use humanize::*;
