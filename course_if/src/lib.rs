//! # Course interface crate.
//!
//! Provides the common data types shared between the course import pipeline, the progress
//! resolution engine, and the consumers of its output (ranking, HUD, AI steering).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Course data: segments, the lap chain and fix zones
pub mod course;

/// Per-racer location on the course
pub mod loc;

/// Per-tick inputs fed to the race tracker
pub mod tick;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use nalgebra;
