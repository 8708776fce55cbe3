//! # Track library.
//!
//! This library allows other crates in the workspace, the benches and the integration tests to
//! access items defined inside the track executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Course graph - the segments and lap chain of a course, and navigation over them
pub mod course;

/// Fix zones - snap racers to a known progress where the course crosses itself
pub mod fix_zone;

/// Progress resolver - keeps racers' curvilinear locations up to date
pub mod resolver;

/// Race tracker - drives the resolver for every racer on each tick
pub mod race_tracker;
