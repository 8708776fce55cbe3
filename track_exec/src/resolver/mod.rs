//! # Progress resolver module
//!
//! The progress resolver keeps each racer's curvilinear location on the course up to date. Every
//! tick it is given the racer's previous [`CarLocationInfo`](course_if::loc::CarLocationInfo), a
//! progress delta and, for racers with a physical body, their world position.
//!
//! Resolution runs in up to four stages:
//!
//! 1. Fix zones. If a position is given and it lies in a fix zone whose progress window contains
//!    the racer's current progress, the racer is first snapped to the zone's progress. This
//!    handles courses which pass over or under themselves, where the position alone cannot tell
//!    which part of the course the racer is on.
//! 1. Coarse walk. The delta is added to the distance already travelled through the current
//!    segment and the segment is advanced or retreated until the remainder fits inside it. At
//!    either end of the course the walk clamps rather than wrapping.
//! 1. Position search. If a position is given, the segment is refined by projecting the position
//!    onto segments around the coarse result, see [`search`].
//! 1. Commit. The new segment, quantised fraction, cumulative progress and (with a position)
//!    lateral offset are written back to the location.
//!
//! The resolver never decides when a lap or race is complete, consumers read that from
//! `progress_along_course`.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod params;
pub mod search;
mod state;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
pub use params::{Params, ProgressSource};
pub use search::{SearchOutcome, SearchState};
pub use state::ProgressResolver;
use course_if::loc::SegmentRef;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Status report for a single resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Index of the fix zone applied before resolving, if any
    pub fix_zone_applied: Option<usize>,

    /// Segments stepped over by the coarse walk, including any fix zone correction
    pub coarse_steps: usize,

    /// Segments stepped over by the position search
    pub search_steps: usize,

    /// Changes of direction made by the position search
    pub direction_changes: usize,

    /// The position search was stopped by the direction-flip guard
    pub flip_guard_tripped: bool,

    /// The walk, search or fix zone correction was clamped at the start of the course
    pub clamped_at_start: bool,

    /// The walk, search or fix zone correction was clamped at the end of the course
    pub clamped_at_end: bool,

    /// The supplied position or delta was not finite and was ignored
    pub input_rejected: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur when resolving progress.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("The racer's segment {0} is not part of the course")]
    InvalidSegmentRef(SegmentRef),
}
