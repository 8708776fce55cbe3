//! # Race tracker module
//!
//! The race tracker owns the course and the location of every racer on it, and drives the
//! progress resolver once per tick from a list of [`TickInput`](course_if::tick::TickInput)s.
//!
//! Racers which supply a position are advanced by the resolver's `tick_progress` and then
//! corrected by the position search. Racers which supply a delta are advanced by that delta only.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;
use crate::{course::CourseError, resolver::ResolveError};
use util::archive::ArchiveError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during race tracker operation.
#[derive(Debug, thiserror::Error)]
pub enum RaceTrackerError {
    #[error("The race tracker has not been initialised")]
    NotInitialised,

    #[error("Received an input for racer {0} but only {1} racers are tracked")]
    UnknownRacer(usize, usize),

    #[error("The course is invalid: {0}")]
    Course(#[from] CourseError),

    #[error("Could not resolve racer {0}: {1}")]
    Resolve(usize, ResolveError),

    #[error("Could not archive racer data: {0}")]
    Archive(#[from] ArchiveError),
}
