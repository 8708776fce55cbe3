//! # Position search
//!
//! Refines the segment a racer is on using its world position. Starting from the segment the
//! coarse walk landed on, the position is projected onto the segment's forward axis:
//!
//! - Past the end of the segment (`fraction > 1`) the search steps forward.
//! - Behind the start (`fraction < 0`) it steps backward.
//! - Otherwise the segment is accepted.
//!
//! Where the geometry is ambiguous (gaps between segments on tight turns, overlapping or
//! near-parallel segments) the search can be told to step forward from one segment and backward
//! from the next forever. The direction-flip guard stops this: the first time the search reverses
//! direction it terminates on the boundary between the two segments it is alternating over.
//!
//! The search is an explicit state machine over [`SearchState`], so every call makes at most two
//! direction changes (`Idle` to a direction, then one reversal) and at most one pass over the
//! course in a single direction.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Vector3;

// Internal
use crate::course::{CourseGraph, SegmentNavigator};
use course_if::loc::SegmentRef;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Result of a position search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    /// The segment the racer was resolved to
    pub seg_ref: SegmentRef,

    /// Fraction through the segment, always in `[0, 1]`
    pub fraction: f64,

    /// Number of segment steps taken
    pub steps: usize,

    /// Number of changes of search state, at most 2
    pub direction_changes: usize,

    /// True if the search was stopped by the direction-flip guard
    pub flip_guard_tripped: bool,

    /// True if the search ran off the start of the course
    pub clamped_at_start: bool,

    /// True if the search ran off the end of the course
    pub clamped_at_end: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The state of the search, i.e. the direction of the last step taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Incrementing,
    Decrementing,
}

/// What the search does after evaluating the current segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Accept,
    Increment,
    Decrement,
}

/// Outcome of a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Move into the given state, which may be the current one
    Continue(SearchState),

    /// The step reverses the search direction, stop after taking it
    Flip,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl SearchState {
    /// Transition for taking a step in the given direction.
    fn on_step(self, step: Step) -> Transition {
        match (self, step) {
            (_, Step::Accept) => Transition::Continue(self),
            (SearchState::Idle, Step::Increment) => Transition::Continue(SearchState::Incrementing),
            (SearchState::Idle, Step::Decrement) => Transition::Continue(SearchState::Decrementing),
            (SearchState::Incrementing, Step::Increment) => Transition::Continue(self),
            (SearchState::Decrementing, Step::Decrement) => Transition::Continue(self),
            (SearchState::Incrementing, Step::Decrement) => Transition::Flip,
            (SearchState::Decrementing, Step::Increment) => Transition::Flip,
        }
    }
}

impl Step {
    fn from_fraction(fraction: f64) -> Self {
        if fraction > 1.0 {
            Step::Increment
        } else if fraction < 0.0 {
            Step::Decrement
        } else {
            Step::Accept
        }
    }
}

impl SearchOutcome {
    fn new(seg_ref: SegmentRef) -> Self {
        Self {
            seg_ref,
            fraction: 0.0,
            steps: 0,
            direction_changes: 0,
            flip_guard_tripped: false,
            clamped_at_start: false,
            clamped_at_end: false,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Find the segment and fraction of the course that the world position lies on, starting the
/// search at `start`.
///
/// The position must be finite.
pub fn refine(course: &CourseGraph, start: SegmentRef, position: &Vector3<f64>) -> SearchOutcome {
    let mut out = SearchOutcome::new(start);
    let mut state = SearchState::Idle;

    loop {
        let fraction = course.segment(out.seg_ref).fraction_along(position);
        let step = Step::from_fraction(fraction);

        trace!(
            "{}: fraction {:.4}, state {:?}, step {:?}",
            out.seg_ref,
            fraction,
            state,
            step
        );

        if step == Step::Accept {
            out.fraction = fraction;
            return out;
        }
        let transition = state.on_step(step);

        // Take the step, clamping if it leaves the course
        let stepped = match step {
            Step::Increment => course.next(out.seg_ref),
            _ => course.prev(out.seg_ref),
        };

        out.seg_ref = match stepped {
            Some(r) => r,
            None if step == Step::Increment => {
                debug!("Position search reached the end of the course at {}", out.seg_ref);
                out.fraction = 1.0;
                out.clamped_at_end = true;
                return out;
            }
            None => {
                debug!("Position search reached the start of the course at {}", out.seg_ref);
                out.fraction = 0.0;
                out.clamped_at_start = true;
                return out;
            }
        };
        out.steps += 1;

        match transition {
            Transition::Continue(s) => {
                if s != state {
                    out.direction_changes += 1;
                }
                state = s;
            }
            Transition::Flip => {
                // Reversal: stop on the boundary shared with the segment just left, which is the
                // start of a segment entered forwards or the end of one entered backwards.
                out.direction_changes += 1;
                out.flip_guard_tripped = true;
                out.fraction = match step {
                    Step::Increment => 0.0,
                    _ => 1.0,
                };
                debug!(
                    "Position search direction flip at {}, clamped to fraction {}",
                    out.seg_ref, out.fraction
                );
                return out;
            }
        }
    }
}
