//! # Location module
//!
//! Defines where a racer currently is along the course. This is the entire per-racer state
//! surface read by the ranking, HUD and AI steering systems after every tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::Display;

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Value of `amnt_through_cur_section` at the very end of a segment.
pub const AMNT_MAX: u16 = u16::MAX;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Identifies one segment within one lap chain entry.
///
/// The same segment may appear in many lap chain entries (once per lap), so a segment index alone
/// does not locate a racer on the course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentRef {
    /// Index of the lap chain entry
    pub lnk_index: u16,

    /// Index of the segment within the lap chain entry
    pub sub_index: u16,
}

/// Curvilinear location of a racer on the course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarLocationInfo {
    /// The segment the racer is currently on
    pub cur_segment_ref: SegmentRef,

    /// Distance travelled along the course since the race start, including all previous laps
    pub progress_along_course: f64,

    /// Signed offset from the road centreline, where +/-1 is the edge of the road.
    ///
    /// Not clamped, racers off the road will exceed this range.
    pub horizontal_offset_from_center_of_track: f64,

    /// Fraction of the current segment travelled, 0 is the start and [`AMNT_MAX`] the end
    pub amnt_through_cur_section: u16,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl SegmentRef {
    pub fn new(lnk_index: u16, sub_index: u16) -> Self {
        Self {
            lnk_index,
            sub_index,
        }
    }
}

impl Display for SegmentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lnk_index, self.sub_index)
    }
}

impl CarLocationInfo {
    /// A location at the very start of the course, on the centreline.
    pub fn at_course_start() -> Self {
        Self::default()
    }

    /// The fraction of the current segment travelled, in the range `[0, 1]`.
    pub fn fraction_through_cur_section(&self) -> f64 {
        self.amnt_through_cur_section as f64 / AMNT_MAX as f64
    }
}
