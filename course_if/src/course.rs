//! # Course data module
//!
//! The course is described by three static lists produced by the track import pipeline:
//!
//! - The segments, each a straight local frame at the start of a piece of road.
//! - The lap chain, a list of `(start, count)` runs into the segment list. Laps are encoded by
//!   repeating runs, for example `(0, 30), (30, 238), (268, 161), (30, 238), ...`.
//! - The fix zones, which snap progress where the road passes over or under itself.
//!
//! All of these are loaded once per track and never modified.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A single piece of track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Up vector, perpendicular to the road surface
    pub up: Vector3<f64>,

    /// Start position of the segment
    pub pos: Vector3<f64>,

    /// Unit vector pointing along the road in the direction of travel
    pub fwd: Vector3<f64>,

    /// Unit vector pointing to the right of the direction of travel
    pub right: Vector3<f64>,

    /// Length of the segment in world units
    pub length: f64,

    /// Width of the road (not the drivable area) in world units
    pub road_width: f64,
}

/// One run of segments in the lap chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapChainEntry {
    /// Index of the first segment in the run
    pub start: usize,

    /// Number of segments in the run
    pub count: usize,
}

/// A square region which forces a racer's progress to a new value.
///
/// Used where the geometry of the course overlaps a logically different part of itself, for
/// example a bridge crossing an earlier section of road.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixZone {
    /// X coordinate of the square's centre
    pub x: f64,

    /// Y coordinate of the square's centre
    pub y: f64,

    /// Half the side length of the square
    pub half_size: f64,

    /// Inclusive lower bound of the progress window
    pub progress_min: f64,

    /// Exclusive upper bound of the progress window
    pub progress_max: f64,

    /// Progress the racer is moved to when the zone matches
    pub new_progress: f64,
}

/// The full description of a course as produced by the import pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseData {
    /// Name of the course, for logging only
    #[serde(default)]
    pub name: String,

    pub segments: Vec<Segment>,

    pub lap_chain: Vec<LapChainEntry>,

    #[serde(default)]
    pub fix_zones: Vec<FixZone>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur while reading course data.
#[derive(Debug, Error)]
pub enum CourseDataError {
    #[error("Course data contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Segment {
    /// Build the segment running straight from `start` to `end`.
    ///
    /// The right vector is derived as `fwd x up`, so for a Z-up world a segment heading along +X
    /// has its right vector along -Y.
    pub fn between(start: Vector3<f64>, end: Vector3<f64>, up: Vector3<f64>, road_width: f64) -> Self {
        let diff = end - start;
        let length = diff.norm();
        let fwd = diff / length;

        Self {
            up,
            pos: start,
            fwd,
            right: fwd.cross(&up).normalize(),
            length,
            road_width,
        }
    }

    /// Position of the end of the segment.
    pub fn end(&self) -> Vector3<f64> {
        self.pos + self.fwd * self.length
    }

    /// Fraction of the way along this segment that the given point projects to.
    ///
    /// Values below 0 are behind the segment start, values above 1 beyond its end.
    pub fn fraction_along(&self, point: &Vector3<f64>) -> f64 {
        self.fwd.dot(&(point - self.pos)) / self.length
    }

    /// Signed lateral offset of the point from the road centreline.
    ///
    /// Scaled so that one road half-width equals 1.0, positive to the right. The offset is not
    /// clamped, off-road positions give magnitudes above 1.
    pub fn lateral_offset(&self, point: &Vector3<f64>) -> f64 {
        2.0 * self.right.dot(&(point - self.pos)) / self.road_width
    }
}

impl LapChainEntry {
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }
}

impl FixZone {
    /// Whether the point lies inside the zone's square, ignoring height.
    pub fn contains_point(&self, point: &Vector3<f64>) -> bool {
        (point.x - self.x).abs() < self.half_size && (point.y - self.y).abs() < self.half_size
    }

    /// Whether the progress value lies in `[progress_min, progress_max)`.
    pub fn contains_progress(&self, progress: f64) -> bool {
        progress >= self.progress_min && progress < self.progress_max
    }
}

impl CourseData {
    /// Parse course data from a JSON document.
    pub fn from_json(json_str: &str) -> Result<Self, CourseDataError> {
        serde_json::from_str(json_str).map_err(CourseDataError::InvalidJson)
    }
}
