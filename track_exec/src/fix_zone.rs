//! # Fix zones
//!
//! Fix zones are axis aligned squares in the horizontal plane, each with a progress window. A
//! racer whose position lies inside the square while its progress lies inside the window is
//! snapped to the zone's new progress before the normal resolution runs.
//!
//! Only the first matching zone, in course order, is applied.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, warn};
use nalgebra::Vector3;

// Internal
use crate::resolver::{ProgressResolver, StatusReport};
use course_if::{course::FixZone, loc::CarLocationInfo};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Applies a course's fix zones to racers.
#[derive(Debug, Clone, Copy)]
pub struct FixZoneCorrector<'c> {
    zones: &'c [FixZone],
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<'c> FixZoneCorrector<'c> {
    pub fn new(zones: &'c [FixZone]) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &'c [FixZone] {
        self.zones
    }

    /// Index of the first zone containing both the progress and the position.
    pub fn find_match(&self, progress: f64, position: &Vector3<f64>) -> Option<usize> {
        self.zones
            .iter()
            .position(|z| z.contains_progress(progress) && z.contains_point(position))
    }

    /// Apply the first matching fix zone to the racer, returning its index.
    ///
    /// The racer is moved by walking the difference between the zone's new progress and its
    /// current progress. The walk does not use the position and does not recheck fix zones. Its
    /// steps and clamps are added to `report`.
    ///
    /// The racer's segment must be part of the resolver's course.
    pub(crate) fn apply_fix_zones(
        &self,
        resolver: &ProgressResolver,
        info: &mut CarLocationInfo,
        position: &Vector3<f64>,
        report: &mut StatusReport,
    ) -> Option<usize> {
        if self.zones.is_empty() {
            return None;
        }

        let progress = resolver.course().progress_of(info);
        let index = self.find_match(progress, position)?;

        if cfg!(debug_assertions) {
            let others = self.zones[index + 1..]
                .iter()
                .filter(|z| z.contains_progress(progress) && z.contains_point(position))
                .count();
            if others > 0 {
                warn!(
                    "Fix zone {} overlaps {} later zone(s) at progress {:.3}, only the first is \
                    applied",
                    index, others, progress
                );
            }
        }

        let zone = &self.zones[index];
        debug!(
            "Fix zone {} hit at progress {:.3}, moving to {:.3}",
            index, progress, zone.new_progress
        );

        resolver.walk_and_commit(info, zone.new_progress - progress, None, report);

        Some(index)
    }
}
