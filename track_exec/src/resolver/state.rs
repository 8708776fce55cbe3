//! Progress resolver state and tick processing

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, warn};
use nalgebra::Vector3;

// Internal
use super::{search, Params, ProgressSource, ResolveError, StatusReport};
use crate::{
    course::{Course, CourseGraph, SegmentNavigator},
    fix_zone::FixZoneCorrector,
};
use course_if::{
    course::FixZone,
    loc::{CarLocationInfo, SegmentRef},
};
use util::maths::{clamp, dequantise_u16, quantise_u16};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Resolves racers' curvilinear locations on one course.
///
/// The resolver only borrows the course and its fix zones, so one instance can be shared by every
/// racer on the track. All per-racer state lives in the `CarLocationInfo` passed to each call.
#[derive(Debug, Clone, Copy)]
pub struct ProgressResolver<'c> {
    course: &'c CourseGraph,

    fix_zones: FixZoneCorrector<'c>,

    params: Params,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<'c> ProgressResolver<'c> {
    /// Create a new resolver over the given course graph and fix zones.
    pub fn new(course: &'c CourseGraph, fix_zones: &'c [FixZone], params: Params) -> Self {
        Self {
            course,
            fix_zones: FixZoneCorrector::new(fix_zones),
            params,
        }
    }

    /// Create a new resolver over a loaded course.
    pub fn for_course(course: &'c Course, params: Params) -> Self {
        Self::new(&course.graph, &course.fix_zones, params)
    }

    pub fn course(&self) -> &'c CourseGraph {
        self.course
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Update the racer's location for this tick.
    ///
    /// - `additional_progress` is added to the racer's progress before any position refinement.
    ///   Position-tracked racers pass the constant `tick_progress`, position-less racers pass
    ///   their full delta for the tick.
    /// - `world_position` is the racer's position, or `None` for racers without one.
    ///
    /// The start and end of the course are handled by clamping. The only error is a racer whose
    /// segment is not part of this course, in which case `info` is not modified.
    pub fn resolve(
        &self,
        info: &mut CarLocationInfo,
        additional_progress: f64,
        world_position: Option<&Vector3<f64>>,
    ) -> Result<StatusReport, ResolveError> {
        if !self.course.contains(info.cur_segment_ref) {
            return Err(ResolveError::InvalidSegmentRef(info.cur_segment_ref));
        }

        let mut report = StatusReport::default();

        let mut additional_progress = additional_progress;
        if !additional_progress.is_finite() {
            warn!("Ignoring non-finite progress delta {}", additional_progress);
            additional_progress = 0.0;
            report.input_rejected = true;
        }

        let world_position = match world_position {
            Some(p) if !p.iter().all(|c| c.is_finite()) => {
                warn!("Ignoring non-finite world position {:?}", p);
                report.input_rejected = true;
                None
            }
            p => p,
        };

        if let Some(pos) = world_position {
            let applied = self.fix_zones.apply_fix_zones(self, info, pos, &mut report);
            report.fix_zone_applied = applied;
        }

        self.walk_and_commit(info, additional_progress, world_position, &mut report);

        Ok(report)
    }

    /// Run only the fix zone pass for the racer, returning the index of the zone applied.
    ///
    /// This is the first stage of [`ProgressResolver::resolve`] and is exposed for consumers which
    /// need the correction without a full update.
    pub fn apply_fix_zones(
        &self,
        info: &mut CarLocationInfo,
        world_position: &Vector3<f64>,
    ) -> Result<Option<usize>, ResolveError> {
        if !self.course.contains(info.cur_segment_ref) {
            return Err(ResolveError::InvalidSegmentRef(info.cur_segment_ref));
        }

        let mut report = StatusReport::default();
        Ok(self.fix_zones.apply_fix_zones(self, info, world_position, &mut report))
    }

    /// Walk, search and commit a new location.
    ///
    /// This never runs the fix zone pass, which lets the fix zone corrector call it without
    /// recursing into itself.
    pub(crate) fn walk_and_commit(
        &self,
        info: &mut CarLocationInfo,
        additional_progress: f64,
        world_position: Option<&Vector3<f64>>,
        report: &mut StatusReport,
    ) {
        let (coarse_ref, remaining) = self.coarse_walk(info, additional_progress, report);

        let (seg_ref, fraction) = match world_position {
            Some(pos) => {
                let out = search::refine(self.course, coarse_ref, pos);

                report.search_steps = out.steps;
                report.direction_changes = out.direction_changes;
                report.flip_guard_tripped = out.flip_guard_tripped;
                report.clamped_at_start |= out.clamped_at_start;
                report.clamped_at_end |= out.clamped_at_end;

                (out.seg_ref, out.fraction)
            }
            None => {
                let length = self.course.segment(coarse_ref).length;
                (coarse_ref, clamp(&(remaining / length), &0.0, &1.0))
            }
        };

        self.commit(info, seg_ref, fraction, world_position);
    }

    /// Step the racer's segment forward or backward by the given progress.
    ///
    /// Returns the segment landed on and the distance travelled through it. The distance is
    /// only outside `[0, length)` when the walk was clamped at the end of the course.
    fn coarse_walk(
        &self,
        info: &CarLocationInfo,
        additional_progress: f64,
        report: &mut StatusReport,
    ) -> (SegmentRef, f64) {
        let mut seg_ref = info.cur_segment_ref;
        let mut length = self.course.segment(seg_ref).length;
        let mut remaining = length * info.fraction_through_cur_section() + additional_progress;

        while remaining >= length {
            match self.course.next(seg_ref) {
                Some(n) => {
                    remaining -= length;
                    seg_ref = n;
                    length = self.course.segment(seg_ref).length;
                    report.coarse_steps += 1;
                }
                None => {
                    // Resting exactly on the end of the course loses no progress
                    if remaining > length {
                        debug!(
                            "Coarse walk reached the end of the course with {:.3} remaining",
                            remaining - length
                        );
                        report.clamped_at_end = true;
                    }
                    break;
                }
            }
        }

        while remaining < 0.0 {
            match self.course.prev(seg_ref) {
                Some(p) => {
                    seg_ref = p;
                    length = self.course.segment(seg_ref).length;
                    remaining += length;
                    report.coarse_steps += 1;
                }
                None => {
                    debug!("Coarse walk reached the start of the course");
                    remaining = 0.0;
                    report.clamped_at_start = true;
                    break;
                }
            }
        }

        (seg_ref, remaining)
    }

    /// Write the resolved location back into the racer's info.
    fn commit(
        &self,
        info: &mut CarLocationInfo,
        seg_ref: SegmentRef,
        fraction: f64,
        world_position: Option<&Vector3<f64>>,
    ) {
        let segment = self.course.segment(seg_ref);
        let amnt = quantise_u16(fraction);

        let progress_fraction = match self.params.progress_source {
            ProgressSource::Fraction => fraction,
            ProgressSource::Quantised => dequantise_u16(amnt),
        };

        info.amnt_through_cur_section = amnt;
        info.cur_segment_ref = seg_ref;
        info.progress_along_course =
            self.course.progress_at(seg_ref) + progress_fraction * segment.length;

        if let Some(pos) = world_position {
            info.horizontal_offset_from_center_of_track = segment.lateral_offset(pos);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use course_if::course::{LapChainEntry, Segment};

    fn straight_course(num: usize, length: f64) -> CourseGraph {
        let segs = (0..num)
            .map(|i| {
                Segment::between(
                    Vector3::new(i as f64 * length, 0.0, 0.0),
                    Vector3::new((i + 1) as f64 * length, 0.0, 0.0),
                    Vector3::z(),
                    8.0,
                )
            })
            .collect();

        CourseGraph::new(segs, vec![LapChainEntry::new(0, num)]).unwrap()
    }

    #[test]
    fn test_coarse_walk() {
        let g = straight_course(5, 10.0);
        let r = ProgressResolver::new(&g, &[], Params::default());
        let mut report = StatusReport::default();

        let info = CarLocationInfo {
            cur_segment_ref: SegmentRef::new(0, 1),
            amnt_through_cur_section: u16::MAX,
            ..Default::default()
        };

        // End of segment 1 plus 15 is half way through segment 3
        assert_eq!(r.coarse_walk(&info, 15.0, &mut report), (SegmentRef::new(0, 3), 5.0));
        assert_eq!(report.coarse_steps, 2);

        // Backwards past the start clamps to zero
        let mut report = StatusReport::default();
        assert_eq!(r.coarse_walk(&info, -50.0, &mut report), (SegmentRef::new(0, 0), 0.0));
        assert!(report.clamped_at_start);

        // Forwards past the end keeps the remainder on the last segment
        let mut report = StatusReport::default();
        let (seg_ref, remaining) = r.coarse_walk(&info, 100.0, &mut report);
        assert_eq!(seg_ref, SegmentRef::new(0, 4));
        assert_eq!(remaining, 80.0);
        assert!(report.clamped_at_end);
    }

    #[test]
    fn test_no_clamp_resting_on_end() {
        let g = straight_course(3, 10.0);
        let r = ProgressResolver::new(&g, &[], Params::default());

        let mut info = CarLocationInfo {
            cur_segment_ref: g.last_ref(),
            amnt_through_cur_section: u16::MAX,
            ..Default::default()
        };

        let report = r.resolve(&mut info, 0.0, None).unwrap();
        assert!(!report.clamped_at_end);
        assert_eq!(info.cur_segment_ref, g.last_ref());
        assert_eq!(info.amnt_through_cur_section, u16::MAX);
        assert_eq!(info.progress_along_course, 30.0);

        // Any progress past the end is lost and reported
        let report = r.resolve(&mut info, 0.5, None).unwrap();
        assert!(report.clamped_at_end);
        assert_eq!(info.progress_along_course, 30.0);
    }

    #[test]
    fn test_fix_zone_walk_reported() {
        let g = straight_course(5, 10.0);
        let zone = |new_progress: f64| FixZone {
            x: 35.0,
            y: 0.0,
            half_size: 3.0,
            progress_min: 10.0,
            progress_max: 20.0,
            new_progress,
        };
        let in_zone = Vector3::new(35.0, 0.0, 0.0);
        let start = CarLocationInfo {
            cur_segment_ref: SegmentRef::new(0, 1),
            amnt_through_cur_section: 13107,
            ..Default::default()
        };
        let params = Params {
            tick_progress: 0.0,
            ..Params::default()
        };

        // Corrective walk from 12 to 35 crosses two segments, the main walk none
        let zones = vec![zone(35.0)];
        let r = ProgressResolver::new(&g, &zones, params);
        let mut info = start;
        let report = r.resolve(&mut info, 0.0, Some(&in_zone)).unwrap();
        assert_eq!(report.fix_zone_applied, Some(0));
        assert_eq!(report.coarse_steps, 2);
        assert!(!report.clamped_at_end);

        // A correction past the end of the course is clamped and reported, even though the
        // position search then brings the racer back
        let zones = vec![zone(60.0)];
        let r = ProgressResolver::new(&g, &zones, params);
        let mut info = start;
        let report = r.resolve(&mut info, 0.0, Some(&in_zone)).unwrap();
        assert_eq!(report.fix_zone_applied, Some(0));
        assert!(report.clamped_at_end);
        assert_eq!(info.cur_segment_ref, SegmentRef::new(0, 3));
        assert_eq!(info.progress_along_course, 35.0);
    }

    #[test]
    fn test_commit_progress_source() {
        let g = straight_course(3, 30.0);
        let mut info = CarLocationInfo::at_course_start();

        let raw = ProgressResolver::new(&g, &[], Params::default());
        raw.commit(&mut info, SegmentRef::new(0, 1), 1.0 / 3.0, None);
        assert_eq!(info.progress_along_course, 30.0 + 10.0);
        assert_eq!(info.amnt_through_cur_section, 21845);

        let quantised = ProgressResolver::new(
            &g,
            &[],
            Params {
                progress_source: ProgressSource::Quantised,
                ..Params::default()
            },
        );
        quantised.commit(&mut info, SegmentRef::new(0, 1), 1.0 / 3.0, None);
        assert_eq!(
            info.progress_along_course,
            30.0 + 21845.0 / 65535.0 * 30.0
        );
    }

    #[test]
    fn test_rejects_foreign_ref() {
        let g = straight_course(3, 30.0);
        let r = ProgressResolver::new(&g, &[], Params::default());

        let mut info = CarLocationInfo {
            cur_segment_ref: SegmentRef::new(1, 0),
            ..Default::default()
        };
        let before = info;

        assert!(matches!(
            r.resolve(&mut info, 10.0, None),
            Err(ResolveError::InvalidSegmentRef(_))
        ));
        assert_eq!(info, before);
    }

    #[test]
    fn test_non_finite_inputs_ignored() {
        let g = straight_course(3, 30.0);
        let r = ProgressResolver::new(&g, &[], Params::default());
        let mut info = CarLocationInfo::at_course_start();

        let report = r.resolve(&mut info, f64::NAN, None).unwrap();
        assert!(report.input_rejected);
        assert_eq!(info.progress_along_course, 0.0);

        let nan_pos = Vector3::new(f64::NAN, 0.0, 0.0);
        let report = r.resolve(&mut info, 15.0, Some(&nan_pos)).unwrap();
        assert!(report.input_rejected);
        assert_eq!(info.progress_along_course, 15.0);
        assert_eq!(info.horizontal_offset_from_center_of_track, 0.0);
    }
}
