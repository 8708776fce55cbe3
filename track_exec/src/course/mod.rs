//! # Course module
//!
//! The course graph is the immutable topology of a race: the segments and the lap chain which
//! sequences runs of them into the full race, every lap included. On construction the graph is
//! validated and the cumulative progress at the start of every position on the course is
//! precomputed, so progress lookups during a tick are a single index.
//!
//! A position on the course is a [`SegmentRef`], a lap chain entry plus an index within it. The
//! same segment appears under many refs (once per lap), each with its own cumulative progress.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod nav;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::info;

// Internal
pub use nav::SegmentNavigator;
use course_if::{
    course::{CourseData, FixZone, LapChainEntry, Segment},
    loc::{CarLocationInfo, SegmentRef},
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Validated, immutable course topology.
#[derive(Debug, Clone)]
pub struct CourseGraph {
    segments: Vec<Segment>,

    lap_chain: Vec<LapChainEntry>,

    /// Flat course position of the first segment of each lap chain entry
    entry_offsets: Vec<usize>,

    /// Cumulative progress at the start of each flat course position. Has one extra element
    /// holding the total course length.
    progress_table: Vec<f64>,
}

/// A course graph together with its fix zones, as loaded for one track.
#[derive(Debug, Clone)]
pub struct Course {
    pub name: String,

    pub graph: CourseGraph,

    pub fix_zones: Vec<FixZone>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised when validating course data.
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("Segment {0} has an invalid length ({1}), lengths must be finite and positive")]
    InvalidSegmentLength(usize, f64),

    #[error("Segment {0} has an invalid road width ({1}), widths must be finite and positive")]
    InvalidRoadWidth(usize, f64),

    #[error("Segment {0} has a non-finite frame vector")]
    NonFiniteFrame(usize),

    #[error("The lap chain is empty")]
    EmptyLapChain,

    #[error("Lap chain entry {0} contains no segments")]
    EmptyLapChainEntry(usize),

    #[error(
        "Lap chain entry {entry} ({start}, {count}) is outside the {num_segments} segments \
         of the course"
    )]
    LapChainEntryOutOfRange {
        entry: usize,
        start: usize,
        count: usize,
        num_segments: usize,
    },

    #[error("The lap chain has {0} entries, which cannot be indexed by a SegmentRef")]
    LapChainTooLong(usize),

    #[error("Lap chain entry {0} has {1} segments, which cannot be indexed by a SegmentRef")]
    LapChainEntryTooLong(usize, usize),

    #[error("Fix zone {0} has an invalid half size ({1})")]
    InvalidFixZoneSize(usize, f64),

    #[error("Fix zone {0} has an empty or non-finite progress window")]
    InvalidFixZoneWindow(usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl CourseGraph {
    /// Validate the segments and lap chain and build the graph.
    pub fn new(segments: Vec<Segment>, lap_chain: Vec<LapChainEntry>) -> Result<Self, CourseError> {
        // ---- SEGMENT VALIDATION ----

        for (i, seg) in segments.iter().enumerate() {
            if !(seg.length.is_finite() && seg.length > 0.0) {
                return Err(CourseError::InvalidSegmentLength(i, seg.length));
            }
            if !(seg.road_width.is_finite() && seg.road_width > 0.0) {
                return Err(CourseError::InvalidRoadWidth(i, seg.road_width));
            }

            let finite = [seg.up, seg.pos, seg.fwd, seg.right]
                .iter()
                .all(|v| v.iter().all(|c| c.is_finite()));
            if !finite {
                return Err(CourseError::NonFiniteFrame(i));
            }
        }

        // ---- LAP CHAIN VALIDATION ----

        if lap_chain.is_empty() {
            return Err(CourseError::EmptyLapChain);
        }

        // Both indices of a SegmentRef are u16
        if lap_chain.len() > u16::MAX as usize + 1 {
            return Err(CourseError::LapChainTooLong(lap_chain.len()));
        }

        for (i, entry) in lap_chain.iter().enumerate() {
            if entry.count == 0 {
                return Err(CourseError::EmptyLapChainEntry(i));
            }
            if entry.count > u16::MAX as usize + 1 {
                return Err(CourseError::LapChainEntryTooLong(i, entry.count));
            }

            let in_range = entry
                .start
                .checked_add(entry.count)
                .map(|end| end <= segments.len())
                .unwrap_or(false);
            if !in_range {
                return Err(CourseError::LapChainEntryOutOfRange {
                    entry: i,
                    start: entry.start,
                    count: entry.count,
                    num_segments: segments.len(),
                });
            }
        }

        // ---- PROGRESS TABLE ----

        let num_positions: usize = lap_chain.iter().map(|e| e.count).sum();

        let mut entry_offsets = Vec::with_capacity(lap_chain.len());
        let mut progress_table = Vec::with_capacity(num_positions + 1);
        let mut progress = 0f64;

        for entry in lap_chain.iter() {
            entry_offsets.push(progress_table.len());

            for seg in &segments[entry.start..entry.start + entry.count] {
                progress_table.push(progress);
                progress += seg.length;
            }
        }
        progress_table.push(progress);

        Ok(Self {
            segments,
            lap_chain,
            entry_offsets,
            progress_table,
        })
    }

    /// All segments of the course, in import order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The lap chain of the course.
    pub fn lap_chain(&self) -> &[LapChainEntry] {
        &self.lap_chain
    }

    /// Number of positions on the course, i.e. the number of segments travelled from start to
    /// finish, counting repeated laps.
    pub fn num_positions(&self) -> usize {
        self.progress_table.len() - 1
    }

    /// Total length of the course from start to finish, all laps included.
    pub fn total_length(&self) -> f64 {
        self.progress_table[self.num_positions()]
    }

    /// Whether the ref points at a segment of this course.
    pub fn contains(&self, seg_ref: SegmentRef) -> bool {
        match self.lap_chain.get(seg_ref.lnk_index as usize) {
            Some(e) => (seg_ref.sub_index as usize) < e.count,
            None => false,
        }
    }

    /// The first segment of the course.
    pub fn start_ref(&self) -> SegmentRef {
        SegmentRef::new(0, 0)
    }

    /// The last segment of the course.
    pub fn last_ref(&self) -> SegmentRef {
        let lnk = self.lap_chain.len() - 1;
        SegmentRef::new(lnk as u16, (self.lap_chain[lnk].count - 1) as u16)
    }

    /// Get the segment the ref points to.
    ///
    /// # Panics
    /// - If the ref is not part of this course, see [`CourseGraph::contains`].
    pub fn segment(&self, seg_ref: SegmentRef) -> &Segment {
        let entry = &self.lap_chain[seg_ref.lnk_index as usize];
        &self.segments[entry.start + seg_ref.sub_index as usize]
    }

    /// Cumulative progress at the start of the referenced segment, including all previous
    /// segments and laps.
    ///
    /// # Panics
    /// - If the ref is not part of this course.
    pub fn progress_at(&self, seg_ref: SegmentRef) -> f64 {
        self.progress_table[self.flat_index(seg_ref)]
    }

    /// The approximate progress of a racer, derived from its segment and quantised fraction
    /// rather than its stored progress value.
    ///
    /// # Panics
    /// - If the racer's segment ref is not part of this course.
    pub fn progress_of(&self, info: &CarLocationInfo) -> f64 {
        self.progress_at(info.cur_segment_ref)
            + self.segment(info.cur_segment_ref).length * info.fraction_through_cur_section()
    }

    /// Flat course position of the referenced segment.
    fn flat_index(&self, seg_ref: SegmentRef) -> usize {
        self.entry_offsets[seg_ref.lnk_index as usize] + seg_ref.sub_index as usize
    }
}

impl Course {
    /// Validate course data and build the course.
    pub fn from_data(data: CourseData) -> Result<Self, CourseError> {
        let graph = CourseGraph::new(data.segments, data.lap_chain)?;

        for (i, zone) in data.fix_zones.iter().enumerate() {
            if !(zone.half_size.is_finite() && zone.half_size > 0.0) {
                return Err(CourseError::InvalidFixZoneSize(i, zone.half_size));
            }

            let window_ok = zone.progress_min.is_finite()
                && zone.progress_max.is_finite()
                && zone.new_progress.is_finite()
                && zone.progress_min < zone.progress_max;
            if !window_ok {
                return Err(CourseError::InvalidFixZoneWindow(i));
            }
        }

        info!(
            "Loaded course \"{}\": {} segments, {} lap chain entries, {} fix zones, length {:.1}",
            data.name,
            graph.segments().len(),
            graph.lap_chain().len(),
            data.fix_zones.len(),
            graph.total_length()
        );

        Ok(Self {
            name: data.name,
            graph,
            fix_zones: data.fix_zones,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;

    fn straight(num: usize, length: f64) -> Vec<Segment> {
        (0..num)
            .map(|i| {
                Segment::between(
                    Vector3::new(i as f64 * length, 0.0, 0.0),
                    Vector3::new((i + 1) as f64 * length, 0.0, 0.0),
                    Vector3::z(),
                    8.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_progress_table() {
        let mut segs = straight(4, 10.0);
        segs[2].length = 5.0;

        // Intro of segment 0, then two laps of 1..4
        let graph = CourseGraph::new(
            segs,
            vec![
                LapChainEntry::new(0, 1),
                LapChainEntry::new(1, 3),
                LapChainEntry::new(1, 3),
            ],
        )
        .unwrap();

        assert_eq!(graph.num_positions(), 7);
        assert_eq!(graph.total_length(), 10.0 + 2.0 * 25.0);

        assert_eq!(graph.progress_at(SegmentRef::new(0, 0)), 0.0);
        assert_eq!(graph.progress_at(SegmentRef::new(1, 0)), 10.0);
        assert_eq!(graph.progress_at(SegmentRef::new(1, 2)), 25.0);
        assert_eq!(graph.progress_at(SegmentRef::new(2, 0)), 35.0);
        assert_eq!(graph.progress_at(SegmentRef::new(2, 2)), 50.0);

        // Same segment on different laps
        assert_eq!(
            graph.segment(SegmentRef::new(1, 1)),
            graph.segment(SegmentRef::new(2, 1))
        );

        assert_eq!(graph.last_ref(), SegmentRef::new(2, 2));
        assert!(graph.contains(SegmentRef::new(2, 2)));
        assert!(!graph.contains(SegmentRef::new(2, 3)));
        assert!(!graph.contains(SegmentRef::new(3, 0)));

        let info = CarLocationInfo {
            cur_segment_ref: SegmentRef::new(1, 1),
            amnt_through_cur_section: u16::MAX,
            ..Default::default()
        };
        assert_eq!(graph.progress_of(&info), 25.0);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            CourseGraph::new(straight(2, 10.0), vec![]),
            Err(CourseError::EmptyLapChain)
        ));
        assert!(matches!(
            CourseGraph::new(straight(2, 10.0), vec![LapChainEntry::new(0, 0)]),
            Err(CourseError::EmptyLapChainEntry(0))
        ));
        assert!(matches!(
            CourseGraph::new(
                straight(2, 10.0),
                vec![LapChainEntry::new(0, 2), LapChainEntry::new(1, 2)]
            ),
            Err(CourseError::LapChainEntryOutOfRange { entry: 1, .. })
        ));
        assert!(matches!(
            CourseGraph::new(straight(2, 10.0), vec![LapChainEntry::new(usize::MAX, 2)]),
            Err(CourseError::LapChainEntryOutOfRange { entry: 0, .. })
        ));

        let mut zero_len = straight(2, 10.0);
        zero_len[1].length = 0.0;
        assert!(matches!(
            CourseGraph::new(zero_len, vec![LapChainEntry::new(0, 2)]),
            Err(CourseError::InvalidSegmentLength(1, _))
        ));

        let mut zero_width = straight(2, 10.0);
        zero_width[0].road_width = 0.0;
        assert!(matches!(
            CourseGraph::new(zero_width, vec![LapChainEntry::new(0, 2)]),
            Err(CourseError::InvalidRoadWidth(0, _))
        ));

        let mut nan_frame = straight(2, 10.0);
        nan_frame[1].right.x = f64::NAN;
        assert!(matches!(
            CourseGraph::new(nan_frame, vec![LapChainEntry::new(0, 2)]),
            Err(CourseError::NonFiniteFrame(1))
        ));
    }

    #[test]
    fn test_fix_zone_validation() {
        let zone = FixZone {
            x: 0.0,
            y: 0.0,
            half_size: 5.0,
            progress_min: 10.0,
            progress_max: 20.0,
            new_progress: 40.0,
        };
        let data = |zone: FixZone| CourseData {
            name: String::from("zones"),
            segments: straight(4, 10.0),
            lap_chain: vec![LapChainEntry::new(0, 4)],
            fix_zones: vec![zone],
        };

        let course = Course::from_data(data(zone)).unwrap();
        assert_eq!(course.fix_zones.len(), 1);
        assert_eq!(course.graph.total_length(), 40.0);

        assert!(matches!(
            Course::from_data(data(FixZone { half_size: 0.0, ..zone })),
            Err(CourseError::InvalidFixZoneSize(0, _))
        ));
        assert!(matches!(
            Course::from_data(data(FixZone { progress_max: 10.0, ..zone })),
            Err(CourseError::InvalidFixZoneWindow(0))
        ));
    }
}
