//! Segment navigation over the lap chain.
//!
//! Stepping off the end of a lap chain entry moves onto the first segment of the next entry,
//! which is how racers move from one lap to the next. There is no wrap from the final entry back
//! to the first, `None` marks both ends of the course.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::CourseGraph;
use course_if::loc::SegmentRef;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Forward and backward traversal between segments.
pub trait SegmentNavigator {
    /// The segment after `seg_ref`, or `None` at the end of the course.
    fn next(&self, seg_ref: SegmentRef) -> Option<SegmentRef>;

    /// The segment before `seg_ref`, or `None` at the start of the course.
    fn prev(&self, seg_ref: SegmentRef) -> Option<SegmentRef>;
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl SegmentNavigator for CourseGraph {
    fn next(&self, seg_ref: SegmentRef) -> Option<SegmentRef> {
        let lap_chain = self.lap_chain();
        let entry = lap_chain.get(seg_ref.lnk_index as usize)?;

        // Within the same entry
        if (seg_ref.sub_index as usize) + 1 < entry.count {
            return Some(SegmentRef::new(seg_ref.lnk_index, seg_ref.sub_index + 1));
        }

        // First segment of the next entry, if there is one
        let next_lnk = seg_ref.lnk_index as usize + 1;
        if next_lnk < lap_chain.len() {
            Some(SegmentRef::new(next_lnk as u16, 0))
        } else {
            None
        }
    }

    fn prev(&self, seg_ref: SegmentRef) -> Option<SegmentRef> {
        if seg_ref.sub_index > 0 {
            return Some(SegmentRef::new(seg_ref.lnk_index, seg_ref.sub_index - 1));
        }

        // Last segment of the previous entry, if there is one
        let prev_lnk = (seg_ref.lnk_index as usize).checked_sub(1)?;
        let entry = self.lap_chain().get(prev_lnk)?;

        Some(SegmentRef::new(prev_lnk as u16, (entry.count - 1) as u16))
    }
}
