//! Helpers shared by the integration tests

#![allow(dead_code, unused_macros)]

use course_if::course::{LapChainEntry, Segment};
use nalgebra::Vector3;
use track_lib::course::CourseGraph;

/// Assert that two floats are within a tolerance of each other.
macro_rules! assert_near {
    ($left:expr, $right:expr, $tol:expr) => {{
        let (l, r, t): (f64, f64, f64) = ($left, $right, $tol);
        assert!(
            (l - r).abs() <= t,
            "assertion failed: `|left - right| <= tol`\n  left: {}\n right: {}\n   tol: {}",
            l,
            r,
            t
        );
    }};
}

/// Segments running end to end along +X, each `length` long and 8 units wide.
pub fn straight_segments(num: usize, length: f64) -> Vec<Segment> {
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

/// A straight course run once from start to finish.
pub fn straight_course(num: usize, length: f64) -> CourseGraph {
    CourseGraph::new(straight_segments(num, length), vec![LapChainEntry::new(0, num)]).unwrap()
}

/// Three 10 unit segments along +X with a 2 unit gap between the first and second.
pub fn gapped_course() -> CourseGraph {
    let seg = |x0: f64, x1: f64| {
        Segment::between(Vector3::new(x0, 0.0, 0.0), Vector3::new(x1, 0.0, 0.0), Vector3::z(), 8.0)
    };

    CourseGraph::new(
        vec![seg(0.0, 10.0), seg(12.0, 22.0), seg(22.0, 32.0)],
        vec![LapChainEntry::new(0, 3)],
    )
    .unwrap()
}
