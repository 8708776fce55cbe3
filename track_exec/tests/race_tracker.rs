//! Race tracker processing over the square demo course

#[macro_use]
mod common;

use course_if::{
    course::CourseData,
    loc::SegmentRef,
    tick::{RacerInput, TickInput},
};
use nalgebra::Vector3;
use track_lib::{
    course::Course,
    race_tracker::{Params, RaceTracker, RaceTrackerError},
    resolver,
};
use util::{module::State, script_interpreter::ScriptInterpreter};

const SQUARE: &str = include_str!("../../courses/square.json");

fn tracker(num_racers: usize) -> RaceTracker {
    let course = Course::from_data(CourseData::from_json(SQUARE).unwrap()).unwrap();
    let params = Params {
        resolver: resolver::Params {
            tick_progress: 20.0,
            ..Default::default()
        },
        archive: false,
    };

    RaceTracker::with_course(course, params, num_racers)
}

fn position(racer: usize, x: f64, y: f64) -> TickInput {
    TickInput {
        racer,
        kind: RacerInput::Position(Vector3::new(x, y, 0.0)),
    }
}

fn delta(racer: usize, d: f64) -> TickInput {
    TickInput {
        racer,
        kind: RacerInput::Delta(d),
    }
}

#[test]
fn test_square_course_loads() {
    let t = tracker(1);
    let course = t.course().unwrap();

    assert_eq!(course.name, "square");
    assert_eq!(course.graph.num_positions(), 12);
    assert_eq!(course.graph.total_length(), 1200.0);
    assert_eq!(course.fix_zones.len(), 1);
}

#[test]
fn test_proc_mixed_racers() {
    let mut t = tracker(3);

    // Tick 0
    let (out, report) = t
        .proc(&vec![position(0, 30.0, 1.0), delta(1, 250.0)])
        .unwrap();

    assert_eq!(report.tick, 0);
    assert!(report.racers[0].is_some());
    assert!(report.racers[2].is_none());

    assert_eq!(out[0].cur_segment_ref, SegmentRef::new(0, 0));
    assert_near!(out[0].progress_along_course, 30.0, 1e-9);
    assert_near!(out[0].horizontal_offset_from_center_of_track, -0.2, 1e-12);

    assert_eq!(out[1].cur_segment_ref, SegmentRef::new(0, 2));
    assert_near!(out[1].progress_along_course, 250.0, 1e-9);

    // Racer 2 had no input and has not moved
    assert_eq!(out[2].progress_along_course, 0.0);

    // Tick 1, racer 0 rounds the first corner and racer 1 starts the second lap
    let (out, report) = t
        .proc(&vec![position(0, 105.0, 40.0), delta(1, 200.0)])
        .unwrap();

    assert_eq!(report.tick, 1);
    assert_eq!(out[0].cur_segment_ref, SegmentRef::new(0, 1));
    assert_near!(out[0].progress_along_course, 140.0, 1e-9);
    assert_near!(out[0].horizontal_offset_from_center_of_track, 1.0, 1e-12);

    assert_eq!(out[1].cur_segment_ref, SegmentRef::new(1, 0));
    assert_near!(out[1].progress_along_course, 450.0, 1e-3);

    assert_eq!(t.tick(), 2);
}

#[test]
fn test_proc_fix_zone() {
    let mut t = tracker(1);

    // Just after the start line but seen on the final straight
    let (out, report) = t.proc(&vec![position(0, 1.0, 50.0)]).unwrap();

    assert_eq!(report.racers[0].unwrap().fix_zone_applied, Some(0));
    assert_eq!(out[0].cur_segment_ref, SegmentRef::new(0, 3));
    assert_near!(out[0].progress_along_course, 350.0, 1e-9);
}

#[test]
fn test_proc_unknown_racer() {
    let mut t = tracker(2);

    let err = t
        .proc(&vec![delta(0, 10.0), delta(2, 10.0)])
        .unwrap_err();

    assert!(matches!(err, RaceTrackerError::UnknownRacer(2, 2)));

    // Nothing moved and the tick did not advance
    assert_eq!(t.racers()[0].progress_along_course, 0.0);
    assert_eq!(t.tick(), 0);
}

#[test]
fn test_proc_uninitialised() {
    let mut t = RaceTracker::default();

    assert!(matches!(
        t.proc(&vec![]),
        Err(RaceTrackerError::NotInitialised)
    ));
}

#[test]
fn test_scripted_run() {
    let mut t = tracker(2);
    let mut script = ScriptInterpreter::from_script(
        "0: {\"racer\": 1, \"delta\": 60.0};\n\
        1: {\"racer\": 1, \"delta\": 60.0};\n\
        1: {\"racer\": 0, \"position\": [50.0, 0.0, 0.0]};\n\
        3: {\"racer\": 1, \"delta\": -30.0};\n",
    )
    .unwrap();

    loop {
        let inputs = match script.get_pending(t.tick()) {
            util::script_interpreter::PendingInputs::Some(i) => i,
            util::script_interpreter::PendingInputs::None => vec![],
            util::script_interpreter::PendingInputs::EndOfScript => break,
        };
        t.proc(&inputs).unwrap();
    }

    assert_eq!(t.tick(), 4);
    assert_near!(t.racers()[0].progress_along_course, 50.0, 1e-9);
    assert_near!(t.racers()[1].progress_along_course, 90.0, 1e-3);
}
