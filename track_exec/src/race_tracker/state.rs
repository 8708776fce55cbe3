//! Implementations for the RaceTracker state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::Serialize;

// Internal
use super::{Params, RaceTrackerError};
use crate::{
    course::Course,
    resolver::{self, ProgressResolver},
};
use course_if::{
    course::CourseData,
    loc::CarLocationInfo,
    tick::{RacerInput, TickInput},
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Race tracker module state
#[derive(Default)]
pub struct RaceTracker {
    params: Params,

    course: Option<Course>,

    racers: Vec<CarLocationInfo>,

    tick: u64,

    records: Vec<RacerRecord>,
    arch_racers: Archiver,
}

/// Data required to initialise the race tracker.
pub struct InitData {
    pub params: Params,

    pub course: CourseData,

    /// Number of racers, all of which start at the beginning of the course
    pub num_racers: usize,
}

/// Status report for one tick of the race tracker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    /// The tick number this report is for
    pub tick: u64,

    /// Resolver reports for each racer, `None` for racers with no input this tick
    pub racers: Vec<Option<resolver::StatusReport>>,
}

/// One archived racer update.
#[derive(Debug, Clone, Copy, Serialize)]
struct RacerRecord {
    tick: u64,
    racer: usize,
    lnk_index: u16,
    sub_index: u16,
    amnt: u16,
    progress: f64,
    offset: f64,
    fix_zone: Option<usize>,
    flip_guard_tripped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RaceTracker {
    /// Create a tracker over an already loaded course without a session.
    ///
    /// Archiving is disabled regardless of the parameters.
    pub fn with_course(course: Course, params: Params, num_racers: usize) -> Self {
        Self {
            params: Params {
                archive: false,
                ..params
            },
            course: Some(course),
            racers: vec![CarLocationInfo::at_course_start(); num_racers],
            ..Default::default()
        }
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    /// Current locations of all racers.
    pub fn racers(&self) -> &[CarLocationInfo] {
        &self.racers
    }

    /// Number of ticks processed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl State for RaceTracker {
    type InitData = InitData;
    type InitError = RaceTrackerError;

    type InputData = Vec<TickInput>;
    type OutputData = Vec<CarLocationInfo>;
    type StatusReport = StatusReport;
    type ProcError = RaceTrackerError;

    /// Initialise the race tracker.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let course = Course::from_data(init_data.course)?;

        *self = Self::with_course(course, init_data.params, init_data.num_racers);
        self.params = init_data.params;

        if self.params.archive {
            self.arch_racers = Archiver::from_path(
                session, "race_tracker/racers.csv"
            )?;
        }

        info!("RaceTracker tracking {} racers", self.racers.len());

        Ok(())
    }

    /// Resolve every racer which has an input this tick.
    ///
    /// All inputs are checked before any racer is moved, so an error leaves
    /// every racer where it was.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let course = self.course.as_ref().ok_or(RaceTrackerError::NotInitialised)?;
        let num_racers = self.racers.len();

        if let Some(i) = input_data.iter().find(|i| i.racer >= num_racers) {
            return Err(RaceTrackerError::UnknownRacer(i.racer, num_racers));
        }

        let resolver = ProgressResolver::for_course(course, self.params.resolver);
        let mut racers = self.racers.clone();
        let mut report = StatusReport {
            tick: self.tick,
            racers: vec![None; num_racers],
        };

        for input in input_data {
            let info = &mut racers[input.racer];

            let racer_report = match input.kind {
                RacerInput::Position(ref pos) => resolver.resolve(
                    info, self.params.resolver.tick_progress, Some(pos)
                ),
                RacerInput::Delta(delta) => resolver.resolve(info, delta, None),
            }
            .map_err(|e| RaceTrackerError::Resolve(input.racer, e))?;

            trace!(
                "Racer {} at {} amnt {}, progress {:.3}",
                input.racer,
                info.cur_segment_ref,
                info.amnt_through_cur_section,
                info.progress_along_course
            );

            if self.params.archive {
                self.records.push(RacerRecord {
                    tick: self.tick,
                    racer: input.racer,
                    lnk_index: info.cur_segment_ref.lnk_index,
                    sub_index: info.cur_segment_ref.sub_index,
                    amnt: info.amnt_through_cur_section,
                    progress: info.progress_along_course,
                    offset: info.horizontal_offset_from_center_of_track,
                    fix_zone: racer_report.fix_zone_applied,
                    flip_guard_tripped: racer_report.flip_guard_tripped,
                });
            }

            report.racers[input.racer] = Some(racer_report);
        }

        self.racers = racers;
        self.tick += 1;

        Ok((self.racers.clone(), report))
    }
}

impl Archived for RaceTracker {
    /// Write out all racer updates since the last call.
    fn write(&mut self) -> Result<(), ArchiveError> {
        for record in self.records.drain(..) {
            self.arch_racers.serialise(record)?;
        }

        Ok(())
    }
}
