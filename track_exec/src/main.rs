//! # Track executable
//!
//! Replays a tick script against a course, resolving the progress of every racer on each tick.
//!
//! ```text
//! track_exec <COURSE> <SCRIPT> [--racers <N>] [--params <FILE>]
//! ```
//!
//! The course is a JSON file, see [`CourseData`]. The script contains one `<tick>: <input>;`
//! statement per racer input, where each input is a JSON tick input. Parameters are loaded from
//! the `params` directory under `$TRACK_SW_ROOT`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::path::PathBuf;

use color_eyre::{eyre::WrapErr, Result};
use log::{debug, info, warn};
use structopt::StructOpt;

use course_if::course::CourseData;
use track_lib::race_tracker::{self, RaceTracker};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingInputs, ScriptInterpreter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "track_exec", about = "Resolve racer progress along a course")]
struct Opt {
    /// Path to the course JSON file
    #[structopt(parse(from_os_str))]
    course: PathBuf,

    /// Path to the tick script
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Number of racers on the course
    #[structopt(short, long, default_value = "1")]
    racers: usize,

    /// Parameter file, relative to the params directory
    #[structopt(short, long, default_value = "track_exec.toml")]
    params: String,

    /// Enable debug logging
    #[structopt(short, long)]
    verbose: bool,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("track_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger_init(level, &session).wrap_err("Failed to initialise logging")?;

    info!("Track Exec\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let params: race_tracker::Params =
        util::params::load(&opt.params).wrap_err("Could not load track_exec params")?;

    // ---- LOAD COURSE ----

    let course_str = std::fs::read_to_string(&opt.course)
        .wrap_err_with(|| format!("Could not read the course file {:?}", opt.course))?;
    let course = CourseData::from_json(&course_str).wrap_err("Could not parse the course")?;

    // ---- INITIALISE SCRIPT ----

    info!("Loading script from {:?}", opt.script);

    let mut script_interpreter =
        ScriptInterpreter::new(&opt.script).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {} ticks and contains {} inputs\n",
        script_interpreter.get_last_tick() + 1,
        script_interpreter.get_num_inputs()
    );

    // ---- MODULE INIT ----

    let mut tracker = RaceTracker::default();
    tracker
        .init(
            race_tracker::InitData {
                params,
                course,
                num_racers: opt.racers,
            },
            &session,
        )
        .wrap_err("Failed to initialise RaceTracker")?;
    info!("RaceTracker init complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut num_fix_zones = 0;
    let mut num_flip_guards = 0;

    loop {
        let inputs = match script_interpreter.get_pending(tracker.tick()) {
            PendingInputs::Some(i) => i,
            PendingInputs::None => Vec::new(),
            PendingInputs::EndOfScript => break,
        };

        let tick = tracker.tick();
        let (_, report) = tracker
            .proc(&inputs)
            .wrap_err_with(|| format!("Failed to process tick {}", tick))?;

        for (racer, r) in report.racers.iter().enumerate() {
            if let Some(r) = r {
                if r.fix_zone_applied.is_some() {
                    num_fix_zones += 1;
                }
                if r.flip_guard_tripped {
                    num_flip_guards += 1;
                    debug!("Racer {} tripped the flip guard on tick {}", racer, report.tick);
                }
                if r.input_rejected {
                    warn!("Racer {} had a rejected input on tick {}", racer, report.tick);
                }
            }
        }

        tracker.write().wrap_err("Failed to write archives")?;
    }

    // ---- SUMMARY ----

    info!("End of script reached after {} ticks\n", tracker.tick());
    info!("{} fix zone corrections, {} flip guard trips", num_fix_zones, num_flip_guards);

    for (i, r) in tracker.racers().iter().enumerate() {
        info!(
            "Racer {}: {} amnt {}, progress {:.3}, offset {:.3}",
            i,
            r.cur_segment_ref,
            r.amnt_through_cur_section,
            r.progress_along_course,
            r.horizontal_offset_from_center_of_track
        );
    }

    Ok(())
}
