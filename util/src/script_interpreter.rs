//! # Tick script interpreter module
//!
//! This module provides an interpreter for tick scripts, which replay racer
//! inputs into the race tracker. Each statement in a script has the form
//!
//! ```text
//! <tick>: <json tick input>;
//! ```
//!
//! for example `12: {"racer": 0, "position": [10.0, 4.5, 0.0]};`. Several
//! statements may share a tick, and lines starting with `#` are ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use course_if::tick::{TickInput, TickParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An input which is scripted to occur on a specific tick.
pub struct ScriptedInput {
    /// The tick the input is applied on
    exec_tick: u64,

    /// The input to apply
    input: TickInput
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending`
/// to acquire the inputs that need applying on the current tick.
pub struct ScriptInterpreter {
    _script_path: Option<PathBuf>,
    inputs: VecDeque<ScriptedInput>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error("Script contains an invalid tick number: {0}")]
    InvalidTick(String),

    #[error("Script contains an invalid input at tick {0}: {1}")]
    InvalidInput(u64, TickParseError)
}

pub enum PendingInputs {
    None,
    Some(Vec<TickInput>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(
                ScriptError::ScriptNotFound(path.display().to_string()));
        }

        // Load the script into a string
        let script = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e))
        };

        let mut interp = Self::from_script(&script)?;
        interp._script_path = Some(path);

        Ok(interp)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {

        // Go through the script executing __the magic regex__.
        let re = match RegexBuilder::
            new(r"^\s*(\d+)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
        {
            Ok(r) => r,
            Err(e) => return Err(ScriptError::InvalidTick(e.to_string()))
        };

        let mut inputs: Vec<ScriptedInput> = vec![];

        for cap in re.captures_iter(script) {
            let (tick_str, payload) = match (cap.get(1), cap.get(2)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue
            };

            // Parse the exec tick
            let exec_tick: u64 = match tick_str.parse() {
                Ok(t) => t,
                Err(e) => return Err(
                    ScriptError::InvalidTick(format!("{}", e)))
            };

            // Parse the input from the payload. The scripts contain JSON only.
            let input = match TickInput::from_json(payload) {
                Ok(i) => i,
                Err(e) => return Err(ScriptError::InvalidInput(exec_tick, e))
            };

            inputs.push(ScriptedInput {
                exec_tick,
                input
            });
        }

        if inputs.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        // Stable sort keeps the order of inputs sharing a tick
        inputs.sort_by_key(|i| i.exec_tick);

        Ok(ScriptInterpreter {
            _script_path: None,
            inputs: inputs.into()
        })
    }

    /// Return the inputs due on or before the given tick.
    pub fn get_pending(&mut self, tick: u64) -> PendingInputs {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.inputs.is_empty() {
            return PendingInputs::EndOfScript
        }

        let mut input_vec: Vec<TickInput> = vec![];

        while let Some(front) = self.inputs.front() {
            if front.exec_tick > tick {
                break;
            }
            if let Some(i) = self.inputs.pop_front() {
                input_vec.push(i.input);
            }
        }

        if input_vec.is_empty() {
            PendingInputs::None
        }
        else {
            PendingInputs::Some(input_vec)
        }
    }

    /// Get the number of inputs remaining in the script
    pub fn get_num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Get the tick of the last input in the script
    pub fn get_last_tick(&self) -> u64 {
        match self.inputs.back() {
            Some(i) => i.exec_tick,
            None => 0
        }
    }
}
