//! Progress resolver parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the progress resolver
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Params {

    /// Progress added to position-tracked racers on every tick, before the
    /// position search corrects it.
    ///
    /// Units: world units
    pub tick_progress: f64,

    /// Which value progress is derived from when committing a new location.
    #[serde(default)]
    pub progress_source: ProgressSource
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The fraction used to compute `progress_along_course` on commit.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSource {
    /// The unquantised fraction produced by the walk or search.
    Fraction,

    /// The fraction after quantising to `amnt_through_cur_section`, so that
    /// progress always agrees exactly with the stored segment and amount.
    Quantised
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ProgressSource {
    fn default() -> Self {
        ProgressSource::Fraction
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            tick_progress: 100.0,
            progress_source: ProgressSource::default()
        }
    }
}
