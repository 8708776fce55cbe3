//! Parameters structure for the race tracker

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::resolver;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the race tracker, loaded from `track_exec.toml`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Params {

    /// Parameters passed through to the progress resolver.
    pub resolver: resolver::Params,

    /// If true every racer update is archived to `race_tracker/racers.csv`
    /// in the session directory.
    #[serde(default)]
    pub archive: bool
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resolver::ProgressSource;

    #[test]
    fn test_load() {
        let p: Params = util::params::from_str(
            "archive = true\n\
            [resolver]\n\
            tick_progress = 50.0\n\
            progress_source = \"Quantised\"\n"
        ).unwrap();

        assert!(p.archive);
        assert_eq!(p.resolver.tick_progress, 50.0);
        assert_eq!(p.resolver.progress_source, ProgressSource::Quantised);

        // Archiving and progress source are optional
        let p: Params = util::params::from_str(
            "[resolver]\ntick_progress = 10.0\n"
        ).unwrap();

        assert!(!p.archive);
        assert_eq!(p.resolver.progress_source, ProgressSource::Fraction);
    }
}
