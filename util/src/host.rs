//! Host platform utility functions

use std::env::{self, VarError};
use std::path::PathBuf;

/// Name of the environment variable pointing at the root of the software tree.
pub const SW_ROOT_ENV_VAR: &str = "TRACK_SW_ROOT";

/// Get the root directory of the software tree, which contains the `params` directory and
/// where sessions are created.
pub fn get_sw_root() -> Result<PathBuf, VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
