//! # Tick input module
//!
//! Inputs which drive one racer for one simulation tick. Position-tracked racers supply their
//! world position, position-less racers (AI, ghosts) supply a raw progress delta.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The input for a single racer on a single tick.
///
/// In JSON this is written as either `{"racer": 0, "position": [x, y, z]}` or
/// `{"racer": 1, "delta": 12.5}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Index of the racer this input applies to
    pub racer: usize,

    #[serde(flatten)]
    pub kind: RacerInput,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RacerInput {
    /// The racer's world position this tick
    Position(Vector3<f64>),

    /// Progress to add to the racer this tick, without a position
    Delta(f64),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TickParseError {
    #[error("Tick input contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Tick input for racer {0} contains a non-finite value")]
    NonFinite(usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl TickInput {
    /// Parse a new tick input from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TickParseError> {
        let input: TickInput = match serde_json::from_str(json_str) {
            Ok(i) => i,
            Err(e) => return Err(TickParseError::InvalidJson(e)),
        };

        let finite = match input.kind {
            RacerInput::Position(p) => p.iter().all(|v| v.is_finite()),
            RacerInput::Delta(d) => d.is_finite(),
        };

        if !finite {
            return Err(TickParseError::NonFinite(input.racer));
        }

        Ok(input)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tick_input_from_json() {
        let pos = TickInput::from_json(r#"{"racer": 0, "position": [1.0, 2.0, 3.0]}"#).unwrap();
        assert_eq!(pos.racer, 0);
        assert_eq!(pos.kind, RacerInput::Position(Vector3::new(1.0, 2.0, 3.0)));

        let delta = TickInput::from_json(r#"{"racer": 3, "delta": -12.5}"#).unwrap();
        assert_eq!(delta.racer, 3);
        assert_eq!(delta.kind, RacerInput::Delta(-12.5));

        assert!(matches!(
            TickInput::from_json(r#"{"racer": 0, "speed": 4.0}"#),
            Err(TickParseError::InvalidJson(_))
        ));
        assert!(matches!(
            TickInput::from_json(r#"{"racer": 0}"#),
            Err(TickParseError::InvalidJson(_))
        ));
    }
}
