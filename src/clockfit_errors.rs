use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinate axis a fit was attempted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// x as a function of time
    X,
    /// y as a function of time
    Y,
    /// y as a function of x (trend line, no time involved)
    Trend,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x(t)"),
            Axis::Y => write!(f, "y(t)"),
            Axis::Trend => write!(f, "y(x)"),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ClockfitError {
    #[error("Invalid clock text: {0:?}")]
    ParseFailure(String),

    #[error("Timestamp acquisition failed: {0}")]
    AcquisitionFailure(String),

    #[error("Timestamp acquisition exceeded its budget of {0:?}")]
    AcquisitionTimeout(Duration),

    #[error("At least 2 samples are required, found {found}")]
    InsufficientSamples { found: usize },

    #[error("Sample {index} has no valid timestamp")]
    IncompleteSamples { index: usize },

    #[error("Degenerate least-squares fit for {0}: all abscissae are identical")]
    DegenerateFit(Axis),

    #[error("Sample not found: {0}")]
    SampleNotFound(usize),

    #[error("Invalid tracker parameter: {0}")]
    InvalidTrackerParameter(String),
}

impl ClockfitError {
    /// True for every error meaning "no timestamp could be read from the screen".
    ///
    /// A timeout is an acquisition failure from the engine's point of view.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            ClockfitError::AcquisitionFailure(_) | ClockfitError::AcquisitionTimeout(_)
        )
    }
}

impl PartialEq for ClockfitError {
    fn eq(&self, other: &Self) -> bool {
        use ClockfitError::*;
        match (self, other) {
            (ParseFailure(a), ParseFailure(b)) => a == b,
            (AcquisitionFailure(a), AcquisitionFailure(b)) => a == b,
            (AcquisitionTimeout(a), AcquisitionTimeout(b)) => a == b,
            (InsufficientSamples { found: a }, InsufficientSamples { found: b }) => a == b,
            (IncompleteSamples { index: a }, IncompleteSamples { index: b }) => a == b,
            (DegenerateFit(a), DegenerateFit(b)) => a == b,
            (SampleNotFound(a), SampleNotFound(b)) => a == b,
            (InvalidTrackerParameter(a), InvalidTrackerParameter(b)) => a == b,
            _ => false,
        }
    }
}
