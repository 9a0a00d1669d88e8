//! # Tracker configuration
//!
//! [`TrackerParams`] centralizes the tunables of a [`Tracker`](crate::tracker::Tracker):
//! where the clock is read, how long a read may take, how removal gestures edit the
//! sample list, whether marking a point also reads the clock, and where the default
//! query time comes from.
//!
//! Two presets match the two ways the tool is deployed:
//!
//! | preset | stamp on mark | deletion | query time |
//! |---|---|---|---|
//! | [`TrackerParams::auto_stamping`] | yes | remove single | fresh capture |
//! | [`TrackerParams::manual_entry`] | no | truncate from | operator field |
//!
//! ```rust
//! use std::time::Duration;
//! use clockfit::tracker_params::TrackerParams;
//! use clockfit::samples::DeletionPolicy;
//!
//! let params = TrackerParams::builder()
//!     .capture_region(120, 40, 90, 28)
//!     .acquisition_budget(Duration::from_millis(250))
//!     .deletion_policy(DeletionPolicy::TruncateFrom)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.capture_region.as_tuple(), (120, 40, 90, 28));
//! ```
use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    acquisition::CaptureRegion, clockfit_errors::ClockfitError,
    constants::DEFAULT_ACQUISITION_BUDGET, samples::DeletionPolicy,
};

/// Where [`Tracker::estimate_default`](crate::tracker::Tracker::estimate_default) takes
/// its query time from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryMode {
    /// Read the on-screen clock at estimate time.
    #[default]
    Capture,
    /// Use the operator query field.
    QueryField,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Capture => write!(f, "capture"),
            QueryMode::QueryField => write!(f, "query-field"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerParams {
    /// Initial rectangle the clock is read from.
    pub capture_region: CaptureRegion,
    /// Maximum duration of one capture + OCR round trip.
    pub acquisition_budget: Duration,
    /// How a removal gesture edits the sample list.
    pub deletion_policy: DeletionPolicy,
    /// Read the clock right after a point is marked.
    pub stamp_on_mark: bool,
    pub query_mode: QueryMode,
}

impl TrackerParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TrackerParamsBuilder {
        TrackerParamsBuilder::new()
    }

    /// Every mark reads the clock, removal drops one point, estimates read the clock.
    pub fn auto_stamping() -> Self {
        TrackerParams {
            stamp_on_mark: true,
            deletion_policy: DeletionPolicy::RemoveSingle,
            query_mode: QueryMode::Capture,
            ..Self::default()
        }
    }

    /// Timestamps are typed or captured on demand, removal truncates, estimates use
    /// the operator query field.
    pub fn manual_entry() -> Self {
        TrackerParams {
            stamp_on_mark: false,
            deletion_policy: DeletionPolicy::TruncateFrom,
            query_mode: QueryMode::QueryField,
            ..Self::default()
        }
    }
}

impl Default for TrackerParams {
    fn default() -> Self {
        TrackerParams {
            capture_region: CaptureRegion::default(),
            acquisition_budget: DEFAULT_ACQUISITION_BUDGET,
            deletion_policy: DeletionPolicy::RemoveSingle,
            stamp_on_mark: true,
            query_mode: QueryMode::Capture,
        }
    }
}

/// Builder for [`TrackerParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct TrackerParamsBuilder {
    params: TrackerParams,
}

impl TrackerParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: TrackerParams::default(),
        }
    }

    /// Start from an existing configuration, e.g. a preset.
    pub fn from_params(params: TrackerParams) -> Self {
        Self { params }
    }

    pub fn capture_region(mut self, x: i32, y: i32, width: u32, height: u32) -> Self {
        self.params.capture_region = CaptureRegion::new(x, y, width, height);
        self
    }

    pub fn acquisition_budget(mut self, v: Duration) -> Self {
        self.params.acquisition_budget = v;
        self
    }

    pub fn deletion_policy(mut self, v: DeletionPolicy) -> Self {
        self.params.deletion_policy = v;
        self
    }

    pub fn stamp_on_mark(mut self, v: bool) -> Self {
        self.params.stamp_on_mark = v;
        self
    }

    pub fn query_mode(mut self, v: QueryMode) -> Self {
        self.params.query_mode = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * capture region width and height must be > 0,
    /// * acquisition budget must be > 0.
    pub fn build(self) -> Result<TrackerParams, ClockfitError> {
        let p = &self.params;

        if p.capture_region.is_empty() {
            return Err(ClockfitError::InvalidTrackerParameter(
                "capture region width and height must be > 0".into(),
            ));
        }
        if p.acquisition_budget.is_zero() {
            return Err(ClockfitError::InvalidTrackerParameter(
                "acquisition budget must be > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for TrackerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Tracker parameters")?;
            writeln!(f, "------------------")?;
            writeln!(f, "capture region     : {}", self.capture_region)?;
            writeln!(f, "acquisition budget : {:?}", self.acquisition_budget)?;
            writeln!(f, "deletion policy    : {}", self.deletion_policy)?;
            writeln!(f, "stamp on mark      : {}", self.stamp_on_mark)?;
            write!(f, "query mode         : {}", self.query_mode)
        } else {
            write!(
                f,
                "TrackerParams(region={}, budget={:?}, deletion={}, stamp_on_mark={}, query={})",
                self.capture_region,
                self.acquisition_budget,
                self.deletion_policy,
                self.stamp_on_mark,
                self.query_mode
            )
        }
    }
}
