//! # clockfit
//!
//! Hand-tracked trajectory estimation against an on-screen clock.
//!
//! An operator marks successive screen positions of a moving object; each mark is
//! paired with a time of day read optically from a clock overlay. Two independent
//! least-squares lines `x(t)` and `y(t)` are fitted over the marks and evaluated at any
//! query time to interpolate or extrapolate the object's position.
//!
//! Entry point: [`Tracker`](crate::tracker::Tracker).
pub mod acquisition;
pub mod clockfit_errors;
pub mod constants;
pub mod linear_fit;
pub mod logging;
pub mod samples;
pub mod selector;
pub mod time;
pub mod tracker;
pub mod tracker_params;

pub use acquisition::{CaptureRegion, TimestampSource};
pub use clockfit_errors::{Axis, ClockfitError};
pub use linear_fit::{LinearFit, TrajectoryModel, TrendLine};
pub use samples::{DeletionPolicy, Sample, SampleStore, SampleTime};
pub use time::ClockReading;
pub use tracker::{QuerySource, Tracker, TrackerSnapshot};
pub use tracker_params::{QueryMode, TrackerParams};
