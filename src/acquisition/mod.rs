//! # Timestamp acquisition
//!
//! The engine never talks to a screen-capture or OCR backend directly. It depends on
//! the [`TimestampSource`] contract: *given a capture rectangle, return the raw text
//! read from it, or an acquisition failure*.
//!
//! Modules
//! -----------------
//! * [`bounded`](crate::acquisition::bounded) – wraps any source into a time-bounded,
//!   cancellable acquisition.
//! * [`scripted`](crate::acquisition::scripted) – deterministic sources for tests and demos.
//!
//! Data flow
//! -----------------
//! ```text
//! CaptureRegion ──► TimestampSource::capture_text ──► raw text
//!                                                      │ leftmost H:MM:SS match
//!                                                      ▼
//!                                               ClockReading::parse
//! ```
//!
//! A raw text holding no clock-shaped substring is reported exactly like a failed
//! capture ([`ClockfitError::AcquisitionFailure`]).
use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    clockfit_errors::ClockfitError,
    constants::DEFAULT_CAPTURE_REGION,
    time::{reading_from_raw_text, ClockReading},
};

pub mod bounded;
pub mod scripted;

/// Screen rectangle the clock is read from, in screen pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        CaptureRegion {
            x,
            y,
            width,
            height,
        }
    }

    /// Shift the rectangle by a drag delta, keeping its size.
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        CaptureRegion {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Place the top-left corner at `(x, y)`, keeping the size.
    pub fn moved_to(self, x: i32, y: i32) -> Self {
        CaptureRegion { x, y, ..self }
    }

    pub fn as_tuple(&self) -> (i32, i32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for CaptureRegion {
    fn default() -> Self {
        let (x, y, w, h) = DEFAULT_CAPTURE_REGION;
        CaptureRegion::new(x, y, w, h)
    }
}

impl fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Capture a rectangle of the screen and return the text recognized in it.
///
/// Implementations may block; wrap them in
/// [`BoundedSource`](crate::acquisition::bounded::BoundedSource) to put a time limit on
/// the call.
pub trait TimestampSource: Send + Sync {
    /// Arguments
    /// -----------------
    /// * `region`: the rectangle to read, as it is at the moment of the call.
    ///
    /// Return
    /// ----------
    /// * the raw recognized text (possibly holding noise around the clock),
    /// * or [`ClockfitError::AcquisitionFailure`] / [`ClockfitError::AcquisitionTimeout`].
    fn capture_text(&self, region: &CaptureRegion) -> Result<String, ClockfitError>;
}

impl<T: TimestampSource + ?Sized> TimestampSource for Arc<T> {
    fn capture_text(&self, region: &CaptureRegion) -> Result<String, ClockfitError> {
        (**self).capture_text(region)
    }
}

impl<T: TimestampSource + ?Sized> TimestampSource for Box<T> {
    fn capture_text(&self, region: &CaptureRegion) -> Result<String, ClockfitError> {
        (**self).capture_text(region)
    }
}

/// Run one acquisition and turn its text into a [`ClockReading`].
///
/// The leftmost clock-shaped substring of the captured text is used.
pub fn acquire_reading<S: TimestampSource + ?Sized>(
    source: &S,
    region: &CaptureRegion,
) -> Result<ClockReading, ClockfitError> {
    let raw = source.capture_text(region)?;
    reading_from_raw_text(&raw)
}
