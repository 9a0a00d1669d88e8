//! # Constants and type definitions for clockfit
//!
//! This module centralizes the **time constants**, **acquisition defaults**, and **common type
//! definitions** used throughout the `clockfit` library.
//!
//! ## Overview
//!
//! - Time-of-day units (seconds per minute and per hour)
//! - Default capture rectangle and acquisition budget
//! - The clock text pattern shared by the parser and the acquisition layer
//! - Core type aliases used across the crate

use std::time::Duration;

use nalgebra::Point2;

// -------------------------------------------------------------------------------------------------
// Time constants
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a minute
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: u32 = 3_600;

/// Regular expression matching a clock string `H:MM:SS` or `HH:MM:SS` on word boundaries.
///
/// Ranges are **not** checked by the pattern, only the shape; the parser validates each field.
pub const CLOCK_PATTERN: &str = r"\b(\d{1,2}):(\d{2}):(\d{2})\b";

// -------------------------------------------------------------------------------------------------
// Acquisition defaults
// -------------------------------------------------------------------------------------------------

/// Default capture rectangle `(x, y, w, h)` in screen pixels
pub const DEFAULT_CAPTURE_REGION: (i32, i32, u32, u32) = (300, 200, 70, 30);

/// Default time budget for a single capture + OCR round trip
pub const DEFAULT_ACQUISITION_BUDGET: Duration = Duration::from_millis(300);

/// Minimum number of samples needed to fit a line
pub const MIN_FIT_SAMPLES: usize = 2;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Screen coordinate in pixels (sub-pixel values allowed for estimates)
pub type Pixel = f64;

/// Seconds since local midnight
pub type Seconds = f64;

/// A position on the display surface
pub type ScreenPoint = Point2<Pixel>;
