//! # Clock readings
//!
//! Parsing and validation of the on-screen clock text into a [`ClockReading`],
//! a time of day expressed as whole seconds since local midnight.
//!
//! Two entry points exist:
//!
//! * [`ClockReading::parse`] – the whole input (surrounding whitespace aside) must be
//!   `H:MM:SS` or `HH:MM:SS` with every field in range,
//! * [`extract_clock_text`] – finds the **leftmost** clock-shaped substring inside raw
//!   OCR output. The substring is only shape-checked; range validation is left to
//!   [`ClockReading::parse`].
//!
//! A failed parse is always an error, never a zero time.
use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    clockfit_errors::ClockfitError,
    constants::{Seconds, CLOCK_PATTERN, SECONDS_PER_HOUR, SECONDS_PER_MINUTE},
};

static CLOCK_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(CLOCK_PATTERN).expect("clock pattern is a valid regex"));

static CLOCK_EXACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{CLOCK_PATTERN}$")).expect("anchored clock pattern is a valid regex")
});

/// A validated time of day, `0 <= seconds < 86400`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockReading {
    seconds: u32,
}

impl ClockReading {
    /// Build a reading from its fields.
    ///
    /// Arguments
    /// ---------
    /// * `hours`: `0..24`
    /// * `minutes`: `0..60`
    /// * `seconds`: `0..60`
    ///
    /// Return
    /// ------
    /// * the reading, or [`ClockfitError::ParseFailure`] if any field is out of range
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Result<Self, ClockfitError> {
        if hours >= 24 || minutes >= 60 || seconds >= 60 {
            return Err(ClockfitError::ParseFailure(format!(
                "{hours}:{minutes:02}:{seconds:02}"
            )));
        }
        Ok(ClockReading {
            seconds: hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds,
        })
    }

    /// Parse a clock string `H:MM:SS` or `HH:MM:SS`.
    ///
    /// Leading and trailing whitespace is ignored; anything else around the clock text
    /// makes the parse fail.
    ///
    /// Arguments
    /// ---------
    /// * `text`: the clock text
    ///
    /// Return
    /// ------
    /// * the validated reading, or [`ClockfitError::ParseFailure`] carrying the input
    pub fn parse(text: &str) -> Result<Self, ClockfitError> {
        let fail = || ClockfitError::ParseFailure(text.to_string());

        let caps = CLOCK_EXACT.captures(text.trim()).ok_or_else(fail)?;
        let field = |i: usize| -> Result<u32, ClockfitError> {
            caps.get(i)
                .ok_or_else(fail)?
                .as_str()
                .parse::<u32>()
                .map_err(|_| fail())
        };

        ClockReading::from_hms(field(1)?, field(2)?, field(3)?).map_err(|_| fail())
    }

    /// Seconds since midnight as a float, the abscissa used by the fits.
    pub fn seconds(&self) -> Seconds {
        self.seconds as Seconds
    }

    pub fn hours(&self) -> u32 {
        self.seconds / SECONDS_PER_HOUR
    }

    pub fn minutes(&self) -> u32 {
        (self.seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    }

    pub fn secs(&self) -> u32 {
        self.seconds % SECONDS_PER_MINUTE
    }
}

impl FromStr for ClockReading {
    type Err = ClockfitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockReading::parse(s)
    }
}

impl fmt::Display for ClockReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.secs()
        )
    }
}

/// Find the leftmost clock-shaped substring of a raw OCR text.
///
/// Arguments
/// ---------
/// * `raw`: the text returned by the capture backend
///
/// Return
/// ------
/// * the first match, or `None` when the text holds nothing clock-shaped
pub fn extract_clock_text(raw: &str) -> Option<&str> {
    CLOCK_SEARCH.find(raw).map(|m| m.as_str())
}

/// Extract and parse the leftmost clock of a raw OCR text.
///
/// No clock-shaped text is reported as [`ClockfitError::AcquisitionFailure`]; a
/// clock-shaped but out-of-range text is a [`ClockfitError::ParseFailure`].
pub fn reading_from_raw_text(raw: &str) -> Result<ClockReading, ClockfitError> {
    let text = extract_clock_text(raw).ok_or_else(|| {
        ClockfitError::AcquisitionFailure(format!("no clock text in {:?}", raw.trim()))
    })?;
    ClockReading::parse(text)
}
