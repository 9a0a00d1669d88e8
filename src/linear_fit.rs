//! # Linear trajectory model
//!
//! Closed-form ordinary least squares for `value = slope · abscissa + intercept`:
//!
//! ```text
//! Sₜ = Σtᵢ   Sᵥ = Σvᵢ   Sₜₜ = Σtᵢ²   Sₜᵥ = Σtᵢvᵢ
//! denom = n·Sₜₜ − Sₜ²
//! slope = (n·Sₜᵥ − Sₜ·Sᵥ) / denom
//! intercept = (Sᵥ − slope·Sₜ) / n
//! ```
//!
//! `denom == 0` happens when every abscissa is identical; no line can be fitted and
//! [`ClockfitError::DegenerateFit`] is returned.
//!
//! Two consumers exist:
//!
//! * [`TrajectoryModel`] – two independent fits `x(t)` and `y(t)` over timed samples,
//!   evaluated at any time (extrapolation is not clamped),
//! * [`TrendLine`] – `y(x)` over positions only, for display.
//!
//! Sums are order independent, so the insertion order of samples never changes a fit.
use std::fmt;

use itertools::{izip, Itertools};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{
    clockfit_errors::{Axis, ClockfitError},
    constants::{Pixel, ScreenPoint, Seconds, MIN_FIT_SAMPLES},
    time::ClockReading,
};

/// A fitted straight line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

#[derive(Default)]
struct Sums {
    n: usize,
    t: f64,
    v: f64,
    tt: f64,
    tv: f64,
}

impl LinearFit {
    /// Least-squares line through `(abscissa, value)` pairs.
    ///
    /// Arguments
    /// ---------
    /// * `pairs`: the points to fit
    /// * `axis`: which fit this is, reported in errors
    ///
    /// Return
    /// ------
    /// * the line, [`ClockfitError::InsufficientSamples`] below 2 points, or
    ///   [`ClockfitError::DegenerateFit`] when all abscissae are equal
    pub fn fit<'a, I>(pairs: I, axis: Axis) -> Result<Self, ClockfitError>
    where
        I: IntoIterator<Item = (&'a f64, &'a f64)>,
    {
        let s = pairs.into_iter().fold(Sums::default(), |mut s, (&t, &v)| {
            s.n += 1;
            s.t += t;
            s.v += v;
            s.tt += t * t;
            s.tv += t * v;
            s
        });

        if s.n < MIN_FIT_SAMPLES {
            return Err(ClockfitError::InsufficientSamples { found: s.n });
        }

        let n = s.n as f64;
        let denom = n * s.tt - s.t * s.t;
        if denom == 0.0 {
            return Err(ClockfitError::DegenerateFit(axis));
        }

        let slope = (n * s.tv - s.t * s.v) / denom;
        let intercept = (s.v - slope * s.t) / n;
        Ok(LinearFit { slope, intercept })
    }

    pub fn eval(&self, abscissa: f64) -> f64 {
        self.slope * abscissa + self.intercept
    }
}

impl fmt::Display for LinearFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}·t + {:.6}", self.slope, self.intercept)
    }
}

/// Per-axis linear motion `x(t)`, `y(t)` with `t` in seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryModel {
    pub x: LinearFit,
    pub y: LinearFit,
}

impl TrajectoryModel {
    /// Fit both axes over timed positions.
    ///
    /// The axes are fitted independently; the first failing one is reported.
    pub fn fit(samples: &[(ClockReading, ScreenPoint)]) -> Result<Self, ClockfitError> {
        let (t, xs, ys): (Vec<Seconds>, Vec<Pixel>, Vec<Pixel>) = samples
            .iter()
            .map(|(reading, p)| (reading.seconds(), p.x, p.y))
            .multiunzip();

        Ok(TrajectoryModel {
            x: LinearFit::fit(izip!(&t, &xs), Axis::X)?,
            y: LinearFit::fit(izip!(&t, &ys), Axis::Y)?,
        })
    }

    /// Position at `t`; any time is accepted, including outside the fitted range.
    pub fn position_at(&self, t: Seconds) -> ScreenPoint {
        Point2::new(self.x.eval(t), self.y.eval(t))
    }

    pub fn position_at_reading(&self, reading: &ClockReading) -> ScreenPoint {
        self.position_at(reading.seconds())
    }

    /// Apparent velocity in pixels per second.
    pub fn velocity(&self) -> Vector2<f64> {
        Vector2::new(self.x.slope, self.y.slope)
    }
}

impl fmt::Display for TrajectoryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x(t) = {}, y(t) = {}", self.x, self.y)
    }
}

/// Trend line `y = slope · x + intercept` through the sample positions, time ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub line: LinearFit,
}

impl TrendLine {
    /// Fit over positions; fails when fewer than 2 points or all x are equal.
    pub fn fit<I>(positions: I) -> Result<Self, ClockfitError>
    where
        I: IntoIterator<Item = ScreenPoint>,
    {
        let (xs, ys): (Vec<Pixel>, Vec<Pixel>) = positions.into_iter().map(|p| (p.x, p.y)).unzip();
        Ok(TrendLine {
            line: LinearFit::fit(izip!(&xs, &ys), Axis::Trend)?,
        })
    }

    pub fn y_at(&self, x: Pixel) -> Pixel {
        self.line.eval(x)
    }

    /// Endpoints of the line drawn across a surface of the given width.
    pub fn segment(&self, width: Pixel) -> (ScreenPoint, ScreenPoint) {
        (
            Point2::new(0.0, self.y_at(0.0)),
            Point2::new(width, self.y_at(width)),
        )
    }
}
