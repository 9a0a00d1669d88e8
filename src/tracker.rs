//! # Tracker: session state and estimation engine
//!
//! A [`Tracker`] owns the whole state of one tracking session and the timestamp
//! source it reads the on-screen clock with:
//!
//! ```text
//! Tracker
//! ├── params        (TrackerParams)
//! ├── session
//! │   ├── store          (SampleStore, insertion ordered)
//! │   ├── capture_region (written only by drag/move gestures)
//! │   ├── query_text     (operator query field)
//! │   └── last_estimate  (kept across failed estimates)
//! └── source        (any TimestampSource)
//! ```
//!
//! Gestures map to methods:
//!
//! * primary click → [`Tracker::mark`],
//! * secondary click → [`Tracker::remove_nearest`],
//! * reset → [`Tracker::reset`],
//! * estimate → [`Tracker::estimate`] / [`Tracker::estimate_default`],
//! * clock capture button → [`Tracker::capture_into_latest`],
//! * overlay drag → [`Tracker::drag_capture_region`].
//!
//! Every operation is synchronous and takes `&mut self`: there is exactly one writer.
//! A multi-threaded front end should put the tracker behind a single mutex.
//!
//! [`Tracker::bounded`] wraps a blocking capture backend in a [`BoundedSource`] with
//! `params.acquisition_budget`, so no clock read (mark, capture, estimate) can stall
//! the caller longer than the budget; an overrun surfaces as
//! [`ClockfitError::AcquisitionTimeout`]. [`Tracker::new`] uses the source as given.
//!
//! ## Estimation
//!
//! [`Tracker::estimate`] runs, in order:
//!
//! 1. at least 2 samples, else [`ClockfitError::InsufficientSamples`],
//! 2. the query time, else the acquisition or parse error (no query time),
//! 3. a valid reading on **every** sample, else [`ClockfitError::IncompleteSamples`],
//! 4. the `x(t)` and `y(t)` fits, else [`ClockfitError::DegenerateFit`],
//! 5. evaluation at the query time, unclamped.
//!
//! Only a success writes `last_estimate`.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Point2;
//! use clockfit::acquisition::scripted::ScriptedSource;
//! use clockfit::tracker::{QuerySource, Tracker};
//! use clockfit::tracker_params::TrackerParams;
//!
//! let source = ScriptedSource::from_texts(["10:00:00", "10:00:10", "10:00:20"]);
//! let mut tracker = Tracker::new(source, TrackerParams::auto_stamping());
//!
//! tracker.mark(Point2::new(0.0, 0.0));
//! tracker.mark(Point2::new(10.0, 0.0));
//! let estimate = tracker.estimate(QuerySource::Capture).unwrap();
//! assert_eq!(estimate, Point2::new(20.0, 0.0));
//! ```
use serde::{Deserialize, Serialize};

use crate::{
    acquisition::{acquire_reading, bounded::BoundedSource, CaptureRegion, TimestampSource},
    clockfit_errors::ClockfitError,
    constants::{ScreenPoint, Seconds, MIN_FIT_SAMPLES},
    linear_fit::{TrajectoryModel, TrendLine},
    samples::{DeletionPolicy, Removal, Sample, SampleStore, SampleTime},
    time::{extract_clock_text, ClockReading},
    tracker_params::{QueryMode, TrackerParams},
};

/// Where an estimate takes its query time from.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySource {
    /// Read the on-screen clock now.
    Capture,
    /// Use the operator query field of the session.
    QueryField,
    /// Parse this text.
    Text(String),
    /// Use an already validated reading.
    Reading(ClockReading),
}

/// Destination of a [`Tracker::capture_into_latest`] read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget {
    /// The timestamp slot of this sample.
    Sample(usize),
    /// The operator query field.
    QueryField,
}

/// Result of a [`Tracker::mark`] gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Marked {
    pub index: usize,
    /// Reading attached right after marking, if one was taken and succeeded.
    pub reading: Option<ClockReading>,
}

/// Domain state of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub store: SampleStore,
    pub capture_region: CaptureRegion,
    pub query_text: Option<String>,
    pub last_estimate: Option<ScreenPoint>,
    latest_marked: Option<usize>,
}

impl Session {
    pub fn new(capture_region: CaptureRegion) -> Self {
        Session {
            capture_region,
            ..Self::default()
        }
    }

    /// Index of the most recently marked sample that still exists.
    pub fn latest_marked(&self) -> Option<usize> {
        self.latest_marked
    }

    fn forget_removed(&mut self, removal: &Removal, policy: DeletionPolicy) {
        self.latest_marked = match (self.latest_marked, policy) {
            (Some(latest), DeletionPolicy::RemoveSingle) if latest > removal.index => {
                Some(latest - 1)
            }
            (Some(latest), _) if latest >= removal.index => None,
            (latest, _) => latest,
        };
        if policy == DeletionPolicy::TruncateFrom {
            self.last_estimate = None;
        }
    }

    /// Clear samples, query field and estimate; the capture region stays.
    pub fn reset(&mut self) {
        self.store.reset();
        self.query_text = None;
        self.last_estimate = None;
        self.latest_marked = None;
    }
}

/// One sample as shown by the display surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleView {
    pub index: usize,
    pub position: ScreenPoint,
    pub label: String,
    pub seconds: Option<Seconds>,
}

/// Everything the display surface needs to draw the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub samples: Vec<SampleView>,
    pub trend_line: Option<TrendLine>,
    pub last_estimate: Option<ScreenPoint>,
    pub capture_region: CaptureRegion,
    pub query_text: Option<String>,
}

pub struct Tracker<S> {
    params: TrackerParams,
    session: Session,
    source: S,
}

impl<S: TimestampSource + 'static> Tracker<BoundedSource<S>> {
    /// Build a tracker whose clock reads are limited to `params.acquisition_budget`.
    ///
    /// Arguments
    /// -----------------
    /// * `source`: the blocking capture backend.
    /// * `params`: tracker configuration; its budget bounds every read of `source`.
    ///
    /// Return
    /// ----------
    /// * the tracker, or [`ClockfitError::InvalidTrackerParameter`] for a zero budget.
    pub fn bounded(source: S, params: TrackerParams) -> Result<Self, ClockfitError> {
        let source = BoundedSource::new(source, params.acquisition_budget)?;
        Ok(Tracker::new(source, params))
    }
}

impl<S: TimestampSource> Tracker<S> {
    pub fn new(source: S, params: TrackerParams) -> Self {
        Tracker {
            session: Session::new(params.capture_region),
            params,
            source,
        }
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn samples(&self) -> &[Sample] {
        self.session.store.samples()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn capture_region(&self) -> CaptureRegion {
        self.session.capture_region
    }

    pub fn last_estimate(&self) -> Option<ScreenPoint> {
        self.session.last_estimate
    }

    pub fn query_text(&self) -> Option<&str> {
        self.session.query_text.as_deref()
    }

    // --- Samples ---

    /// Record a point, then read the clock for it when `stamp_on_mark` is set.
    ///
    /// The position is stored before the clock is read: a failed read leaves the sample
    /// in place with an absent timestamp.
    pub fn mark(&mut self, position: ScreenPoint) -> Marked {
        let index = self.session.store.add(position);
        self.session.latest_marked = Some(index);
        tracing::debug!(index, x = position.x, y = position.y, "sample marked");

        let reading = if self.params.stamp_on_mark {
            self.stamp_sample(index).ok()
        } else {
            None
        };
        Marked { index, reading }
    }

    /// Read the clock and attach the reading to sample `index`.
    ///
    /// On failure the sample's timestamp slot is left as it was.
    pub fn stamp_sample(&mut self, index: usize) -> Result<ClockReading, ClockfitError> {
        if index >= self.session.store.len() {
            return Err(ClockfitError::SampleNotFound(index));
        }
        match acquire_reading(&self.source, &self.session.capture_region) {
            Ok(reading) => {
                self.session
                    .store
                    .set_time(index, SampleTime::Resolved(reading))?;
                tracing::debug!(index, %reading, "sample stamped");
                Ok(reading)
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "no timestamp for sample");
                Err(err)
            }
        }
    }

    /// Read the clock once and write the clock text into the latest marked sample, or
    /// into the query field when there is none.
    ///
    /// A clock-shaped text is stored even when out of range so the operator can fix
    /// it; it is validated again at estimate time.
    pub fn capture_into_latest(&mut self) -> Result<CaptureTarget, ClockfitError> {
        let raw = self.source.capture_text(&self.session.capture_region)?;
        let text = extract_clock_text(&raw)
            .ok_or_else(|| {
                ClockfitError::AcquisitionFailure(format!("no clock text in {:?}", raw.trim()))
            })?
            .to_string();

        match self.session.latest_marked {
            Some(index) => {
                let time = match ClockReading::parse(&text) {
                    Ok(reading) => SampleTime::Resolved(reading),
                    Err(_) => SampleTime::Entered(text),
                };
                self.session.store.set_time(index, time)?;
                Ok(CaptureTarget::Sample(index))
            }
            None => {
                self.session.query_text = Some(text);
                Ok(CaptureTarget::QueryField)
            }
        }
    }

    /// Operator edit of a sample's timestamp text; validated when an estimate runs.
    pub fn set_sample_time_text(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), ClockfitError> {
        self.session
            .store
            .set_time(index, SampleTime::Entered(text.into()))
    }

    pub fn clear_sample_time(&mut self, index: usize) -> Result<(), ClockfitError> {
        self.session.store.set_time(index, SampleTime::Absent)
    }

    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.session.query_text = Some(text.into());
    }

    pub fn clear_query_text(&mut self) {
        self.session.query_text = None;
    }

    /// Remove the sample nearest to `point` with the configured deletion policy.
    pub fn remove_nearest(&mut self, point: ScreenPoint) -> Option<Removal> {
        self.remove_nearest_with(point, self.params.deletion_policy)
    }

    /// Remove the sample nearest to `point` with an explicit policy.
    ///
    /// `TruncateFrom` also clears the last estimate; `RemoveSingle` keeps it.
    /// An empty session is left untouched.
    pub fn remove_nearest_with(
        &mut self,
        point: ScreenPoint,
        policy: DeletionPolicy,
    ) -> Option<Removal> {
        let removal = self.session.store.remove_nearest(&point, policy)?;
        self.session.forget_removed(&removal, policy);
        tracing::debug!(
            index = removal.index,
            removed = removal.removed.len(),
            %policy,
            "samples removed"
        );
        Some(removal)
    }

    pub fn reset(&mut self) {
        self.session.reset();
        tracing::debug!("session reset");
    }

    // --- Capture region ---

    pub fn drag_capture_region(&mut self, dx: i32, dy: i32) -> CaptureRegion {
        self.session.capture_region = self.session.capture_region.translated(dx, dy);
        self.session.capture_region
    }

    pub fn move_capture_region(&mut self, x: i32, y: i32) -> CaptureRegion {
        self.session.capture_region = self.session.capture_region.moved_to(x, y);
        self.session.capture_region
    }

    // --- Estimation ---

    fn query_reading(&self, query: &QuerySource) -> Result<ClockReading, ClockfitError> {
        match query {
            QuerySource::Capture => acquire_reading(&self.source, &self.session.capture_region),
            QuerySource::QueryField => ClockReading::parse(
                self.session.query_text.as_deref().unwrap_or_default(),
            ),
            QuerySource::Text(text) => ClockReading::parse(text),
            QuerySource::Reading(reading) => Ok(*reading),
        }
    }

    /// Fit the per-axis model over the current samples, without evaluating it.
    pub fn trajectory(&self) -> Result<TrajectoryModel, ClockfitError> {
        let found = self.session.store.len();
        if found < MIN_FIT_SAMPLES {
            return Err(ClockfitError::InsufficientSamples { found });
        }
        TrajectoryModel::fit(&self.session.store.timed_positions()?)
    }

    /// Estimate the object position at the query time.
    ///
    /// Return
    /// ----------
    /// * `Ok(point)` – the new `last_estimate`,
    /// * `Err(InsufficientSamples)` – fewer than 2 samples,
    /// * `Err(AcquisitionFailure | AcquisitionTimeout | ParseFailure)` – no query time,
    /// * `Err(IncompleteSamples)` – a sample lacks a valid timestamp,
    /// * `Err(DegenerateFit)` – all sample timestamps are identical.
    ///
    /// Errors leave the session unchanged.
    pub fn estimate(&mut self, query: QuerySource) -> Result<ScreenPoint, ClockfitError> {
        let found = self.session.store.len();
        if found < MIN_FIT_SAMPLES {
            return Err(ClockfitError::InsufficientSamples { found });
        }

        let query_time = self.query_reading(&query).inspect_err(|err| {
            tracing::warn!(error = %err, ?query, "no query time");
        })?;

        let model = self.trajectory().inspect_err(|err| {
            tracing::warn!(error = %err, "trajectory fit failed");
        })?;

        let estimate = model.position_at_reading(&query_time);
        self.session.last_estimate = Some(estimate);
        tracing::info!(
            query = %query_time,
            x = estimate.x,
            y = estimate.y,
            samples = found,
            "position estimated"
        );
        Ok(estimate)
    }

    /// Estimate with the query source selected by `params.query_mode`.
    pub fn estimate_default(&mut self) -> Result<ScreenPoint, ClockfitError> {
        let query = match self.params.query_mode {
            QueryMode::Capture => QuerySource::Capture,
            QueryMode::QueryField => QuerySource::QueryField,
        };
        self.estimate(query)
    }

    // --- Output ---

    /// Trend line `y(x)` through the sample positions, `None` when it cannot be fitted.
    pub fn trend_line(&self) -> Option<TrendLine> {
        TrendLine::fit(self.session.store.positions()).ok()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            samples: self
                .session
                .store
                .iter()
                .enumerate()
                .map(|(index, s)| SampleView {
                    index,
                    position: s.position,
                    label: s.label(),
                    seconds: s.reading().map(|r| r.seconds()),
                })
                .collect(),
            trend_line: self.trend_line(),
            last_estimate: self.session.last_estimate,
            capture_region: self.session.capture_region,
            query_text: self.session.query_text.clone(),
        }
    }
}
