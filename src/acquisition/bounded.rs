//! # Time-bounded acquisition
//!
//! Screen capture followed by OCR is a blocking call of unknown duration. A
//! [`BoundedSource`] runs the wrapped [`TimestampSource`] on a blocking worker and
//! gives up once its budget is spent, reporting
//! [`ClockfitError::AcquisitionTimeout`] instead of stalling the caller.
//!
//! Execution modes
//! -----------------
//! * **Blocking** – [`TimestampSource::capture_text`] on a `BoundedSource` drives its
//!   own small runtime. Called from inside a Tokio runtime it fails with
//!   [`ClockfitError::AcquisitionFailure`]; use the async methods there.
//! * **Async** – [`BoundedSource::acquire_async`] awaits the capture with the budget,
//!   and [`BoundedSource::acquire_until`] also stops early when a cancellation future
//!   resolves.
//!
//! A capture that times out keeps running on its worker until the backend returns;
//! its result is discarded. The blocking-mode runtime is created on first use and
//! shut down in the background on drop, so a stuck backend never blocks the owner.
use std::{future::Future, sync::Arc, time::Duration};

use once_cell::sync::OnceCell;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::{acquisition::CaptureRegion, clockfit_errors::ClockfitError};

use super::TimestampSource;

pub struct BoundedSource<S> {
    inner: Arc<S>,
    budget: Duration,
    runtime: OnceCell<Runtime>,
}

impl<S: TimestampSource + 'static> BoundedSource<S> {
    /// Wrap `inner` with a per-capture time budget.
    ///
    /// Arguments
    /// -----------------
    /// * `inner`: the blocking capture backend.
    /// * `budget`: maximum time a single capture may take, must be non-zero.
    ///
    /// Return
    /// ----------
    /// * the bounded source, or [`ClockfitError::InvalidTrackerParameter`] for a zero budget.
    pub fn new(inner: S, budget: Duration) -> Result<Self, ClockfitError> {
        if budget.is_zero() {
            return Err(ClockfitError::InvalidTrackerParameter(
                "acquisition budget must be > 0".into(),
            ));
        }

        Ok(BoundedSource {
            inner: Arc::new(inner),
            budget,
            runtime: OnceCell::new(),
        })
    }

    fn runtime(&self) -> Result<&Runtime, ClockfitError> {
        self.runtime.get_or_try_init(|| {
            Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("clockfit-acquire")
                .enable_time()
                .build()
                .map_err(|e| {
                    ClockfitError::AcquisitionFailure(format!(
                        "cannot start acquisition worker: {e}"
                    ))
                })
        })
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Capture `region` on a blocking worker, waiting at most the budget.
    pub async fn acquire_async(&self, region: CaptureRegion) -> Result<String, ClockfitError> {
        let inner = Arc::clone(&self.inner);
        let task = tokio::task::spawn_blocking(move || inner.capture_text(&region));

        match tokio::time::timeout(self.budget, task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_err)) => Err(ClockfitError::AcquisitionFailure(format!(
                "capture worker failed: {join_err}"
            ))),
            Err(_) => {
                tracing::warn!(budget = ?self.budget, %region, "timestamp acquisition timed out");
                Err(ClockfitError::AcquisitionTimeout(self.budget))
            }
        }
    }

    /// Same as [`acquire_async`](Self::acquire_async) but abandons the capture as soon
    /// as `cancel` resolves.
    pub async fn acquire_until<F>(
        &self,
        region: CaptureRegion,
        cancel: F,
    ) -> Result<String, ClockfitError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            outcome = self.acquire_async(region) => outcome,
            _ = cancel => {
                tracing::debug!(%region, "timestamp acquisition cancelled");
                Err(ClockfitError::AcquisitionFailure("acquisition cancelled".into()))
            }
        }
    }
}

impl<S: TimestampSource + 'static> TimestampSource for BoundedSource<S> {
    fn capture_text(&self, region: &CaptureRegion) -> Result<String, ClockfitError> {
        if Handle::try_current().is_ok() {
            return Err(ClockfitError::AcquisitionFailure(
                "blocking capture called from an async context, use acquire_async".into(),
            ));
        }
        self.runtime()?.block_on(self.acquire_async(*region))
    }
}

impl<S> Drop for BoundedSource<S> {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
