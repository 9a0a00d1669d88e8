use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use clockfit::acquisition::{CaptureRegion, TimestampSource};
use clockfit::clockfit_errors::ClockfitError;
use clockfit::logging::init_test_tracing;
use clockfit::time::ClockReading;
use clockfit::tracker::{QuerySource, Tracker};
use clockfit::tracker_params::{TrackerParams, TrackerParamsBuilder};
use nalgebra::Point2;

const BUDGET: Duration = Duration::from_millis(50);
const STALL: Duration = Duration::from_millis(1500);

/// Backend answering each capture after its own delay, in script order.
struct DelayedSource {
    script: Mutex<VecDeque<(Duration, &'static str)>>,
}

impl DelayedSource {
    fn new(script: impl IntoIterator<Item = (Duration, &'static str)>) -> Self {
        DelayedSource {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

impl TimestampSource for DelayedSource {
    fn capture_text(&self, _region: &CaptureRegion) -> Result<String, ClockfitError> {
        let next = self
            .script
            .lock()
            .map_err(|_| ClockfitError::AcquisitionFailure("poisoned".into()))?
            .pop_front();
        match next {
            Some((delay, text)) => {
                thread::sleep(delay);
                Ok(text.to_string())
            }
            None => Err(ClockfitError::AcquisitionFailure("script exhausted".into())),
        }
    }
}

fn budgeted(params: TrackerParams) -> TrackerParams {
    TrackerParamsBuilder::from_params(params)
        .acquisition_budget(BUDGET)
        .build()
        .unwrap()
}

#[test]
fn test_stalled_capture_on_mark_leaves_sample_unstamped() {
    init_test_tracing();
    let source = DelayedSource::new([(STALL, "10:00:00")]);
    let mut tracker =
        Tracker::bounded(source, budgeted(TrackerParams::auto_stamping())).unwrap();

    let start = Instant::now();
    let marked = tracker.mark(Point2::new(12.0, 34.0));
    let elapsed = start.elapsed();

    assert!(elapsed < STALL / 2, "mark blocked for {elapsed:?}");
    assert_eq!(marked.index, 0);
    assert_eq!(marked.reading, None);
    assert_eq!(tracker.samples().len(), 1);
    assert_eq!(tracker.samples()[0].position, Point2::new(12.0, 34.0));
    assert!(tracker.samples()[0].time.is_absent());
}

#[test]
fn test_stalled_stamp_reports_timeout() {
    init_test_tracing();
    let source = DelayedSource::new([(STALL, "10:00:00")]);
    let params = TrackerParams {
        stamp_on_mark: false,
        ..budgeted(TrackerParams::auto_stamping())
    };
    let mut tracker = Tracker::bounded(source, params).unwrap();
    tracker.mark(Point2::new(0.0, 0.0));

    assert_eq!(
        tracker.stamp_sample(0),
        Err(ClockfitError::AcquisitionTimeout(BUDGET))
    );
    assert!(tracker.samples()[0].time.is_absent());
}

#[test]
fn test_stalled_query_capture_keeps_last_estimate() {
    init_test_tracing();
    let fast = Duration::from_millis(1);
    let source = DelayedSource::new([
        (fast, "10:00:00"),
        (fast, "10:00:10"),
        (STALL, "10:00:20"),
        (fast, "10:00:30"),
    ]);
    let mut tracker =
        Tracker::bounded(source, budgeted(TrackerParams::auto_stamping())).unwrap();
    tracker.mark(Point2::new(0.0, 0.0));
    tracker.mark(Point2::new(10.0, 0.0));

    let first = tracker
        .estimate(QuerySource::Reading(
            ClockReading::from_hms(10, 0, 5).unwrap(),
        ))
        .unwrap();
    assert_eq!(first, Point2::new(5.0, 0.0));

    let start = Instant::now();
    let err = tracker.estimate(QuerySource::Capture).unwrap_err();
    assert!(start.elapsed() < STALL / 2);
    assert_eq!(err, ClockfitError::AcquisitionTimeout(BUDGET));
    assert!(err.is_acquisition_failure());
    assert_eq!(tracker.last_estimate(), Some(first));

    // the stalled read is abandoned; the next capture answers normally
    let next = tracker.estimate(QuerySource::Capture).unwrap();
    assert_eq!(next, Point2::new(30.0, 0.0));
    assert_eq!(tracker.last_estimate(), Some(next));
}

#[test]
fn test_stalled_capture_into_latest_changes_nothing() {
    init_test_tracing();
    let source = DelayedSource::new([(STALL, "11:00:00")]);
    let mut tracker =
        Tracker::bounded(source, budgeted(TrackerParams::manual_entry())).unwrap();
    tracker.mark(Point2::new(1.0, 1.0));

    assert_eq!(
        tracker.capture_into_latest(),
        Err(ClockfitError::AcquisitionTimeout(BUDGET))
    );
    assert!(tracker.samples()[0].time.is_absent());
    assert_eq!(tracker.query_text(), None);
}
