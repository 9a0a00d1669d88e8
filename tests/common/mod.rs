#![allow(dead_code)]

use approx::assert_relative_eq;
use clockfit::acquisition::scripted::ScriptedSource;
use clockfit::constants::ScreenPoint;
use clockfit::logging::init_test_tracing;
use clockfit::tracker::Tracker;
use clockfit::tracker_params::TrackerParams;
use nalgebra::Point2;

pub fn assert_point_close(actual: &ScreenPoint, expected: &ScreenPoint, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
}

/// Tracker whose marks are stamped from `times`, in order.
pub fn stamped_tracker(
    marks: &[(f64, f64, &str)],
    params: TrackerParams,
) -> Tracker<ScriptedSource> {
    init_test_tracing();
    let source = ScriptedSource::from_texts(marks.iter().map(|(_, _, t)| *t));
    let mut tracker = Tracker::new(source, params);
    for (x, y, _) in marks {
        let marked = tracker.mark(Point2::new(*x, *y));
        assert!(marked.reading.is_some(), "mark at ({x}, {y}) was not stamped");
    }
    tracker
}
