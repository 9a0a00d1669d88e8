//! Nearest-point selection for removal gestures.
use nalgebra::distance_squared;

use crate::constants::ScreenPoint;

/// Index of the point closest to `target` by squared Euclidean distance.
///
/// Ties go to the lowest index (first occurrence). Points at a non-finite distance
/// (NaN or infinite coordinates) are never selected. An empty input gives `None`.
pub fn nearest_index<I>(points: I, target: &ScreenPoint) -> Option<usize>
where
    I: IntoIterator<Item = ScreenPoint>,
{
    points
        .into_iter()
        .enumerate()
        .map(|(i, p)| (i, distance_squared(&p, target)))
        .filter(|(_, d2)| d2.is_finite())
        .fold(None, |best: Option<(usize, f64)>, (i, d2)| {
            match best {
                Some((_, best_d2)) if best_d2 <= d2 => best,
                _ => Some((i, d2)),
            }
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod selector_test {
    use nalgebra::Point2;

    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(nearest_index(Vec::new(), &Point2::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_coincident_point() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0), Point2::new(9.0, 1.0)];
        assert_eq!(nearest_index(pts, &Point2::new(5.0, 5.0)), Some(1));
    }

    #[test]
    fn test_tie_goes_to_first() {
        let pts = vec![
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(-1.0, 0.0),
        ];
        assert_eq!(nearest_index(pts, &Point2::new(0.0, 0.0)), Some(0));
    }

    #[test]
    fn test_duplicates_pick_first() {
        let pts = vec![Point2::new(3.0, 3.0), Point2::new(7.0, 7.0), Point2::new(7.0, 7.0)];
        assert_eq!(nearest_index(pts, &Point2::new(8.0, 8.0)), Some(1));
    }

    #[test]
    fn test_non_finite_points_never_selected() {
        let pts = vec![
            Point2::new(2.0, 2.0),
            Point2::new(f64::NAN, 0.0),
            Point2::new(f64::INFINITY, 1.0),
        ];
        assert_eq!(nearest_index(pts, &Point2::new(0.0, 0.0)), Some(0));

        let pts = vec![Point2::new(f64::NAN, f64::NAN), Point2::new(4.0, 0.0)];
        assert_eq!(nearest_index(pts, &Point2::new(0.0, 0.0)), Some(1));

        assert_eq!(
            nearest_index(vec![Point2::new(f64::NAN, 1.0)], &Point2::new(0.0, 0.0)),
            None
        );
    }
}
