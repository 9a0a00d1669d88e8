//! # Sample store
//!
//! Ordered collection of marked positions, each paired with an optional timestamp.
//! Samples keep **insertion order**: they are never re-sorted by time, so a later
//! sample may carry an earlier clock reading.
//!
//! Timestamps
//! -----------------
//! A sample's timestamp is a [`SampleTime`]:
//!
//! * `Absent` – no reading yet (acquisition failed, or stamping is manual),
//! * `Resolved` – a reading obtained from the acquisition contract,
//! * `Entered` – raw text typed by the operator, validated only when used.
//!
//! Deletion
//! -----------------
//! Two policies exist, chosen per deployment through [`DeletionPolicy`]:
//!
//! * `RemoveSingle` – drop only the selected sample,
//! * `TruncateFrom` – drop the selected sample and every sample added after it.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    clockfit_errors::ClockfitError,
    constants::ScreenPoint,
    selector::nearest_index,
    time::ClockReading,
};

/// Timestamp slot of a [`Sample`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleTime {
    #[default]
    Absent,
    Resolved(ClockReading),
    Entered(String),
}

impl SampleTime {
    /// Validate the slot at the moment of use.
    ///
    /// Return
    /// ------
    /// * `Some(reading)` for a resolved reading or a well-formed entered text, `None` otherwise
    pub fn resolve(&self) -> Option<ClockReading> {
        match self {
            SampleTime::Absent => None,
            SampleTime::Resolved(reading) => Some(*reading),
            SampleTime::Entered(text) => ClockReading::parse(text).ok(),
        }
    }

    /// Text shown next to the marker; empty when absent.
    pub fn label(&self) -> String {
        match self {
            SampleTime::Absent => String::new(),
            SampleTime::Resolved(reading) => reading.to_string(),
            SampleTime::Entered(text) => text.clone(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SampleTime::Absent)
    }
}

/// A tracked position and its timestamp slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub position: ScreenPoint,
    pub time: SampleTime,
}

impl Sample {
    pub fn new(position: ScreenPoint) -> Self {
        Sample {
            position,
            time: SampleTime::Absent,
        }
    }

    pub fn with_reading(position: ScreenPoint, reading: ClockReading) -> Self {
        Sample {
            position,
            time: SampleTime::Resolved(reading),
        }
    }

    pub fn reading(&self) -> Option<ClockReading> {
        self.time.resolve()
    }

    pub fn label(&self) -> String {
        self.time.label()
    }
}

/// How a removal gesture edits the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeletionPolicy {
    /// Remove only the selected sample.
    #[default]
    RemoveSingle,
    /// Remove the selected sample and all samples added after it.
    TruncateFrom,
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionPolicy::RemoveSingle => write!(f, "remove-single"),
            DeletionPolicy::TruncateFrom => write!(f, "truncate-from"),
        }
    }
}

/// What a removal actually did.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// Index of the selected sample.
    pub index: usize,
    /// Removed samples, in their former order.
    pub removed: Vec<Sample>,
}

/// Insertion-ordered list of samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStore {
    samples: Vec<Sample>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample with an absent timestamp and return its index.
    pub fn add(&mut self, position: ScreenPoint) -> usize {
        self.push(Sample::new(position))
    }

    /// Append an already built sample and return its index.
    pub fn push(&mut self, sample: Sample) -> usize {
        self.samples.push(sample);
        self.samples.len() - 1
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = ScreenPoint> + '_ {
        self.samples.iter().map(|s| s.position)
    }

    /// Overwrite the timestamp slot of sample `index`.
    pub fn set_time(&mut self, index: usize, time: SampleTime) -> Result<(), ClockfitError> {
        let sample = self
            .samples
            .get_mut(index)
            .ok_or(ClockfitError::SampleNotFound(index))?;
        sample.time = time;
        Ok(())
    }

    /// Every sample paired with its validated reading.
    ///
    /// Return
    /// ------
    /// * `(reading, position)` in insertion order, or
    ///   [`ClockfitError::IncompleteSamples`] naming the first sample without a valid reading
    pub fn timed_positions(&self) -> Result<Vec<(ClockReading, ScreenPoint)>, ClockfitError> {
        self.samples
            .iter()
            .enumerate()
            .map(|(index, s)| {
                s.reading()
                    .map(|r| (r, s.position))
                    .ok_or(ClockfitError::IncompleteSamples { index })
            })
            .collect()
    }

    /// Remove sample `index` only.
    pub fn remove_single(&mut self, index: usize) -> Result<Removal, ClockfitError> {
        if index >= self.samples.len() {
            return Err(ClockfitError::SampleNotFound(index));
        }
        let removed = self.samples.remove(index);
        Ok(Removal {
            index,
            removed: vec![removed],
        })
    }

    /// Remove sample `index` and every sample after it.
    pub fn truncate_from(&mut self, index: usize) -> Result<Removal, ClockfitError> {
        if index >= self.samples.len() {
            return Err(ClockfitError::SampleNotFound(index));
        }
        let removed = self.samples.split_off(index);
        Ok(Removal { index, removed })
    }

    /// Apply `policy` at `index`.
    pub fn remove(&mut self, index: usize, policy: DeletionPolicy) -> Result<Removal, ClockfitError> {
        match policy {
            DeletionPolicy::RemoveSingle => self.remove_single(index),
            DeletionPolicy::TruncateFrom => self.truncate_from(index),
        }
    }

    /// Index of the sample closest to `point`, first one on ties.
    pub fn nearest(&self, point: &ScreenPoint) -> Option<usize> {
        nearest_index(self.positions(), point)
    }

    /// Remove the sample closest to `point` with `policy`.
    ///
    /// Return
    /// ------
    /// * `None` when the store is empty (nothing changes), the removal otherwise
    pub fn remove_nearest(&mut self, point: &ScreenPoint, policy: DeletionPolicy) -> Option<Removal> {
        let index = self.nearest(point)?;
        self.remove(index, policy).ok()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod samples_test {
    use nalgebra::Point2;

    use super::*;

    fn reading(text: &str) -> ClockReading {
        ClockReading::parse(text).unwrap()
    }

    fn store_of(n: usize) -> SampleStore {
        let mut store = SampleStore::new();
        for i in 0..n {
            let idx = store.push(Sample::with_reading(
                Point2::new(10.0 * i as f64, 0.0),
                ClockReading::from_hms(10, 0, i as u32).unwrap(),
            ));
            assert_eq!(idx, i);
        }
        store
    }

    #[test]
    fn test_add_appends_absent() {
        let mut store = SampleStore::new();
        assert_eq!(store.add(Point2::new(1.0, 2.0)), 0);
        assert_eq!(store.add(Point2::new(3.0, 4.0)), 1);
        assert!(store.get(1).unwrap().time.is_absent());
        assert_eq!(store.get(1).unwrap().label(), "");
    }

    #[test]
    fn test_entered_text_is_validated_on_use() {
        let mut store = SampleStore::new();
        store.add(Point2::new(0.0, 0.0));
        store
            .set_time(0, SampleTime::Entered("10:61:00".into()))
            .unwrap();
        assert_eq!(store.get(0).unwrap().reading(), None);
        assert_eq!(store.get(0).unwrap().label(), "10:61:00");

        store
            .set_time(0, SampleTime::Entered("10:01:00".into()))
            .unwrap();
        assert_eq!(store.get(0).unwrap().reading(), Some(reading("10:01:00")));
        assert_eq!(
            store.set_time(3, SampleTime::Absent),
            Err(ClockfitError::SampleNotFound(3))
        );
    }

    #[test]
    fn test_timed_positions_reports_first_incomplete() {
        let mut store = store_of(3);
        store.set_time(1, SampleTime::Absent).unwrap();
        store.set_time(2, SampleTime::Entered("x".into())).unwrap();
        assert_eq!(
            store.timed_positions(),
            Err(ClockfitError::IncompleteSamples { index: 1 })
        );
    }

    #[test]
    fn test_remove_single_keeps_others_in_order() {
        let mut store = store_of(4);
        let before = store.samples().to_vec();
        let removal = store.remove_single(1).unwrap();
        assert_eq!(removal.index, 1);
        assert_eq!(removal.removed, vec![before[1].clone()]);
        assert_eq!(
            store.samples(),
            &[before[0].clone(), before[2].clone(), before[3].clone()]
        );
    }

    #[test]
    fn test_truncate_from_drops_tail() {
        let mut store = store_of(4);
        let before = store.samples().to_vec();
        let removal = store.truncate_from(2).unwrap();
        assert_eq!(removal.removed, before[2..].to_vec());
        assert_eq!(store.samples(), &before[..2]);
        assert_eq!(
            store.truncate_from(2),
            Err(ClockfitError::SampleNotFound(2))
        );
    }

    #[test]
    fn test_remove_nearest_on_empty_store() {
        let mut store = SampleStore::new();
        assert!(store
            .remove_nearest(&Point2::new(0.0, 0.0), DeletionPolicy::TruncateFrom)
            .is_none());
    }

    #[test]
    fn test_remove_nearest_with_both_policies() {
        let mut single = store_of(4);
        let removal = single
            .remove_nearest(&Point2::new(19.0, 3.0), DeletionPolicy::RemoveSingle)
            .unwrap();
        assert_eq!(removal.index, 2);
        assert_eq!(single.len(), 3);

        let mut truncated = store_of(4);
        let removal = truncated
            .remove_nearest(&Point2::new(11.0, -1.0), DeletionPolicy::TruncateFrom)
            .unwrap();
        assert_eq!(removal.index, 1);
        assert_eq!(removal.removed.len(), 3);
        assert_eq!(truncated.len(), 1);
    }

    #[test]
    fn test_reset_clears() {
        let mut store = store_of(3);
        store.reset();
        assert!(store.is_empty());
    }
}
