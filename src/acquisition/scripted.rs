//! Deterministic [`TimestampSource`] implementations.
//!
//! They stand in for a capture/OCR backend so the estimation logic can be driven
//! without any screen: [`FixedSource`] always answers the same text, while
//! [`ScriptedSource`] replays a queue of answers and records every region it was
//! asked to read.
use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use crate::{acquisition::CaptureRegion, clockfit_errors::ClockfitError};

use super::TimestampSource;

/// Answers every capture with the same raw text.
#[derive(Debug, Clone)]
pub struct FixedSource {
    text: String,
}

impl FixedSource {
    pub fn new(text: impl Into<String>) -> Self {
        FixedSource { text: text.into() }
    }
}

impl TimestampSource for FixedSource {
    fn capture_text(&self, _region: &CaptureRegion) -> Result<String, ClockfitError> {
        Ok(self.text.clone())
    }
}

/// Replays a queue of capture outcomes, one per call.
///
/// Once the queue is empty every further call fails with
/// [`ClockfitError::AcquisitionFailure`].
#[derive(Debug, Default)]
pub struct ScriptedSource {
    answers: Mutex<VecDeque<Result<String, ClockfitError>>>,
    requested: Mutex<Vec<CaptureRegion>>,
}

impl ScriptedSource {
    pub fn new(answers: Vec<Result<String, ClockfitError>>) -> Self {
        ScriptedSource {
            answers: Mutex::new(answers.into()),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Script made only of successful reads.
    pub fn from_texts<I, T>(texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ScriptedSource::new(texts.into_iter().map(|t| Ok(t.into())).collect())
    }

    /// Queue one more outcome at the end of the script.
    pub fn push(&self, answer: Result<String, ClockfitError>) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    /// Push a successful read.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push(Ok(text.into()));
    }

    /// Number of outcomes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every region read so far, in call order.
    pub fn requested_regions(&self) -> Vec<CaptureRegion> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TimestampSource for ScriptedSource {
    fn capture_text(&self, region: &CaptureRegion) -> Result<String, ClockfitError> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*region);

        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(ClockfitError::AcquisitionFailure(
                    "scripted source exhausted".into(),
                ))
            })
    }
}
