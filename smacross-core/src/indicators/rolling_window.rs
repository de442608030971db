//! Fixed-capacity, most-recent-first window of values.
//!
//! Index 0 is the newest value, index `len() - 1` the oldest retained one.
//! Adding to a full window evicts the oldest value. Once the window has been
//! filled it stays full for the rest of its life.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindowError {
    #[error("rolling window capacity must be >= 1")]
    ZeroCapacity,

    #[error("index {index} out of range for window holding {len} values")]
    OutOfRange { index: usize, len: usize },

    #[error("window not ready: {len}/{capacity} values")]
    NotReady { len: usize, capacity: usize },
}

#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    samples: u64,
}

impl RollingWindow {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity: capacity.get(),
            values: VecDeque::new(),
            samples: 0,
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, WindowError> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(WindowError::ZeroCapacity)
    }

    /// Push a value to the front, evicting the oldest when full.
    pub fn add(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_back();
        }
        self.values.push_front(value);
        self.samples += 1;
    }

    pub fn is_ready(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total number of values ever added, including evicted ones.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Value `age` bars ago (0 = most recent).
    pub fn value_at(&self, age: usize) -> Result<f64, WindowError> {
        self.values.get(age).copied().ok_or(WindowError::OutOfRange {
            index: age,
            len: self.values.len(),
        })
    }

    /// Mean of the `first_n` most recent values.
    pub fn mean(&self, first_n: usize) -> Result<f64, WindowError> {
        self.mean_from(0, first_n)
    }

    /// Mean of `n` values starting `offset` bars back.
    ///
    /// Partial windows are never averaged: a window that has not yet been
    /// filled reports `NotReady` regardless of how many values it holds.
    pub fn mean_from(&self, offset: usize, n: usize) -> Result<f64, WindowError> {
        if !self.is_ready() {
            return Err(WindowError::NotReady {
                len: self.values.len(),
                capacity: self.capacity,
            });
        }
        let end = offset + n;
        if n == 0 || end > self.values.len() {
            return Err(WindowError::OutOfRange {
                index: end.saturating_sub(1),
                len: self.values.len(),
            });
        }
        let sum: f64 = self.values.range(offset..end).sum();
        Ok(sum / n as f64)
    }

    /// Iterate most-recent-first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}
