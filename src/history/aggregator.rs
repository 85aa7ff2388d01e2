//! Bounded, time-ordered sample window for one monitor.

use chrono::{DateTime, Utc};

use super::models::{Bound, Sample};

/// Authoritative sample history for a single monitor.
///
/// Samples are kept in ascending timestamp order. The aggregator is the only
/// thing that mutates the window; everything else reads slices of it.
#[derive(Debug, Clone)]
pub struct HistoryAggregator {
    samples: Vec<Sample>,
    bound: Bound,
}

impl HistoryAggregator {
    /// Create an empty window with the given storage bound.
    pub fn new(bound: Bound) -> Self {
        Self {
            samples: Vec::new(),
            bound,
        }
    }

    /// The storage bound applied after every initialize and merge.
    pub fn bound(&self) -> Bound {
        self.bound
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Replace the window with `samples` (expected ascending) under a new bound.
    pub fn initialize(&mut self, samples: Vec<Sample>, bound: Bound) {
        self.initialize_at(samples, bound, Utc::now());
    }

    pub fn initialize_at(&mut self, samples: Vec<Sample>, bound: Bound, now: DateTime<Utc>) {
        self.samples = samples;
        self.bound = bound;
        self.truncate(now);
    }

    /// Append the part of `batch` that is newer than the window, then
    /// re-apply the storage bound.
    ///
    /// Returns the number of samples appended.
    pub fn merge(&mut self, batch: &[Sample]) -> usize {
        self.merge_at(batch, Utc::now())
    }

    /// Entries not strictly newer than the last accepted timestamp are
    /// dropped, including stale entries interleaved with newer ones.
    pub fn merge_at(&mut self, batch: &[Sample], now: DateTime<Utc>) -> usize {
        let mut last = self.samples.last().map(|s| s.timestamp);
        let mut appended = 0;

        for sample in batch {
            if last.is_some_and(|t| sample.timestamp <= t) {
                continue;
            }
            last = Some(sample.timestamp);
            self.samples.push(sample.clone());
            appended += 1;
        }

        self.truncate(now);
        appended
    }

    /// Trailing part of the window selected by `bound`.
    pub fn active_slice(&self, bound: Bound) -> &[Sample] {
        self.active_slice_at(bound, Utc::now())
    }

    pub fn active_slice_at(&self, bound: Bound, now: DateTime<Utc>) -> &[Sample] {
        let start = match bound {
            Bound::Latest(n) => self.samples.len().saturating_sub(n),
            Bound::Within(horizon) => {
                let cutoff = now - horizon;
                self.samples.partition_point(|s| s.timestamp < cutoff)
            }
        };
        &self.samples[start..]
    }

    /// Whether `active_slice(bound)` can be served without re-fetching.
    pub fn covers(&self, bound: Bound) -> bool {
        self.bound.covers(&bound)
    }

    fn truncate(&mut self, now: DateTime<Utc>) {
        match self.bound {
            Bound::Latest(n) => {
                if self.samples.len() > n {
                    let excess = self.samples.len() - n;
                    self.samples.drain(..excess);
                }
            }
            Bound::Within(horizon) => {
                let cutoff = now - horizon;
                self.samples.retain(|s| s.timestamp >= cutoff);
            }
        }
    }
}
