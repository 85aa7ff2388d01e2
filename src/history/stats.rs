//! Summary statistics over a window slice.

use serde::Serialize;

use super::models::{Sample, Status};

/// Most recent check of a slice: its response time when up, else its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CurrentResponse {
    Millis(u64),
    Status(Status),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total: usize,
    pub online_count: usize,
    /// `online_count / total`, or 0 for an empty slice.
    pub uptime_ratio: f64,
    /// Mean response time over up samples only.
    pub avg_response_ms: f64,
    /// Max response time over up samples only.
    pub max_response_ms: u64,
    /// `None` for an empty slice.
    pub current_response: Option<CurrentResponse>,
}

impl SummaryStats {
    pub fn offline_count(&self) -> usize {
        self.total - self.online_count
    }
}

/// Compute summary statistics for a slice.
pub fn compute_summary(slice: &[Sample]) -> SummaryStats {
    let total = slice.len();

    let mut online_count = 0usize;
    let mut sum = 0u64;
    let mut max = 0u64;
    for ms in slice.iter().filter_map(Sample::response_time) {
        online_count += 1;
        sum += ms;
        max = max.max(ms);
    }

    let uptime_ratio = if total > 0 {
        online_count as f64 / total as f64
    } else {
        0.0
    };
    let avg_response_ms = if online_count > 0 {
        sum as f64 / online_count as f64
    } else {
        0.0
    };

    let current_response = slice.last().map(|s| match s.status {
        Status::Up => CurrentResponse::Millis(s.response_time_ms),
        other => CurrentResponse::Status(other),
    });

    SummaryStats {
        total,
        online_count,
        uptime_ratio,
        avg_response_ms,
        max_response_ms: max,
        current_response,
    }
}
