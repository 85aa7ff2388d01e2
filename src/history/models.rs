//! Sample and window bound types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Result of a single health check.
///
/// Encoded on the wire as `1` (up), `2` (retrying) and `0` (down). Any other
/// code decodes as down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Status {
    Up,
    Retrying,
    #[default]
    Down,
}

impl Status {
    pub fn is_up(self) -> bool {
        self == Status::Up
    }

    /// Lowercase name used for CSS classes and JSON views.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Up => "up",
            Status::Retrying => "retrying",
            Status::Down => "down",
        }
    }
}

impl From<i64> for Status {
    fn from(code: i64) -> Self {
        match code {
            1 => Status::Up,
            2 => Status::Retrying,
            _ => Status::Down,
        }
    }
}

impl From<Status> for i64 {
    fn from(status: Status) -> Self {
        match status {
            Status::Up => 1,
            Status::Retrying => 2,
            Status::Down => 0,
        }
    }
}

/// One observation of a monitored target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub status: Status,
    /// Only meaningful when `status` is up.
    pub response_time_ms: u64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, status: Status, response_time_ms: u64) -> Self {
        Self {
            timestamp,
            status,
            response_time_ms,
        }
    }

    /// Response time if the check succeeded.
    pub fn response_time(&self) -> Option<u64> {
        self.status.is_up().then_some(self.response_time_ms)
    }
}

/// How much history a window keeps, or how much a view displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The latest N samples.
    Latest(usize),
    /// Samples no older than `now - duration`.
    Within(Duration),
}

impl Bound {
    pub fn hours(hours: i64) -> Self {
        Bound::Within(Duration::hours(hours))
    }

    /// Whether a window stored under `self` already holds everything a view
    /// bounded by `other` needs.
    pub fn covers(&self, other: &Bound) -> bool {
        match (self, other) {
            (Bound::Latest(stored), Bound::Latest(wanted)) => wanted <= stored,
            (Bound::Within(stored), Bound::Within(wanted)) => wanted <= stored,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::from(1), Status::Up);
        assert_eq!(Status::from(2), Status::Retrying);
        assert_eq!(Status::from(0), Status::Down);
        assert_eq!(Status::from(7), Status::Down);
        assert_eq!(i64::from(Status::Retrying), 2);
    }

    #[test]
    fn test_status_serde_uses_codes() {
        let status: Status = serde_json::from_str("2").unwrap();
        assert_eq!(status, Status::Retrying);
        assert_eq!(serde_json::to_string(&Status::Up).unwrap(), "1");
    }

    #[test]
    fn test_bound_covers() {
        assert!(Bound::Latest(100).covers(&Bound::Latest(25)));
        assert!(!Bound::Latest(50).covers(&Bound::Latest(100)));
        assert!(Bound::hours(24).covers(&Bound::hours(6)));
        assert!(!Bound::hours(3).covers(&Bound::hours(6)));
        assert!(!Bound::Latest(100).covers(&Bound::hours(1)));
        assert!(!Bound::hours(168).covers(&Bound::Latest(1)));
    }
}
