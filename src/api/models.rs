//! Backend wire types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::{Sample, Status};

/// Response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Payload, or `None` when the backend reported no data.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// A monitored target as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub monitor_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub group: String,
    /// Records without an order sort after every ordered group.
    #[serde(default = "default_group_order")]
    pub group_order: i64,
    #[serde(default)]
    pub status: Status,
    /// 24h uptime as a ratio in `0..=1`.
    #[serde(default)]
    pub uptime: f64,
    #[serde(default)]
    pub response_time: i64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_group_order() -> i64 {
    UNORDERED_GROUP
}

/// Group order assumed when the backend omits `groupOrder`.
pub const UNORDERED_GROUP: i64 = 999;

/// Aggregate counters from `/api/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorStats {
    pub total_monitors: i64,
    pub up_monitors: i64,
    pub down_monitors: i64,
    pub avg_uptime: f64,
    pub avg_response_time: f64,
}

/// A heartbeat record from `/api/monitors/{id}/history`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartBeat {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub monitor_id: i64,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub response_time: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl HeartBeat {
    /// Convert to a sample. Returns `None` if the timestamp is missing or
    /// unparseable.
    pub fn to_sample(&self) -> Option<Sample> {
        let timestamp = self.created_at.as_deref().and_then(parse_time)?;
        Some(Sample::new(
            timestamp,
            self.status,
            self.response_time.max(0) as u64,
        ))
    }
}

/// History selection accepted by the backend. The two modes are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryQuery {
    /// `?limit=N`: the latest N heartbeats.
    Limit(usize),
    /// `?hours=H`: heartbeats within the last H hours.
    Hours(i64),
}

impl HistoryQuery {
    pub fn param(&self) -> (&'static str, String) {
        match self {
            HistoryQuery::Limit(n) => ("limit", n.to_string()),
            HistoryQuery::Hours(h) => ("hours", h.to_string()),
        }
    }
}

/// Parse a backend timestamp.
pub fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    None
}
