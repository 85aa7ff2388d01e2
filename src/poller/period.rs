//! History period selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::HistoryQuery;
use crate::history::Bound;

/// Number of samples kept for the "recent" period and on overview cards.
pub const RECENT_LIMIT: usize = 100;

/// Hour spans offered besides "recent".
pub const PERIOD_HOURS: [i64; 4] = [3, 6, 24, 168];

/// How much history a monitor view fetches and displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    /// The latest [`RECENT_LIMIT`] checks.
    #[default]
    Recent,
    /// Every check within the last N hours.
    Hours(i64),
}

impl Period {
    pub fn bound(&self) -> Bound {
        match self {
            Period::Recent => Bound::Latest(RECENT_LIMIT),
            Period::Hours(h) => Bound::hours(*h),
        }
    }

    pub fn query(&self) -> HistoryQuery {
        match self {
            Period::Recent => HistoryQuery::Limit(RECENT_LIMIT),
            Period::Hours(h) => HistoryQuery::Hours(*h),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Recent => write!(f, "recent"),
            Period::Hours(168) => write!(f, "1w"),
            Period::Hours(h) => write!(f, "{}h", h),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let period = match s {
            "recent" => Period::Recent,
            "1w" => Period::Hours(168),
            other => {
                let hours = other
                    .strip_suffix('h')
                    .and_then(|h| h.parse::<i64>().ok())
                    .ok_or_else(|| format!("unknown period: {}", s))?;
                Period::Hours(hours)
            }
        };

        match period {
            Period::Hours(h) if !PERIOD_HOURS.contains(&h) => {
                Err(format!("unsupported period: {}", s))
            }
            p => Ok(p),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}
