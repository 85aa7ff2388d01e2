//! Overview page: grouped monitor cards and the status banner.

use serde::Serialize;

use super::chart::{status_bar, StatusCell};
use super::{COLOR_DOWN, COLOR_UP, COLOR_WARN};
use crate::api::{Monitor, MonitorStats};
use crate::history::{compute_summary, Bound, SummaryStats};
use crate::poller::MonitorBoard;

/// Sample counts an overview card can display.
pub const CARD_SIZES: [usize; 3] = [25, 50, 100];

/// Group name for monitors without one.
const UNGROUPED: &str = "other";

/// Color for an uptime ratio: green from 99%, orange from 95%, red below.
pub fn uptime_color(ratio: f64) -> &'static str {
    if ratio >= 0.99 {
        COLOR_UP
    } else if ratio >= 0.95 {
        COLOR_WARN
    } else {
        COLOR_DOWN
    }
}

/// `0.98765` -> `"98.77%"`
pub fn format_uptime(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    Success,
    Warning,
    Error,
}

/// Page banner level from the backend's down count.
pub fn banner(stats: Option<&MonitorStats>) -> Banner {
    match stats.map(|s| s.down_monitors) {
        None | Some(0) => Banner::Success,
        Some(n) if n > 3 => Banner::Error,
        Some(_) => Banner::Warning,
    }
}

#[derive(Debug, Clone)]
pub struct MonitorGroup<'a> {
    pub name: String,
    pub order: i64,
    pub monitors: Vec<&'a Monitor>,
}

/// Filter monitors by a case-insensitive search over name and group, then
/// group them. Groups keep the backend order of their first member.
pub fn group_monitors<'a>(monitors: &'a [Monitor], query: &str) -> Vec<MonitorGroup<'a>> {
    let query = query.trim().to_lowercase();
    let mut groups: Vec<MonitorGroup<'a>> = Vec::new();

    for monitor in monitors {
        if !query.is_empty()
            && !monitor.name.to_lowercase().contains(&query)
            && !monitor.group.to_lowercase().contains(&query)
        {
            continue;
        }

        let name = if monitor.group.is_empty() {
            UNGROUPED
        } else {
            monitor.group.as_str()
        };

        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.monitors.push(monitor),
            None => groups.push(MonitorGroup {
                name: name.to_string(),
                order: monitor.group_order,
                monitors: vec![monitor],
            }),
        }
    }

    groups.sort_by_key(|g| g.order);
    groups
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewCard {
    pub monitor: Monitor,
    pub uptime: String,
    pub uptime_color: &'static str,
    pub summary: SummaryStats,
    pub status_bar: Vec<StatusCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewGroup {
    pub name: String,
    pub cards: Vec<OverviewCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub banner: Banner,
    pub stats: Option<MonitorStats>,
    pub groups: Vec<OverviewGroup>,
    pub paused: bool,
    pub last_update: Option<chrono::DateTime<chrono::Utc>>,
    pub error: Option<String>,
}

/// Build the overview from the board. Each card shows the latest `last`
/// samples of its stored window.
pub fn build_overview(board: &MonitorBoard, last: usize, query: &str, paused: bool) -> Overview {
    let groups = group_monitors(&board.monitors, query)
        .into_iter()
        .map(|group| OverviewGroup {
            name: group.name,
            cards: group
                .monitors
                .into_iter()
                .map(|monitor| {
                    let slice = board
                        .history(monitor.id)
                        .map(|h| h.history.active_slice(Bound::Latest(last)))
                        .unwrap_or(&[]);
                    OverviewCard {
                        monitor: monitor.clone(),
                        uptime: format_uptime(monitor.uptime),
                        uptime_color: uptime_color(monitor.uptime),
                        summary: compute_summary(slice),
                        status_bar: status_bar(slice),
                    }
                })
                .collect(),
        })
        .collect();

    Overview {
        banner: banner(board.stats.as_ref()),
        stats: board.stats.clone(),
        groups,
        paused,
        last_update: board.last_update,
        error: board.last_error.clone(),
    }
}
