//! Response-time chart and status bar models.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::history::{
    compute_run_segments, fill_gaps, y_axis_scale, AxisScale, RunSegment, Sample, Status,
};

const SHADE_RETRYING: &str = "rgba(245, 158, 11, 0.3)";
const SHADE_DOWN: &str = "rgba(239, 68, 68, 0.3)";
const TRANSPARENT: &str = "transparent";

/// A background band over the chart's category axis, covering
/// `[start, end)` in index units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadedRegion {
    pub start: usize,
    pub end: usize,
    pub status: Status,
    pub color: &'static str,
}

impl From<&RunSegment> for ShadedRegion {
    fn from(seg: &RunSegment) -> Self {
        let color = match seg.status {
            Status::Retrying => SHADE_RETRYING,
            _ => SHADE_DOWN,
        };
        // Extend to the next tick so a single-sample outage is visible
        Self {
            start: seg.start_index,
            end: seg.end_index + 1,
            status: seg.status,
            color,
        }
    }
}

/// Everything a line-chart widget needs to draw one monitor's trend.
#[derive(Debug, Clone, Serialize)]
pub struct ChartModel {
    /// Category axis labels, `HH:MM:SS` in local time.
    pub labels: Vec<String>,
    /// Full local timestamps for tooltips.
    pub tooltip_times: Vec<String>,
    pub trend: Vec<Option<u64>>,
    /// Line color per index; outages are drawn transparent.
    pub line_colors: Vec<&'static str>,
    pub regions: Vec<ShadedRegion>,
    pub y_axis: AxisScale,
}

pub fn chart_model(slice: &[Sample]) -> ChartModel {
    ChartModel {
        labels: slice.iter().map(|s| axis_label(s.timestamp)).collect(),
        tooltip_times: slice.iter().map(|s| tooltip_time(s.timestamp)).collect(),
        trend: fill_gaps(slice),
        line_colors: slice
            .iter()
            .map(|s| if s.status.is_up() { super::COLOR_UP } else { TRANSPARENT })
            .collect(),
        regions: compute_run_segments(slice).iter().map(ShadedRegion::from).collect(),
        y_axis: y_axis_scale(slice),
    }
}

/// One cell of the status bar.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCell {
    pub class: &'static str,
    pub timestamp: DateTime<Utc>,
    pub response_time_ms: Option<u64>,
}

pub fn status_bar(slice: &[Sample]) -> Vec<StatusCell> {
    slice
        .iter()
        .map(|s| StatusCell {
            class: s.status.as_str(),
            timestamp: s.timestamp,
            response_time_ms: s.response_time(),
        })
        .collect()
}

fn axis_label(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn tooltip_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
