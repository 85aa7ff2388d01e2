//! Trend series and Y-axis scale for the response-time chart.

use serde::Serialize;

use super::models::Sample;

/// Ceiling used when a slice has no successful checks.
pub const DEFAULT_AXIS_CEILING: u64 = 100;

/// Margin added when the computed ceiling is zero.
const MIN_AXIS_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisScale {
    pub min: u64,
    pub max: u64,
}

/// Response time per index, carrying the last known value through outages.
///
/// Leading outages take the first up value of the slice. Every entry is
/// `None` only when the slice has no up sample at all.
pub fn fill_gaps(slice: &[Sample]) -> Vec<Option<u64>> {
    let mut last = slice.iter().find_map(Sample::response_time);

    slice
        .iter()
        .map(|s| {
            if let Some(ms) = s.response_time() {
                last = Some(ms);
            }
            last
        })
        .collect()
}

/// Y-axis range for a slice.
///
/// The ceiling is `mean + 2 * stddev` over up samples, or their maximum when
/// the series is nearly flat (`stddev < 0.2 * mean`), plus a 10% margin.
pub fn y_axis_scale(slice: &[Sample]) -> AxisScale {
    let values: Vec<f64> = slice
        .iter()
        .filter_map(Sample::response_time)
        .map(|ms| ms as f64)
        .collect();

    if values.is_empty() {
        return AxisScale {
            min: 0,
            max: DEFAULT_AXIS_CEILING,
        };
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let ceiling = if std_dev < mean * 0.2 {
        values.iter().copied().fold(f64::MIN, f64::max)
    } else {
        mean + 2.0 * std_dev
    };

    let margin = if ceiling == 0.0 {
        MIN_AXIS_MARGIN
    } else {
        ceiling * 0.1
    };

    AxisScale {
        min: 0,
        max: (ceiling + margin).round() as u64,
    }
}
