//! Render-ready models built from history slices.

mod chart;
mod overview;

pub use chart::*;
pub use overview::*;

/// Trend line and healthy status color.
pub const COLOR_UP: &str = "#10b981";
/// Warning color: retrying checks, middling uptime.
pub const COLOR_WARN: &str = "#f59e0b";
/// Failure color: down checks, poor uptime.
pub const COLOR_DOWN: &str = "#ef4444";
