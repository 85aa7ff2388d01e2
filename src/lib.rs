//! statusboard - status dashboard over a monitoring backend.
//!
//! Keeps a bounded, deduplicated heartbeat window per monitor and derives
//! the summary, chart, and overview models the dashboard renders.

pub mod api;
pub mod config;
pub mod history;
pub mod poller;
pub mod prefs;
pub mod view;
pub mod web;
