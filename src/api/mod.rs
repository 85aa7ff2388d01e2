//! Client for the status backend's REST API.

mod client;
mod models;

pub use client::*;
pub use models::*;

use thiserror::Error;

/// Backend client error types.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}
