//! Data source trait the poller fetches through.

use async_trait::async_trait;

use crate::api::{ApiError, HistoryQuery, Monitor, MonitorStats};
use crate::history::Sample;

/// Where monitor records and heartbeat history come from.
///
/// Every method returns `Ok(None)` when the backend has no data to offer.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn monitors(&self) -> Result<Option<Vec<Monitor>>, ApiError>;

    async fn monitor(&self, id: i64) -> Result<Option<Monitor>, ApiError>;

    async fn stats(&self) -> Result<Option<MonitorStats>, ApiError>;

    async fn history(
        &self,
        id: i64,
        query: HistoryQuery,
    ) -> Result<Option<Vec<Sample>>, ApiError>;
}
