//! Resolver data source interface
//!
//! Separates the typed search operations from the HTTP client so they can
//! be exercised against canned records.

use async_trait::async_trait;

use crate::error::AppError;
use crate::search::types::SearchFilter;
use crate::services::resolver::{ResolverClient, VncInfo};

/// Anything that can hand out raw resolver records.
#[async_trait]
pub trait VncSource {
    /// Records matching `filter`, one per host.
    async fn fetch_filtered(&self, filter: &SearchFilter) -> Result<Vec<VncInfo>, AppError>;

    async fn fetch_random(&self) -> Result<VncInfo, AppError>;

    /// Name used in log lines.
    fn source_name(&self) -> &str;
}

#[async_trait]
impl VncSource for ResolverClient {
    async fn fetch_filtered(&self, filter: &SearchFilter) -> Result<Vec<VncInfo>, AppError> {
        self.search(filter).await
    }

    async fn fetch_random(&self) -> Result<VncInfo, AppError> {
        self.random().await
    }

    fn source_name(&self) -> &str {
        "VNC Resolver"
    }
}
