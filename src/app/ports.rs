use async_trait::async_trait;

use crate::error::Result;

/// Fetches the raw markup of one page.
///
/// Transport failures and non-success statuses are reported as
/// `ScraperError::Fetch`; callers decide whether that abandons a page or an
/// event.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
