use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::app::ports::PageFetcher;
use crate::config::SiteConfig;
use crate::error::{Result, ScraperError};

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let fetch_error = |reason: String| ScraperError::Fetch {
            url: url.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP status {}", status.as_u16())));
        }

        let body = resp.text().await.map_err(|e| fetch_error(e.to_string()))?;
        debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}
