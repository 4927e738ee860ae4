use scraper::Selector;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::{Result, ScraperError};

/// What to do with a pricing block whose total could not be read as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// Drop the block; it contributes no entry.
    #[default]
    Drop,
    /// Record the entry with no amount.
    KeepUnpriced,
}

/// Site layout and transport settings for one crawl.
///
/// Every field has a default targeting the built-in listings site, so a TOML
/// file only needs the keys it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Listing page URL with a `{page}` placeholder for the 1-based page number.
    pub listings_url: String,
    pub currency_symbol: String,
    pub listing_link: String,
    pub pagination: String,
    pub event_information: String,
    pub artist_heading: String,
    pub support_heading: String,
    pub venue_details: String,
    pub venue_heading: String,
    pub date_heading: String,
    pub price_block: String,
    pub price_total: String,
    pub concession: String,
    pub price_policy: PricePolicy,
    /// Read the leading number of a price and ignore trailing text such as
    /// booking-fee notes. Off by default: the whole text after the currency
    /// symbol must be a number.
    pub allow_amount_suffix: bool,
    pub request_delay_ms: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listings_url: DEFAULT_LISTINGS_URL.to_string(),
            currency_symbol: CURRENCY_SYMBOL.to_string(),
            listing_link: LISTING_LINK_SELECTOR.to_string(),
            pagination: PAGINATION_SELECTOR.to_string(),
            event_information: EVENT_INFORMATION_SELECTOR.to_string(),
            artist_heading: ARTIST_HEADING_SELECTOR.to_string(),
            support_heading: SUPPORT_HEADING_SELECTOR.to_string(),
            venue_details: VENUE_DETAILS_SELECTOR.to_string(),
            venue_heading: VENUE_HEADING_SELECTOR.to_string(),
            date_heading: DATE_HEADING_SELECTOR.to_string(),
            price_block: PRICE_BLOCK_SELECTOR.to_string(),
            price_total: PRICE_TOTAL_SELECTOR.to_string(),
            concession: CONCESSION_SELECTOR.to_string(),
            price_policy: PricePolicy::default(),
            allow_amount_suffix: false,
            request_delay_ms: 0,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: SiteConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// URL of the given 1-based listing page.
    pub fn listing_page_url(&self, page: u32) -> String {
        self.listings_url.replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    /// Validates the URL template and parses every selector once.
    pub fn compile(&self) -> Result<SiteSelectors> {
        if !self.listings_url.contains(PAGE_PLACEHOLDER) {
            return Err(ScraperError::Config(format!(
                "listings_url '{}' has no {} placeholder",
                self.listings_url, PAGE_PLACEHOLDER
            )));
        }
        if self.currency_symbol.is_empty() {
            return Err(ScraperError::Config("currency_symbol must not be empty".into()));
        }

        Ok(SiteSelectors {
            listing_link: parse_selector("listing_link", &self.listing_link)?,
            pagination: parse_selector("pagination", &self.pagination)?,
            event_information: parse_selector("event_information", &self.event_information)?,
            artist_heading: parse_selector("artist_heading", &self.artist_heading)?,
            support_heading: parse_selector("support_heading", &self.support_heading)?,
            venue_details: parse_selector("venue_details", &self.venue_details)?,
            venue_heading: parse_selector("venue_heading", &self.venue_heading)?,
            date_heading: parse_selector("date_heading", &self.date_heading)?,
            price_block: parse_selector("price_block", &self.price_block)?,
            price_total: parse_selector("price_total", &self.price_total)?,
            concession: parse_selector("concession", &self.concession)?,
        })
    }
}

/// Pre-compiled selectors for every structural query the pipeline makes.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub listing_link: Selector,
    pub pagination: Selector,
    pub event_information: Selector,
    pub artist_heading: Selector,
    pub support_heading: Selector,
    pub venue_details: Selector,
    pub venue_heading: Selector,
    pub date_heading: Selector,
    pub price_block: Selector,
    pub price_total: Selector,
    pub concession: Selector,
}

impl SiteSelectors {
    /// Selectors for the built-in site layout.
    pub fn defaults() -> Result<Self> {
        SiteConfig::default().compile()
    }
}

fn parse_selector(name: &'static str, raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| ScraperError::Selector {
        name,
        reason: format!("{raw}: {e:?}"),
    })
}
