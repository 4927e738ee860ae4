use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::app::ports::PageFetcher;
use crate::config::{SiteConfig, SiteSelectors};
use crate::constants::INITIAL_PAGE_BOUND;
use crate::document::DocumentView;
use crate::error::{FieldError, Result, ScraperError};
use crate::metrics::ScrapeMetrics;
use crate::parser::{harvest, resolve_artist, resolve_page_count, resolve_support, resolve_venue, PriceParser};
use crate::storage::AggregationStore;
use crate::types::{EventInfo, SummaryListing};

/// Caller-resolved parameters for one crawl.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Crawl exactly this many listing pages instead of discovering the count.
    pub page_override: Option<u32>,
    /// Hand every extracted event to the caller as soon as it is stored.
    pub verbose: bool,
}

/// Counts of what a crawl did, including what it had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub listing_pages: u32,
    pub listing_pages_failed: u32,
    pub listings: usize,
    pub events_extracted: usize,
    pub events_failed: usize,
}

/// Mutable state of one run.
#[derive(Debug)]
pub struct ScraperState {
    pub store: AggregationStore,
    /// Listing page count, kept as the fallback when discovery fails.
    pub page_bound: u32,
}

impl Default for ScraperState {
    fn default() -> Self {
        Self {
            store: AggregationStore::new(),
            page_bound: INITIAL_PAGE_BOUND,
        }
    }
}

/// Crawls listing pages, then visits every harvested event page in order.
///
/// Pages are fetched one at a time. No failure below configuration level
/// stops a run: failed pages and events are logged and skipped.
pub struct Scraper {
    config: SiteConfig,
    selectors: SiteSelectors,
    prices: PriceParser,
    fetcher: Arc<dyn PageFetcher>,
    state: ScraperState,
}

impl Scraper {
    pub fn new(config: SiteConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let selectors = config.compile()?;
        let prices = PriceParser::new(&config.currency_symbol, config.price_policy, config.allow_amount_suffix)?;
        Ok(Self {
            config,
            selectors,
            prices,
            fetcher,
            state: ScraperState::default(),
        })
    }

    pub fn state(&self) -> &ScraperState {
        &self.state
    }

    pub fn store(&self) -> &AggregationStore {
        &self.state.store
    }

    /// Forgets everything from previous runs.
    pub fn reset(&mut self) {
        self.state = ScraperState::default();
    }

    /// Full crawl: listing pages, then event pages.
    ///
    /// Listings and events of earlier runs are discarded first; only the page
    /// bound is carried over as the discovery fallback. `on_event` is called
    /// once per stored event when `options.verbose` is set.
    #[instrument(skip(self, on_event), fields(listings_url = %self.config.listings_url))]
    pub async fn run<F>(&mut self, options: &RunOptions, mut on_event: F) -> RunSummary
    where
        F: FnMut(&EventInfo),
    {
        let mut summary = RunSummary::default();
        self.state.store.clear();
        info!("Starting crawl");

        self.crawl_listings(options.page_override, &mut summary).await;
        self.extract_all(&mut summary, |event| {
            if options.verbose {
                on_event(event);
            }
        })
        .await;

        info!(
            pages = summary.listing_pages,
            pages_failed = summary.listing_pages_failed,
            listings = summary.listings,
            events = summary.events_extracted,
            events_failed = summary.events_failed,
            "Crawl finished"
        );
        summary
    }

    /// Harvests every listing page into the store.
    ///
    /// The first page is fetched once and used both to discover the page
    /// count and for its own listings.
    pub async fn crawl_listings(&mut self, page_override: Option<u32>, summary: &mut RunSummary) {
        let first = self.fetch_page(&self.config.listing_page_url(1), "listing").await;

        let page_count = resolve_page_count(
            first.as_ref(),
            &self.selectors,
            page_override,
            self.state.page_bound,
        );
        self.state.page_bound = page_count;
        info!(page_count, "Crawling listing pages");

        summary.listing_pages += 1;
        self.harvest_page(first, summary);

        for page in 2..=page_count {
            self.pause().await;
            let doc = self.fetch_page(&self.config.listing_page_url(page), "listing").await;
            summary.listing_pages += 1;
            self.harvest_page(doc, summary);
        }
    }

    fn harvest_page(&mut self, doc: Option<DocumentView>, summary: &mut RunSummary) {
        let Some(doc) = doc else {
            summary.listing_pages_failed += 1;
            return;
        };

        let listings = harvest(&doc, &self.selectors);
        debug!(url = doc.url(), count = listings.len(), "harvested listing page");
        ScrapeMetrics::record_listings_harvested(listings.len());
        summary.listings += listings.len();
        for listing in listings {
            self.state.store.add_listing(Some(listing));
        }
    }

    /// Visits every stored listing in discovery order.
    pub async fn extract_all<F>(&mut self, summary: &mut RunSummary, mut on_event: F)
    where
        F: FnMut(&EventInfo),
    {
        let listings: Vec<SummaryListing> = self.state.store.listings().to_vec();

        for (index, listing) in listings.iter().enumerate() {
            if index > 0 {
                self.pause().await;
            }

            let event = match self.extract(&listing.link, &listing.name).await {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(link = %listing.link, error = %e, "Skipping event");
                    ScrapeMetrics::record_event_failed();
                    summary.events_failed += 1;
                    None
                }
            };

            if let Some(event) = &event {
                summary.events_extracted += 1;
                on_event(event);
            }
            self.state.store.add_event(event);
        }
    }

    /// Fetches one event page and extracts its details.
    ///
    /// An empty `fallback_name` makes the headline act the event name.
    #[instrument(skip(self))]
    pub async fn extract(&self, link: &str, fallback_name: &str) -> Result<EventInfo> {
        let body = self.fetcher.fetch(link).await?;
        ScrapeMetrics::record_page_fetched("event", body.len());
        let doc = DocumentView::parse(link, &body);
        self.extract_from_document(&doc, fallback_name)
    }

    /// Extracts one event from an already fetched page.
    ///
    /// A page without an event-information block is not an event page and is
    /// rejected. Every other missing field falls back to its default.
    pub fn extract_from_document(&self, doc: &DocumentView, fallback_name: &str) -> Result<EventInfo> {
        let url = doc.url();

        let missing_section = |e: FieldError| match e {
            FieldError::MissingContext(section) => ScraperError::MissingSection {
                url: url.to_string(),
                section,
            },
        };
        let artist = resolve_artist(doc, &self.selectors).map_err(missing_section)?;
        let support = resolve_support(doc, &self.selectors).map_err(missing_section)?;

        let venue = resolve_venue(doc, &self.selectors);
        let prices = self.prices.parse_prices(doc, &self.selectors);
        ScrapeMetrics::record_event_extracted(prices.len());

        let event_name = if fallback_name.is_empty() {
            artist.clone()
        } else {
            fallback_name.to_string()
        };

        Ok(EventInfo {
            event_name,
            link: url.to_string(),
            artist,
            support,
            city: venue.city,
            venue: venue.location,
            gig_date: venue.date_time,
            prices,
            description: String::new(),
            website: String::new(),
        })
    }

    /// Extracts a single event page outside a crawl and stores it.
    pub async fn extract_single(&mut self, link: &str) -> Option<EventInfo> {
        match self.extract(link, "").await {
            Ok(event) => {
                self.state.store.add_event(Some(event.clone()));
                Some(event)
            }
            Err(e) => {
                warn!(link, error = %e, "Event page could not be extracted");
                ScrapeMetrics::record_event_failed();
                None
            }
        }
    }

    /// Fetches and parses a page. A failure is logged and yields `None`.
    async fn fetch_page(&self, url: &str, kind: &'static str) -> Option<DocumentView> {
        match self.fetcher.fetch(url).await {
            Ok(body) => {
                ScrapeMetrics::record_page_fetched(kind, body.len());
                Some(DocumentView::parse(url, &body))
            }
            Err(e) => {
                warn!(url, kind, error = %e, "Page fetch failed");
                ScrapeMetrics::record_page_failed(kind);
                None
            }
        }
    }

    async fn pause(&self) {
        if self.config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages; any other URL fails like a network error.
    struct FakeFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages.iter().map(|(u, b)| (u.to_string(), b.to_string())).collect(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| ScraperError::Fetch {
                url: url.to_string(),
                reason: "HTTP status 404".to_string(),
            })
        }
    }

    fn config() -> SiteConfig {
        SiteConfig {
            listings_url: "http://gigs.test/list/{page}".to_string(),
            ..SiteConfig::default()
        }
    }

    fn scraper(fetcher: Arc<FakeFetcher>) -> Scraper {
        Scraper::new(config(), fetcher).unwrap()
    }

    const EVENT: &str = r#"
        <div class="event-information"><h1>Headliner</h1><h4 class="support">Opener</h4></div>
        <div class="venue-details"><h2>BRISTOL: Thekla</h2><h4>SAT 1ST APR, 2017 7:00pm</h4></div>
        <div class="BuyBox"><strong>£9.00</strong></div>
    "#;

    #[tokio::test]
    async fn test_uses_artist_when_no_name_supplied() {
        let fetcher = Arc::new(FakeFetcher::new(&[("http://gigs.test/event/1", EVENT)]));
        let scraper = scraper(fetcher);

        let event = scraper.extract("http://gigs.test/event/1", "").await.unwrap();
        assert_eq!(event.event_name, "Headliner");
        assert_eq!(event.support, "Opener");
        assert_eq!(event.city, "BRISTOL");
        assert_eq!(event.venue, " Thekla");
        assert_eq!(event.prices.len(), 1);

        let named = scraper.extract("http://gigs.test/event/1", "Listing Name").await.unwrap();
        assert_eq!(named.event_name, "Listing Name");
        assert_eq!(named.artist, "Headliner");
    }

    #[tokio::test]
    async fn test_page_without_event_block_is_rejected() {
        let fetcher = Arc::new(FakeFetcher::new(&[("http://gigs.test/event/2", "<p>Page moved</p>")]));
        let scraper = scraper(fetcher);

        let err = scraper.extract("http://gigs.test/event/2", "x").await.unwrap_err();
        assert!(matches!(err, ScraperError::MissingSection { section: "event information", .. }));
    }

    #[tokio::test]
    async fn test_listing_fetch_failure_falls_back_to_stored_bound() {
        let fetcher = Arc::new(FakeFetcher::new(&[]));
        let mut scraper = scraper(fetcher.clone());
        let mut summary = RunSummary::default();

        scraper.crawl_listings(None, &mut summary).await;

        assert_eq!(scraper.state().page_bound, INITIAL_PAGE_BOUND);
        assert_eq!(summary.listing_pages, 1);
        assert_eq!(summary.listing_pages_failed, 1);
        assert!(scraper.store().listings().is_empty());
        assert_eq!(fetcher.requests.lock().unwrap().as_slice(), ["http://gigs.test/list/1"]);
    }

    #[tokio::test]
    async fn test_failed_listing_page_contributes_nothing() {
        let page1 = r#"
            <a class="event_link" href="http://gigs.test/event/1">One</a>
            <div class="pagination_links"><a>1</a><a>2</a><a>3</a></div>
        "#;
        let page3 = r#"<a class="event_link" href="http://gigs.test/event/3">Three</a>"#;
        let fetcher = Arc::new(FakeFetcher::new(&[
            ("http://gigs.test/list/1", page1),
            ("http://gigs.test/list/3", page3),
        ]));
        let mut scraper = scraper(fetcher);
        let mut summary = RunSummary::default();

        scraper.crawl_listings(None, &mut summary).await;

        assert_eq!(scraper.state().page_bound, 3);
        assert_eq!(summary.listing_pages, 3);
        assert_eq!(summary.listing_pages_failed, 1);
        let names: Vec<_> = scraper.store().listings().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["One", "Three"]);
    }

    #[tokio::test]
    async fn test_verbose_run_emits_each_event_and_reset_clears_state() {
        let page1 = r#"
            <a class="event_link" href="http://gigs.test/event/1">One</a>
            <a class="event_link" href="http://gigs.test/event/missing">Gone</a>
        "#;
        let fetcher = Arc::new(FakeFetcher::new(&[
            ("http://gigs.test/list/1", page1),
            ("http://gigs.test/event/1", EVENT),
        ]));
        let mut scraper = scraper(fetcher);

        let mut emitted = Vec::new();
        let options = RunOptions { page_override: Some(1), verbose: true };
        let summary = scraper.run(&options, |e| emitted.push(e.link.clone())).await;

        assert_eq!(emitted, ["http://gigs.test/event/1"]);
        assert_eq!(summary.events_extracted, 1);
        assert_eq!(summary.events_failed, 1);
        assert_eq!(scraper.store().events().len(), 1);

        scraper.reset();
        assert!(scraper.store().is_empty());
        assert_eq!(scraper.state().page_bound, INITIAL_PAGE_BOUND);
    }

    #[tokio::test]
    async fn test_quiet_run_does_not_emit() {
        let page1 = r#"<a class="event_link" href="http://gigs.test/event/1">One</a>"#;
        let fetcher = Arc::new(FakeFetcher::new(&[
            ("http://gigs.test/list/1", page1),
            ("http://gigs.test/event/1", EVENT),
        ]));
        let mut scraper = scraper(fetcher);

        let mut calls = 0;
        scraper.run(&RunOptions::default(), |_| calls += 1).await;
        assert_eq!(calls, 0);
        assert_eq!(scraper.store().events().len(), 1);
    }

    #[tokio::test]
    async fn test_second_run_starts_from_empty_store() {
        let page1 = r#"
            <a class="event_link" href="http://gigs.test/event/1">One</a>
            <div class="pagination_links"><a>1</a><a>2</a></div>
        "#;
        let fetcher = Arc::new(FakeFetcher::new(&[
            ("http://gigs.test/list/1", page1),
            ("http://gigs.test/event/1", EVENT),
        ]));
        let mut scraper = scraper(fetcher.clone());

        let first = scraper.run(&RunOptions::default(), |_| {}).await;
        assert_eq!(first.events_extracted, 1);
        assert_eq!(scraper.state().page_bound, 2);

        let second = scraper.run(&RunOptions::default(), |_| {}).await;
        assert_eq!(second.listings, 1);
        assert_eq!(second.events_extracted, 1);
        assert_eq!(second.events_failed, 0);
        assert_eq!(scraper.store().listings().len(), 1);
        assert_eq!(scraper.store().events().len(), 1);
        // Page bound survives between runs
        assert_eq!(scraper.state().page_bound, 2);

        let event_fetches = fetcher
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == "http://gigs.test/event/1")
            .count();
        assert_eq!(event_fetches, 2);
    }

    #[tokio::test]
    async fn test_missing_support_heading_keeps_other_fields() {
        let page = r#"
            <div class="event-information"><h1>Solo</h1></div>
            <div class="venue-details"><h2>YORK: The Crescent</h2></div>
        "#;
        let fetcher = Arc::new(FakeFetcher::new(&[("http://gigs.test/event/5", page)]));
        let scraper = scraper(fetcher);

        let event = scraper.extract("http://gigs.test/event/5", "").await.unwrap();
        assert_eq!(event.artist, "Solo");
        assert_eq!(event.support, "");
        assert_eq!(event.city, "YORK");
    }

    #[tokio::test]
    async fn test_extract_single_stores_event() {
        let fetcher = Arc::new(FakeFetcher::new(&[("http://gigs.test/event/1", EVENT)]));
        let mut scraper = scraper(fetcher);

        assert!(scraper.extract_single("http://gigs.test/event/1").await.is_some());
        assert!(scraper.extract_single("http://gigs.test/event/404").await.is_none());
        assert_eq!(scraper.store().events().len(), 1);
    }
}
