//! Run counters.
//!
//! No recorder is installed by this crate, so these are no-ops unless the
//! embedding process installs one.

/// Counters for one crawl.
pub struct ScrapeMetrics;

impl ScrapeMetrics {
    pub fn record_page_fetched(kind: &'static str, bytes: usize) {
        ::metrics::counter!("gig_scraper_pages_fetched_total", "kind" => kind).increment(1);
        ::metrics::histogram!("gig_scraper_page_bytes", "kind" => kind).record(bytes as f64);
    }

    pub fn record_page_failed(kind: &'static str) {
        ::metrics::counter!("gig_scraper_page_failures_total", "kind" => kind).increment(1);
    }

    pub fn record_listings_harvested(count: usize) {
        ::metrics::counter!("gig_scraper_listings_total").increment(count as u64);
    }

    pub fn record_event_extracted(prices: usize) {
        ::metrics::counter!("gig_scraper_events_total").increment(1);
        ::metrics::histogram!("gig_scraper_prices_per_event").record(prices as f64);
    }

    pub fn record_event_failed() {
        ::metrics::counter!("gig_scraper_event_failures_total").increment(1);
    }
}
