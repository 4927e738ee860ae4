pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod types;

// Fetching boundary: the port the pipeline depends on, and its HTTP adapter
pub mod app;
pub mod infra;

pub use app::ports::PageFetcher;
pub use config::{PricePolicy, SiteConfig, SiteSelectors};
pub use document::DocumentView;
pub use error::{FieldError, Result, ScraperError};
pub use infra::http_client::ReqwestFetcher;
pub use pipeline::{RunOptions, RunSummary, Scraper, ScraperState};
pub use storage::AggregationStore;
pub use types::{EventInfo, PriceEntry, SummaryListing, VenueDetails};
