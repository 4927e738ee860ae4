/// Layout constants for the default listings site.
/// Every value here can be overridden through `SiteConfig`.

// Listing pages
pub const DEFAULT_LISTINGS_URL: &str = "https://www.wegottickets.com/searchresults/page/{page}/all";
pub const PAGE_PLACEHOLDER: &str = "{page}";
pub const LISTING_LINK_SELECTOR: &str = "a.event_link";
pub const PAGINATION_SELECTOR: &str = ".pagination_links a";

// Event pages
pub const EVENT_INFORMATION_SELECTOR: &str = "div.event-information";
pub const ARTIST_HEADING_SELECTOR: &str = "h1";
pub const SUPPORT_HEADING_SELECTOR: &str = "h4.support";
pub const VENUE_DETAILS_SELECTOR: &str = "div.venue-details";
pub const VENUE_HEADING_SELECTOR: &str = "h2";
pub const DATE_HEADING_SELECTOR: &str = "h4";

// Prices
pub const PRICE_BLOCK_SELECTOR: &str = "div.BuyBox";
pub const PRICE_TOTAL_SELECTOR: &str = "strong";
pub const CONCESSION_SELECTOR: &str = "a.concession";
pub const CURRENCY_SYMBOL: &str = "£";
pub const DEFAULT_TICKET_TYPE: &str = "All";

// Transport
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("gig_scraper/", env!("CARGO_PKG_VERSION"));

// Pagination falls back to this bound until a page count has been discovered
pub const INITIAL_PAGE_BOUND: u32 = 1;
