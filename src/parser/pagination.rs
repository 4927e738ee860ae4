use tracing::{debug, warn};

use crate::config::SiteSelectors;
use crate::document::{text_of, DocumentView};

/// Highest page number advertised by the page's pagination controls.
pub fn discover_page_count(doc: &DocumentView, selectors: &SiteSelectors) -> Option<u32> {
    let text = doc.select_last(&selectors.pagination).and_then(text_of)?;
    text.parse::<u32>().ok().filter(|&pages| pages > 0)
}

/// Number of listing pages to crawl.
///
/// An explicit override wins (zero is raised to one). Otherwise the count is
/// discovered from `doc`, falling back to `last_known` when there are no
/// pagination controls or their text is not a number.
pub fn resolve_page_count(
    doc: Option<&DocumentView>,
    selectors: &SiteSelectors,
    explicit_override: Option<u32>,
    last_known: u32,
) -> u32 {
    if let Some(pages) = explicit_override {
        return pages.max(1);
    }

    match doc.and_then(|d| discover_page_count(d, selectors)) {
        Some(pages) => {
            debug!(pages, "discovered listing page count");
            pages
        }
        None => {
            warn!(fallback = last_known, "could not discover listing page count");
            last_known
        }
    }
}
