use reqwest::Url;
use tracing::{debug, warn};

use crate::config::SiteSelectors;
use crate::document::{attribute_of, text_of, DocumentView};
use crate::types::SummaryListing;

/// Collects the event links on one listing page.
///
/// An anchor without text or without a target is skipped; it never aborts the
/// rest of the page.
pub fn harvest(doc: &DocumentView, selectors: &SiteSelectors) -> Vec<SummaryListing> {
    let base = Url::parse(doc.url()).ok();
    let mut listings = Vec::new();

    for (index, anchor) in doc.select(&selectors.listing_link).enumerate() {
        let Some(name) = text_of(anchor) else {
            warn!(url = doc.url(), anchor = index, "listing link has no text, skipping");
            continue;
        };
        let Some(href) = attribute_of(anchor, "href") else {
            warn!(url = doc.url(), anchor = index, name = %name, "listing link has no href, skipping");
            continue;
        };

        let link = resolve_link(base.as_ref(), &href);
        debug!(name = %name, link = %link, "harvested listing");
        listings.push(SummaryListing { name, link });
    }

    listings
}

/// Absolute URL for `href`; relative targets are joined onto the page URL.
fn resolve_link(base: Option<&Url>, href: &str) -> String {
    match base.and_then(|b| b.join(href).ok()) {
        Some(url) => url.to_string(),
        None => href.to_string(),
    }
}
