//! Resolvers for the single-valued fields of an event page.
//!
//! A selector that matches nothing resolves to the field's default. Only a
//! missing enclosing block is reported, as a [`FieldError`].

use scraper::ElementRef;

use crate::config::SiteSelectors;
use crate::document::{first_within, text_of, DocumentView};
use crate::error::FieldError;
use crate::types::VenueDetails;

const EVENT_INFORMATION: &str = "event information";

fn event_information<'a>(doc: &'a DocumentView, selectors: &'a SiteSelectors) -> Result<ElementRef<'a>, FieldError> {
    doc.select_first(&selectors.event_information)
        .ok_or(FieldError::MissingContext(EVENT_INFORMATION))
}

/// Headline act: the event-information block's heading.
pub fn resolve_artist(doc: &DocumentView, selectors: &SiteSelectors) -> Result<String, FieldError> {
    let block = event_information(doc, selectors)?;
    Ok(first_within(block, &selectors.artist_heading)
        .and_then(text_of)
        .unwrap_or_default())
}

/// Support act: the event-information block's support sub-heading.
pub fn resolve_support(doc: &DocumentView, selectors: &SiteSelectors) -> Result<String, FieldError> {
    let block = event_information(doc, selectors)?;
    Ok(first_within(block, &selectors.support_heading)
        .and_then(text_of)
        .unwrap_or_default())
}

/// City, location and date from the venue-details block. An absent block
/// yields empty fields.
pub fn resolve_venue(doc: &DocumentView, selectors: &SiteSelectors) -> VenueDetails {
    let Some(block) = doc.select_first(&selectors.venue_details) else {
        return VenueDetails::default();
    };

    let heading = first_within(block, &selectors.venue_heading)
        .and_then(text_of)
        .unwrap_or_default();
    let date_time = first_within(block, &selectors.date_heading)
        .and_then(text_of)
        .unwrap_or_default();

    VenueDetails::from_heading(&heading, date_time)
}
