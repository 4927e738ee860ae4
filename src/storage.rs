use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::types::{AggregateRecord, EventInfo, EventRecord, SummaryListing};

/// Accumulates the listings and events of one run, in discovery order.
#[derive(Debug, Default)]
pub struct AggregationStore {
    listings: Vec<SummaryListing>,
    events: Vec<EventInfo>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` is ignored, so upstream failures can be passed straight through.
    pub fn add_listing(&mut self, listing: Option<SummaryListing>) {
        if let Some(listing) = listing {
            debug!("Stored listing: {}", listing.name);
            self.listings.push(listing);
        }
    }

    /// `None` is ignored, so upstream failures can be passed straight through.
    pub fn add_event(&mut self, event: Option<EventInfo>) {
        if let Some(event) = event {
            debug!("Stored event: {} ({})", event.event_name, event.link);
            self.events.push(event);
        }
    }

    pub fn listings(&self) -> &[SummaryListing] {
        &self.listings
    }

    pub fn events(&self) -> &[EventInfo] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty() && self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.listings.clear();
        self.events.clear();
    }

    /// Every event stored so far, in the shape emitted to callers.
    pub fn aggregate(&self) -> AggregateRecord<'_> {
        AggregateRecord {
            events: self.events.iter().map(EventRecord::from).collect(),
        }
    }

    pub fn render(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.aggregate())?)
    }

    pub fn render_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.aggregate())?)
    }

    /// One event rendered on its own, for incremental output.
    pub fn render_event(event: &EventInfo) -> Result<String> {
        Ok(serde_json::to_string(&EventRecord::from(event))?)
    }
}
