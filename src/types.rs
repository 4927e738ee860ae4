use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TICKET_TYPE;

/// An event as it appears on a listing page: its display name and a link to
/// its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryListing {
    pub name: String,
    pub link: String,
}

/// Where and when an event takes place. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDetails {
    pub city: String,
    pub location: String,
    pub date_time: String,
}

impl VenueDetails {
    /// Splits a combined "CITY: Location" heading on its first colon.
    pub fn from_heading(text: &str, date_time: String) -> Self {
        let (city, location) = match text.split_once(':') {
            Some((city, location)) => (city.to_string(), location.to_string()),
            None => (text.to_string(), String::new()),
        };
        Self { city, location, date_time }
    }
}

/// One ticket price from an event page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub ticket_type: String,
    /// Always rendered with exactly two fraction digits.
    pub amount: Option<String>,
}

impl PriceEntry {
    pub fn new(ticket_type: Option<String>, amount: Option<f64>) -> Self {
        Self {
            ticket_type: ticket_type.unwrap_or_else(|| DEFAULT_TICKET_TYPE.to_string()),
            amount: amount.map(|a| format!("{a:.2}")),
        }
    }
}

/// Full details of one event page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub event_name: String,
    pub link: String,
    pub artist: String,
    pub support: String,
    pub city: String,
    pub venue: String,
    pub gig_date: String,
    pub prices: Vec<PriceEntry>,
    // Not scraped yet; kept so the record shape is stable.
    pub description: String,
    pub website: String,
}

/// The artists block of a rendered event.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistsRecord<'a> {
    pub main: &'a str,
    pub support: &'a str,
}

/// The externally emitted shape of one event.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord<'a> {
    pub artists: ArtistsRecord<'a>,
    pub city: &'a str,
    pub venue: &'a str,
    pub gig_date: &'a str,
    pub prices: &'a [PriceEntry],
    pub link: &'a str,
}

impl<'a> From<&'a EventInfo> for EventRecord<'a> {
    fn from(event: &'a EventInfo) -> Self {
        Self {
            artists: ArtistsRecord {
                main: &event.artist,
                support: &event.support,
            },
            city: &event.city,
            venue: &event.venue,
            gig_date: &event.gig_date,
            prices: &event.prices,
            link: &event.link,
        }
    }
}

/// The aggregate result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateRecord<'a> {
    pub events: Vec<EventRecord<'a>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_split_on_first_colon() {
        let venue = VenueDetails::from_heading("GOUDHURST: Parish Church", "SUN 11TH DEC".into());
        assert_eq!(venue.city, "GOUDHURST");
        assert_eq!(venue.location, " Parish Church");
        assert_eq!(venue.date_time, "SUN 11TH DEC");

        let venue = VenueDetails::from_heading("LONDON: The Borderline: Upstairs", String::new());
        assert_eq!(venue.city, "LONDON");
        assert_eq!(venue.location, " The Borderline: Upstairs");
    }

    #[test]
    fn test_venue_without_colon() {
        let venue = VenueDetails::from_heading("Online Event", String::new());
        assert_eq!(venue.city, "Online Event");
        assert_eq!(venue.location, "");
    }

    #[test]
    fn test_price_entry_defaults() {
        let entry = PriceEntry::new(None, Some(7.5));
        assert_eq!(entry.ticket_type, "All");
        assert_eq!(entry.amount.as_deref(), Some("7.50"));

        let entry = PriceEntry::new(Some("Student".into()), None);
        assert_eq!(entry.ticket_type, "Student");
        assert!(entry.amount.is_none());
    }
}
