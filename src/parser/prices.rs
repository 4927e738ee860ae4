//! Ticket price extraction.
//!
//! Every pricing block is handled on its own: a block that cannot be read
//! never affects the other prices on the same page.

use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

use crate::config::{PricePolicy, SiteSelectors};
use crate::document::{first_within, text_of, DocumentView};
use crate::error::{Result, ScraperError};
use crate::types::PriceEntry;

/// Why the amount of a pricing block could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountError {
    /// The total text has no currency symbol.
    NoCurrency,
    /// The text after the currency symbol is not a number.
    NotNumeric(String),
}

pub struct PriceParser {
    currency_symbol: String,
    /// Leading number of the amount text, when trailing text is tolerated.
    leading_number: Option<Regex>,
    policy: PricePolicy,
}

impl PriceParser {
    /// With `allow_amount_suffix` unset, everything after the currency symbol
    /// must be the number.
    pub fn new(currency_symbol: &str, policy: PricePolicy, allow_amount_suffix: bool) -> Result<Self> {
        let leading_number = if allow_amount_suffix {
            let re = Regex::new(r"^\s*([0-9][0-9,]*(?:\.[0-9]+)?)")
                .map_err(|e| ScraperError::Config(format!("price pattern: {e}")))?;
            Some(re)
        } else {
            None
        };
        Ok(Self {
            currency_symbol: currency_symbol.to_string(),
            leading_number,
            policy,
        })
    }

    /// Reads the amount following the currency symbol, e.g. `"£12.50"` -> 12.5.
    pub fn parse_amount(&self, text: &str) -> std::result::Result<f64, AmountError> {
        let start = text.find(&self.currency_symbol).ok_or(AmountError::NoCurrency)?;
        let after = text[start + self.currency_symbol.len()..].trim();

        let digits = match &self.leading_number {
            Some(re) => re
                .captures(after)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().replace(',', ""))
                .ok_or_else(|| AmountError::NotNumeric(after.to_string()))?,
            None => after.to_string(),
        };

        digits
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or(AmountError::NotNumeric(digits))
    }

    /// Every priced block on the page, in page order.
    pub fn parse_prices(&self, doc: &DocumentView, selectors: &SiteSelectors) -> Vec<PriceEntry> {
        doc.select(&selectors.price_block)
            .enumerate()
            .filter_map(|(index, block)| self.parse_block(doc.url(), index, block, selectors))
            .collect()
    }

    fn parse_block(
        &self,
        url: &str,
        index: usize,
        block: ElementRef<'_>,
        selectors: &SiteSelectors,
    ) -> Option<PriceEntry> {
        let Some(total) = first_within(block, &selectors.price_total).and_then(text_of) else {
            debug!(url, block = index, "pricing block has no total, skipping");
            return None;
        };

        let amount = match self.parse_amount(&total) {
            Ok(amount) => Some(amount),
            Err(AmountError::NoCurrency) => {
                debug!(url, block = index, total = %total, "no currency amount in pricing block");
                None
            }
            Err(AmountError::NotNumeric(raw)) => {
                warn!(url, block = index, raw = %raw, "unparseable ticket price");
                None
            }
        };

        if amount.is_none() && self.policy == PricePolicy::Drop {
            return None;
        }

        let ticket_type = first_within(block, &selectors.concession).and_then(text_of);
        Some(PriceEntry::new(ticket_type, amount))
    }
}
