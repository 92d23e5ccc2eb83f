//! Listing card extraction
//!
//! This module turns a rendered catalog page into `ListingRecord`s. Every
//! field has its own extraction function returning `Option`; the empty-string
//! defaults are applied once, in `ListingRecord::from_fields`.
//!
//! # Markup contract
//!
//! | Field | Selector |
//! |-------|----------|
//! | card | `div[data-cy='l-card']` |
//! | title | `h6`, falling back to `h4` |
//! | price | `p[data-testid='ad-price']` |
//! | link | first `a` |
//! | location/date | `p[data-testid='location-date']` |
//! | meta | `span[data-testid='ad-meta']` |
//! | area candidates | `div[color='text-global-secondary']` |
//!
//! Links are resolved against the document's `<base href>` when it has one,
//! and against the page URL otherwise.

use crate::listing::ListingRecord;
use crate::url::resolve_link;
use crate::{HarvestError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Selector for one listing card
pub const LISTING_SELECTOR: &str = "div[data-cy='l-card']";

const TITLE_PRIMARY_SELECTOR: &str = "h6";
const TITLE_FALLBACK_SELECTOR: &str = "h4";
const PRICE_SELECTOR: &str = "p[data-testid='ad-price']";
const ANCHOR_SELECTOR: &str = "a";
const LOCATION_SELECTOR: &str = "p[data-testid='location-date']";
const META_SELECTOR: &str = "span[data-testid='ad-meta']";
const SECONDARY_INFO_SELECTOR: &str = "div[color='text-global-secondary']";
const BASE_SELECTOR: &str = "base[href]";

/// Surface in square meters, e.g. "54 m²"
const AREA_PATTERN: &str = r"(?i)[0-9]+\s*m²";

/// Compiled selectors for the catalog markup
#[derive(Debug)]
pub struct ListingExtractor {
    card: Selector,
    title_primary: Selector,
    title_fallback: Selector,
    price: Selector,
    anchor: Selector,
    location: Selector,
    meta: Selector,
    secondary_info: Selector,
    base: Selector,
    area_pattern: Regex,
}

impl ListingExtractor {
    /// Compiles the selectors and the area pattern
    pub fn new() -> Result<Self> {
        Ok(Self {
            card: compile(LISTING_SELECTOR)?,
            title_primary: compile(TITLE_PRIMARY_SELECTOR)?,
            title_fallback: compile(TITLE_FALLBACK_SELECTOR)?,
            price: compile(PRICE_SELECTOR)?,
            anchor: compile(ANCHOR_SELECTOR)?,
            location: compile(LOCATION_SELECTOR)?,
            meta: compile(META_SELECTOR)?,
            secondary_info: compile(SECONDARY_INFO_SELECTOR)?,
            base: compile(BASE_SELECTOR)?,
            area_pattern: Regex::new(AREA_PATTERN)
                .map_err(|e| HarvestError::Selector(format!("{}: {}", AREA_PATTERN, e)))?,
        })
    }

    /// Counts the listing cards in a document
    pub fn count_listings(&self, document: &Html) -> usize {
        document.select(&self.card).count()
    }

    /// Extracts one record per listing card, in document order
    ///
    /// `page_url` is the URL the page was fetched from.
    /// Returns an empty vector if the page has no cards.
    pub fn extract(&self, document: &Html, page_url: &Url) -> Vec<ListingRecord> {
        let base_url = self.document_base(document, page_url);
        document
            .select(&self.card)
            .map(|card| self.record_from_card(card, &base_url))
            .collect()
    }

    /// URL that relative links in `document` resolve against
    ///
    /// The first `<base href>` wins; a relative one is itself resolved
    /// against the page URL. Falls back to the page URL.
    pub fn document_base(&self, document: &Html, page_url: &Url) -> Url {
        document
            .select(&self.base)
            .next()
            .and_then(|base| base.value().attr("href"))
            .and_then(|href| page_url.join(href.trim()).ok())
            .unwrap_or_else(|| page_url.clone())
    }

    fn record_from_card(&self, card: ElementRef<'_>, base_url: &Url) -> ListingRecord {
        let record = ListingRecord::from_fields(
            self.title(card),
            self.price(card),
            self.link(card, base_url),
            self.location(card).and_then(|location| city_from_location(&location)),
            self.area(card),
            self.meta(card),
        );
        if record.is_blank() {
            tracing::debug!("Listing card without any known field on {}", base_url);
        }
        record
    }

    /// Primary heading, or the fallback heading if the primary is missing or blank
    pub fn title(&self, card: ElementRef<'_>) -> Option<String> {
        first_text(card, &self.title_primary)
            .filter(|title| !title.is_empty())
            .or_else(|| first_text(card, &self.title_fallback))
            .filter(|title| !title.is_empty())
    }

    pub fn price(&self, card: ElementRef<'_>) -> Option<String> {
        first_text(card, &self.price)
    }

    /// Absolute URL of the first anchor in the card
    pub fn link(&self, card: ElementRef<'_>, base_url: &Url) -> Option<String> {
        let anchor = card.select(&self.anchor).next()?;
        resolve_link(anchor.value().attr("href"), base_url)
    }

    /// The combined "location - date" label
    pub fn location(&self, card: ElementRef<'_>) -> Option<String> {
        first_text(card, &self.location)
    }

    pub fn meta(&self, card: ElementRef<'_>) -> Option<String> {
        first_text(card, &self.meta)
    }

    /// First area match among the secondary info labels
    ///
    /// Labels are scanned in document order and scanning stops at the first
    /// label containing a match.
    pub fn area(&self, card: ElementRef<'_>) -> Option<String> {
        card.select(&self.secondary_info).find_map(|label| {
            self.area_pattern
                .find(&element_text(label))
                .map(|found| found.as_str().to_string())
        })
    }
}

/// Takes the city from a "City - date" label
///
/// Everything before the first hyphen, trimmed.
pub fn city_from_location(location: &str) -> Option<String> {
    location
        .split('-')
        .next()
        .map(|city| city.trim().to_string())
        .filter(|city| !city.is_empty())
}

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| HarvestError::Selector(format!("{}: {:?}", css, e)))
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(element_text)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
