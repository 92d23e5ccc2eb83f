//! Listing record definition
//!
//! One `ListingRecord` is produced per listing card found on a catalog page.

/// A single scraped catalog entry
///
/// Fields that could not be found on the card are empty strings (or `None`
/// for `area`); a card never fails to produce a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    /// Card heading, empty if the card has none
    pub title: String,

    /// Price exactly as displayed, currency and formatting included
    pub price: String,

    /// Absolute URL of the listing detail page, empty if missing
    pub link: String,

    /// Locality taken from the "location - date" label
    pub city: String,

    /// Surface such as "54 m²", if any secondary label carries one
    pub area: Option<String>,

    /// Secondary tags (negotiable, urgent, ...); not written to the dataset
    pub meta: String,
}

impl ListingRecord {
    /// Builds a record from the optional per-field extraction results
    ///
    /// Missing fields become empty strings. `area` stays optional.
    pub fn from_fields(
        title: Option<String>,
        price: Option<String>,
        link: Option<String>,
        city: Option<String>,
        area: Option<String>,
        meta: Option<String>,
    ) -> Self {
        Self {
            title: title.unwrap_or_default(),
            price: price.unwrap_or_default(),
            link: link.unwrap_or_default(),
            city: city.unwrap_or_default(),
            area,
            meta: meta.unwrap_or_default(),
        }
    }

    /// Returns true if no field at all could be derived from the card
    pub fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.price.is_empty()
            && self.link.is_empty()
            && self.city.is_empty()
            && self.area.is_none()
            && self.meta.is_empty()
    }
}
