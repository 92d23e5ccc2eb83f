use serde::Serialize;
use std::fmt;

/// The persisted crawl cursor: the next catalog page to fetch
///
/// The page index is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CrawlState {
    page: u32,
}

impl CrawlState {
    /// The cursor of a crawl that has never run
    pub const fn initial() -> Self {
        Self { page: 1 }
    }

    /// Creates a cursor pointing at `page`, or None for page 0
    pub fn at_page(page: u32) -> Option<Self> {
        (page >= 1).then_some(Self { page })
    }

    /// The next page index to fetch
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the cursor for the following page
    pub fn advance(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
        }
    }

    /// Returns true once the cursor has moved past the last allowed page
    pub fn exceeds(&self, max_pages: u32) -> bool {
        self.page > max_pages
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}", self.page)
    }
}
