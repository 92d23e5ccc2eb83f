//! Phases of the crawl loop
//!
//! One pass over a catalog page goes through
//! `Fetching -> CheckingPresence -> Extracting -> Appending -> Advancing`
//! and then either back to `Fetching` or to `Stopped`.

use crate::state::CrawlState;
use std::fmt;

/// Why a crawl run ended normally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// A fetched page contained no listing cards
    EndOfCatalog,

    /// The cursor moved past the configured page limit
    SafetyCutoff,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfCatalog => "end_of_catalog",
            Self::SafetyCutoff => "safety_cutoff",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current phase of the crawl loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Loading the cursor
    Init,

    /// Requesting the page and waiting for it to settle
    Fetching,

    /// Looking for at least one listing card
    CheckingPresence,

    /// Turning listing cards into records
    Extracting,

    /// Handing the batch to the record sink
    Appending,

    /// Moving and persisting the cursor
    Advancing,

    /// The run is over
    Stopped(StopReason),
}

impl CrawlPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }

    /// Returns true if the loop may move from this phase to `next`
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        matches!(
            (*self, next),
            (Init, Fetching)
                | (Init, Stopped(StopReason::SafetyCutoff))
                | (Fetching, CheckingPresence)
                | (CheckingPresence, Extracting)
                | (CheckingPresence, Stopped(StopReason::EndOfCatalog))
                | (Extracting, Appending)
                | (Appending, Advancing)
                | (Advancing, Fetching)
                | (Advancing, Stopped(StopReason::SafetyCutoff))
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Fetching => "fetching",
            Self::CheckingPresence => "checking_presence",
            Self::Extracting => "extracting",
            Self::Appending => "appending",
            Self::Advancing => "advancing",
            Self::Stopped(_) => "stopped",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped(reason) => write!(f, "stopped ({})", reason),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Phase to enter after loading the cursor
///
/// A cursor already past the limit stops the run before anything is fetched.
pub fn start_transition(state: CrawlState, max_pages: u32) -> CrawlPhase {
    if state.exceeds(max_pages) {
        CrawlPhase::Stopped(StopReason::SafetyCutoff)
    } else {
        CrawlPhase::Fetching
    }
}

/// Phase to enter after counting the listing cards on a page
pub fn presence_transition(listing_count: usize) -> CrawlPhase {
    if listing_count == 0 {
        CrawlPhase::Stopped(StopReason::EndOfCatalog)
    } else {
        CrawlPhase::Extracting
    }
}

/// Phase to enter after the cursor has been advanced and saved
pub fn advance_transition(state: CrawlState, max_pages: u32) -> CrawlPhase {
    if state.exceeds(max_pages) {
        CrawlPhase::Stopped(StopReason::SafetyCutoff)
    } else {
        CrawlPhase::Fetching
    }
}
