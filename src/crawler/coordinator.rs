//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. Each catalog page goes through
//! fetch → presence check → extract → append → advance, and the loop stops at
//! the first page without listings or once the cursor passes the page limit.
//!
//! The cursor is saved only after a page's records have been appended, so a
//! run that dies mid-page retries that same page next time.

use crate::config::{CatalogConfig, Config};
use crate::crawler::extractor::ListingExtractor;
use crate::crawler::fetcher::{HttpPageFetcher, PageFetcher, RenderedPage};
use crate::output::{CsvSink, RecordSink, RunSummary};
use crate::state::{
    advance_transition, presence_transition, start_transition, CrawlPhase, CrawlState,
    JsonStateStore, StateStore, StopReason,
};
use crate::url::page_url;
use crate::{HarvestError, ListingRecord, Result};

/// Main crawler coordinator structure
pub struct Coordinator<F, S, T>
where
    F: PageFetcher,
    S: RecordSink,
    T: StateStore,
{
    catalog: CatalogConfig,
    fetcher: F,
    sink: S,
    store: T,
    extractor: ListingExtractor,
    phase: CrawlPhase,
}

impl<F, S, T> Coordinator<F, S, T>
where
    F: PageFetcher,
    S: RecordSink,
    T: StateStore,
{
    /// Creates a new coordinator instance
    ///
    /// The coordinator takes ownership of the fetcher and releases it when
    /// `run` returns.
    pub fn new(catalog: CatalogConfig, fetcher: F, sink: S, store: T) -> Result<Self> {
        Ok(Self {
            catalog,
            fetcher,
            sink,
            store,
            extractor: ListingExtractor::new()?,
            phase: CrawlPhase::Init,
        })
    }

    /// Current phase of the crawl loop
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Runs the crawl loop until it stops or fails
    ///
    /// The page fetcher is released on every exit path. If the loop failed,
    /// that error is returned even when releasing the fetcher fails too.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let outcome = self.drive(&mut summary).await;
        let released = self.fetcher.close().await;

        match (outcome, released) {
            (Ok(()), Ok(())) => Ok(summary),
            (Err(e), Ok(())) => Err(e),
            (Ok(()), Err(e)) => Err(e),
            (Err(e), Err(close_err)) => {
                tracing::warn!("Failed to release page fetcher: {}", close_err);
                Err(e)
            }
        }
    }

    async fn drive(&mut self, summary: &mut RunSummary) -> Result<()> {
        self.phase = CrawlPhase::Init;

        let mut state = self.store.load()?;
        *summary = RunSummary::starting_at(state);
        tracing::info!("Starting from page {}", state.page());

        let mut next = start_transition(state, self.catalog.max_pages);

        while next == CrawlPhase::Fetching {
            self.transition(CrawlPhase::Fetching)?;
            let page = self.fetch_page(state).await?;

            self.transition(CrawlPhase::CheckingPresence)?;
            let batch = match self.listings_on(&page)? {
                Some(batch) => batch,
                None => {
                    next = CrawlPhase::Stopped(StopReason::EndOfCatalog);
                    break;
                }
            };

            self.transition(CrawlPhase::Appending)?;
            let count = batch.len();
            tracing::info!("Found {} listings on page {}", count, state.page());
            self.sink.append(batch)?;

            self.transition(CrawlPhase::Advancing)?;
            state = state.advance();
            self.store.save(state)?;
            summary.record_page(count, state);

            next = advance_transition(state, self.catalog.max_pages);
        }

        self.transition(next)?;
        if let CrawlPhase::Stopped(reason) = next {
            log_stop(reason, state, self.catalog.max_pages);
            summary.finish(reason);
        }

        Ok(())
    }

    /// Fetches the page the cursor points at and waits for it to settle
    async fn fetch_page(&mut self, state: CrawlState) -> Result<RenderedPage> {
        let url = page_url(&self.catalog.url_template, state.page())?;
        tracing::info!("Navigating to {}", url);

        let page = self.fetcher.fetch(&url).await?;
        self.fetcher.settle().await?;

        tracing::debug!(
            "Fetched {} ({} bytes, HTTP {})",
            page.url,
            page.html.len(),
            page.status_code
        );
        Ok(page)
    }

    /// Checks the page for listing cards and extracts them
    ///
    /// Returns None, without running the extractor, when the page has no
    /// cards.
    fn listings_on(&mut self, page: &RenderedPage) -> Result<Option<Vec<ListingRecord>>> {
        let document = page.document();

        let presence = presence_transition(self.extractor.count_listings(&document));
        if presence.is_terminal() {
            return Ok(None);
        }

        self.transition(presence)?;
        Ok(Some(self.extractor.extract(&document, &page.url)))
    }

    /// Moves the loop to `next`, rejecting transitions the loop does not allow
    fn transition(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::trace!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

fn log_stop(reason: StopReason, state: CrawlState, max_pages: u32) {
    match reason {
        StopReason::EndOfCatalog => {
            tracing::info!("No more listings on page {}, stopping", state.page())
        }
        StopReason::SafetyCutoff => {
            tracing::info!("Reached the page limit ({}), stopping", max_pages)
        }
    }
}

/// Runs a crawl with the production fetcher, dataset and cursor file
///
/// # Example
///
/// ```no_run
/// use listing_harvester::config::Config;
/// use listing_harvester::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(&Config::default()).await?;
/// println!("Saved {} listings", summary.records_appended);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<RunSummary> {
    let fetcher = HttpPageFetcher::new(config)?;
    let sink = CsvSink::new(&config.output.dataset_path);
    let store = JsonStateStore::new(&config.output.state_path);

    let mut coordinator = Coordinator::new(config.catalog.clone(), fetcher, sink, store)?;
    coordinator.run().await
}
