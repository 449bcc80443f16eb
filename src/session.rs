//! The caller-side state of one company selection.
//!
//! A [`Session`] owns the [`Tree`] for the selected company and drives the
//! page-by-page growth of it. Fetching a page is split into
//! [`Session::begin_page`] and [`Session::complete_page`] so that a front-end
//! can run the fetch elsewhere. Two rules are enforced here rather than in the
//! tree:
//!
//! - only one page may be in flight at a time; further requests are refused
//!   until it completes, and
//! - a page that completes after the company selection changed is discarded
//!   without touching the new tree.

use tracing::instrument;

use crate::{
    domain::{
        AssetRecord, Config, Filters, MergeReport, RecordId, Tree, TreeNode, apply_filters,
    },
    source::{AssetSource, SourceError},
};

/// Errors raised by a [`Session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Assets were requested before a company was selected.
    #[error("no company selected")]
    NoCompanySelected,

    /// The data source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A ticket for one page fetch.
///
/// Obtained from [`Session::begin_page`] and handed back to
/// [`Session::complete_page`] together with the fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    company: RecordId,
    page: usize,
    page_size: usize,
    generation: u64,
}

impl PageRequest {
    /// The company to fetch assets for.
    #[must_use]
    pub const fn company(&self) -> &RecordId {
        &self.company
    }

    /// Zero-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Number of records per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}

/// What a completed page fetch did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was merged into the tree.
    Merged {
        /// Zero-based number of the merged page.
        page: usize,
        /// What happened to the page's records.
        report: MergeReport,
    },
    /// The source has no more pages.
    Exhausted,
    /// A page is already in flight; the request was ignored.
    Busy,
    /// The page belonged to an earlier company selection and was discarded.
    Stale,
}

/// State for browsing one company at a time.
#[derive(Debug)]
pub struct Session {
    config: Config,
    company: Option<RecordId>,
    tree: Tree,
    filters: Filters,
    next_page: usize,
    exhausted: bool,
    in_flight: bool,

    /// Bumped on every change of company selection. Page requests carry the
    /// generation they were issued in.
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    /// Creates a session with no company selected.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let tree = Tree::new().adopt_orphans(config.adopt_orphans);
        Self {
            config,
            company: None,
            tree,
            filters: Filters::none(),
            next_page: 0,
            exhausted: false,
            in_flight: false,
            generation: 0,
        }
    }

    /// Selects a company and builds its location hierarchy.
    ///
    /// Any previous tree is discarded, and any page still in flight for the
    /// previous company becomes stale. Filters are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the locations cannot be fetched. The session is
    /// left with no company selected.
    #[instrument(level = "debug", skip(self, source))]
    pub fn select_company<S>(
        &mut self,
        source: &S,
        company: RecordId,
    ) -> Result<MergeReport, SessionError>
    where
        S: AssetSource + ?Sized,
    {
        self.clear();
        let locations = source.locations(&company)?;
        let report = self.tree.insert_locations(locations);
        tracing::info!(%company, locations = report.inserted, "selected company");
        self.company = Some(company);
        Ok(report)
    }

    /// Discards the current selection and its tree.
    pub fn back_to_companies(&mut self) {
        self.clear();
        self.filters = Filters::none();
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.company = None;
        self.tree.reset();
        self.next_page = 0;
        self.exhausted = false;
        self.in_flight = false;
    }

    /// Starts fetching the next page.
    ///
    /// Returns `None` if no company is selected, a page is already in flight,
    /// or the source has run out of pages.
    pub fn begin_page(&mut self) -> Option<PageRequest> {
        if self.in_flight || self.exhausted {
            return None;
        }
        let company = self.company.clone()?;
        self.in_flight = true;
        Some(PageRequest {
            company,
            page: self.next_page,
            page_size: self.config.page_size().get(),
            generation: self.generation,
        })
    }

    /// Finishes a page fetch started with [`Session::begin_page`].
    ///
    /// An empty page marks the end of the source.
    ///
    /// # Errors
    ///
    /// Returns the fetch error unchanged. The page is not marked as loaded,
    /// so the next request retries it.
    pub fn complete_page(
        &mut self,
        request: PageRequest,
        result: Result<Vec<AssetRecord>, SourceError>,
    ) -> Result<LoadOutcome, SessionError> {
        if request.generation != self.generation {
            tracing::debug!(
                company = %request.company,
                page = request.page,
                "discarding page for a previous selection"
            );
            return Ok(LoadOutcome::Stale);
        }
        self.in_flight = false;

        let records = result?;
        if records.is_empty() {
            tracing::debug!(page = request.page, "no more pages");
            self.exhausted = true;
            return Ok(LoadOutcome::Exhausted);
        }

        let report = self.tree.merge(records);
        self.next_page = request.page + 1;
        tracing::info!(
            page = request.page,
            inserted = report.inserted,
            skipped = report.skipped(),
            "merged page"
        );
        Ok(LoadOutcome::Merged {
            page: request.page,
            report,
        })
    }

    /// Fetches and merges the next page.
    ///
    /// Returns [`LoadOutcome::Busy`] if a page is already in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if no company is selected or the fetch fails.
    pub fn load_more<S>(&mut self, source: &S) -> Result<LoadOutcome, SessionError>
    where
        S: AssetSource + ?Sized,
    {
        if self.company.is_none() {
            return Err(SessionError::NoCompanySelected);
        }
        let Some(request) = self.begin_page() else {
            return Ok(if self.exhausted {
                LoadOutcome::Exhausted
            } else {
                LoadOutcome::Busy
            });
        };
        let result = source.assets_page(request.company(), request.page(), request.page_size());
        self.complete_page(request, result)
    }

    /// Fetches and merges pages until the source runs out.
    ///
    /// Returns the number of pages merged.
    ///
    /// # Errors
    ///
    /// Returns an error if no company is selected or a fetch fails. Pages
    /// merged before the failure are kept.
    pub fn load_all<S>(&mut self, source: &S) -> Result<usize, SessionError>
    where
        S: AssetSource + ?Sized,
    {
        let mut pages = 0;
        while let LoadOutcome::Merged { .. } = self.load_more(source)? {
            pages += 1;
        }
        Ok(pages)
    }

    /// The selected company.
    #[must_use]
    pub const fn company(&self) -> Option<&RecordId> {
        self.company.as_ref()
    }

    /// The full, unfiltered tree.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The active filters.
    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Mutable access to the active filters.
    pub const fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }

    /// Replaces the active filters.
    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    /// Number of pages merged for the current selection.
    #[must_use]
    pub const fn pages_loaded(&self) -> usize {
        self.next_page
    }

    /// Whether the source has run out of pages.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether a page fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// The tree as it should be displayed: filtered, rooted at the synthetic
    /// root.
    #[must_use]
    pub fn visible(&self) -> TreeNode {
        apply_filters(&self.tree.snapshot(), &self.filters)
    }
}
