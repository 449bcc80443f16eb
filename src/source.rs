use std::{io, path::PathBuf};

use crate::domain::{AssetRecord, Company, LocationRecord, RecordId};

mod directory;
pub use directory::JsonDirectory;

/// Delivers the raw records a [`Tree`](crate::Tree) is built from.
///
/// Locations are always fetched in full; assets are fetched one page at a
/// time. Implementations do not retry; a failed fetch is returned to the
/// caller unchanged.
pub trait AssetSource {
    /// Lists the companies that can be browsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the companies cannot be fetched.
    fn companies(&self) -> Result<Vec<Company>, SourceError>;

    /// Fetches every location of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the company is unknown or the locations cannot be
    /// fetched.
    fn locations(&self, company: &RecordId) -> Result<Vec<LocationRecord>, SourceError>;

    /// Fetches one page of a company's assets.
    ///
    /// Pages are numbered from zero. An empty page means there are no more.
    ///
    /// # Errors
    ///
    /// Returns an error if the company is unknown or the page cannot be
    /// fetched.
    fn assets_page(
        &self,
        company: &RecordId,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<AssetRecord>, SourceError>;
}

/// Errors raised while fetching records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A file could not be parsed.
    #[error("failed to parse {}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The requested company does not exist.
    #[error("unknown company {0}")]
    UnknownCompany(RecordId),
}
