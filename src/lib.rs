//! Asset hierarchy explorer
//!
//! Companies own locations, locations hold assets, and assets carry sensor
//! components. The data source delivers all of these as flat records that
//! point at their parent. This crate assembles them into a [`Tree`], grows it
//! page by page as more assets arrive, and derives filtered views of it.

pub mod domain;
pub use domain::{
    AssetRecord, Company, Config, Filters, LocationRecord, MergeReport, NodeKind, Predicate,
    RecordId, SensorType, Status, Tree, TreeNode, apply_filters,
};

/// Data-access collaborators that deliver companies, locations and asset pages.
pub mod source;
pub use source::{AssetSource, JsonDirectory, SourceError};

/// The state of one company selection.
pub mod session;
pub use session::{LoadOutcome, PageRequest, Session, SessionError};
