//! Domain models for the asset hierarchy.
//!
//! This module contains the flat records delivered by a data source, the tree
//! they are assembled into, the filters applied to it, and configuration.

/// Record identifiers.
pub mod id;
pub use id::{EmptyIdError, RecordId};

/// Flat location and asset records.
pub mod record;
pub use record::{AssetRecord, Company, LocationRecord, SensorType, Status};

mod node;
pub use node::{NodeKind, TreeNode};

/// Tree assembly from flat records.
pub mod tree;
pub use tree::{KindCounts, MergeReport, Tree};

/// Predicate filtering with ancestor preservation.
pub mod filter;
pub use filter::{Filters, Predicate, apply_filters};

mod config;
pub use config::Config;
