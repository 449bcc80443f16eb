//! Predicate filtering that keeps the path to every match.
//!
//! [`apply_filters`] walks a [`TreeNode`] hierarchy bottom-up with an explicit
//! stack. A node survives if it satisfies every active predicate itself, or if
//! any of its children survived. The root always survives. The input is never
//! modified.

use std::fmt;

use crate::domain::{
    node::{NodeKind, TreeNode},
    record::{SensorType, Status},
};

/// A single filter criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match against the node name.
    TextMatch(String),
    /// The node is a component with an energy sensor.
    HasEnergySensor,
    /// The node has critical status.
    IsCritical,
}

impl Predicate {
    /// Whether a node satisfies this predicate on its own.
    #[must_use]
    pub fn matches(&self, node: &TreeNode) -> bool {
        match self {
            Self::TextMatch(query) => node.name.to_lowercase().contains(&query.to_lowercase()),
            Self::HasEnergySensor => node.sensor_type == Some(SensorType::Energy),
            Self::IsCritical => node.status == Some(Status::Critical),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextMatch(query) => write!(f, "name contains \"{query}\""),
            Self::HasEnergySensor => f.write_str("energy sensor"),
            Self::IsCritical => f.write_str("critical status"),
        }
    }
}

/// The set of active predicates.
///
/// At most one predicate of each category is active; the text query is
/// stored lowercased and trimmed, and an empty query counts as inactive.
/// A node matches directly only if it satisfies *all* active predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    text: Option<String>,
    energy: bool,
    critical: bool,
}

impl Filters {
    /// No active predicates.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets or clears the name query.
    #[must_use]
    pub fn with_text(mut self, query: impl AsRef<str>) -> Self {
        self.set_text(query);
        self
    }

    /// Requires an energy sensor.
    #[must_use]
    pub fn with_energy_sensor(mut self, enabled: bool) -> Self {
        self.energy = enabled;
        self
    }

    /// Requires critical status.
    #[must_use]
    pub fn with_critical(mut self, enabled: bool) -> Self {
        self.critical = enabled;
        self
    }

    /// Sets the name query. Blank queries clear it.
    pub fn set_text(&mut self, query: impl AsRef<str>) {
        let query = query.as_ref().trim();
        self.text = (!query.is_empty()).then(|| query.to_lowercase());
    }

    /// Flips the energy sensor predicate.
    pub const fn toggle_energy_sensor(&mut self) {
        self.energy = !self.energy;
    }

    /// Flips the critical status predicate.
    pub const fn toggle_critical(&mut self) {
        self.critical = !self.critical;
    }

    /// The active name query, lowercased.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether the energy sensor predicate is active.
    #[must_use]
    pub const fn energy_sensor(&self) -> bool {
        self.energy
    }

    /// Whether the critical status predicate is active.
    #[must_use]
    pub const fn critical(&self) -> bool {
        self.critical
    }

    /// Whether any predicate is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.text.is_some() || self.energy || self.critical
    }

    /// The active predicates, text first.
    #[must_use]
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(text) = &self.text {
            predicates.push(Predicate::TextMatch(text.clone()));
        }
        if self.energy {
            predicates.push(Predicate::HasEnergySensor);
        }
        if self.critical {
            predicates.push(Predicate::IsCritical);
        }
        predicates
    }

    /// Whether a node satisfies every active predicate on its own.
    ///
    /// The root never matches directly.
    #[must_use]
    pub fn matches(&self, node: &TreeNode) -> bool {
        if node.kind == NodeKind::Root || !self.is_active() {
            return false;
        }
        if let Some(text) = &self.text {
            if !node.name.to_lowercase().contains(text.as_str()) {
                return false;
            }
        }
        if self.energy && !Predicate::HasEnergySensor.matches(node) {
            return false;
        }
        if self.critical && !Predicate::IsCritical.matches(node) {
            return false;
        }
        true
    }
}

impl FromIterator<Predicate> for Filters {
    /// Collects predicates into a filter set. A later text predicate replaces
    /// an earlier one.
    fn from_iter<T: IntoIterator<Item = Predicate>>(iter: T) -> Self {
        let mut filters = Self::default();
        for predicate in iter {
            match predicate {
                Predicate::TextMatch(query) => filters.set_text(query),
                Predicate::HasEnergySensor => filters.energy = true,
                Predicate::IsCritical => filters.critical = true,
            }
        }
        filters
    }
}

/// Prunes a hierarchy down to the nodes matching `filters` and their
/// ancestors.
///
/// With no active predicates the result is an unmodified copy. The returned
/// root is always present, possibly with no children. Sibling order is
/// preserved.
#[must_use]
pub fn apply_filters(root: &TreeNode, filters: &Filters) -> TreeNode {
    if !filters.is_active() {
        return root.clone();
    }
    root.copy_retaining(|node| filters.matches(node))
}
