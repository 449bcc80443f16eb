//! In-memory hierarchy of locations, assets and components.
//!
//! The [`Tree`] is assembled from flat records that each point at their
//! parent. Nodes live in an arena; an id → slot index survives across calls
//! so that records merged in a later page can hang off nodes merged earlier.
//!
//! Placement follows a fixed precedence: an explicit `parent_id` wins, then
//! `location_id` (assets only), then the synthetic root. A reference that
//! cannot be resolved, names a node of the wrong kind, or would close a cycle
//! attaches the node to the root instead. None of these are errors; they are
//! counted in the returned [`MergeReport`].

use std::collections::HashMap;

use tracing::instrument;

use crate::domain::{
    id::{ROOT_ID, RecordId},
    node::{NodeKind, TreeNode},
    record::{AssetRecord, LocationRecord, SensorType, Status},
};

/// Slot index of the synthetic root.
const ROOT: usize = 0;

/// A node stored in the arena.
#[derive(Debug, Clone)]
struct Slot {
    id: RecordId,
    name: String,
    kind: NodeKind,
    sensor_type: Option<SensorType>,
    status: Option<Status>,
    sensor_id: Option<String>,
    gateway_id: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Slot {
    fn root() -> Self {
        let root = TreeNode::root();
        Self {
            id: root.id.clone(),
            name: root.name.clone(),
            kind: NodeKind::Root,
            sensor_type: None,
            status: None,
            sensor_id: None,
            gateway_id: None,
            parent: None,
            children: Vec::new(),
        }
    }

    fn location(id: RecordId, record: LocationRecord) -> Self {
        Self {
            id,
            name: record.name,
            kind: NodeKind::Location,
            sensor_type: None,
            status: None,
            sensor_id: None,
            gateway_id: None,
            parent: None,
            children: Vec::new(),
        }
    }

    fn asset(id: RecordId, record: AssetRecord) -> Self {
        let kind = if record.is_component() {
            NodeKind::Component
        } else {
            NodeKind::Asset
        };
        Self {
            id,
            name: record.name,
            kind,
            sensor_type: record.sensor_type,
            status: record.status,
            sensor_id: record.sensor_id,
            gateway_id: record.gateway_id,
            parent: None,
            children: Vec::new(),
        }
    }

    fn to_node(&self) -> TreeNode {
        TreeNode {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            sensor_type: self.sensor_type,
            status: self.status,
            sensor_id: self.sensor_id.clone(),
            gateway_id: self.gateway_id.clone(),
            children: Vec::new(),
        }
    }
}

/// The kind of node a reference is allowed to point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Location,
    Asset,
}

impl Expect {
    const fn accepts(self, kind: NodeKind) -> bool {
        match self {
            Self::Location => matches!(kind, NodeKind::Location),
            Self::Asset => matches!(kind, NodeKind::Asset | NodeKind::Component),
        }
    }
}

/// The reference chosen for a record by the placement precedence.
#[derive(Debug, Clone)]
struct Reference {
    id: RecordId,
    expect: Expect,
}

impl Reference {
    fn for_location(record: &LocationRecord) -> Option<Self> {
        record.parent_id.clone().map(|id| Self {
            id,
            expect: Expect::Location,
        })
    }

    fn for_asset(record: &AssetRecord) -> Option<Self> {
        if let Some(id) = record.parent_id.clone() {
            Some(Self {
                id,
                expect: Expect::Asset,
            })
        } else {
            record.location_id.clone().map(|id| Self {
                id,
                expect: Expect::Location,
            })
        }
    }
}

enum Resolution {
    Found(usize),
    Missing,
    WrongKind(NodeKind),
}

/// A node inserted into the arena that still has to be linked.
struct Staged {
    slot: usize,
    reference: Option<Reference>,
}

/// What happened to the records of one call to [`Tree::insert_locations`] or
/// [`Tree::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Records added to the tree.
    pub inserted: usize,
    /// Records skipped because their id was already present.
    pub duplicates: usize,
    /// Records skipped because they had no id.
    pub missing_id: usize,
    /// Records skipped because their id is the one reserved for the root.
    pub reserved_id: usize,
    /// Records attached to the root because their reference could not be
    /// resolved.
    pub dangling: usize,
    /// Records attached to the root because their reference would have
    /// closed a cycle.
    pub cycles_broken: usize,
    /// Previously dangling nodes moved under a parent that arrived in this
    /// call.
    pub adopted: usize,
}

impl MergeReport {
    /// Records that were not added to the tree.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.duplicates + self.missing_id + self.reserved_id
    }
}

/// Number of nodes of each kind, excluding the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    /// Location nodes.
    pub locations: usize,
    /// Plain asset nodes.
    pub assets: usize,
    /// Sensor component nodes.
    pub components: usize,
}

/// The hierarchy for one company selection.
///
/// Created with the company's locations, then grown one page of assets at a
/// time with [`Tree::merge`]. Pages must be merged in order.
///
/// A record whose id is already present is ignored: the first record with a
/// given id wins, so merging the same page twice changes nothing. The id
/// `root` belongs to the synthetic root, so records carrying it are ignored
/// too.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,

    /// Slot index for every location and asset merged so far.
    index: HashMap<RecordId, usize>,

    /// Nodes parked at the root, keyed by the id of the parent they are
    /// waiting for. Only populated when orphan adoption is enabled.
    waiting: HashMap<RecordId, Vec<(usize, Expect)>>,

    adopt_orphans: bool,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree containing only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::root()],
            index: HashMap::new(),
            waiting: HashMap::new(),
            adopt_orphans: false,
        }
    }

    /// Creates a tree holding the full location hierarchy of one company.
    pub fn initialize<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = LocationRecord>,
    {
        let mut tree = Self::new();
        tree.insert_locations(locations);
        tree
    }

    /// Enables or disables orphan adoption.
    ///
    /// When enabled, a node that was attached to the root because its parent
    /// had not been merged yet is moved under that parent once it arrives.
    /// When disabled (the default) such a node stays at the root.
    #[must_use]
    pub fn adopt_orphans(mut self, enabled: bool) -> Self {
        self.adopt_orphans = enabled;
        self
    }

    /// Discards every node and the id index, leaving only the root.
    ///
    /// The orphan adoption setting is kept.
    pub fn reset(&mut self) {
        self.slots.truncate(1);
        self.slots[ROOT].children.clear();
        self.index.clear();
        self.waiting.clear();
    }

    /// Adds location records to the tree.
    ///
    /// All records are indexed before any is linked, so a location may refer
    /// to a parent that appears later in the same sequence.
    #[instrument(level = "debug", skip_all)]
    pub fn insert_locations<I>(&mut self, locations: I) -> MergeReport
    where
        I: IntoIterator<Item = LocationRecord>,
    {
        let mut report = MergeReport::default();
        let staged: Vec<Staged> = locations
            .into_iter()
            .filter_map(|record| {
                let reference = Reference::for_location(&record);
                let id = record.id.clone();
                self.stage(id, reference, &mut report, |id| {
                    Slot::location(id, record)
                })
            })
            .collect();

        self.link(staged, &mut report);
        tracing::debug!(?report, "inserted locations");
        report
    }

    /// Adds one page of asset records to the tree.
    ///
    /// Records become [`NodeKind::Component`] nodes if they carry a sensor
    /// type and [`NodeKind::Asset`] nodes otherwise. Nodes already in the tree
    /// keep their place, unless orphan adoption is enabled and their missing
    /// parent arrives in this page.
    #[instrument(level = "debug", skip_all)]
    pub fn merge<I>(&mut self, page: I) -> MergeReport
    where
        I: IntoIterator<Item = AssetRecord>,
    {
        let mut report = MergeReport::default();
        let staged: Vec<Staged> = page
            .into_iter()
            .filter_map(|record| {
                let reference = Reference::for_asset(&record);
                let id = record.id.clone();
                self.stage(id, reference, &mut report, |id| Slot::asset(id, record))
            })
            .collect();

        let new_slots: Vec<usize> = staged.iter().map(|staged| staged.slot).collect();
        self.link(staged, &mut report);

        if self.adopt_orphans {
            for slot in new_slots {
                self.adopt_waiting(slot, &mut report);
            }
        }

        tracing::debug!(?report, "merged page");
        report
    }

    fn stage(
        &mut self,
        id: Option<RecordId>,
        reference: Option<Reference>,
        report: &mut MergeReport,
        make: impl FnOnce(RecordId) -> Slot,
    ) -> Option<Staged> {
        let Some(id) = id else {
            tracing::debug!("skipping record without an id");
            report.missing_id += 1;
            return None;
        };

        if id.is_root() {
            tracing::debug!(%id, "skipping record with the reserved root id");
            report.reserved_id += 1;
            return None;
        }

        if self.index.contains_key(&id) {
            tracing::debug!(%id, "skipping duplicate record");
            report.duplicates += 1;
            return None;
        }

        let slot = self.slots.len();
        self.index.insert(id.clone(), slot);
        self.slots.push(make(id));
        report.inserted += 1;

        Some(Staged { slot, reference })
    }

    fn link(&mut self, staged: Vec<Staged>, report: &mut MergeReport) {
        for Staged { slot, reference } in staged {
            let parent = match reference {
                None => ROOT,
                Some(reference) => self.place(slot, reference, report),
            };
            self.attach(slot, parent);
        }
    }

    /// Chooses the parent slot for a staged node with a reference.
    fn place(&mut self, slot: usize, reference: Reference, report: &mut MergeReport) -> usize {
        match self.resolve(&reference) {
            Resolution::Found(parent) if self.is_ancestor_or_self(slot, parent) => {
                tracing::warn!(
                    id = %self.slots[slot].id,
                    parent = %reference.id,
                    "reference would create a cycle, attaching to root"
                );
                report.cycles_broken += 1;
                ROOT
            }
            Resolution::Found(parent) => parent,
            Resolution::WrongKind(kind) => {
                tracing::debug!(
                    id = %self.slots[slot].id,
                    parent = %reference.id,
                    %kind,
                    "reference points at the wrong kind of node, attaching to root"
                );
                report.dangling += 1;
                ROOT
            }
            Resolution::Missing => {
                tracing::debug!(
                    id = %self.slots[slot].id,
                    parent = %reference.id,
                    "unknown reference, attaching to root"
                );
                report.dangling += 1;
                if self.adopt_orphans {
                    self.waiting
                        .entry(reference.id)
                        .or_default()
                        .push((slot, reference.expect));
                }
                ROOT
            }
        }
    }

    fn resolve(&self, reference: &Reference) -> Resolution {
        match self.index.get(&reference.id) {
            None => Resolution::Missing,
            Some(&slot) => {
                let kind = self.slots[slot].kind;
                if reference.expect.accepts(kind) {
                    Resolution::Found(slot)
                } else {
                    Resolution::WrongKind(kind)
                }
            }
        }
    }

    /// Moves nodes waiting for `parent`'s id underneath it.
    fn adopt_waiting(&mut self, parent: usize, report: &mut MergeReport) {
        let Some(orphans) = self.waiting.remove(&self.slots[parent].id) else {
            return;
        };

        for (orphan, expect) in orphans {
            if !expect.accepts(self.slots[parent].kind) {
                continue;
            }
            if self.is_ancestor_or_self(orphan, parent) {
                report.cycles_broken += 1;
                continue;
            }
            tracing::debug!(
                id = %self.slots[orphan].id,
                parent = %self.slots[parent].id,
                "adopting orphan"
            );
            self.detach(orphan);
            self.attach(orphan, parent);
            report.adopted += 1;
        }
    }

    /// Whether `node` lies on the path from `start` up to the root.
    fn is_ancestor_or_self(&self, node: usize, start: usize) -> bool {
        let mut current = Some(start);
        while let Some(slot) = current {
            if slot == node {
                return true;
            }
            current = self.slots[slot].parent;
        }
        false
    }

    fn attach(&mut self, child: usize, parent: usize) {
        self.slots[child].parent = Some(parent);
        self.slots[parent].children.push(child);
    }

    fn detach(&mut self, child: usize) {
        if let Some(parent) = self.slots[child].parent.take() {
            self.slots[parent].children.retain(|&slot| slot != child);
        }
    }

    /// Number of nodes, excluding the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    /// Whether the tree holds nothing but the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a record with the given id has been merged.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// The kind of the node with the given id.
    #[must_use]
    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.index.get(id).map(|&slot| self.slots[slot].kind)
    }

    /// Id of the parent of the node with the given id.
    ///
    /// Nodes at the top level return the root id.
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<&RecordId> {
        let slot = *self.index.get(id)?;
        self.slots[slot]
            .parent
            .map(|parent| &self.slots[parent].id)
    }

    /// Ids of the children of the node with the given id, in insertion order.
    ///
    /// Pass the root id to list the top level.
    #[must_use]
    pub fn children_of(&self, id: &str) -> Vec<&RecordId> {
        let slot = if id == ROOT_ID {
            Some(ROOT)
        } else {
            self.index.get(id).copied()
        };
        slot.map_or_else(Vec::new, |slot| {
            self.slots[slot]
                .children
                .iter()
                .map(|&child| &self.slots[child].id)
                .collect()
        })
    }

    /// Ids of every ancestor of the node with the given id, nearest first,
    /// ending with the root.
    #[must_use]
    pub fn ancestors(&self, id: &str) -> Vec<&RecordId> {
        let mut ancestors = Vec::new();
        let Some(&slot) = self.index.get(id) else {
            return ancestors;
        };
        let mut current = self.slots[slot].parent;
        while let Some(slot) = current {
            ancestors.push(&self.slots[slot].id);
            current = self.slots[slot].parent;
        }
        ancestors
    }

    /// Number of nodes of each kind.
    #[must_use]
    pub fn counts(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        for slot in &self.slots {
            match slot.kind {
                NodeKind::Root => {}
                NodeKind::Location => counts.locations += 1,
                NodeKind::Asset => counts.assets += 1,
                NodeKind::Component => counts.components += 1,
            }
        }
        counts
    }

    /// An owned copy of the whole hierarchy, starting at the root.
    #[must_use]
    pub fn snapshot(&self) -> TreeNode {
        // Post-order with an explicit stack: each entry is a node together
        // with the slots of its children that have not been copied yet.
        let root = &self.slots[ROOT];
        let mut stack = vec![(root.to_node(), root.children.iter())];
        while let Some((_, pending)) = stack.last_mut() {
            if let Some(&child) = pending.next() {
                let slot = &self.slots[child];
                stack.push((slot.to_node(), slot.children.iter()));
            } else if let Some((node, _)) = stack.pop() {
                match stack.last_mut() {
                    Some((parent, _)) => parent.children.push(node),
                    None => return node,
                }
            }
        }
        root.to_node()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn id(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    fn location(i: &str, name: &str) -> LocationRecord {
        LocationRecord::new(id(i), name)
    }

    fn asset(i: &str, name: &str) -> AssetRecord {
        AssetRecord::new(id(i), name)
    }

    /// Every (child, parent) pair in the tree.
    fn edges(tree: &Tree) -> BTreeSet<(String, String)> {
        tree.index
            .keys()
            .map(|child| {
                let parent = tree.parent_of(child).unwrap();
                (child.to_string(), parent.to_string())
            })
            .collect()
    }

    fn plant() -> Tree {
        Tree::initialize([location("1", "Plant A")])
    }

    #[test]
    fn new_tree_is_root_only() {
        let tree = Tree::new();
        assert!(tree.is_empty());

        let root = tree.snapshot();
        assert_eq!(root.kind, NodeKind::Root);
        assert_eq!(root.id.as_str(), "root");
        assert!(root.is_leaf());
    }

    #[test]
    fn builds_location_asset_component_chain() {
        let mut tree = plant();
        let report = tree.merge([
            asset("10", "Motor").with_location(id("1")),
            asset("11", "Vibration Sensor")
                .with_parent(id("10"))
                .with_sensor(SensorType::Energy)
                .with_status(Status::Critical),
        ]);
        assert_eq!(report.inserted, 2);

        let root = tree.snapshot();
        let plant = &root.children[0];
        assert_eq!(plant.name, "Plant A");
        assert_eq!(plant.kind, NodeKind::Location);

        let motor = &plant.children[0];
        assert_eq!(motor.name, "Motor");
        assert_eq!(motor.kind, NodeKind::Asset);

        let sensor = &motor.children[0];
        assert_eq!(sensor.name, "Vibration Sensor");
        assert_eq!(sensor.kind, NodeKind::Component);
        assert_eq!(sensor.status, Some(Status::Critical));
        assert!(sensor.is_leaf());
    }

    #[test]
    fn locations_nest_regardless_of_order() {
        let tree = Tree::initialize([
            location("c", "Child").with_parent(id("p")),
            location("p", "Parent"),
            location("g", "Grandchild").with_parent(id("c")),
        ]);

        assert_eq!(tree.parent_of("c").unwrap().as_str(), "p");
        assert_eq!(tree.parent_of("p").unwrap().as_str(), "root");
        let ancestors: Vec<_> = tree.ancestors("g").iter().map(|a| a.as_str()).collect();
        assert_eq!(ancestors, ["c", "p", "root"]);
    }

    #[test]
    fn parent_id_wins_over_location_id() {
        let mut tree = Tree::initialize([location("1", "A"), location("2", "B")]);
        tree.merge([
            asset("10", "Motor").with_location(id("1")),
            asset("11", "Pump").with_parent(id("10")).with_location(id("2")),
        ]);
        assert_eq!(tree.parent_of("11").unwrap().as_str(), "10");
    }

    #[test]
    fn records_without_references_attach_to_root() {
        let mut tree = plant();
        tree.merge([asset("10", "Loose").with_sensor(SensorType::Vibration)]);

        assert_eq!(tree.parent_of("10").unwrap().as_str(), "root");
        assert_eq!(tree.kind_of("10"), Some(NodeKind::Component));
    }

    #[test]
    fn unknown_references_attach_to_root() {
        let mut tree = plant();
        let report = tree.merge([
            asset("10", "Ghost parent").with_parent(id("404")),
            asset("11", "Ghost location").with_location(id("405")),
        ]);

        assert_eq!(report.dangling, 2);
        assert_eq!(tree.parent_of("10").unwrap().as_str(), "root");
        assert_eq!(tree.parent_of("11").unwrap().as_str(), "root");
    }

    #[test]
    fn references_of_the_wrong_kind_attach_to_root() {
        let mut tree = plant();
        let report = tree.merge([
            asset("10", "Motor"),
            // parent_id must name an asset, location_id must name a location
            asset("11", "A").with_parent(id("1")),
            asset("12", "B").with_location(id("10")),
        ]);

        assert_eq!(report.dangling, 2);
        assert_eq!(tree.parent_of("11").unwrap().as_str(), "root");
        assert_eq!(tree.parent_of("12").unwrap().as_str(), "root");
    }

    #[test]
    fn records_without_id_are_skipped() {
        let mut tree = plant();
        let nameless = AssetRecord {
            name: "No id".to_string(),
            ..AssetRecord::default()
        };
        let report = tree.merge([nameless, asset("10", "Motor")]);

        assert_eq!(report.missing_id, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn merging_the_same_page_twice_is_a_no_op() {
        let page = vec![
            asset("10", "Motor").with_location(id("1")),
            asset("11", "Sensor")
                .with_parent(id("10"))
                .with_sensor(SensorType::Energy),
        ];

        let mut once = plant();
        once.merge(page.clone());

        let mut twice = plant();
        twice.merge(page.clone());
        let report = twice.merge(page);

        assert_eq!(report.inserted, 0);
        assert_eq!(report.duplicates, 2);
        assert_eq!(once.snapshot(), twice.snapshot());
    }

    #[test]
    fn first_record_with_an_id_wins() {
        let mut tree = plant();
        tree.merge([asset("10", "Original"), asset("10", "Impostor")]);

        assert_eq!(tree.snapshot().find("10").unwrap().name, "Original");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn page_order_does_not_change_shape() {
        let page = vec![
            asset("10", "Motor").with_location(id("1")),
            asset("11", "Gearbox").with_parent(id("10")),
            asset("12", "Sensor")
                .with_parent(id("11"))
                .with_sensor(SensorType::Energy),
            asset("13", "Fan"),
        ];

        let mut forward = plant();
        forward.merge(page.clone());

        let mut reversed = plant();
        reversed.merge(page.into_iter().rev());

        assert_eq!(edges(&forward), edges(&reversed));
    }

    #[test]
    fn components_nest_under_assets_from_earlier_pages() {
        let mut tree = plant();
        tree.merge([asset("10", "Motor").with_location(id("1"))]);
        tree.merge([asset("11", "Sensor")
            .with_parent(id("10"))
            .with_sensor(SensorType::Energy)]);

        let ancestors: Vec<_> = tree.ancestors("11").iter().map(|a| a.as_str()).collect();
        assert_eq!(ancestors, ["10", "1", "root"]);
    }

    #[test]
    fn parents_from_later_pages_are_not_adopted_by_default() {
        let mut tree = plant();
        let first = tree.merge([asset("11", "Sensor")
            .with_parent(id("10"))
            .with_sensor(SensorType::Energy)]);
        assert_eq!(first.dangling, 1);

        let second = tree.merge([asset("10", "Motor").with_location(id("1"))]);
        assert_eq!(second.adopted, 0);
        assert_eq!(tree.parent_of("11").unwrap().as_str(), "root");
    }

    #[test]
    fn parents_from_later_pages_adopt_orphans_when_enabled() {
        let mut tree = plant().adopt_orphans(true);
        tree.merge([asset("11", "Sensor")
            .with_parent(id("10"))
            .with_sensor(SensorType::Energy)]);
        let report = tree.merge([asset("10", "Motor").with_location(id("1"))]);

        assert_eq!(report.adopted, 1);
        assert_eq!(tree.parent_of("11").unwrap().as_str(), "10");
        assert_eq!(tree.children_of("root").len(), 1);
    }

    #[test]
    fn cycles_are_broken_at_the_root() {
        let mut tree = Tree::new();
        let report = tree.merge([
            asset("a", "A").with_parent(id("b")),
            asset("b", "B").with_parent(id("a")),
        ]);

        assert_eq!(report.cycles_broken, 1);
        assert_eq!(tree.parent_of("a").unwrap().as_str(), "b");
        assert_eq!(tree.parent_of("b").unwrap().as_str(), "root");
        assert_eq!(tree.snapshot().size(), 3);
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let tree = Tree::initialize([location("1", "Loop").with_parent(id("1"))]);
        assert_eq!(tree.parent_of("1").unwrap().as_str(), "root");
    }

    #[test]
    fn ancestor_chains_terminate_at_root() {
        let locations: Vec<_> = (0..50)
            .map(|i| {
                let record = location(&i.to_string(), "L");
                if i == 0 {
                    record
                } else {
                    record.with_parent(id(&(i - 1).to_string()))
                }
            })
            .collect();
        let tree = Tree::initialize(locations);

        for i in 0..50 {
            let ancestors = tree.ancestors(&i.to_string());
            assert_eq!(ancestors.len(), i + 1);
            assert_eq!(ancestors.last().unwrap().as_str(), "root");
        }
    }

    #[test]
    fn reset_clears_nodes_and_index() {
        let mut tree = plant();
        tree.merge([asset("10", "Motor").with_location(id("1"))]);
        tree.reset();

        assert!(tree.is_empty());
        assert!(!tree.contains("10"));
        assert!(tree.snapshot().is_leaf());

        // ids from before the reset can be reused
        tree.merge([asset("10", "Motor")]);
        assert_eq!(tree.parent_of("10").unwrap().as_str(), "root");
    }

    #[test]
    fn counts_by_kind() {
        let mut tree = plant();
        tree.merge([
            asset("10", "Motor").with_location(id("1")),
            asset("11", "Sensor")
                .with_parent(id("10"))
                .with_sensor(SensorType::Energy),
        ]);

        assert_eq!(
            tree.counts(),
            KindCounts {
                locations: 1,
                assets: 1,
                components: 1,
            }
        );
    }

    #[test]
    fn siblings_keep_insertion_order() {
        let mut tree = plant();
        tree.merge([
            asset("12", "C").with_location(id("1")),
            asset("10", "A").with_location(id("1")),
        ]);
        tree.merge([asset("11", "B").with_location(id("1"))]);

        let children: Vec<_> = tree.children_of("1").iter().map(|c| c.as_str()).collect();
        assert_eq!(children, ["12", "10", "11"]);
    }

    #[test]
    fn record_with_the_root_id_is_skipped() {
        let mut tree = Tree::new();
        let report = tree.insert_locations([location("root", "Impostor")]);
        assert_eq!(report.reserved_id, 1);
        assert_eq!(report.skipped(), 1);
        assert!(tree.is_empty());

        let report = tree.merge([asset("x", "Motor").with_location(id("root"))]);
        assert_eq!(report.dangling, 1);
        assert_eq!(tree.children_of("root"), [&id("x")]);

        let root = tree.snapshot();
        assert_eq!(root.find("root").unwrap().kind, NodeKind::Root);
        assert_eq!(root.iter().filter(|node| node.id.is_root()).count(), 1);
    }

    #[test]
    fn adoption_that_would_close_a_cycle_is_refused() {
        let mut tree = Tree::new().adopt_orphans(true);
        tree.merge([asset("a", "A").with_parent(id("b"))]);
        let report = tree.merge([asset("b", "B").with_parent(id("a"))]);

        assert_eq!(report.adopted, 0);
        assert_eq!(report.cycles_broken, 1);
        assert_eq!(tree.parent_of("a").unwrap().as_str(), "root");
        assert_eq!(tree.parent_of("b").unwrap().as_str(), "a");
    }

    #[test]
    fn adoption_requires_the_expected_kind() {
        let mut tree = plant().adopt_orphans(true);
        // waits for a location named "20", but "20" arrives as an asset
        tree.merge([asset("11", "Sensor").with_location(id("20"))]);
        let report = tree.merge([asset("20", "Motor").with_location(id("1"))]);

        assert_eq!(report.adopted, 0);
        assert_eq!(tree.parent_of("11").unwrap().as_str(), "root");
    }

    #[test]
    fn deep_chains_snapshot_and_filter_without_recursion() {
        const DEPTH: usize = 10_000;
        let locations: Vec<_> = (0..DEPTH)
            .map(|i| {
                let record = location(&i.to_string(), &format!("Level {i}"));
                if i == 0 {
                    record
                } else {
                    record.with_parent(id(&(i - 1).to_string()))
                }
            })
            .collect();
        let tree = Tree::initialize(locations);

        let root = tree.snapshot();
        assert_eq!(root.size(), DEPTH + 1);

        let copy = root.clone();
        assert_eq!(copy.size(), DEPTH + 1);

        let none = crate::domain::apply_filters(
            &root,
            &crate::domain::Filters::none().with_text("zzz"),
        );
        assert!(none.is_leaf());

        let deepest = crate::domain::apply_filters(
            &root,
            &crate::domain::Filters::none().with_text(format!("Level {}", DEPTH - 1)),
        );
        assert_eq!(deepest.size(), DEPTH + 1);
        assert!(deepest.find(&(DEPTH - 1).to_string()).is_some());
    }
}
