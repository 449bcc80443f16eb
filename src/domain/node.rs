use std::fmt;

use serde::Serialize;

use crate::domain::{
    id::RecordId,
    record::{SensorType, Status},
};

/// What a [`TreeNode`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The synthetic entry point of the hierarchy.
    Root,
    /// A physical site or area.
    Location,
    /// A piece of equipment.
    Asset,
    /// A sensor attached to equipment.
    Component,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Root => "root",
            Self::Location => "location",
            Self::Asset => "asset",
            Self::Component => "component",
        };
        f.write_str(label)
    }
}

/// An owned node of the hierarchy, together with all of its descendants.
///
/// This is the shape handed to renderers: it carries no information about
/// how the tree was assembled.
///
/// Copying and dropping walk the subtree with an explicit stack, so arbitrarily
/// deep hierarchies are safe to handle.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Identifier of the source record, or `root`.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// What this node represents.
    pub kind: NodeKind,
    /// Sensor type of a component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<SensorType>,
    /// Operational status of an asset or component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Hardware identifier of a component's sensor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,
    /// Gateway a component's sensor reports through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
    /// Children in insertion order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// An empty root node.
    #[must_use]
    pub fn root() -> Self {
        Self {
            id: RecordId::root(),
            name: "Root".to_string(),
            kind: NodeKind::Root,
            sensor_type: None,
            status: None,
            sensor_id: None,
            gateway_id: None,
            children: Vec::new(),
        }
    }

    /// A copy of this node without its children.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
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

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first, pre-order iterator over this subtree.
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Finds a node in this subtree by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Self> {
        self.iter().find(|node| node.id.as_str() == id)
    }

    /// Copies this subtree, keeping every node that `keep` accepts together
    /// with its ancestors. This node is always returned.
    ///
    /// Sibling order is preserved.
    pub(crate) fn copy_retaining(&self, keep: impl Fn(&Self) -> bool) -> Self {
        let mut stack = vec![Frame::new(self)];
        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.pending.next() {
                stack.push(Frame::new(child));
            } else if let Some(done) = stack.pop() {
                let keep_this = !done.kept.is_empty() || keep(done.source);
                match stack.last_mut() {
                    Some(parent) => {
                        if keep_this {
                            parent.kept.push(done.finish());
                        }
                    }
                    None => return done.finish(),
                }
            }
        }
        self.detached()
    }
}

/// A node whose children are still being copied.
struct Frame<'a> {
    source: &'a TreeNode,
    pending: std::slice::Iter<'a, TreeNode>,
    kept: Vec<TreeNode>,
}

impl<'a> Frame<'a> {
    fn new(source: &'a TreeNode) -> Self {
        Self {
            source,
            pending: source.children.iter(),
            kept: Vec::new(),
        }
    }

    fn finish(self) -> TreeNode {
        let mut node = self.source.detached();
        node.children = self.kept;
        node
    }
}

impl Clone for TreeNode {
    fn clone(&self) -> Self {
        self.copy_retaining(|_| true)
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
