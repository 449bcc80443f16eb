//! Text rendering of a [`TreeNode`] hierarchy.

use std::{borrow::Cow, rc::Rc};

use asset_tree::{NodeKind, SensorType, Status, TreeNode};

use super::terminal::{Colorize, terminal_width};

/// Space reserved after the name for the kind tag and status marker.
const DECORATION_WIDTH: usize = 24;

/// Names are never truncated below this many characters.
const MIN_NAME_WIDTH: usize = 12;

/// A node together with the connector drawn in front of it.
#[derive(Debug)]
pub struct Line<'a> {
    pub prefix: String,
    pub node: &'a TreeNode,
}

/// Flattens the hierarchy below `root` into drawable lines, depth first.
///
/// The root itself is not drawn.
pub fn layout(root: &TreeNode) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    // Each entry is a node still to be drawn, the prefix of its parent's
    // column and whether it is the last of its siblings.
    let mut stack: Vec<(&TreeNode, Rc<str>, bool)> = Vec::new();
    push_children(&mut stack, root, &Rc::from(""));

    while let Some((node, prefix, last)) = stack.pop() {
        let (connector, continuation) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(Line {
            prefix: format!("{prefix}{connector}"),
            node,
        });
        push_children(&mut stack, node, &Rc::from(format!("{prefix}{continuation}")));
    }
    lines
}

/// Queues the children of `node` so that the first child is popped first.
fn push_children<'a>(
    stack: &mut Vec<(&'a TreeNode, Rc<str>, bool)>,
    node: &'a TreeNode,
    prefix: &Rc<str>,
) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate().rev() {
        stack.push((child, Rc::clone(prefix), i + 1 == count));
    }
}

/// Shortens `name` to at most `max` characters, marking the cut with an
/// ellipsis.
fn truncate(name: &str, max: usize) -> Cow<'_, str> {
    if name.chars().count() <= max {
        return Cow::Borrowed(name);
    }
    let kept: String = name.chars().take(max.saturating_sub(1)).collect();
    Cow::Owned(format!("{kept}…"))
}

fn label(node: &TreeNode, max_name: Option<usize>) -> String {
    let name = max_name.map_or(Cow::Borrowed(node.name.as_str()), |max| {
        truncate(&node.name, max)
    });
    let name = match node.kind {
        NodeKind::Location => name.info(),
        _ => name.into_owned(),
    };

    let mut label = format!("{name} {}", format!("[{}]", node.kind).dim());

    match node.sensor_type {
        Some(SensorType::Energy) => label.push_str(" ⚡"),
        Some(SensorType::Vibration) => label.push_str(" ∿"),
        Some(SensorType::Unknown) | None => {}
    }

    match node.status {
        Some(Status::Critical) => label.push_str(&format!(" {}", "● critical".critical())),
        Some(Status::Alert) => label.push_str(&format!(" {}", "● alert".warning())),
        Some(Status::Operating | Status::Normal) => label.push_str(&format!(" {}", "●".success())),
        Some(Status::Unknown) | None => {}
    }

    label
}

/// Prints the hierarchy below `root` to stdout.
pub fn print_tree(root: &TreeNode) {
    if root.is_leaf() {
        println!("{}", "No matching nodes".dim());
        return;
    }

    let width = terminal_width().map(usize::from);
    for line in layout(root) {
        let max_name = width.map(|width| {
            width
                .saturating_sub(line.prefix.chars().count() + DECORATION_WIDTH)
                .max(MIN_NAME_WIDTH)
        });
        println!("{}{}", line.prefix, label(line.node, max_name));
    }
}
