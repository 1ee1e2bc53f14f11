//! Hierarchy projector — mirrors the coordinator/node graph as a display
//! tree.
//!
//! Runs at initialization and again only on a topology-changed
//! notification; it is the most expensive projection and changes the
//! least. The projected tree is always fully expanded: [`flatten`]
//! produces every item, so rendering never hides a node behind a collapsed
//! parent.

use std::sync::Arc;

use meshwatch_sim::{Coordinator, Node};

/// What a display item wraps: a coordinator or a node, never both.
#[derive(Debug, Clone)]
pub enum HierarchyKind {
    Coordinator(Arc<Coordinator>),
    Node(Arc<Node>),
}

impl HierarchyKind {
    /// Opaque entry identity used by the selection tracker: the wrapped
    /// entity's address.
    pub fn identity(&self) -> &str {
        match self {
            Self::Coordinator(c) => &c.cluster_address,
            Self::Node(n) => &n.address,
        }
    }
}

/// One display item in the hierarchy tree. Owns its children; dropping a
/// parent drops the whole subtree.
#[derive(Debug, Clone)]
pub struct HierarchyItem {
    pub label: String,
    pub kind: HierarchyKind,
    pub children: Vec<HierarchyItem>,
}

impl HierarchyItem {
    /// Total number of items in this subtree, including self.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(HierarchyItem::count).sum::<usize>()
    }
}

/// Project the coordinator hierarchy into a display tree: one labeled item
/// per coordinator and per node reachable from the root, in the provider's
/// iteration order.
pub fn project(root: &Arc<Coordinator>) -> HierarchyItem {
    HierarchyItem {
        label: format!("Root: {}", root.cluster_address),
        kind: HierarchyKind::Coordinator(Arc::clone(root)),
        children: project_children(root),
    }
}

fn project_children(coordinator: &Arc<Coordinator>) -> Vec<HierarchyItem> {
    if coordinator.hierarchy_level == 0 {
        // End of the tree: leaf cluster members.
        coordinator
            .members
            .iter()
            .map(|node| HierarchyItem {
                label: format!("Node  {}", node.address),
                kind: HierarchyKind::Node(Arc::clone(node)),
                children: Vec::new(),
            })
            .collect()
    } else {
        coordinator
            .children
            .iter()
            .map(|child| HierarchyItem {
                label: format!("Coord. {}", child.cluster_address),
                kind: HierarchyKind::Coordinator(Arc::clone(child)),
                children: project_children(child),
            })
            .collect()
    }
}

/// One row of the flattened (fully expanded) tree.
#[derive(Debug, Clone)]
pub struct HierarchyRow {
    pub depth: usize,
    pub label: String,
    pub kind: HierarchyKind,
    /// Whether this row is the last child of its parent, for tree guides.
    pub last_child: bool,
}

/// Flatten the tree in pre-order. Every item appears — the expanded state
/// of the view is a post-condition of projection, not a toggle.
pub fn flatten(root: &HierarchyItem) -> Vec<HierarchyRow> {
    let mut rows = Vec::with_capacity(root.count());
    push_rows(root, 0, true, &mut rows);
    rows
}

fn push_rows(item: &HierarchyItem, depth: usize, last_child: bool, rows: &mut Vec<HierarchyRow>) {
    rows.push(HierarchyRow {
        depth,
        label: item.label.clone(),
        kind: item.kind.clone(),
        last_child,
    });
    let count = item.children.len();
    for (i, child) in item.children.iter().enumerate() {
        push_rows(child, depth + 1, i + 1 == count, rows);
    }
}
