//! Selection state tracker.
//!
//! Remembers which hierarchy entry, stream row, and topology node are
//! focused, and reports whether an input event actually changed anything —
//! detail panels are re-derived only on change, not on every click or
//! tick.

use tracing::debug;

/// Last-focused hierarchy entry: row, column, and the opaque entry
/// identity (entity address) at that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyFocus {
    pub row: usize,
    pub column: usize,
    pub entry: String,
}

/// An item selected in the network view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneItem {
    Node(String),
    Link(String, String),
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    hierarchy: Option<HierarchyFocus>,
    stream_row: usize,
    selected_node: Option<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hierarchy(&self) -> Option<&HierarchyFocus> {
        self.hierarchy.as_ref()
    }

    pub fn stream_row(&self) -> usize {
        self.stream_row
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    pub fn set_selected_node(&mut self, address: Option<String>) {
        self.selected_node = address;
    }

    /// A hierarchy row was clicked. Updates the stored triple only if any
    /// component differs; returns whether it did (the caller re-derives
    /// the detail panel on `true`).
    pub fn hierarchy_clicked(&mut self, row: usize, column: usize, entry: &str) -> bool {
        let next = HierarchyFocus {
            row,
            column,
            entry: entry.to_owned(),
        };
        if self.hierarchy.as_ref() == Some(&next) {
            return false;
        }
        debug!(row, column, entry, "hierarchy focus changed");
        self.hierarchy = Some(next);
        true
    }

    /// A stream row was clicked. No immediate panel refresh — the next
    /// periodic reconciliation picks the new row up.
    pub fn stream_clicked(&mut self, row: usize) -> bool {
        if row == self.stream_row {
            return false;
        }
        debug!(row, "stream focus changed");
        self.stream_row = row;
        true
    }

    /// The network view's selected item set changed. The first node-kind
    /// item wins; link-kind selections are observed but change nothing.
    pub fn scene_selection_changed(&mut self, items: &[SceneItem]) -> bool {
        for item in items {
            match item {
                SceneItem::Node(address) => {
                    if self.selected_node.as_deref() == Some(address.as_str()) {
                        return false;
                    }
                    debug!(node = %address, "selected node changed");
                    self.selected_node = Some(address.clone());
                    return true;
                }
                SceneItem::Link(a, b) => {
                    debug!(node0 = %a, node1 = %b, "link item selected");
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_click_reports_change_once() {
        let mut sel = SelectionTracker::new();
        assert!(sel.hierarchy_clicked(2, 0, "1.1.0"));
        assert!(!sel.hierarchy_clicked(2, 0, "1.1.0"));
        // Same row, different entry (tree rebuilt underneath).
        assert!(sel.hierarchy_clicked(2, 0, "1.2.0"));
    }

    #[test]
    fn stream_click_only_stores_the_row() {
        let mut sel = SelectionTracker::new();
        assert!(!sel.stream_clicked(0));
        assert!(sel.stream_clicked(2));
        assert_eq!(sel.stream_row(), 2);
    }

    #[test]
    fn first_node_kind_item_wins() {
        let mut sel = SelectionTracker::new();
        let items = [
            SceneItem::Link("1.1.1".into(), "1.1.2".into()),
            SceneItem::Node("1.1.2".into()),
            SceneItem::Node("1.1.3".into()),
        ];
        assert!(sel.scene_selection_changed(&items));
        assert_eq!(sel.selected_node(), Some("1.1.2"));
    }

    #[test]
    fn link_only_selection_changes_nothing() {
        let mut sel = SelectionTracker::new();
        sel.set_selected_node(Some("1.1.1".into()));
        let items = [SceneItem::Link("1.1.1".into(), "1.1.2".into())];
        assert!(!sel.scene_selection_changed(&items));
        assert_eq!(sel.selected_node(), Some("1.1.1"));
    }
}
