//! The view facade — one synchronous entry point per concern.
//!
//! A host shell drives this from its scheduler: `refresh()` on every
//! periodic tick (streams → link positions → routing, in that order), and
//! `rebuild_hierarchy()` / `rebuild_graph()` on topology-changed
//! notifications. Input callbacks mutate selection state and re-derive
//! detail panels only when the focus actually changed. Nothing here
//! suspends, spawns, or locks.

use meshwatch_sim::SnapshotProvider;
use tracing::{error, warn};

use crate::error::ViewError;
use crate::graph::DisplayGraph;
use crate::hierarchy::{HierarchyKind, HierarchyRow, flatten, project};
use crate::routing::RoutingTable;
use crate::selection::{SceneItem, SelectionTracker};
use crate::streams::StreamTable;

/// Detail panel content for the focused hierarchy entry. `"-"` across the
/// board when nothing is focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyDetail {
    pub level: String,
    pub siblings: String,
    pub children: String,
}

impl Default for HierarchyDetail {
    fn default() -> Self {
        Self {
            level: "-".into(),
            siblings: "-".into(),
            children: "-".into(),
        }
    }
}

/// All display projections plus selection state, reconciled against a
/// [`SnapshotProvider`].
pub struct NetworkView {
    hierarchy_rows: Vec<HierarchyRow>,
    hierarchy_detail: HierarchyDetail,
    streams: StreamTable,
    routing: RoutingTable,
    graph: DisplayGraph,
    selection: SelectionTracker,
}

impl NetworkView {
    /// Build the initial projections: display graph, hierarchy tree, and a
    /// first full reconciliation pass.
    pub fn new(provider: &impl SnapshotProvider) -> Self {
        let mut view = Self {
            hierarchy_rows: Vec::new(),
            hierarchy_detail: HierarchyDetail::default(),
            streams: StreamTable::new(),
            routing: RoutingTable::new(),
            graph: DisplayGraph::new(),
            selection: SelectionTracker::new(),
        };
        view.rebuild_graph(provider);
        view.rebuild_hierarchy(provider);
        view.refresh(provider);
        view
    }

    // ── Refresh tick ─────────────────────────────────────────────────

    /// One refresh tick: stream table, then link positions, then the
    /// selected node's routing table. Runs to completion; all failures
    /// are local.
    pub fn refresh(&mut self, provider: &impl SnapshotProvider) {
        let streams = provider.streams();
        self.streams.reconcile(&streams, self.selection.stream_row());

        self.graph.update_link_positions();

        self.refresh_routing(provider);
    }

    fn refresh_routing(&mut self, provider: &impl SnapshotProvider) {
        let nodes = provider.nodes();

        if self.selection.selected_node().is_none() {
            // Stable-but-arbitrary default: first node in provider order.
            self.selection
                .set_selected_node(nodes.first().map(|n| n.address.clone()));
        }
        let Some(address) = self.selection.selected_node().map(ToOwned::to_owned) else {
            return;
        };

        if let Some(node) = nodes.iter().find(|n| n.address == address) {
            self.routing.reconcile(node);
            return;
        }

        // The selected node left the simulation between ticks: fall back
        // to the default selection rather than showing a dead table.
        warn!(node = %address, "selected node vanished from snapshot");
        match nodes.first() {
            Some(node) => {
                self.selection.set_selected_node(Some(node.address.clone()));
                self.routing.reconcile(node);
            }
            None => self.selection.set_selected_node(None),
        }
    }

    // ── Topology-changed notifications ───────────────────────────────

    /// Rebuild the hierarchy tree projection. Post-condition: fully
    /// expanded. With no focused entry the detail panel shows the neutral
    /// placeholder.
    pub fn rebuild_hierarchy(&mut self, provider: &impl SnapshotProvider) {
        let root = provider.root_coordinator();
        self.hierarchy_rows = flatten(&project(&root));
        if self.selection.hierarchy().is_none() {
            self.hierarchy_detail = HierarchyDetail::default();
        }
    }

    /// Rebuild display nodes and links from the current topology,
    /// preserving user-moved positions.
    pub fn rebuild_graph(&mut self, provider: &impl SnapshotProvider) {
        self.graph.rebuild(&provider.nodes(), &provider.links());
    }

    // ── Input callbacks ──────────────────────────────────────────────

    /// Hierarchy row clicked. Re-derives the detail panel only when the
    /// focus triple changed.
    pub fn hierarchy_clicked(&mut self, row: usize) {
        let Some(hit) = self.hierarchy_rows.get(row) else {
            let e = ViewError::RowOutOfRange {
                projection: "hierarchy",
                row,
            };
            error!(%e, "ignoring click");
            return;
        };
        let kind = hit.kind.clone();
        if self
            .selection
            .hierarchy_clicked(row, 0, kind.identity())
        {
            self.hierarchy_detail = Self::detail_for(&kind);
        }
    }

    /// Stream row clicked. The detail panel catches up on the next tick.
    pub fn stream_clicked(&mut self, row: usize) {
        self.selection.stream_clicked(row);
    }

    /// Network view selection changed.
    pub fn scene_selection_changed(&mut self, items: &[SceneItem]) {
        self.selection.scene_selection_changed(items);
    }

    /// Move the selected node marker (direct manipulation).
    pub fn move_selected_node(&mut self, dx: f64, dy: f64) -> bool {
        let Some(address) = self.selection.selected_node().map(ToOwned::to_owned) else {
            return false;
        };
        self.graph.move_node(&address, dx, dy)
    }

    fn detail_for(kind: &HierarchyKind) -> HierarchyDetail {
        match kind {
            HierarchyKind::Coordinator(c) => HierarchyDetail {
                level: c.hierarchy_level.to_string(),
                siblings: c.siblings.len().to_string(),
                children: c.child_count().to_string(),
            },
            HierarchyKind::Node(n) => HierarchyDetail {
                level: "node".into(),
                siblings: n.siblings.len().to_string(),
                children: "0".into(),
            },
        }
    }

    // ── Render accessors ─────────────────────────────────────────────

    pub fn hierarchy_rows(&self) -> &[HierarchyRow] {
        &self.hierarchy_rows
    }

    pub fn hierarchy_detail(&self) -> &HierarchyDetail {
        &self.hierarchy_detail
    }

    pub fn streams(&self) -> &StreamTable {
        &self.streams
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn graph(&self) -> &DisplayGraph {
        &self.graph
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use meshwatch_sim::{NodeSpec, SnapshotProvider, demo_scenario, driver};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn init_builds_all_projections() {
        let scenario = demo_scenario();
        let view = NetworkView::new(&scenario);

        // 5 coordinators + 8 nodes in the demo world.
        assert_eq!(view.hierarchy_rows().len(), 13);
        assert_eq!(view.graph().nodes().len(), 8);
        assert_eq!(view.streams().rows().len(), 2);
        // Default selection: first node in provider order.
        assert_eq!(view.selection().selected_node(), Some("1.1.1"));
        assert_eq!(
            view.routing().rows().len(),
            scenario.nodes()[0].rib.len()
        );
    }

    #[test]
    fn quiet_ticks_do_no_structural_work() {
        let scenario = demo_scenario();
        let mut view = NetworkView::new(&scenario);
        let rebuilds = view.streams().rebuild_count();
        let seqs: Vec<u64> = view.routing().rows().iter().map(|r| r.seq).collect();

        view.refresh(&scenario);
        view.refresh(&scenario);

        assert_eq!(view.streams().rebuild_count(), rebuilds);
        let again: Vec<u64> = view.routing().rows().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, again);
    }

    #[test]
    fn stream_selection_survives_value_churn() {
        let scenario = demo_scenario();
        let mut view = NetworkView::new(&scenario);
        view.stream_clicked(1);

        driver::run_step(&scenario, 1); // packet counters move, identities don't
        view.refresh(&scenario);

        assert_eq!(view.selection().stream_row(), 1);
        // Stream 1 advances by 4 packets per step in the demo driver.
        assert_eq!(view.streams().detail().packet_count, 4);
        assert_eq!(view.streams().rebuild_count(), 1);
    }

    #[test]
    fn hierarchy_detail_tracks_clicked_kind() {
        let scenario = demo_scenario();
        let mut view = NetworkView::new(&scenario);

        // Row 0 is the root coordinator (level 2, two groups below).
        view.hierarchy_clicked(0);
        assert_eq!(
            *view.hierarchy_detail(),
            HierarchyDetail {
                level: "2".into(),
                siblings: "0".into(),
                children: "2".into(),
            }
        );

        // Row 3 is the first leaf node, 1.1.1 (two cluster siblings).
        view.hierarchy_clicked(3);
        assert_eq!(
            *view.hierarchy_detail(),
            HierarchyDetail {
                level: "node".into(),
                siblings: "2".into(),
                children: "0".into(),
            }
        );

        // Out of range: ignored, detail untouched.
        view.hierarchy_clicked(999);
        assert_eq!(view.hierarchy_detail().level, "node");
    }

    #[test]
    fn topology_change_reprojects_hierarchy_and_graph() {
        let scenario = demo_scenario();
        let mut view = NetworkView::new(&scenario);

        scenario.add_member(
            "1.1.0",
            NodeSpec {
                address: "1.1.4".into(),
                position_hint: (20, 20),
                rib: Vec::new(),
            },
        );
        view.rebuild_hierarchy(&scenario);
        view.rebuild_graph(&scenario);

        assert_eq!(view.hierarchy_rows().len(), 14);
        assert!(view.graph().node("1.1.4").is_some());
    }

    #[test]
    fn vanished_selection_falls_back_to_first_node() {
        let scenario = demo_scenario();
        let mut view = NetworkView::new(&scenario);

        view.scene_selection_changed(&[crate::SceneItem::Node("2.1.2".into())]);
        view.refresh(&scenario);
        assert_eq!(view.routing().title(), " Routing table 2.1.2 ");

        scenario.remove_member("2.1.2");
        view.refresh(&scenario);
        assert_eq!(view.selection().selected_node(), Some("1.1.1"));
        assert_eq!(view.routing().title(), " Routing table 1.1.1 ");
    }

    #[test]
    fn moving_the_selected_node_updates_links_next_tick() {
        let scenario = demo_scenario();
        let mut view = NetworkView::new(&scenario);

        assert!(view.move_selected_node(2.0, 0.0));
        view.refresh(&scenario);

        let link = view
            .graph()
            .links()
            .iter()
            .find(|l| l.node0 == "1.1.1")
            .expect("demo link");
        assert_eq!(link.line.0, (12.0, 10.0));
    }
}
