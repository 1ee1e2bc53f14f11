//! Network display graph — node markers and link segments.
//!
//! Display nodes start at the simulation's position hints and may be moved
//! by the user afterwards; the link position updater snaps every segment
//! to the current endpoint positions on each refresh. No smoothing, no
//! animation.

use std::sync::Arc;

use meshwatch_sim::{Link, Node};
use tracing::error;

use crate::error::ViewError;

/// A node marker in the network view.
#[derive(Debug, Clone)]
pub struct DisplayNode {
    pub address: String,
    pub position: (f64, f64),
}

/// A line segment between two display nodes, keyed by the address pair.
#[derive(Debug, Clone)]
pub struct DisplayLink {
    pub node0: String,
    pub node1: String,
    /// Current segment endpoints, snapped on every refresh.
    pub line: ((f64, f64), (f64, f64)),
    /// False while the two endpoints coincide; the draw step is skipped
    /// that tick but the stored geometry above is still updated.
    pub visible: bool,
}

/// All display nodes and links of the network view.
#[derive(Debug, Default)]
pub struct DisplayGraph {
    nodes: Vec<DisplayNode>,
    links: Vec<DisplayLink>,
}

impl DisplayGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[DisplayNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[DisplayLink] {
        &self.links
    }

    pub fn node(&self, address: &str) -> Option<&DisplayNode> {
        self.nodes.iter().find(|n| n.address == address)
    }

    /// Rebuild the display set from a topology snapshot. Positions of
    /// surviving nodes are preserved (the user may have moved them); new
    /// nodes start at their position hint. A link whose endpoint has no
    /// display node is logged and skipped without aborting the rest.
    pub fn rebuild(&mut self, nodes: &[Arc<Node>], links: &[Link]) {
        let old = std::mem::take(&mut self.nodes);
        self.nodes = nodes
            .iter()
            .map(|n| {
                let position = old
                    .iter()
                    .find(|o| o.address == n.address)
                    .map_or(
                        (f64::from(n.position_hint.0), f64::from(n.position_hint.1)),
                        |o| o.position,
                    );
                DisplayNode {
                    address: n.address.clone(),
                    position,
                }
            })
            .collect();

        let nodes = &self.nodes;
        self.links = links
            .iter()
            .filter_map(|l| {
                let n0 = nodes.iter().find(|n| n.address == l.node0.address);
                let n1 = nodes.iter().find(|n| n.address == l.node1.address);
                match (n0, n1) {
                    (Some(a), Some(b)) => Some(DisplayLink {
                        node0: a.address.clone(),
                        node1: b.address.clone(),
                        line: (a.position, b.position),
                        visible: a.position != b.position,
                    }),
                    (None, _) => {
                        let e = ViewError::MissingDisplayNode {
                            address: l.node0.address.clone(),
                        };
                        error!(%e, "skipping link");
                        None
                    }
                    (_, None) => {
                        let e = ViewError::MissingDisplayNode {
                            address: l.node1.address.clone(),
                        };
                        error!(%e, "skipping link");
                        None
                    }
                }
            })
            .collect();
    }

    /// Snap every link segment to the current endpoint positions.
    /// Coinciding endpoints suppress the draw step for this tick only.
    pub fn update_link_positions(&mut self) {
        let nodes = &self.nodes;
        for link in &mut self.links {
            let p0 = nodes.iter().find(|n| n.address == link.node0);
            let p1 = nodes.iter().find(|n| n.address == link.node1);
            match (p0, p1) {
                (Some(a), Some(b)) => {
                    link.line = (a.position, b.position);
                    link.visible = a.position != b.position;
                }
                (None, _) => {
                    let e = ViewError::MissingDisplayNode {
                        address: link.node0.clone(),
                    };
                    error!(%e, "link endpoint lost, keeping previous geometry");
                }
                (_, None) => {
                    let e = ViewError::MissingDisplayNode {
                        address: link.node1.clone(),
                    };
                    error!(%e, "link endpoint lost, keeping previous geometry");
                }
            }
        }
    }

    /// Move a display node by a delta (direct user manipulation). Links
    /// pick the new position up on the next update.
    pub fn move_node(&mut self, address: &str, dx: f64, dy: f64) -> bool {
        match self.nodes.iter_mut().find(|n| n.address == address) {
            Some(node) => {
                node.position.0 += dx;
                node.position.1 += dy;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use meshwatch_sim::{SnapshotProvider, demo_scenario};
    use pretty_assertions::assert_eq;

    use super::*;

    fn demo_graph() -> DisplayGraph {
        let scenario = demo_scenario();
        let mut graph = DisplayGraph::new();
        graph.rebuild(&scenario.nodes(), &scenario.links());
        graph
    }

    #[test]
    fn rebuild_places_nodes_at_their_hints() {
        let graph = demo_graph();
        assert_eq!(graph.nodes().len(), 8);
        assert_eq!(graph.node("1.1.1").expect("exists").position, (10.0, 10.0));
    }

    #[test]
    fn moved_nodes_keep_their_position_across_rebuilds() {
        let scenario = demo_scenario();
        let mut graph = DisplayGraph::new();
        graph.rebuild(&scenario.nodes(), &scenario.links());

        assert!(graph.move_node("1.1.1", 5.0, -2.0));
        graph.rebuild(&scenario.nodes(), &scenario.links());
        assert_eq!(graph.node("1.1.1").expect("exists").position, (15.0, 8.0));
    }

    #[test]
    fn link_positions_snap_to_moved_endpoints() {
        let mut graph = demo_graph();
        graph.move_node("1.1.2", 1.0, 1.0);
        graph.update_link_positions();

        let link = graph
            .links()
            .iter()
            .find(|l| l.node0 == "1.1.1" && l.node1 == "1.1.2")
            .expect("demo link");
        assert_eq!(link.line, ((10.0, 10.0), (31.0, 15.0)));
        assert!(link.visible);
    }

    #[test]
    fn coinciding_endpoints_suppress_drawing_but_update_geometry() {
        let mut graph = demo_graph();
        // Put 1.1.2 exactly on top of 1.1.1.
        graph.move_node("1.1.2", -20.0, -4.0);
        graph.update_link_positions();

        let link = graph
            .links()
            .iter()
            .find(|l| l.node0 == "1.1.1" && l.node1 == "1.1.2")
            .expect("demo link");
        assert!(!link.visible);
        assert_eq!(link.line, ((10.0, 10.0), (10.0, 10.0)));

        // Moving apart restores drawing next update.
        graph.move_node("1.1.2", 3.0, 0.0);
        graph.update_link_positions();
        let link = graph
            .links()
            .iter()
            .find(|l| l.node0 == "1.1.1" && l.node1 == "1.1.2")
            .expect("demo link");
        assert!(link.visible);
    }
}
