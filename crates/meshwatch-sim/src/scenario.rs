//! The in-memory scenario — mutable world state plus atomic snapshots.
//!
//! Consumers only ever see the [`SnapshotProvider`] surface: every query
//! returns an `Arc` snapshot taken at a single point in time (`arc-swap`
//! load), so a refresh tick can reconcile against a consistent view while
//! the simulation keeps mutating in the background. Topology changes
//! (membership, links) are announced through a `watch` generation counter;
//! stream and RIB churn is not, since the per-tick projections pick those
//! up on their own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use tokio::sync::watch;
use tracing::warn;

use crate::model::{Coordinator, Link, Node, RibEntry, StreamDescriptor};

/// Read-only query surface of the simulation.
///
/// Iteration order of `nodes()`, `links()`, `streams()` and of the
/// coordinator tree is a documented precondition: stable and
/// simulation-defined. [`Scenario`] keeps insertion order, so this holds by
/// construction.
pub trait SnapshotProvider {
    /// The root of the coordinator hierarchy. Always available.
    fn root_coordinator(&self) -> Arc<Coordinator>;
    /// All nodes reachable in the world, in stable order.
    fn nodes(&self) -> Arc<Vec<Arc<Node>>>;
    /// All node-to-node links.
    fn links(&self) -> Arc<Vec<Link>>;
    /// All currently active streams.
    fn streams(&self) -> Arc<Vec<StreamDescriptor>>;
}

// ── Build specs ──────────────────────────────────────────────────────

/// Blueprint for a leaf node.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub address: String,
    pub position_hint: (i32, i32),
    pub rib: Vec<RibEntry>,
}

/// Blueprint for one coordinator subtree. A spec with members and no
/// children describes a level-0 cluster; levels above are derived from the
/// tree shape.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorSpec {
    pub address: String,
    pub children: Vec<CoordinatorSpec>,
    pub members: Vec<NodeSpec>,
}

impl CoordinatorSpec {
    /// Leaf cluster with direct members.
    pub fn cluster(address: impl Into<String>, members: Vec<NodeSpec>) -> Self {
        Self {
            address: address.into(),
            children: Vec::new(),
            members,
        }
    }

    /// Inner coordinator owning child coordinators.
    pub fn group(address: impl Into<String>, children: Vec<CoordinatorSpec>) -> Self {
        Self {
            address: address.into(),
            children,
            members: Vec::new(),
        }
    }

    fn find_cluster_mut(&mut self, address: &str) -> Option<&mut CoordinatorSpec> {
        if self.children.is_empty() {
            return (self.address == address).then_some(self);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_cluster_mut(address))
    }

    fn find_node_mut(&mut self, address: &str) -> Option<&mut NodeSpec> {
        if let Some(node) = self.members.iter_mut().find(|n| n.address == address) {
            return Some(node);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_node_mut(address))
    }

    fn remove_node(&mut self, address: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|n| n.address != address);
        if self.members.len() != before {
            return true;
        }
        self.children.iter_mut().any(|c| c.remove_node(address))
    }
}

// ── Immutable world snapshot ─────────────────────────────────────────

struct World {
    root: Arc<Coordinator>,
    nodes: Arc<Vec<Arc<Node>>>,
    links: Arc<Vec<Link>>,
}

struct WorldState {
    root: CoordinatorSpec,
    links: Vec<(String, String)>,
    streams: Vec<StreamDescriptor>,
}

/// Build one coordinator (and its subtree) from its spec. Appends every
/// member node to `nodes_out` in traversal order.
fn build_coordinator(
    spec: &CoordinatorSpec,
    siblings: Vec<String>,
    nodes_out: &mut Vec<Arc<Node>>,
) -> Arc<Coordinator> {
    if spec.children.is_empty() {
        let members: Vec<Arc<Node>> = spec
            .members
            .iter()
            .map(|n| {
                Arc::new(Node {
                    address: n.address.clone(),
                    position_hint: n.position_hint,
                    siblings: spec
                        .members
                        .iter()
                        .filter(|m| m.address != n.address)
                        .map(|m| m.address.clone())
                        .collect(),
                    rib: n.rib.clone(),
                })
            })
            .collect();
        nodes_out.extend(members.iter().cloned());
        return Arc::new(Coordinator {
            cluster_address: spec.address.clone(),
            hierarchy_level: 0,
            siblings,
            children: Vec::new(),
            members,
        });
    }

    let children: Vec<Arc<Coordinator>> = spec
        .children
        .iter()
        .map(|c| {
            let sibs = spec
                .children
                .iter()
                .filter(|o| o.address != c.address)
                .map(|o| o.address.clone())
                .collect();
            build_coordinator(c, sibs, nodes_out)
        })
        .collect();
    let level = 1 + children
        .iter()
        .map(|c| c.hierarchy_level)
        .max()
        .unwrap_or(0);

    Arc::new(Coordinator {
        cluster_address: spec.address.clone(),
        hierarchy_level: level,
        siblings,
        children,
        members: Vec::new(),
    })
}

fn build_world(state: &WorldState) -> World {
    let mut nodes = Vec::new();
    let root = build_coordinator(&state.root, Vec::new(), &mut nodes);

    let by_address: HashMap<&str, &Arc<Node>> =
        nodes.iter().map(|n| (n.address.as_str(), n)).collect();

    let links: Vec<Link> = state
        .links
        .iter()
        .filter_map(|(a, b)| {
            match (by_address.get(a.as_str()), by_address.get(b.as_str())) {
                (Some(n0), Some(n1)) => Some(Link {
                    node0: Arc::clone(n0),
                    node1: Arc::clone(n1),
                }),
                _ => {
                    warn!(node0 = %a, node1 = %b, "link references unknown node, dropping");
                    None
                }
            }
        })
        .collect();

    World {
        root,
        nodes: Arc::new(nodes),
        links: Arc::new(links),
    }
}

// ── Scenario ─────────────────────────────────────────────────────────

/// Mutable simulation world with atomic read snapshots.
pub struct Scenario {
    state: Mutex<WorldState>,
    world: ArcSwap<World>,
    streams: ArcSwap<Vec<StreamDescriptor>>,
    topology_gen: watch::Sender<u64>,
}

impl Scenario {
    pub fn new(
        root: CoordinatorSpec,
        links: Vec<(String, String)>,
        streams: Vec<StreamDescriptor>,
    ) -> Self {
        let state = WorldState {
            root,
            links,
            streams: streams.clone(),
        };
        let world = build_world(&state);
        let (topology_gen, _) = watch::channel(0u64);
        Self {
            state: Mutex::new(state),
            world: ArcSwap::from_pointee(world),
            streams: ArcSwap::from_pointee(streams),
            topology_gen,
        }
    }

    /// Subscribe to the topology generation counter. The value bumps on
    /// every membership or link change; the hierarchy and network
    /// projections rebuild only on those.
    pub fn subscribe_topology(&self) -> watch::Receiver<u64> {
        self.topology_gen.subscribe()
    }

    /// Mutate the stream list in place and publish a fresh snapshot.
    pub fn update_streams(&self, f: impl FnOnce(&mut Vec<StreamDescriptor>)) {
        let mut state = self.state.lock().expect("scenario state poisoned");
        f(&mut state.streams);
        self.streams.store(Arc::new(state.streams.clone()));
    }

    /// Replace a node's routing table. Returns `false` if the address is
    /// unknown. Does not bump the topology generation — RIBs are re-read
    /// every tick by the routing projection.
    pub fn update_rib(&self, address: &str, rib: Vec<RibEntry>) -> bool {
        let mut state = self.state.lock().expect("scenario state poisoned");
        let Some(node) = state.root.find_node_mut(address) else {
            return false;
        };
        node.rib = rib;
        self.world.store(Arc::new(build_world(&state)));
        true
    }

    /// Add a member node to a level-0 cluster. Bumps the topology
    /// generation.
    pub fn add_member(&self, cluster_address: &str, node: NodeSpec) -> bool {
        let mut state = self.state.lock().expect("scenario state poisoned");
        let Some(cluster) = state.root.find_cluster_mut(cluster_address) else {
            warn!(cluster = %cluster_address, "add_member: unknown cluster");
            return false;
        };
        cluster.members.push(node);
        self.world.store(Arc::new(build_world(&state)));
        self.topology_gen.send_modify(|g| *g += 1);
        true
    }

    /// Remove a node (and any links touching it). Bumps the topology
    /// generation.
    pub fn remove_member(&self, address: &str) -> bool {
        let mut state = self.state.lock().expect("scenario state poisoned");
        if !state.root.remove_node(address) {
            return false;
        }
        state
            .links
            .retain(|(a, b)| a != address && b != address);
        self.world.store(Arc::new(build_world(&state)));
        self.topology_gen.send_modify(|g| *g += 1);
        true
    }

    /// Connect two nodes. Bumps the topology generation.
    pub fn add_link(&self, a: impl Into<String>, b: impl Into<String>) {
        let mut state = self.state.lock().expect("scenario state poisoned");
        state.links.push((a.into(), b.into()));
        self.world.store(Arc::new(build_world(&state)));
        self.topology_gen.send_modify(|g| *g += 1);
    }
}

impl SnapshotProvider for Scenario {
    fn root_coordinator(&self) -> Arc<Coordinator> {
        Arc::clone(&self.world.load().root)
    }

    fn nodes(&self) -> Arc<Vec<Arc<Node>>> {
        Arc::clone(&self.world.load().nodes)
    }

    fn links(&self) -> Arc<Vec<Link>> {
        Arc::clone(&self.world.load().links)
    }

    fn streams(&self) -> Arc<Vec<StreamDescriptor>> {
        self.streams.load_full()
    }
}

// ── Demo world ───────────────────────────────────────────────────────

fn demo_node(address: &str, x: i32, y: i32, routes: &[(&str, &str, u32)]) -> NodeSpec {
    NodeSpec {
        address: address.to_owned(),
        position_hint: (x, y),
        rib: routes
            .iter()
            .map(|&(dest, hop, count)| RibEntry {
                destination: dest.to_owned(),
                next_hop: hop.to_owned(),
                hop_count: count,
                qos: crate::Qos {
                    data_rate_kbps: 1_000 / u64::from(count),
                    delay_ms: 10 * u64::from(count),
                },
            })
            .collect(),
    }
}

/// A small three-level world used by the binary and by tests: one root
/// coordinator, three leaf clusters, eight nodes.
pub fn demo_scenario() -> Scenario {
    let root = CoordinatorSpec::group(
        "0.0.0",
        vec![
            CoordinatorSpec::group(
                "1.0.0",
                vec![
                    CoordinatorSpec::cluster(
                        "1.1.0",
                        vec![
                            demo_node("1.1.1", 10, 10, &[("1.1.2", "1.1.2", 1), ("2.1.1", "1.1.2", 3)]),
                            demo_node("1.1.2", 30, 14, &[("1.1.1", "1.1.1", 1), ("1.2.1", "1.2.1", 1)]),
                            demo_node("1.1.3", 14, 26, &[("1.1.1", "1.1.1", 1), ("2.1.2", "1.1.1", 4)]),
                        ],
                    ),
                    CoordinatorSpec::cluster(
                        "1.2.0",
                        vec![
                            demo_node("1.2.1", 52, 12, &[("1.1.2", "1.1.2", 1), ("2.1.1", "2.1.1", 1)]),
                            demo_node("1.2.2", 60, 24, &[("1.2.1", "1.2.1", 1)]),
                        ],
                    ),
                ],
            ),
            CoordinatorSpec::cluster(
                "2.1.0",
                vec![
                    demo_node("2.1.1", 80, 10, &[("1.2.1", "1.2.1", 1), ("2.1.2", "2.1.2", 1)]),
                    demo_node("2.1.2", 88, 22, &[("2.1.1", "2.1.1", 1), ("1.1.1", "2.1.1", 4)]),
                    demo_node("2.1.3", 74, 28, &[("2.1.1", "2.1.1", 1)]),
                ],
            ),
        ],
    );

    let links = [
        ("1.1.1", "1.1.2"),
        ("1.1.1", "1.1.3"),
        ("1.1.2", "1.2.1"),
        ("1.2.1", "1.2.2"),
        ("1.2.1", "2.1.1"),
        ("2.1.1", "2.1.2"),
        ("2.1.1", "2.1.3"),
    ]
    .into_iter()
    .map(|(a, b)| (a.to_owned(), b.to_owned()))
    .collect();

    let streams = vec![
        StreamDescriptor {
            local_node: "1.1.1".into(),
            local_port: 5000,
            peer_node: "2.1.2".into(),
            peer_port: 5002,
            packet_count: 0,
            qos: crate::Qos {
                data_rate_kbps: 256,
                delay_ms: 40,
            },
        },
        StreamDescriptor {
            local_node: "1.2.2".into(),
            local_port: 6000,
            peer_node: "2.1.3".into(),
            peer_port: 6002,
            packet_count: 0,
            qos: crate::Qos {
                data_rate_kbps: 128,
                delay_ms: 80,
            },
        },
    ];

    Scenario::new(root, links, streams)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn demo_world_shape() {
        let scenario = demo_scenario();
        let root = scenario.root_coordinator();

        assert_eq!(root.cluster_address, "0.0.0");
        assert_eq!(root.hierarchy_level, 2);
        assert_eq!(root.children.len(), 2);
        assert_eq!(scenario.nodes().len(), 8);
        assert_eq!(scenario.links().len(), 7);
        assert_eq!(scenario.streams().len(), 2);
    }

    #[test]
    fn node_order_is_stable_across_snapshots() {
        let scenario = demo_scenario();
        let first: Vec<String> = scenario.nodes().iter().map(|n| n.address.clone()).collect();
        scenario.update_rib("1.1.1", Vec::new());
        let second: Vec<String> = scenario.nodes().iter().map(|n| n.address.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn siblings_are_derived_from_the_tree() {
        let scenario = demo_scenario();
        let node = scenario
            .nodes()
            .iter()
            .find(|n| n.address == "1.1.2")
            .cloned()
            .unwrap();
        assert_eq!(node.siblings, vec!["1.1.1".to_owned(), "1.1.3".to_owned()]);

        let root = scenario.root_coordinator();
        let group = &root.children[0];
        assert_eq!(group.cluster_address, "1.0.0");
        assert_eq!(group.siblings, vec!["2.1.0".to_owned()]);
    }

    #[test]
    fn membership_changes_bump_topology_generation() {
        let scenario = demo_scenario();
        let mut rx = scenario.subscribe_topology();

        scenario.update_streams(|s| s.clear());
        assert!(!rx.has_changed().unwrap());

        assert!(scenario.add_member(
            "1.2.0",
            NodeSpec {
                address: "1.2.3".into(),
                position_hint: (40, 40),
                rib: Vec::new(),
            }
        ));
        assert!(rx.has_changed().unwrap());
        assert_eq!(scenario.nodes().len(), 9);
    }

    #[test]
    fn removing_a_node_drops_its_links() {
        let scenario = demo_scenario();
        assert!(scenario.remove_member("2.1.1"));

        let links = scenario.links();
        assert!(
            links
                .iter()
                .all(|l| l.node0.address != "2.1.1" && l.node1.address != "2.1.1")
        );
        // 2.1.1 carried three links
        assert_eq!(links.len(), 4);
    }

    #[test]
    fn rib_updates_are_visible_in_the_next_snapshot() {
        let scenario = demo_scenario();
        assert!(scenario.update_rib("2.1.3", Vec::new()));
        let node = scenario
            .nodes()
            .iter()
            .find(|n| n.address == "2.1.3")
            .cloned()
            .unwrap();
        assert!(node.rib.is_empty());

        assert!(!scenario.update_rib("9.9.9", Vec::new()));
    }
}
