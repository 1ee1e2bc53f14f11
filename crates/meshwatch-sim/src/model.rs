//! Domain model for the simulated network.
//!
//! All entities are owned by the simulation and handed out behind `Arc`;
//! consumers must treat a reference as valid only for the current refresh
//! tick and re-fetch snapshots on the next one.

use std::sync::Arc;

/// A (data rate, delay) pair describing demanded or offered service quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Qos {
    pub data_rate_kbps: u64,
    pub delay_ms: u64,
}

/// One routing table entry.
///
/// Entries carry no identity across refreshes; display rows are matched
/// purely by table position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RibEntry {
    pub destination: String,
    pub next_hop: String,
    pub hop_count: u32,
    /// QoS capability offered along this route.
    pub qos: Qos,
}

/// An active end-to-end data stream between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamDescriptor {
    pub local_node: String,
    pub local_port: u16,
    pub peer_node: String,
    pub peer_port: u16,
    pub packet_count: u64,
    /// QoS requirement demanded by the stream.
    pub qos: Qos,
}

/// A leaf network node, owned by a level-0 coordinator.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique string address (e.g., `"1.1.2"`).
    pub address: String,
    /// Initial placement hint for the network view.
    pub position_hint: (i32, i32),
    /// Addresses of the other members of the same cluster.
    pub siblings: Vec<String>,
    /// Routing information base, in simulation-defined order.
    pub rib: Vec<RibEntry>,
}

/// A hierarchical grouping entity owning either child coordinators
/// (level > 0) or a cluster of leaf nodes (level 0).
#[derive(Debug, Clone)]
pub struct Coordinator {
    /// Unique cluster address (e.g., `"1.1.0"`).
    pub cluster_address: String,
    /// 0 = leaf cluster owning nodes directly; > 0 = owns child coordinators.
    pub hierarchy_level: u32,
    /// Cluster addresses of the coordinators at the same level.
    pub siblings: Vec<String>,
    /// Child coordinators; populated only when `hierarchy_level > 0`.
    pub children: Vec<Arc<Coordinator>>,
    /// Cluster member nodes; populated only when `hierarchy_level == 0`.
    pub members: Vec<Arc<Node>>,
}

impl Coordinator {
    /// Number of entities directly below this coordinator: child coordinators
    /// for level > 0, cluster members for level 0.
    pub fn child_count(&self) -> usize {
        if self.hierarchy_level > 0 {
            self.children.len()
        } else {
            self.members.len()
        }
    }
}

/// An unordered pair of linked nodes.
#[derive(Debug, Clone)]
pub struct Link {
    pub node0: Arc<Node>,
    pub node1: Arc<Node>,
}
