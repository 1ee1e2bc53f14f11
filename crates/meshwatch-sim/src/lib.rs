//! Simulated hierarchical network for meshwatch.
//!
//! Hosts the domain model (coordinators, nodes, links, streams, RIBs) and the
//! [`Scenario`] — an in-memory world that implements the read-only
//! [`SnapshotProvider`] surface consumed by `meshwatch-core`. A small
//! deterministic [`driver`] task mutates the scenario over time so the TUI
//! has something live to show.

pub mod driver;
mod model;
mod scenario;

pub use model::{Coordinator, Link, Node, Qos, RibEntry, StreamDescriptor};
pub use scenario::{CoordinatorSpec, NodeSpec, Scenario, SnapshotProvider, demo_scenario};
