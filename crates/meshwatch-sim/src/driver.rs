//! Background mutation driver.
//!
//! Deterministic stand-in for a real simulation backend: advances packet
//! counters every step, jitters RIB QoS values, churns one stream
//! periodically, and toggles one node's cluster membership so topology
//! rebuilds get exercised. Everything is derived from a step counter — no
//! randomness, which keeps behaviour reproducible.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::scenario::{NodeSpec, Scenario, SnapshotProvider};

/// Cluster that gains/loses the transient demo node.
const CHURN_CLUSTER: &str = "1.2.0";
const CHURN_NODE: &str = "1.2.9";

/// Spawn the driver task. Mutates `scenario` once per `period` until
/// cancelled.
pub fn spawn_simulation(
    scenario: Arc<Scenario>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut step: u64 = 0;

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            step += 1;
            run_step(&scenario, step);
        }
        debug!("simulation driver stopped");
    })
}

/// One mutation step. Public so tests can drive the simulation without a
/// runtime.
pub fn run_step(scenario: &Scenario, step: u64) {
    // Packet counters advance every step, at per-stream rates.
    scenario.update_streams(|streams| {
        for (i, stream) in streams.iter_mut().enumerate() {
            stream.packet_count += 1 + i as u64 * 3;
        }
    });

    // RIB delay jitter, every third step.
    if step % 3 == 0 {
        let nodes = scenario.nodes();
        for node in nodes.iter() {
            let mut rib = node.rib.clone();
            for (r, entry) in rib.iter_mut().enumerate() {
                entry.qos.delay_ms = 10 * u64::from(entry.hop_count) + (step + r as u64) % 7;
            }
            scenario.update_rib(&node.address, rib);
        }
    }

    // Stream churn: retarget the last stream's peer port so its display
    // identity changes and the stream table takes the rebuild path.
    if step % 10 == 0 {
        scenario.update_streams(|streams| {
            if let Some(last) = streams.last_mut() {
                last.peer_port = if last.peer_port == 6002 { 7002 } else { 6002 };
                last.packet_count = 0;
            }
        });
    }

    // Membership churn: a transient node joins and leaves.
    if step % 25 == 0 {
        if step % 50 == 0 {
            scenario.remove_member(CHURN_NODE);
        } else {
            scenario.add_member(
                CHURN_CLUSTER,
                NodeSpec {
                    address: CHURN_NODE.to_owned(),
                    position_hint: (66, 34),
                    rib: Vec::new(),
                },
            );
            scenario.add_link(CHURN_NODE, "1.2.2");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::demo_scenario;

    #[test]
    fn packet_counters_advance_per_step() {
        let scenario = demo_scenario();
        run_step(&scenario, 1);
        run_step(&scenario, 2);

        let streams = scenario.streams();
        assert_eq!(streams[0].packet_count, 2);
        assert_eq!(streams[1].packet_count, 8);
    }

    #[test]
    fn churn_node_joins_and_leaves() {
        let scenario = demo_scenario();
        let base = scenario.nodes().len();

        run_step(&scenario, 25);
        assert_eq!(scenario.nodes().len(), base + 1);

        run_step(&scenario, 50);
        assert_eq!(scenario.nodes().len(), base);
    }

    #[test]
    fn stream_identity_churn_flips_peer_port() {
        let scenario = demo_scenario();
        run_step(&scenario, 10);
        assert_eq!(scenario.streams()[1].peer_port, 7002);
        run_step(&scenario, 20);
        assert_eq!(scenario.streams()[1].peer_port, 6002);
    }
}
