//! Data bridge — forwards simulation topology changes into the action loop.
//!
//! Runs as a background task: watches the scenario's topology generation
//! counter and dispatches [`Action::TopologyChanged`] on every bump. The
//! per-tick projections (streams, link geometry, routing) need no bridge —
//! they re-read the snapshot on `Action::Tick`.

use std::sync::Arc;

use meshwatch_sim::Scenario;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action::Action;

/// Spawn the bridge from the scenario's topology watch channel to the TUI.
pub fn spawn_topology_bridge(
    scenario: &Arc<Scenario>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut rx = scenario.subscribe_topology();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,

                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let generation = *rx.borrow_and_update();
                    debug!(generation, "dispatching TopologyChanged");
                    if action_tx.send(Action::TopologyChanged).is_err() {
                        break;
                    }
                }
            }
        }
        debug!("topology bridge stopped");
    });
}
