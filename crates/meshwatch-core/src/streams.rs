//! Stream table reconciler.
//!
//! Keeps a list-shaped projection in sync with the stream snapshot while
//! minimizing churn. Rows are compared by derived display identity —
//! endpoint addresses and ports only — so packet counters and QoS values,
//! which move every tick, never force a rebuild. Any identity divergence
//! (or a row-count mismatch) clears and rebuilds the whole table; there is
//! no partial rewrite.

use meshwatch_sim::StreamDescriptor;
use tracing::debug;

/// Derived display identity: two descriptors are "the same stream" iff
/// this string matches, regardless of packet count or QoS.
pub fn stream_identity(desc: &StreamDescriptor) -> String {
    format!(
        "{}:{} <==> {}:{}",
        desc.local_node, desc.local_port, desc.peer_node, desc.peer_port
    )
}

/// One display row: the descriptor snapshot taken at build time plus its
/// identity string.
#[derive(Debug, Clone)]
pub struct StreamRow {
    pub identity: String,
    pub desc: StreamDescriptor,
}

/// The reconciled stream table and its detail panel state.
#[derive(Debug, Default)]
pub struct StreamTable {
    rows: Vec<StreamRow>,
    /// Live descriptor backing the detail panel for the selected row.
    detail: StreamDescriptor,
    /// Number of full rebuilds performed, for diagnostics and tests.
    rebuilds: u64,
}

impl StreamTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[StreamRow] {
        &self.rows
    }

    /// Detail panel values for the selected row; all-zero placeholder when
    /// there are no streams.
    pub fn detail(&self) -> &StreamDescriptor {
        &self.detail
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Reconcile against the current snapshot.
    ///
    /// `selected_row` is the user's selected row index; its detail values
    /// are refreshed from the live snapshot even when no rebuild happens.
    pub fn reconcile(&mut self, streams: &[StreamDescriptor], selected_row: usize) {
        if streams.is_empty() {
            self.detail = StreamDescriptor::default();
            if self.rows.is_empty() {
                return;
            }
        }

        // Row-count divergence always forces a reset; identity comparison
        // below catches in-place replacements.
        let mut reset_needed = self.rows.len() != streams.len();

        if !self.rows.is_empty() {
            for (i, desc) in streams.iter().enumerate() {
                let wanted = stream_identity(desc);
                match self.rows.get(i) {
                    Some(row) if row.identity == wanted => {}
                    _ => reset_needed = true,
                }
                if i == selected_row {
                    self.detail = desc.clone();
                }
            }
        }

        if reset_needed {
            debug!(rows = streams.len(), "stream table reset");
            self.rows.clear();
            for (i, desc) in streams.iter().enumerate() {
                self.rows.push(StreamRow {
                    identity: stream_identity(desc),
                    desc: desc.clone(),
                });
                if i == selected_row {
                    self.detail = desc.clone();
                }
            }
            self.rebuilds += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use meshwatch_sim::Qos;
    use pretty_assertions::assert_eq;

    use super::*;

    fn stream(local: &str, lport: u16, peer: &str, pport: u16, packets: u64) -> StreamDescriptor {
        StreamDescriptor {
            local_node: local.into(),
            local_port: lport,
            peer_node: peer.into(),
            peer_port: pport,
            packet_count: packets,
            qos: Qos {
                data_rate_kbps: 64,
                delay_ms: 20,
            },
        }
    }

    #[test]
    fn identity_ignores_packet_count_and_qos() {
        let a = stream("A", 100, "B", 200, 5);
        let mut b = stream("A", 100, "B", 200, 9_999);
        b.qos = Qos {
            data_rate_kbps: 1,
            delay_ms: 1,
        };
        assert_eq!(stream_identity(&a), stream_identity(&b));
        assert_eq!(stream_identity(&a), "A:100 <==> B:200");
    }

    #[test]
    fn unchanged_snapshot_is_idempotent() {
        let streams = vec![stream("A", 100, "B", 200, 5), stream("C", 300, "D", 400, 1)];
        let mut table = StreamTable::new();

        table.reconcile(&streams, 0);
        assert_eq!(table.rebuild_count(), 1);
        assert_eq!(table.rows().len(), 2);

        table.reconcile(&streams, 0);
        assert_eq!(table.rebuild_count(), 1, "second run must not rebuild");
    }

    #[test]
    fn packet_count_change_refreshes_detail_without_rebuild() {
        let mut streams = vec![stream("A", 100, "B", 200, 5), stream("C", 300, "D", 400, 1)];
        let mut table = StreamTable::new();
        table.reconcile(&streams, 0);

        streams[0].packet_count = 7;
        streams[1].packet_count = 2;
        table.reconcile(&streams, 0);

        assert_eq!(table.rebuild_count(), 1);
        assert_eq!(table.detail().packet_count, 7);
        // The row snapshot is from build time; only the detail is live.
        assert_eq!(table.rows()[0].desc.packet_count, 5);
    }

    #[test]
    fn selection_row_detail_follows_live_values() {
        let mut streams = vec![
            stream("A", 100, "B", 200, 5),
            stream("C", 300, "D", 400, 1),
            stream("E", 500, "F", 600, 8),
        ];
        let mut table = StreamTable::new();
        table.reconcile(&streams, 2);

        streams[0].packet_count = 50;
        streams[2].packet_count = 9;
        table.reconcile(&streams, 2);

        assert_eq!(table.rebuild_count(), 1);
        assert_eq!(table.detail().packet_count, 9);
    }

    #[test]
    fn identity_change_rebuilds_all_rows() {
        let mut streams = vec![stream("A", 100, "B", 200, 5), stream("C", 300, "D", 400, 1)];
        let mut table = StreamTable::new();
        table.reconcile(&streams, 0);

        streams[1] = stream("C", 300, "D", 401, 0);
        table.reconcile(&streams, 0);

        assert_eq!(table.rebuild_count(), 2);
        assert_eq!(table.rows()[1].identity, "C:300 <==> D:401");
    }

    #[test]
    fn empty_snapshot_clears_table_and_detail() {
        let streams = vec![stream("A", 100, "B", 200, 5)];
        let mut table = StreamTable::new();
        table.reconcile(&streams, 0);
        assert_eq!(table.rows().len(), 1);

        table.reconcile(&[], 0);
        assert_eq!(table.rows().len(), 0);
        assert_eq!(*table.detail(), StreamDescriptor::default());
        let rebuilds = table.rebuild_count();

        // Already empty: a further empty reconcile is a no-op.
        table.reconcile(&[], 0);
        assert_eq!(table.rebuild_count(), rebuilds);
    }

    #[test]
    fn shrinking_snapshot_converges_row_count() {
        let streams = vec![stream("A", 100, "B", 200, 5), stream("C", 300, "D", 400, 1)];
        let mut table = StreamTable::new();
        table.reconcile(&streams, 0);

        table.reconcile(&streams[..1], 0);
        assert_eq!(table.rows().len(), 1);
    }
}
