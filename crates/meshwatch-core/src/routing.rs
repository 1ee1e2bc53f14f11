//! Routing table reconciler.
//!
//! Displays the RIB of the selected node in a fixed five-column table.
//! Rows are grown and shrunk to the RIB size; an existing row is never
//! recreated, only its cell text is overwritten. Each row keeps the
//! sequence number it was created with, which makes in-place reuse
//! observable.

use meshwatch_sim::{Node, RibEntry};

/// Column headers, in cell order.
pub const ROUTE_HEADERS: [&str; 5] = ["Destination", "Next hop", "Hops", "Rate", "Delay"];

/// One table row: five display cells plus a creation sequence number that
/// survives refills.
#[derive(Debug, Clone)]
pub struct RouteRow {
    pub seq: u64,
    pub cells: [String; 5],
}

/// The reconciled routing table for one node.
#[derive(Debug, Default)]
pub struct RoutingTable {
    rows: Vec<RouteRow>,
    title: String,
    next_seq: u64,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[RouteRow] {
        &self.rows
    }

    /// Panel title, refreshed with the selected node's address on every
    /// run.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Synchronize the table with `node`'s current RIB.
    pub fn reconcile(&mut self, node: &Node) {
        self.title = format!(" Routing table {} ", node.address);

        for (r, entry) in node.rib.iter().enumerate() {
            if r >= self.rows.len() {
                self.rows.push(RouteRow {
                    seq: self.next_seq,
                    cells: <[String; 5]>::default(),
                });
                self.next_seq += 1;
            }
            Self::fill_row(&mut self.rows[r], entry);
        }

        // Drop surplus rows from the end; an empty RIB yields a zero-row
        // table, not an error.
        self.rows.truncate(node.rib.len());
    }

    fn fill_row(row: &mut RouteRow, entry: &RibEntry) {
        row.cells[0] = entry.destination.clone();
        row.cells[1] = entry.next_hop.clone();
        row.cells[2] = entry.hop_count.to_string();
        row.cells[3] = entry.qos.data_rate_kbps.to_string();
        row.cells[4] = entry.qos.delay_ms.to_string();
    }
}

#[cfg(test)]
mod tests {
    use meshwatch_sim::Qos;
    use pretty_assertions::assert_eq;

    use super::*;

    fn node_with_rib(rib_len: usize) -> Node {
        Node {
            address: "1.1.1".into(),
            position_hint: (0, 0),
            siblings: Vec::new(),
            rib: (0..rib_len)
                .map(|i| RibEntry {
                    destination: format!("2.1.{i}"),
                    next_hop: "1.1.2".into(),
                    hop_count: 1 + u32::try_from(i).expect("small"),
                    qos: Qos {
                        data_rate_kbps: 500,
                        delay_ms: 15,
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn row_count_converges_for_growing_and_shrinking_ribs() {
        let mut table = RoutingTable::new();
        for len in [0usize, 1, 4, 2, 0, 3] {
            table.reconcile(&node_with_rib(len));
            assert_eq!(table.rows().len(), len);
        }
    }

    #[test]
    fn surviving_rows_are_overwritten_not_recreated() {
        let mut table = RoutingTable::new();
        table.reconcile(&node_with_rib(3));
        let seqs: Vec<u64> = table.rows().iter().map(|r| r.seq).collect();

        // Same size: all rows reused.
        table.reconcile(&node_with_rib(3));
        let again: Vec<u64> = table.rows().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, again);

        // Shrink then grow: the first two rows survive, the third is new.
        table.reconcile(&node_with_rib(2));
        table.reconcile(&node_with_rib(3));
        assert_eq!(table.rows()[0].seq, seqs[0]);
        assert_eq!(table.rows()[1].seq, seqs[1]);
        assert!(table.rows()[2].seq > seqs[2]);
    }

    #[test]
    fn cells_reflect_the_current_entries() {
        let mut table = RoutingTable::new();
        table.reconcile(&node_with_rib(2));

        let row = &table.rows()[1];
        assert_eq!(
            row.cells,
            ["2.1.1", "1.1.2", "2", "500", "15"].map(String::from)
        );
        assert_eq!(table.title(), " Routing table 1.1.1 ");
    }
}
