//! Core error type.
//!
//! Reconciliation errors are local by policy: they are logged where they
//! are detected and the offending entity is skipped, so one bad link or a
//! vanished node never stops the rest of a refresh.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// A link or selection referenced a node with no display counterpart.
    #[error("no display node for address {address}")]
    MissingDisplayNode { address: String },

    /// An input callback referenced a row that is not in the projection.
    #[error("row {row} out of range for {projection}")]
    RowOutOfRange { projection: &'static str, row: usize },
}
