//! Reconciliation engine for the meshwatch display projections.
//!
//! On each refresh tick the engine synchronizes three projections with the
//! live simulation snapshot — the hierarchy tree, the stream table, and the
//! selected node's routing table — plus the link geometry of the network
//! view. The guiding rule is "minimum churn": projections are patched in
//! place wherever structural identity allows it, and rebuilt wholesale only
//! when it does not.
//!
//! Everything here is synchronous and toolkit-free. [`NetworkView`] is the
//! single entry point a host shell needs: `refresh()` driven by a periodic
//! tick, `rebuild_hierarchy()`/`rebuild_graph()` driven by topology-changed
//! notifications, and three input callbacks for clicks.

mod error;
mod graph;
mod hierarchy;
mod routing;
mod selection;
mod streams;
mod view;

pub use error::ViewError;
pub use graph::{DisplayGraph, DisplayLink, DisplayNode};
pub use hierarchy::{HierarchyItem, HierarchyKind, HierarchyRow, flatten, project};
pub use routing::{ROUTE_HEADERS, RouteRow, RoutingTable};
pub use selection::{HierarchyFocus, SceneItem, SelectionTracker};
pub use streams::{StreamRow, StreamTable, stream_identity};
pub use view::{HierarchyDetail, NetworkView};
