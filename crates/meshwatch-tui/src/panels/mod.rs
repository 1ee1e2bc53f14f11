//! Panel implementations. Each panel is a top-level Component.

pub mod hierarchy;
pub mod network;
pub mod routing;
pub mod streams;

use crate::component::Component;
use crate::panel::PanelId;

/// Create the four overview panels.
pub fn create_panels() -> Vec<(PanelId, Box<dyn Component>)> {
    vec![
        (
            PanelId::Hierarchy,
            Box::new(hierarchy::HierarchyPanel::new()),
        ),
        (PanelId::Network, Box::new(network::NetworkPanel::new())),
        (PanelId::Streams, Box::new(streams::StreamsPanel::new())),
        (PanelId::Routing, Box::new(routing::RoutingPanel::new())),
    ]
}
