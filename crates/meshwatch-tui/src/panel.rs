//! Panel identifiers — the four panels of the overview, navigable by
//! number keys 1-4.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelId {
    #[default]
    Hierarchy, // 1
    Network, // 2
    Streams, // 3
    Routing, // 4
}

impl PanelId {
    /// All panels in focus-cycle order.
    pub const ALL: [PanelId; 4] = [Self::Hierarchy, Self::Network, Self::Streams, Self::Routing];

    /// Numeric key (1-4) for this panel.
    pub fn number(self) -> u8 {
        match self {
            Self::Hierarchy => 1,
            Self::Network => 2,
            Self::Streams => 3,
            Self::Routing => 4,
        }
    }

    /// Panel from a numeric key (1-4). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Hierarchy),
            2 => Some(Self::Network),
            3 => Some(Self::Streams),
            4 => Some(Self::Routing),
            _ => None,
        }
    }

    /// Next panel in cycle order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous panel in cycle order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for titles and the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hierarchy => "Hierarchy",
            Self::Network => "Network",
            Self::Streams => "Streams",
            Self::Routing => "Routing",
        }
    }

    /// Stable name used in the config file.
    pub fn config_name(self) -> &'static str {
        match self {
            Self::Hierarchy => "hierarchy",
            Self::Network => "network",
            Self::Streams => "streams",
            Self::Routing => "routing",
        }
    }

    /// Panel from its config-file name; unknown names fall back to the
    /// default panel.
    pub fn from_config_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.config_name() == name)
            .unwrap_or_default()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cycle_covers_all_panels_and_wraps() {
        let mut p = PanelId::Hierarchy;
        for expected in [
            PanelId::Network,
            PanelId::Streams,
            PanelId::Routing,
            PanelId::Hierarchy,
        ] {
            p = p.next();
            assert_eq!(p, expected);
        }
        assert_eq!(PanelId::Hierarchy.prev(), PanelId::Routing);
    }

    #[test]
    fn config_names_round_trip() {
        for p in PanelId::ALL {
            assert_eq!(PanelId::from_config_name(p.config_name()), p);
        }
        assert_eq!(PanelId::from_config_name("bogus"), PanelId::Hierarchy);
    }
}
