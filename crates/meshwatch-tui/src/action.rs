//! All possible UI actions. Actions are the sole mechanism for state mutation.

use crate::panel::PanelId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    FocusPanel(PanelId),
    FocusNext,
    FocusPrev,
    ToggleOverview,
    ToggleHelp,

    // ── Data events (from the simulation bridge) ──────────────────
    TopologyChanged,

    // ── Selection ─────────────────────────────────────────────────
    HierarchyClicked(usize),
    StreamClicked(usize),
    CycleSceneNode,
    SelectLink(String, String),

    // ── Direct manipulation ───────────────────────────────────────
    MoveNode(f64, f64),
}
