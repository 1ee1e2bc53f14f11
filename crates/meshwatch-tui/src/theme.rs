//! Color palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(255, 183, 77); // #ffb74d
pub const SKY_BLUE: Color = Color::Rgb(100, 181, 246); // #64b5f6
pub const MINT: Color = Color::Rgb(129, 199, 132); // #81c784

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(84, 96, 128); // #546080
pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 42, 54); // #262a36

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(SKY_BLUE).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(AMBER)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(SKY_BLUE)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Key hints in the status bar and help overlay.
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// The key itself within a hint.
pub fn key_hint_key() -> Style {
    Style::default().fg(AMBER)
}

/// Detail panel labels.
pub fn detail_label() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Detail panel values.
pub fn detail_value() -> Style {
    Style::default().fg(DIM_WHITE)
}
