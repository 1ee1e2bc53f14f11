//! Routing panel — the selected node's routing table.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use meshwatch_core::{NetworkView, ROUTE_HEADERS};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Row, Table};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct RoutingPanel {
    focused: bool,
    scroll: usize,
}

impl RoutingPanel {
    pub fn new() -> Self {
        Self {
            focused: false,
            scroll: 0,
        }
    }

    /// First row shown. The stored scroll can go stale when the selected
    /// node's RIB shrinks between renders, so it is clamped at read time.
    fn first_row(scroll: usize, rows: usize) -> usize {
        scroll.min(rows.saturating_sub(1))
    }
}

impl Component for RoutingPanel {
    fn handle_key_event(&mut self, key: KeyEvent, view: &NetworkView) -> Result<Option<Action>> {
        let rows = view.routing().rows().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (Self::first_row(self.scroll, rows) + 1).min(rows.saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = Self::first_row(self.scroll, rows).saturating_sub(1);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &NetworkView) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let routing = view.routing();
        let title = if routing.title().is_empty() {
            " Routing table "
        } else {
            routing.title()
        };
        let block = Block::default()
            .title(title.to_owned())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let rows: Vec<Row> = routing
            .rows()
            .iter()
            .skip(Self::first_row(self.scroll, routing.rows().len()))
            .map(|row| Row::new(row.cells.to_vec()).style(theme::table_row()))
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Min(9),
                Constraint::Min(9),
                Constraint::Length(5),
                Constraint::Length(6),
                Constraint::Length(6),
            ],
        )
        .header(Row::new(ROUTE_HEADERS.to_vec()).style(theme::table_header()))
        .block(block);

        frame.render_widget(table, area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "routing"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn stale_scroll_clamps_to_the_shrunken_table() {
        // RIB shrank from 6 rows to 2 with the scroll left at 5.
        assert_eq!(RoutingPanel::first_row(5, 2), 1);
        // Empty table shows from the top.
        assert_eq!(RoutingPanel::first_row(5, 0), 0);
        // In-range scroll is untouched.
        assert_eq!(RoutingPanel::first_row(1, 4), 1);
    }

    #[test]
    fn scrolling_from_a_stale_position_stays_in_range() {
        use crossterm::event::KeyModifiers;
        use meshwatch_core::NetworkView;
        use meshwatch_sim::demo_scenario;

        // The demo's default-selected node has a two-entry RIB.
        let view = NetworkView::new(&demo_scenario());
        assert_eq!(view.routing().rows().len(), 2);

        let mut panel = RoutingPanel::new();
        panel.scroll = 7;
        panel
            .handle_key_event(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE), &view)
            .expect("key handled");
        assert_eq!(panel.scroll, 1);

        panel.scroll = 7;
        panel
            .handle_key_event(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE), &view)
            .expect("key handled");
        assert_eq!(panel.scroll, 0);
    }
}
