//! Hierarchy panel — the coordinator/node tree plus a detail footer.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use meshwatch_core::{HierarchyKind, NetworkView};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct HierarchyPanel {
    focused: bool,
    cursor: usize,
}

impl HierarchyPanel {
    pub fn new() -> Self {
        Self {
            focused: false,
            cursor: 0,
        }
    }

    fn move_cursor(&mut self, delta: isize, row_count: usize) -> Option<Action> {
        if row_count == 0 {
            return None;
        }
        let last = row_count - 1;
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(last);
        Some(Action::HierarchyClicked(self.cursor))
    }
}

impl Component for HierarchyPanel {
    fn handle_key_event(&mut self, key: KeyEvent, view: &NetworkView) -> Result<Option<Action>> {
        let rows = view.hierarchy_rows().len();
        let action = match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, rows),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, rows),
            KeyCode::Char('g') => {
                self.cursor = 0;
                (rows > 0).then_some(Action::HierarchyClicked(0))
            }
            KeyCode::Char('G') => {
                self.cursor = rows.saturating_sub(1);
                (rows > 0).then_some(Action::HierarchyClicked(self.cursor))
            }
            KeyCode::Enter => (self.cursor < rows).then_some(Action::HierarchyClicked(self.cursor)),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &NetworkView) {
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(5)]).split(area);

        self.render_tree(frame, layout[0], view);
        Self::render_detail(frame, layout[1], view);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "hierarchy"
    }
}

impl HierarchyPanel {
    fn render_tree(&self, frame: &mut Frame, area: Rect, view: &NetworkView) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Hierarchy ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = view.hierarchy_rows();
        let visible = usize::from(inner.height);
        // Keep the cursor in view; no sticky scroll state needed.
        let offset = self.cursor.saturating_sub(visible.saturating_sub(1));

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, row)| {
                let mut spans = Vec::new();
                if row.depth > 0 {
                    let guide = format!(
                        "{}{} ",
                        "  ".repeat(row.depth - 1),
                        if row.last_child { "└─" } else { "├─" }
                    );
                    spans.push(Span::styled(guide, theme::key_hint()));
                }
                let style = if i == self.cursor {
                    theme::table_selected()
                } else {
                    match row.kind {
                        HierarchyKind::Coordinator(_) => theme::title_style(),
                        HierarchyKind::Node(_) => theme::table_row(),
                    }
                };
                spans.push(Span::styled(row.label.clone(), style));
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_detail(frame: &mut Frame, area: Rect, view: &NetworkView) {
        let block = Block::default()
            .title(" Entry ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail = view.hierarchy_detail();
        let lines = vec![
            Line::from(vec![
                Span::styled(" Level     ", theme::detail_label()),
                Span::styled(detail.level.clone(), theme::detail_value()),
            ]),
            Line::from(vec![
                Span::styled(" Siblings  ", theme::detail_label()),
                Span::styled(detail.siblings.clone(), theme::detail_value()),
            ]),
            Line::from(vec![
                Span::styled(" Children  ", theme::detail_label()),
                Span::styled(detail.children.clone(), theme::detail_value()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
