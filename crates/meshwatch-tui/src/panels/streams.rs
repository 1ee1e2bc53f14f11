//! Streams panel — the stream table plus a live detail footer.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use meshwatch_core::NetworkView;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Row, Table};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_delay_ms, fmt_packets, fmt_rate_kbps};

pub struct StreamsPanel {
    focused: bool,
    cursor: usize,
}

impl StreamsPanel {
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
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(row_count - 1);
        Some(Action::StreamClicked(self.cursor))
    }
}

impl Component for StreamsPanel {
    fn handle_key_event(&mut self, key: KeyEvent, view: &NetworkView) -> Result<Option<Action>> {
        let rows = view.streams().rows().len();
        let action = match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, rows),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, rows),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &NetworkView) {
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(5)]).split(area);
        self.render_table(frame, layout[0], view);
        Self::render_detail(frame, layout[1], view);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "streams"
    }
}

impl StreamsPanel {
    fn render_table(&self, frame: &mut Frame, area: Rect, view: &NetworkView) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Streams ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let rows: Vec<Row> = view
            .streams()
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if i == self.cursor {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Row::new(vec![
                    row.identity.clone(),
                    fmt_packets(row.desc.packet_count),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(rows, [Constraint::Min(24), Constraint::Length(8)])
            .header(Row::new(vec!["Stream", "Packets"]).style(theme::table_header()))
            .block(block);

        frame.render_widget(table, area);
    }

    fn render_detail(frame: &mut Frame, area: Rect, view: &NetworkView) {
        let block = Block::default()
            .title(" Stream detail ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail = view.streams().detail();
        let lines = vec![
            Line::from(vec![
                Span::styled(" Packets   ", theme::detail_label()),
                Span::styled(fmt_packets(detail.packet_count), theme::detail_value()),
            ]),
            Line::from(vec![
                Span::styled(" Rate      ", theme::detail_label()),
                Span::styled(fmt_rate_kbps(detail.qos.data_rate_kbps), theme::detail_value()),
            ]),
            Line::from(vec![
                Span::styled(" Delay     ", theme::detail_label()),
                Span::styled(fmt_delay_ms(detail.qos.delay_ms), theme::detail_value()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
