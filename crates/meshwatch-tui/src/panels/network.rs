//! Network panel — node markers and link segments on a canvas.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use meshwatch_core::{DisplayLink, NetworkView};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Step for keyboard node dragging, in world units.
const MOVE_STEP: f64 = 2.0;

/// A link is emphasized when one of its endpoints is the selected node.
fn touches_selected(link: &DisplayLink, selected: Option<&str>) -> bool {
    selected.is_some_and(|addr| link.node0 == addr || link.node1 == addr)
}

pub struct NetworkPanel {
    focused: bool,
}

impl NetworkPanel {
    pub fn new() -> Self {
        Self { focused: false }
    }
}

impl Component for NetworkPanel {
    fn handle_key_event(&mut self, key: KeyEvent, view: &NetworkView) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('n') => Some(Action::CycleSceneNode),
            // Select a link adjacent to the selected node.
            KeyCode::Char('e') => {
                let selected = view.selection().selected_node();
                view.graph()
                    .links()
                    .iter()
                    .find(|link| touches_selected(link, selected))
                    .map(|link| Action::SelectLink(link.node0.clone(), link.node1.clone()))
            }
            KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveNode(-MOVE_STEP, 0.0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveNode(MOVE_STEP, 0.0)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveNode(0.0, -MOVE_STEP)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveNode(0.0, MOVE_STEP)),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &NetworkView) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Network ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let graph = view.graph();
        let selected = view.selection().selected_node();

        // World bounds with a margin so edge nodes and labels stay inside.
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (0.0f64, 0.0f64, 40.0f64, 30.0f64);
        for node in graph.nodes() {
            min_x = min_x.min(node.position.0);
            min_y = min_y.min(node.position.1);
            max_x = max_x.max(node.position.0);
            max_y = max_y.max(node.position.1);
        }
        let margin = 6.0;

        // Position hints grow downwards; the canvas y-axis grows upwards.
        let flip = |y: f64| max_y - y;

        let canvas = Canvas::default()
            .block(block)
            .x_bounds([min_x - margin, max_x + margin])
            .y_bounds([flip(max_y) - margin, flip(min_y) + margin])
            .paint(|ctx| {
                for link in graph.links() {
                    if !link.visible {
                        continue;
                    }
                    let color = if touches_selected(link, selected) {
                        theme::AMBER
                    } else {
                        theme::BORDER_GRAY
                    };
                    ctx.draw(&CanvasLine {
                        x1: link.line.0.0,
                        y1: flip(link.line.0.1),
                        x2: link.line.1.0,
                        y2: flip(link.line.1.1),
                        color,
                    });
                }
                ctx.layer();
                for node in graph.nodes() {
                    let style = if selected == Some(node.address.as_str()) {
                        theme::table_selected()
                    } else {
                        Style::default().fg(theme::MINT)
                    };
                    let label = format!("● {}", node.address);
                    ctx.print(
                        node.position.0,
                        flip(node.position.1),
                        Line::styled(label, style),
                    );
                }
            });

        frame.render_widget(canvas, area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "network"
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use meshwatch_sim::demo_scenario;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn links_touching_the_selected_node_are_emphasized() {
        let view = NetworkView::new(&demo_scenario());
        let selected = view.selection().selected_node();
        assert_eq!(selected, Some("1.1.1"));

        let links = view.graph().links();
        let emphasized = links
            .iter()
            .filter(|l| touches_selected(l, selected))
            .count();
        assert_eq!(emphasized, 2);
        assert!(links.iter().any(|l| !touches_selected(l, selected)));
    }

    #[test]
    fn edge_key_selects_a_link_adjacent_to_the_selected_node() {
        let view = NetworkView::new(&demo_scenario());
        let mut panel = NetworkPanel::new();

        let action = panel
            .handle_key_event(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE), &view)
            .expect("key handled");
        assert_eq!(
            action,
            Some(Action::SelectLink("1.1.1".into(), "1.1.2".into()))
        );
    }
}
