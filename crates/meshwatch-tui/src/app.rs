//! Application core — event loop, panel management, action dispatch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use meshwatch_config::Config;
use meshwatch_core::{NetworkView, SceneItem};
use meshwatch_sim::Scenario;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_topology_bridge;
use crate::event::{Event, EventReader};
use crate::panel::PanelId;
use crate::panels::create_panels;
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    /// Live simulation handle; all reads go through its snapshot surface.
    scenario: Arc<Scenario>,
    /// The reconciled display projections.
    view: NetworkView,
    /// All panel components, keyed by PanelId.
    panels: HashMap<PanelId, Box<dyn Component>>,
    /// Panel that currently receives key events.
    focused_panel: PanelId,
    /// Whether the overview is shown and refresh ticks are consumed.
    overview_visible: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Whether the app should keep running.
    running: bool,
    /// Terminal size for responsive layout.
    terminal_size: (u16, u16),
    /// Loaded configuration; UI state is written back on exit.
    config: Config,
    /// Where to persist the configuration.
    config_path: PathBuf,
    /// Cancels background tasks on shutdown.
    cancel: CancellationToken,
    /// Action sender — components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(
        scenario: Arc<Scenario>,
        config: Config,
        config_path: PathBuf,
        cancel: CancellationToken,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let view = NetworkView::new(&*scenario);
        let panels: HashMap<PanelId, Box<dyn Component>> = create_panels().into_iter().collect();
        let focused_panel = PanelId::from_config_name(&config.ui.focused_panel);
        let overview_visible = config.ui.overview_visible;

        Self {
            scenario,
            view,
            panels,
            focused_panel,
            overview_visible,
            help_visible: false,
            running: true,
            terminal_size: (0, 0),
            config,
            config_path,
            cancel,
            action_tx,
            action_rx,
        }
    }

    /// Initialize all panel components with the action sender.
    fn init_panels(&mut self) -> Result<()> {
        for panel in self.panels.values_mut() {
            panel.init(self.action_tx.clone())?;
        }
        if let Some(panel) = self.panels.get_mut(&self.focused_panel) {
            panel.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.init_panels()?;

        spawn_topology_bridge(
            &self.scenario,
            self.action_tx.clone(),
            self.cancel.child_token(),
        );

        let mut events = EventReader::new(
            Duration::from_millis(self.config.refresh_interval_ms),
            Duration::from_millis(33), // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    // A hidden overview does no reconciliation work. It also
                    // gets no forced catch-up on re-show; the next tick
                    // brings it current.
                    if self.overview_visible {
                        self.action_tx.send(Action::Tick)?;
                    }
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.cancel.cancel();
        self.persist_ui_state();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Write the visibility flag and focused panel back to the config file.
    fn persist_ui_state(&mut self) {
        self.config.ui.overview_visible = self.overview_visible;
        self.config.ui.focused_panel = self.focused_panel.config_name().to_owned();
        if let Err(e) = meshwatch_config::save_config_to(&self.config, &self.config_path) {
            warn!(error = %e, "failed to persist UI state");
        }
    }

    /// Map a key event to an action. Global keys are handled here;
    /// panel-specific keys are delegated to the focused panel.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char('v')) => return Ok(Some(Action::ToggleOverview)),

            // Panel focus via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
                if let Some(panel) = c
                    .to_digit(10)
                    .and_then(|n| u8::try_from(n).ok())
                    .and_then(PanelId::from_number)
                {
                    return Ok(Some(Action::FocusPanel(panel)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => return Ok(Some(Action::FocusNext)),
            (KeyModifiers::SHIFT, KeyCode::BackTab) => return Ok(Some(Action::FocusPrev)),

            _ => {}
        }

        // Delegate to the focused panel; a hidden overview eats no keys
        // beyond the globals above.
        if self.overview_visible {
            if let Some(panel) = self.panels.get_mut(&self.focused_panel) {
                return panel.handle_key_event(key, &self.view);
            }
        }

        Ok(None)
    }

    /// Process a single action — update app state and the view.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
            }

            Action::Tick => {
                self.view.refresh(&*self.scenario);
            }

            Action::TopologyChanged => {
                debug!("topology changed, reprojecting");
                self.view.rebuild_hierarchy(&*self.scenario);
                self.view.rebuild_graph(&*self.scenario);
            }

            Action::FocusPanel(target) => self.focus_panel(*target),
            Action::FocusNext => self.focus_panel(self.focused_panel.next()),
            Action::FocusPrev => self.focus_panel(self.focused_panel.prev()),

            Action::ToggleOverview => {
                self.overview_visible = !self.overview_visible;
                debug!(visible = self.overview_visible, "overview toggled");
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::HierarchyClicked(row) => {
                self.view.hierarchy_clicked(*row);
            }

            Action::StreamClicked(row) => {
                self.view.stream_clicked(*row);
            }

            Action::CycleSceneNode => {
                let address = {
                    let nodes = self.view.graph().nodes();
                    if nodes.is_empty() {
                        None
                    } else {
                        let next = self
                            .view
                            .selection()
                            .selected_node()
                            .and_then(|cur| nodes.iter().position(|n| n.address == cur))
                            .map_or(0, |i| (i + 1) % nodes.len());
                        nodes.get(next).map(|n| n.address.clone())
                    }
                };
                if let Some(address) = address {
                    self.view
                        .scene_selection_changed(&[SceneItem::Node(address)]);
                }
            }

            Action::SelectLink(a, b) => {
                self.view
                    .scene_selection_changed(&[SceneItem::Link(a.clone(), b.clone())]);
            }

            Action::MoveNode(dx, dy) => {
                self.view.move_selected_node(*dx, *dy);
            }

            // Render is handled in the main loop, not here
            Action::Render => {}
        }

        Ok(())
    }

    fn focus_panel(&mut self, target: PanelId) {
        if target == self.focused_panel {
            return;
        }
        debug!("switching focus: {} → {}", self.focused_panel, target);
        if let Some(panel) = self.panels.get_mut(&self.focused_panel) {
            panel.set_focused(false);
        }
        self.focused_panel = target;
        if let Some(panel) = self.panels.get_mut(&self.focused_panel) {
            panel.set_focused(true);
        }
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Overview content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if self.overview_visible {
            self.render_overview(frame, layout[0]);
        } else {
            Self::render_hidden_placeholder(frame, layout[0]);
        }

        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    /// Overview layout: hierarchy | network | streams+routing.
    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::horizontal([
            Constraint::Length(34),
            Constraint::Min(30),
            Constraint::Length(46),
        ])
        .split(area);

        let right = Layout::vertical([Constraint::Percentage(55), Constraint::Min(5)])
            .split(columns[2]);

        let spots = [
            (PanelId::Hierarchy, columns[0]),
            (PanelId::Network, columns[1]),
            (PanelId::Streams, right[0]),
            (PanelId::Routing, right[1]),
        ];
        for (id, spot) in spots {
            if let Some(panel) = self.panels.get(&id) {
                panel.render(frame, spot, &self.view);
            }
        }
    }

    fn render_hidden_placeholder(frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let y = inner.y + inner.height / 2;
        let line = Line::from(vec![
            Span::styled("overview hidden — press ", theme::key_hint()),
            Span::styled("v", theme::key_hint_key()),
            Span::styled(" to show", theme::key_hint()),
        ])
        .centered();
        frame.render_widget(
            Paragraph::new(line),
            Rect::new(inner.x, y, inner.width, 1),
        );
    }

    /// Render the bottom status bar with panel focus and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let focus = Span::styled(
            format!("[{}]", self.focused_panel),
            Style::default().fg(theme::AMBER),
        );
        let hints = Span::styled(
            " │ 1-4 panels  Tab cycle  v overview  ? help  q quit",
            theme::key_hint(),
        );

        let line = Line::from(vec![Span::raw(" "), focus, hints]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 18u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_HIGHLIGHT)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled("  Navigation", theme::title_style())),
            Line::from(vec![
                Span::styled("  1-4       ", theme::key_hint_key()),
                Span::styled("Focus panel", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Tab       ", theme::key_hint_key()),
                Span::styled("Next panel", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  j/k ↑/↓   ", theme::key_hint_key()),
                Span::styled("Move selection", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Network panel", theme::title_style())),
            Line::from(vec![
                Span::styled("  n         ", theme::key_hint_key()),
                Span::styled("Cycle selected node", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  h/j/k/l   ", theme::key_hint_key()),
                Span::styled("Move selected node", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  e         ", theme::key_hint_key()),
                Span::styled("Select adjacent link", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Global", theme::title_style())),
            Line::from(vec![
                Span::styled("  v         ", theme::key_hint_key()),
                Span::styled("Show / hide overview", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  q         ", theme::key_hint_key()),
                Span::styled("Quit", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "                     Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

#[cfg(test)]
mod tests {
    use meshwatch_sim::demo_scenario;
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_app() -> App {
        App::new(
            Arc::new(demo_scenario()),
            Config::default(),
            PathBuf::from("/tmp/meshwatch-app-test.toml"),
            CancellationToken::new(),
        )
    }

    #[test]
    fn number_keys_focus_their_panel() {
        let mut app = test_app();
        let cases = [
            ('1', PanelId::Hierarchy),
            ('2', PanelId::Network),
            ('3', PanelId::Streams),
            ('4', PanelId::Routing),
        ];
        for (c, id) in cases {
            let action = app
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .expect("key handled");
            assert_eq!(action, Some(Action::FocusPanel(id)));
        }
    }

    #[test]
    fn link_selection_is_observed_without_stealing_node_focus() {
        let mut app = test_app();
        let before = app.view.selection().selected_node().map(str::to_owned);
        assert_eq!(before.as_deref(), Some("1.1.1"));

        app.process_action(&Action::SelectLink("1.1.1".into(), "1.1.2".into()))
            .expect("action processed");
        assert_eq!(app.view.selection().selected_node(), before.as_deref());
    }
}
