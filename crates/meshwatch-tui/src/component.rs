//! Component trait — the building block for every panel.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use meshwatch_core::NetworkView;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// Every panel implements Component.
///
/// Panels hold presentation state only (cursor, scroll, focus); the shared
/// [`NetworkView`] is owned by the app and passed in read-only wherever a
/// panel needs data.
///
/// Lifecycle: `init` → (`handle_key_event` | `render`)*
pub trait Component: Send {
    /// Called once when the component is mounted.
    /// Receives the action sender for dispatching actions to the app loop.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Handle a keyboard event while focused. Return an Action to dispatch,
    /// or None.
    fn handle_key_event(&mut self, _key: KeyEvent, _view: &NetworkView) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect, view: &NetworkView);

    /// Set focus state.
    fn set_focused(&mut self, _focused: bool) {}

    /// Unique identifier for this component.
    fn id(&self) -> &str;
}
