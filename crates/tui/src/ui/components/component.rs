//! Component system for the navmenu TUI.
//!
//! Components own their local UI behavior, render themselves into a provided
//! `Rect`, and report side effects back to the application as `Effect`s
//! rather than touching global state.

use crossterm::event::{KeyEvent, MouseEvent};
use navmenu_types::Effect;
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

pub(crate) trait Component {
    /// Handle a key while the component holds focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the footer while the component is focused.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }
}
