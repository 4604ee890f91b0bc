//! Top-level view: lays out the bar, the page pane and the hint footer, and
//! routes input to the component that should see it.

use crossterm::event::{KeyEvent, MouseEvent};
use navmenu_types::Effect;
use rat_focus::HasFocus;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::{Component, NavBarComponent, PageComponent, nav_bar::BAR_HEIGHT};

#[derive(Debug, Default)]
pub struct MainView {
    nav_bar: NavBarComponent,
    page: PageComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.nav_bar.is_focused() {
            self.nav_bar.handle_key_events(app, key)
        } else {
            self.page.handle_key_events(app, key)
        }
    }

    /// The bar sees every mouse event (outside presses matter to it); the
    /// page only reacts to presses that miss the bar.
    pub fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let mut effects = self.page.handle_mouse_events(app, mouse);
        effects.extend(self.nav_bar.handle_mouse_events(app, mouse));
        effects
    }

    /// Puts focus back on the bar when nothing holds it.
    pub fn restore_focus(&self, app: &App) {
        app.focus.focus(&app.nav_bar);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let [bar_area, page_area, hint_area] = Layout::vertical([
            Constraint::Length(BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        // The bar draws last so open panels overlay the page.
        self.page.render(frame, page_area, app);
        self.nav_bar.render(frame, bar_area, app);

        let hints = if app.nav_bar.is_focused() {
            self.nav_bar.get_hint_spans(app)
        } else {
            self.page.get_hint_spans(app)
        };
        frame.render_widget(Paragraph::new(Line::from(hints)), hint_area);
    }
}
