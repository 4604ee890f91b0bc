use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use navmenu_types::Effect;
use rat_focus::HasFocus;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::ui::components::{Component, nav_bar::NavHit};
use crate::ui::theme::theme_helpers as th;

#[derive(Debug, Default)]
pub struct PageComponent;

impl Component for PageComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        // Open panels overlap the page; presses on them belong to the bar.
        let on_page = app.page.last_area.contains(Position::new(mouse.column, mouse.row));
        if on_page && app.nav_bar.hit_test(mouse.column, mouse.row) == NavHit::Outside {
            app.focus.focus(&app.page);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.theme;
        let block = th::block(theme, Some("Page"), app.page.is_focused());

        let mut lines = vec![match app.page.current() {
            Some(href) => Line::from(vec![
                Span::styled("Current page: ", theme.text_secondary_style()),
                Span::styled(href.to_string(), theme.accent_emphasis_style()),
            ]),
            None => Line::styled("Nothing opened yet. Pick a link from the bar.", theme.text_muted_style()),
        }];
        lines.push(Line::default());
        lines.push(Line::styled("Recent activations", theme.text_secondary_style()));
        lines.extend(
            app.page
                .history()
                .map(|entry| Line::styled(format!("  {entry}"), theme.status_success())),
        );

        frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
        app.page.last_area = area;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        th::build_hint_spans(&*app.theme, &[(" Tab", " Back to menu"), (" Ctrl+C", " Quit")])
    }
}
