use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use navmenu_engine::{DisclosureMenu, Focusable};
use navmenu_types::{Effect, MenuKey};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Borders, Clear, Paragraph},
};

use super::state::{NavHit, PanelArea, entry_label, layout_entries, layout_panel};
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::{
    Theme,
    theme_helpers::{self as th, ButtonRenderOptions, render_button},
};

/// Maps a terminal key to the keys the menu engine understands.
pub fn menu_key(key: &KeyEvent) -> MenuKey {
    match key.code {
        KeyCode::Up => MenuKey::ArrowUp,
        KeyCode::Down => MenuKey::ArrowDown,
        KeyCode::Left => MenuKey::ArrowLeft,
        KeyCode::Right => MenuKey::ArrowRight,
        KeyCode::Home => MenuKey::Home,
        KeyCode::End => MenuKey::End,
        KeyCode::Enter => MenuKey::Enter,
        KeyCode::Char(' ') => MenuKey::Space,
        KeyCode::Esc => MenuKey::Escape,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => MenuKey::BackTab,
        KeyCode::Tab => MenuKey::Tab,
        KeyCode::BackTab => MenuKey::BackTab,
        _ => MenuKey::Other,
    }
}

/// Renders the bar and its open panels, and feeds input to the menu group.
#[derive(Debug, Default)]
pub struct NavBarComponent;

impl NavBarComponent {
    pub fn new() -> Self {
        Self
    }

    fn render_panel(frame: &mut Frame, trigger: Rect, menu: &DisclosureMenu, group_focused: bool, theme: &dyn Theme) -> PanelArea {
        let labels: Vec<&str> = menu.items().iter().map(|item| item.label.as_str()).collect();
        let (area, rows) = layout_panel(trigger, frame.area(), &labels);
        frame.render_widget(Clear, area);

        let items_focused = group_focused && menu.focused_item().is_some();
        frame.render_widget(th::block(theme, None, items_focused), area);
        for (index, (item, row)) in menu.items().iter().zip(rows.iter()).enumerate() {
            let focused = items_focused && menu.focused_item() == Some(index);
            let style = th::menu_item_style(theme, item.enabled, focused);
            frame.render_widget(Paragraph::new(Line::from(format!(" {}", item.label))).style(style), *row);
        }
        PanelArea {
            menu: menu.id().clone(),
            area,
            item_areas: rows,
        }
    }
}

impl Component for NavBarComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let key = menu_key(&key);
        if key == MenuKey::Other {
            return Vec::new();
        }
        let stamp = app.next_stamp();
        app.nav_bar.group_mut().handle_key(key, stamp)
    }

    /// Every press goes to the pointer document first so open menus can
    /// close on outside presses; presses on the bar then act on it.
    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let hit = app.nav_bar.hit_test(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let stamp = app.next_stamp();
                let mut effects = app.document().dispatch(&hit.press_target());
                match &hit {
                    NavHit::Entry(id) => {
                        app.focus.focus(&app.nav_bar);
                        effects.extend(app.nav_bar.group_mut().click(id, stamp));
                    }
                    NavHit::Item { menu, index } => {
                        app.focus.focus(&app.nav_bar);
                        effects.extend(app.nav_bar.group_mut().click_item(menu, *index, stamp));
                    }
                    NavHit::Panel(_) | NavHit::Outside => {}
                }
                effects
            }
            // Hover counts only when the pointer enters a trigger, not on
            // every move inside it.
            MouseEventKind::Moved => match app.nav_bar.pointer_entered(&hit) {
                Some(id) => {
                    let stamp = app.next_stamp();
                    app.nav_bar.group_mut().hover(&id, stamp)
                }
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.theme;
        let group = app.nav_bar.group();
        let has_focus = group.has_focus();
        let active = group.active_index();
        let labels: Vec<String> = group.entries().map(entry_label).collect();
        let rects = layout_entries(area, &labels);

        let mut entry_areas = Vec::with_capacity(rects.len());
        let mut open_panels = Vec::new();
        for (index, (entry, rect)) in group.entries().zip(rects.iter().copied()).enumerate() {
            let selected = active == Some(index);
            let menu = entry.as_menu();
            // Focus sits on the trigger unless it has moved into the panel.
            let focused = has_focus && selected && menu.is_none_or(|menu| menu.focused_item().is_none());
            let borders = if focused { Borders::ALL } else { Borders::NONE };
            let open = menu.is_some_and(DisclosureMenu::is_open);
            render_button(
                frame,
                rect,
                &labels[index],
                theme,
                ButtonRenderOptions::new(entry.is_enabled(), focused, selected || open, borders),
            );
            entry_areas.push((entry.id().clone(), rect));
            if let Some(menu) = menu.filter(|menu| menu.is_open()) {
                open_panels.push((rect, menu));
            }
        }

        let panel_areas = open_panels
            .into_iter()
            .map(|(trigger, menu)| Self::render_panel(frame, trigger, menu, has_focus, theme))
            .collect();
        drop(group);

        app.nav_bar.last_area = area;
        app.nav_bar.entry_areas = entry_areas;
        app.nav_bar.panel_areas = panel_areas;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let group = app.nav_bar.group();
        let hints: &[(&'static str, &'static str)] = if group.open_menus().is_empty() {
            &[(" ←/→", " Move"), (" ↓/Enter", " Open"), (" Tab", " Leave")]
        } else {
            &[(" ↑/↓", " Choose"), (" Enter", " Activate"), (" Esc", " Close"), (" ←/→", " Next menu")]
        };
        th::build_hint_spans(&*app.theme, hints)
    }
}
