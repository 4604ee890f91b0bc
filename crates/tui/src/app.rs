//! Application state for the navmenu TUI.
//!
//! `App` owns the pointer document, the mounted navigation bar, the page pane
//! and the rat-focus tree. Components report `Effect`s; `App` applies them.

use std::rc::Rc;

use navmenu_engine::{EventStamp, PointerDocument};
use navmenu_types::{Action, Direction, Effect, Msg};
use navmenu_util::NavBarDefinition;
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::ui::components::{NavBarState, PageState};
use crate::ui::theme::Theme;

pub struct App {
    pub nav_bar: NavBarState,
    pub page: PageState,
    pub theme: Box<dyn Theme>,
    /// Focus tree, rebuilt before every frame.
    pub focus: Rc<Focus>,
    container: FocusFlag,
    document: PointerDocument,
    last_stamp: EventStamp,
}

impl App {
    pub fn new(definition: &NavBarDefinition, theme: Box<dyn Theme>) -> Self {
        let document = PointerDocument::new();
        let nav_bar = NavBarState::from_definition(definition, &document);
        let mut app = Self {
            nav_bar,
            page: PageState::new(),
            theme,
            focus: Rc::new(Focus::default()),
            container: FocusFlag::named("app"),
            document,
            last_stamp: 0,
        };
        let focus = FocusBuilder::build_for(&app);
        focus.focus(&app.nav_bar);
        app.focus = Rc::new(focus);
        app
    }

    pub fn document(&self) -> &PointerDocument {
        &self.document
    }

    /// A fresh stamp for one logical input event.
    pub fn next_stamp(&mut self) -> EventStamp {
        self.last_stamp += 1;
        self.last_stamp
    }

    pub fn update(&mut self, msg: &Msg) {
        match msg {
            Msg::Resize(width, height) => debug!(width, height, "terminal resized"),
        }
    }

    /// Brings the menu group's focus in line with the focus tree.
    pub fn sync_nav_focus(&mut self) -> Vec<Effect> {
        let stamp = self.next_stamp();
        self.nav_bar.sync_focus(stamp)
    }

    /// Applies effects until focus changes stop producing new ones.
    pub fn apply_effects(&mut self, effects: Vec<Effect>) {
        let mut pending = effects;
        loop {
            for effect in pending.drain(..) {
                self.apply_effect(effect);
            }
            pending = self.sync_nav_focus();
            if pending.is_empty() {
                break;
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Activate { target, action } => match action {
                Action::Navigate(href) => {
                    info!(target = %target, href = %href, "navigating");
                    self.page.navigate(&target, &href);
                }
                Action::Invoke(command) => {
                    info!(target = %target, command = %command, "command invoked");
                    self.page.record(format!("{target} ran {command}"));
                }
                Action::None => debug!(target = %target, "activated target has no action"),
            },
            Effect::MenuOpened(menu) => debug!(menu = %menu, "menu opened"),
            Effect::MenuClosed(menu) => debug!(menu = %menu, "menu closed"),
            Effect::FocusTarget(target) => {
                debug!(?target, "focus requested");
                if !self.nav_bar.is_focused() {
                    self.focus.focus(&self.nav_bar);
                }
            }
            Effect::FocusLeave(Direction::Next) => {
                self.focus.next();
            }
            Effect::FocusLeave(Direction::Previous) => {
                self.focus.prev();
            }
        }
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.widget(&self.nav_bar);
        builder.widget(&self.page);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use navmenu_types::TargetId;

    use super::*;
    use crate::ui::theme::DraculaTheme;

    fn app() -> App {
        App::new(&NavBarDefinition::builtin(), Box::new(DraculaTheme::new()))
    }

    #[test]
    fn navigate_effect_updates_the_page() {
        let mut app = app();
        app.apply_effects(vec![Effect::Activate {
            target: TargetId::from("profile"),
            action: Action::Navigate("/page/profile".into()),
        }]);
        assert_eq!(app.page.current(), Some("/page/profile"));
    }

    #[test]
    fn invoke_effect_is_recorded_without_navigating() {
        let mut app = app();
        app.apply_effects(vec![Effect::Activate {
            target: TargetId::from("logout"),
            action: Action::Invoke("session.logout".into()),
        }]);
        assert_eq!(app.page.current(), None);
        assert_eq!(app.page.history().next(), Some("logout ran session.logout"));
    }

    #[test]
    fn stamps_are_unique_per_event() {
        let mut app = app();
        let first = app.next_stamp();
        assert!(app.next_stamp() > first);
    }

    #[test]
    fn focused_bar_takes_group_focus_on_sync() {
        let mut app = app();
        app.nav_bar.container_focus.set(true);
        app.apply_effects(Vec::new());
        assert!(app.nav_bar.group().has_focus());
        assert_eq!(app.nav_bar.group().active_id(), Some(&TargetId::from("student")));
    }
}
