//! A single disclosure menu: one trigger plus one panel of items.
//!
//! The menu owns its open flag and its item [`FocusRing`]. Every input is
//! resolved to a [`MenuEvent`], looked up in the [`transition`] table and then
//! applied here, so the only way to change a menu is through one of those
//! rows.

mod transition;

pub use transition::{FocusIntent, ItemActivation, MenuConfig, MenuEvent, MenuState, Transition, transition};

use navmenu_types::{Direction, Effect, FocusTarget, MenuKey, PressTarget, TargetId};
use tracing::debug;

use crate::focus_ring::{FocusRing, HookVerdict, RingOptions};
use crate::target::{Focusable, Target};

/// Identifies one logical user action. A click and any keydown synthesized
/// for the same action share a stamp.
pub type EventStamp = u64;

/// Which part of the menu holds input focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuFocus {
    #[default]
    Outside,
    Trigger,
    Item,
}

/// Result of routing a key through a menu.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    pub effects: Vec<Effect>,
    pub handled: bool,
    /// The parent context should also see this key.
    pub escalate: bool,
}

#[derive(Debug)]
pub struct DisclosureMenu {
    trigger: Target,
    items: FocusRing<Target>,
    state: MenuState,
    config: MenuConfig,
    focus: MenuFocus,
    focus_request: Option<FocusTarget>,
    last_toggle: Option<EventStamp>,
}

impl DisclosureMenu {
    pub fn new(trigger: Target, items: Vec<Target>, config: MenuConfig) -> Self {
        Self::with_item_ring(trigger, FocusRing::with_targets(items, RingOptions::vertical()), config)
    }

    /// Builds a menu over a prepared item ring, e.g. one carrying a key hook.
    pub fn with_item_ring(trigger: Target, items: FocusRing<Target>, config: MenuConfig) -> Self {
        Self {
            trigger,
            items,
            state: MenuState::Closed,
            config,
            focus: MenuFocus::Outside,
            focus_request: None,
            last_toggle: None,
        }
    }

    pub fn id(&self) -> &TargetId {
        &self.trigger.id
    }

    pub fn trigger(&self) -> &Target {
        &self.trigger
    }

    pub fn items(&self) -> &FocusRing<Target> {
        &self.items
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn focus(&self) -> MenuFocus {
        self.focus
    }

    /// Active item index; only meaningful while the menu is open.
    pub fn item_active_index(&self) -> Option<usize> {
        self.items.active_index()
    }

    /// Index of the item currently holding focus, if any.
    pub fn focused_item(&self) -> Option<usize> {
        match self.focus {
            MenuFocus::Item if self.is_open() => self.items.active_index(),
            _ => None,
        }
    }

    /// Takes the pending focus move, if one survived until now.
    pub fn take_focus_request(&mut self) -> Option<FocusTarget> {
        self.focus_request.take()
    }

    /// Whether a document press landed on this menu's trigger or open panel.
    pub fn contains(&self, press: &PressTarget) -> bool {
        match press {
            PressTarget::Target(id) => id == self.id(),
            PressTarget::Panel(id) => self.is_open() && id == self.id(),
            PressTarget::Elsewhere => false,
        }
    }

    pub fn register_item(&mut self, item: Target, index: usize) -> usize {
        self.items.register(item, index)
    }

    pub fn deregister_item(&mut self, id: &TargetId) -> Option<Target> {
        self.items.deregister(id)
    }

    /// Marks the trigger as focused without running a transition.
    pub fn place_focus_on_trigger(&mut self) {
        self.focus = MenuFocus::Trigger;
    }

    /// Focus left the menu entirely. The open flag is untouched.
    pub fn blur(&mut self) {
        self.focus = MenuFocus::Outside;
        self.focus_request = None;
    }

    pub fn click(&mut self, stamp: EventStamp) -> Vec<Effect> {
        self.focus = MenuFocus::Trigger;
        self.apply(MenuEvent::TriggerClick, stamp)
    }

    pub fn hover(&mut self, stamp: EventStamp) -> Vec<Effect> {
        self.apply(MenuEvent::TriggerHover, stamp)
    }

    pub fn focus_trigger(&mut self, stamp: EventStamp) -> Vec<Effect> {
        self.focus = MenuFocus::Trigger;
        self.apply(MenuEvent::TriggerFocus, stamp)
    }

    pub fn activate_item(&mut self, index: usize, stamp: EventStamp) -> Vec<Effect> {
        self.apply(MenuEvent::ItemActivate(index), stamp)
    }

    pub fn dismiss(&mut self, event: MenuEvent) -> Vec<Effect> {
        self.apply(event, 0)
    }

    /// Applies one transition-table row.
    ///
    /// A toggle whose stamp matches the last applied toggle is dropped so one
    /// logical activation never flips the menu twice.
    pub fn apply(&mut self, event: MenuEvent, stamp: EventStamp) -> Vec<Effect> {
        if event == MenuEvent::TriggerClick {
            if self.last_toggle == Some(stamp) {
                debug!(menu = %self.id(), stamp, "dropping duplicate toggle");
                return Vec::new();
            }
            self.last_toggle = Some(stamp);
        }

        let mut activated = None;
        if let MenuEvent::ItemActivate(index) = event {
            match self.items.get(index) {
                Some(item) if item.is_enabled() => activated = Some(item.clone()),
                _ => return Vec::new(),
            }
        }

        let row = transition(self.state, event, &self.config);
        let previous = std::mem::replace(&mut self.state, row.next);
        let mut effects = Vec::new();
        match (previous, row.next) {
            (MenuState::Closed, MenuState::Open) => {
                debug!(menu = %self.id(), ?event, "menu opened");
                effects.push(Effect::MenuOpened(self.id().clone()));
            }
            (MenuState::Open, MenuState::Closed) => {
                debug!(menu = %self.id(), ?event, "menu closed");
                self.on_close();
                effects.push(Effect::MenuClosed(self.id().clone()));
            }
            _ => {}
        }

        self.apply_focus(row.focus);

        if let (Some(_), Some(item)) = (row.activate, activated) {
            effects.push(Effect::Activate {
                target: item.id,
                action: item.action,
            });
        }
        effects
    }

    /// Routes a key according to where focus currently sits.
    ///
    /// Keys the menu does not use (ArrowLeft/ArrowRight, Home/End on the
    /// trigger, anything while focus is outside) are escalated. Tab closes the
    /// menu and is escalated as well so the parent can move focus out.
    pub fn handle_key(&mut self, key: MenuKey, stamp: EventStamp) -> KeyOutcome {
        let event = match self.focus {
            MenuFocus::Trigger => self.trigger_key_event(key),
            MenuFocus::Item => self.item_key_event(key),
            MenuFocus::Outside => None,
        };

        let mut outcome = KeyOutcome::default();
        if let Some(event) = event {
            outcome.effects = self.apply(event, stamp);
            outcome.handled = true;
        }
        outcome.escalate = !outcome.handled || key.is_tab();

        match self.items.run_key_hook(key, outcome.handled) {
            HookVerdict::Continue => {}
            HookVerdict::Escalate => outcome.escalate = true,
            HookVerdict::Consume => {
                outcome.escalate = false;
                outcome.handled = true;
            }
        }
        outcome
    }

    fn trigger_key_event(&self, key: MenuKey) -> Option<MenuEvent> {
        match key {
            MenuKey::Enter | MenuKey::Space => Some(MenuEvent::TriggerClick),
            MenuKey::ArrowDown => Some(MenuEvent::TriggerArrow(Direction::Next)),
            MenuKey::ArrowUp => Some(MenuEvent::TriggerArrow(Direction::Previous)),
            MenuKey::Escape if self.is_open() => Some(MenuEvent::Escape),
            MenuKey::Tab | MenuKey::BackTab => Some(MenuEvent::TabOut),
            _ => None,
        }
    }

    fn item_key_event(&self, key: MenuKey) -> Option<MenuEvent> {
        if !self.is_open() {
            return None;
        }
        if let Some(direction) = self.items.direction_for(key) {
            return Some(MenuEvent::ItemStep(direction));
        }
        let active = self.items.active_index();
        match key {
            MenuKey::Home => Some(MenuEvent::ItemHome),
            MenuKey::End => Some(MenuEvent::ItemEnd),
            MenuKey::Enter => active.map(MenuEvent::ItemActivate),
            MenuKey::Space if self.config.activation == ItemActivation::Button => active.map(MenuEvent::ItemActivate),
            MenuKey::Escape => Some(MenuEvent::Escape),
            MenuKey::Tab | MenuKey::BackTab => Some(MenuEvent::TabOut),
            _ => None,
        }
    }

    fn on_close(&mut self) {
        self.items.reset();
        self.focus_request = None;
        if self.focus == MenuFocus::Item {
            self.focus = MenuFocus::Outside;
        }
    }

    fn apply_focus(&mut self, intent: FocusIntent) {
        let moved = match intent {
            FocusIntent::Keep => return,
            FocusIntent::Trigger => {
                self.focus = MenuFocus::Trigger;
                self.focus_request = Some(FocusTarget::Entry(self.id().clone()));
                return;
            }
            FocusIntent::FirstItem => self.items.focus_first(),
            FocusIntent::LastItem => self.items.focus_last(),
            FocusIntent::Step(direction) if self.focus == MenuFocus::Item => self.items.focus(direction),
            FocusIntent::Step(Direction::Next) => self.items.focus_first(),
            FocusIntent::Step(Direction::Previous) => self.items.focus_last(),
        };
        if let Some(item) = moved.map(|item| item.id.clone()) {
            self.focus = MenuFocus::Item;
            self.focus_request = Some(FocusTarget::Item {
                menu: self.trigger.id.clone(),
                item,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navmenu_types::Action;

    fn teacher_menu(config: MenuConfig) -> DisclosureMenu {
        DisclosureMenu::new(
            Target::trigger("teacher", "Teacher"),
            vec![
                Target::link("add-teacher", "Add a teacher", "/page/create/teacher"),
                Target::link("teacher-attendance", "Attendance", "/page/attend/teacher"),
                Target::link("teacher-reports", "Reports", "/page/reports/teacher"),
            ],
            config,
        )
    }

    #[test]
    fn click_toggles_once_per_stamp() {
        let mut menu = teacher_menu(MenuConfig::click_only());
        assert_eq!(menu.click(1), vec![Effect::MenuOpened("teacher".into())]);
        assert!(menu.is_open());

        // Enter on the focused trigger for the same user action.
        let outcome = menu.handle_key(MenuKey::Enter, 1);
        assert!(outcome.effects.is_empty());
        assert!(menu.is_open());

        menu.click(2);
        assert!(!menu.is_open());
        menu.click(3);
        menu.click(4);
        assert!(!menu.is_open(), "two rapid clicks end closed");
    }

    #[test]
    fn closing_resets_the_item_ring() {
        let mut menu = teacher_menu(MenuConfig::click_only());
        menu.click(1);
        menu.handle_key(MenuKey::ArrowDown, 2);
        menu.handle_key(MenuKey::ArrowDown, 3);
        menu.handle_key(MenuKey::ArrowDown, 4);
        assert_eq!(menu.focused_item(), Some(2));

        menu.dismiss(MenuEvent::OutsidePress);
        assert!(!menu.is_open());
        assert_eq!(menu.take_focus_request(), None, "pending item focus is discarded");

        menu.click(5);
        assert_eq!(menu.item_active_index(), Some(0));
    }

    #[test]
    fn activating_an_item_closes_and_reports_the_action() {
        let mut menu = teacher_menu(MenuConfig::click_only());
        menu.click(1);
        let effects = menu.activate_item(1, 2);
        assert_eq!(
            effects,
            vec![
                Effect::MenuClosed("teacher".into()),
                Effect::Activate {
                    target: "teacher-attendance".into(),
                    action: Action::Navigate("/page/attend/teacher".into()),
                },
            ]
        );
        assert!(!menu.is_open());
        assert_eq!(menu.focus(), MenuFocus::Trigger);
        assert_eq!(menu.take_focus_request(), Some(FocusTarget::Entry("teacher".into())));
    }

    #[test]
    fn disabled_items_do_not_activate() {
        let mut menu = DisclosureMenu::new(
            Target::trigger("student", "Student"),
            vec![Target::link("add-student", "Add a student", "/page/attend/student").disabled()],
            MenuConfig::click_only(),
        );
        menu.click(1);
        assert!(menu.activate_item(0, 2).is_empty());
        assert!(menu.is_open());
        assert!(menu.activate_item(7, 3).is_empty());
    }

    #[test]
    fn arrow_down_from_trigger_enters_first_item_then_advances() {
        let mut menu = teacher_menu(MenuConfig::click_only());
        menu.place_focus_on_trigger();
        let outcome = menu.handle_key(MenuKey::ArrowDown, 1);
        assert!(outcome.handled);
        assert!(menu.is_open());
        assert_eq!(menu.focused_item(), Some(0));
        assert_eq!(
            menu.take_focus_request(),
            Some(FocusTarget::Item {
                menu: "teacher".into(),
                item: "add-teacher".into()
            })
        );

        menu.handle_key(MenuKey::ArrowDown, 2);
        assert_eq!(menu.focused_item(), Some(1));
        menu.handle_key(MenuKey::ArrowUp, 3);
        menu.handle_key(MenuKey::ArrowUp, 4);
        assert_eq!(menu.focused_item(), Some(2), "wraps to the last item");
        menu.handle_key(MenuKey::Home, 5);
        assert_eq!(menu.focused_item(), Some(0));
        menu.handle_key(MenuKey::End, 6);
        assert_eq!(menu.focused_item(), Some(2));
    }

    #[test]
    fn escape_closes_and_returns_focus_to_trigger() {
        let mut menu = teacher_menu(MenuConfig::click_only());
        menu.place_focus_on_trigger();
        menu.handle_key(MenuKey::ArrowDown, 1);
        menu.handle_key(MenuKey::Escape, 2);
        assert!(!menu.is_open());
        assert_eq!(menu.focus(), MenuFocus::Trigger);
    }

    #[test]
    fn tab_always_closes_and_escalates() {
        let mut menu = teacher_menu(MenuConfig::click_only());
        menu.click(1);
        menu.handle_key(MenuKey::ArrowDown, 2);
        let outcome = menu.handle_key(MenuKey::Tab, 3);
        assert!(outcome.handled);
        assert!(outcome.escalate);
        assert!(!menu.is_open());
    }

    #[test]
    fn horizontal_arrows_are_escalated_to_the_parent() {
        let mut menu = teacher_menu(MenuConfig::click_only());
        menu.click(1);
        let outcome = menu.handle_key(MenuKey::ArrowRight, 2);
        assert!(!outcome.handled);
        assert!(outcome.escalate);
        assert!(menu.is_open(), "the parent decides whether to close");
    }

    #[test]
    fn space_activates_only_button_items() {
        let mut links = teacher_menu(MenuConfig::click_only());
        links.place_focus_on_trigger();
        links.handle_key(MenuKey::ArrowDown, 1);
        assert!(links.handle_key(MenuKey::Space, 2).effects.is_empty());
        assert!(links.is_open());

        let mut buttons = teacher_menu(MenuConfig::click_only().with_activation(ItemActivation::Button));
        buttons.place_focus_on_trigger();
        buttons.handle_key(MenuKey::ArrowDown, 1);
        buttons.handle_key(MenuKey::Space, 2);
        assert!(!buttons.is_open());
    }

    #[test]
    fn hover_and_focus_variant_opens_without_click() {
        let mut menu = teacher_menu(MenuConfig::hover_and_focus());
        menu.hover(1);
        assert!(menu.is_open());
        menu.dismiss(MenuEvent::OutsidePress);
        menu.focus_trigger(2);
        assert!(menu.is_open());

        let mut click_only = teacher_menu(MenuConfig::click_only());
        click_only.hover(1);
        click_only.focus_trigger(2);
        assert!(!click_only.is_open());
    }

    #[test]
    fn item_ring_hook_can_consume_keys() {
        let ring = FocusRing::with_targets(
            vec![Target::link("a", "A", "/a")],
            RingOptions::vertical().with_key_hook(|key, _| {
                if key == MenuKey::ArrowLeft { HookVerdict::Consume } else { HookVerdict::Continue }
            }),
        );
        let mut menu = DisclosureMenu::with_item_ring(Target::trigger("m", "M"), ring, MenuConfig::default());
        menu.click(1);
        let outcome = menu.handle_key(MenuKey::ArrowLeft, 2);
        assert!(outcome.handled);
        assert!(!outcome.escalate);
    }

    #[test]
    fn contains_only_counts_open_panels() {
        let mut menu = teacher_menu(MenuConfig::click_only());
        assert!(menu.contains(&PressTarget::Target("teacher".into())));
        assert!(!menu.contains(&PressTarget::Panel("teacher".into())));
        menu.click(1);
        assert!(menu.contains(&PressTarget::Panel("teacher".into())));
        assert!(!menu.contains(&PressTarget::Target("student".into())));
        assert!(!menu.contains(&PressTarget::Elsewhere));
    }
}
