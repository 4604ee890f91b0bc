//! State × event → next state + effect table for a single disclosure menu.
//!
//! The table is a pure function so each row can be tested without building a
//! menu. [`DisclosureMenu`](super::DisclosureMenu) applies the rows and owns
//! the side effects (resetting the item ring, recording focus requests,
//! emitting `Effect`s).

use navmenu_types::Direction;

/// Open/closed state of one menu panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

/// How items inside a panel react to activation keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemActivation {
    /// Link semantics: Enter activates.
    #[default]
    Link,
    /// Button semantics: Enter and Space activate.
    Button,
}

/// Variant flags for a menu. One parameterised menu covers every variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuConfig {
    pub open_on_hover: bool,
    pub open_on_focus: bool,
    pub activation: ItemActivation,
}

impl MenuConfig {
    /// Opens only on explicit click or activation key.
    pub fn click_only() -> Self {
        Self::default()
    }

    /// Also opens when the trigger is hovered or receives focus.
    pub fn hover_and_focus() -> Self {
        Self {
            open_on_hover: true,
            open_on_focus: true,
            activation: ItemActivation::Link,
        }
    }

    pub fn with_activation(mut self, activation: ItemActivation) -> Self {
        self.activation = activation;
        self
    }
}

/// Inputs a single menu reacts to, already resolved from raw events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    /// Pointer click on the trigger, or Enter/Space while it has focus.
    TriggerClick,
    TriggerFocus,
    TriggerHover,
    /// ArrowDown (`Next`) or ArrowUp (`Previous`) while the trigger has focus.
    TriggerArrow(Direction),
    ItemStep(Direction),
    ItemHome,
    ItemEnd,
    ItemActivate(usize),
    OutsidePress,
    /// The group is moving focus to a sibling top-level target.
    SiblingMove,
    /// Tab or Shift-Tab while focus is inside the menu.
    TabOut,
    Escape,
}

/// Where focus should go once the transition is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusIntent {
    Keep,
    Trigger,
    FirstItem,
    LastItem,
    Step(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: MenuState,
    pub focus: FocusIntent,
    /// Item index to activate.
    pub activate: Option<usize>,
}

impl Transition {
    fn to(next: MenuState) -> Self {
        Self {
            next,
            focus: FocusIntent::Keep,
            activate: None,
        }
    }

    fn focusing(mut self, focus: FocusIntent) -> Self {
        self.focus = focus;
        self
    }
}

/// Looks up the row for `(state, event)`.
pub fn transition(state: MenuState, event: MenuEvent, config: &MenuConfig) -> Transition {
    use MenuEvent::*;
    use MenuState::*;

    match (state, event) {
        (Closed, TriggerClick) => Transition::to(Open),
        (Open, TriggerClick) => Transition::to(Closed),

        (Closed, TriggerFocus) if config.open_on_focus => Transition::to(Open),
        (Closed, TriggerHover) if config.open_on_hover => Transition::to(Open),
        (state, TriggerFocus | TriggerHover) => Transition::to(state),

        (_, TriggerArrow(Direction::Next)) => Transition::to(Open).focusing(FocusIntent::FirstItem),
        (_, TriggerArrow(Direction::Previous)) => Transition::to(Open).focusing(FocusIntent::LastItem),

        (Open, ItemStep(direction)) => Transition::to(Open).focusing(FocusIntent::Step(direction)),
        (Open, ItemHome) => Transition::to(Open).focusing(FocusIntent::FirstItem),
        (Open, ItemEnd) => Transition::to(Open).focusing(FocusIntent::LastItem),
        (Open, ItemActivate(index)) => Transition {
            next: Closed,
            focus: FocusIntent::Trigger,
            activate: Some(index),
        },
        (Closed, ItemStep(_) | ItemHome | ItemEnd | ItemActivate(_)) => Transition::to(Closed),

        (_, OutsidePress | SiblingMove | TabOut) => Transition::to(Closed),

        (Open, Escape) => Transition::to(Closed).focusing(FocusIntent::Trigger),
        (Closed, Escape) => Transition::to(Closed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_toggles_in_both_directions() {
        let config = MenuConfig::click_only();
        assert_eq!(transition(MenuState::Closed, MenuEvent::TriggerClick, &config).next, MenuState::Open);
        assert_eq!(transition(MenuState::Open, MenuEvent::TriggerClick, &config).next, MenuState::Closed);
    }

    #[test]
    fn focus_and_hover_open_only_when_configured() {
        let click_only = MenuConfig::click_only();
        let hover = MenuConfig::hover_and_focus();
        for event in [MenuEvent::TriggerFocus, MenuEvent::TriggerHover] {
            assert_eq!(transition(MenuState::Closed, event, &click_only).next, MenuState::Closed);
            assert_eq!(transition(MenuState::Closed, event, &hover).next, MenuState::Open);
            assert_eq!(transition(MenuState::Open, event, &hover).next, MenuState::Open);
        }
    }

    #[test]
    fn every_dismissal_event_closes() {
        let config = MenuConfig::default();
        for event in [MenuEvent::OutsidePress, MenuEvent::SiblingMove, MenuEvent::TabOut, MenuEvent::Escape] {
            assert_eq!(transition(MenuState::Open, event, &config).next, MenuState::Closed, "{event:?}");
            assert_eq!(transition(MenuState::Closed, event, &config).next, MenuState::Closed, "{event:?}");
        }
    }

    #[test]
    fn item_activation_closes_and_returns_focus() {
        let row = transition(MenuState::Open, MenuEvent::ItemActivate(1), &MenuConfig::default());
        assert_eq!(row.next, MenuState::Closed);
        assert_eq!(row.focus, FocusIntent::Trigger);
        assert_eq!(row.activate, Some(1));

        let ignored = transition(MenuState::Closed, MenuEvent::ItemActivate(1), &MenuConfig::default());
        assert_eq!(ignored.activate, None);
    }

    #[test]
    fn trigger_arrows_open_onto_first_or_last_item() {
        let config = MenuConfig::default();
        let down = transition(MenuState::Closed, MenuEvent::TriggerArrow(Direction::Next), &config);
        assert_eq!((down.next, down.focus), (MenuState::Open, FocusIntent::FirstItem));
        let up = transition(MenuState::Open, MenuEvent::TriggerArrow(Direction::Previous), &config);
        assert_eq!((up.next, up.focus), (MenuState::Open, FocusIntent::LastItem));
    }

    #[test]
    fn item_navigation_is_ignored_while_closed() {
        let row = transition(MenuState::Closed, MenuEvent::ItemStep(Direction::Next), &MenuConfig::default());
        assert_eq!(row, Transition::to(MenuState::Closed));
    }
}
