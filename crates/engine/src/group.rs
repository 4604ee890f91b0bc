//! Top-level roving sequence of menus and plain action targets.
//!
//! A [`MenuGroup`] owns a horizontal [`FocusRing`] whose entries are either a
//! [`DisclosureMenu`] (represented in the ring by its trigger) or a plain
//! [`Target`] such as a profile link. Left/Right move between entries no
//! matter which menu is open, closing the menu being left.

use navmenu_types::{Action, Direction, Effect, FocusTarget, MenuKey, PressTarget, TargetId};
use tracing::debug;

use crate::disclosure::{DisclosureMenu, EventStamp, KeyOutcome, MenuEvent};
use crate::focus_ring::{FocusRing, HookVerdict, RingOptions};
use crate::target::{Focusable, Target};

/// One top-level slot of a group.
#[derive(Debug)]
pub enum GroupEntry {
    Menu(DisclosureMenu),
    Action(Target),
}

impl GroupEntry {
    pub fn label(&self) -> &str {
        match self {
            GroupEntry::Menu(menu) => &menu.trigger().label,
            GroupEntry::Action(target) => &target.label,
        }
    }

    pub fn as_menu(&self) -> Option<&DisclosureMenu> {
        match self {
            GroupEntry::Menu(menu) => Some(menu),
            GroupEntry::Action(_) => None,
        }
    }

    fn as_menu_mut(&mut self) -> Option<&mut DisclosureMenu> {
        match self {
            GroupEntry::Menu(menu) => Some(menu),
            GroupEntry::Action(_) => None,
        }
    }
}

impl Focusable for GroupEntry {
    fn id(&self) -> &TargetId {
        match self {
            GroupEntry::Menu(menu) => menu.id(),
            GroupEntry::Action(target) => &target.id,
        }
    }

    fn is_enabled(&self) -> bool {
        match self {
            GroupEntry::Menu(menu) => menu.trigger().enabled,
            GroupEntry::Action(target) => target.enabled,
        }
    }
}

/// Which presses count as "outside" for the group's document listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutsideDismissal {
    /// Close every open menu when the press misses every trigger and every
    /// open panel of the group.
    #[default]
    Group,
    /// Close each open menu whose own trigger and panel the press misses.
    PerMenu,
}

#[derive(Debug, Default)]
pub struct GroupOptions {
    pub dismissal: OutsideDismissal,
    /// Options for the top-level ring. The orientation is forced to
    /// horizontal.
    pub ring: RingOptions,
}

#[derive(Debug)]
pub struct MenuGroup {
    ring: FocusRing<GroupEntry>,
    dismissal: OutsideDismissal,
    focus_within: bool,
}

impl MenuGroup {
    pub fn new(entries: Vec<GroupEntry>, options: GroupOptions) -> Self {
        let GroupOptions { dismissal, ring } = options;
        let ring = RingOptions {
            orientation: navmenu_types::Orientation::Horizontal,
            ..ring
        };
        Self {
            ring: FocusRing::with_targets(entries, ring),
            dismissal,
            focus_within: false,
        }
    }

    pub fn dismissal(&self) -> OutsideDismissal {
        self.dismissal
    }

    pub fn entries(&self) -> impl Iterator<Item = &GroupEntry> {
        self.ring.iter()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.ring.active_index()
    }

    pub fn active_id(&self) -> Option<&TargetId> {
        self.ring.active().map(Focusable::id)
    }

    /// Whether input focus is somewhere inside the group.
    pub fn has_focus(&self) -> bool {
        self.focus_within
    }

    pub fn menu(&self, id: &TargetId) -> Option<&DisclosureMenu> {
        self.ring.iter().filter_map(GroupEntry::as_menu).find(|menu| menu.id() == id)
    }

    pub fn is_open(&self, id: &TargetId) -> bool {
        self.menu(id).is_some_and(DisclosureMenu::is_open)
    }

    pub fn open_menus(&self) -> Vec<TargetId> {
        self.ring
            .iter()
            .filter_map(GroupEntry::as_menu)
            .filter(|menu| menu.is_open())
            .map(|menu| menu.id().clone())
            .collect()
    }

    pub fn register(&mut self, entry: GroupEntry, index: usize) -> usize {
        self.ring.register(entry, index)
    }

    pub fn deregister(&mut self, id: &TargetId) -> Option<GroupEntry> {
        self.ring.deregister(id)
    }

    /// Pointer click on a top-level entry.
    ///
    /// The clicked entry becomes active so keyboard navigation resumes from
    /// it. Menus toggle; plain targets activate.
    pub fn click(&mut self, id: &TargetId, stamp: EventStamp) -> Vec<Effect> {
        let Some(index) = self.ring.position(id) else {
            return Vec::new();
        };
        self.enter_focus_at(index);
        let mut effects = match self.ring.get_mut(index) {
            Some(GroupEntry::Menu(menu)) => menu.click(stamp),
            Some(GroupEntry::Action(target)) => activate(target),
            None => Vec::new(),
        };
        self.flush_focus_requests(&mut effects);
        effects
    }

    /// Pointer click on an item inside the panel of `menu_id`.
    pub fn click_item(&mut self, menu_id: &TargetId, item_index: usize, stamp: EventStamp) -> Vec<Effect> {
        let Some(index) = self.ring.position(menu_id) else {
            return Vec::new();
        };
        if self.ring.get(index).and_then(GroupEntry::as_menu).is_none() {
            return Vec::new();
        }
        self.enter_focus_at(index);
        let mut effects = match self.ring.get_mut(index).and_then(GroupEntry::as_menu_mut) {
            Some(menu) => menu.activate_item(item_index, stamp),
            None => Vec::new(),
        };
        self.flush_focus_requests(&mut effects);
        effects
    }

    /// Pointer entered a top-level entry. Does not move the active index.
    pub fn hover(&mut self, id: &TargetId, stamp: EventStamp) -> Vec<Effect> {
        let Some(index) = self.ring.position(id) else {
            return Vec::new();
        };
        match self.ring.get_mut(index).and_then(GroupEntry::as_menu_mut) {
            Some(menu) => menu.hover(stamp),
            None => Vec::new(),
        }
    }

    /// Input focus arrived on the entry with `id`.
    pub fn focus_entry(&mut self, id: &TargetId, stamp: EventStamp) -> Vec<Effect> {
        let Some(index) = self.ring.position(id) else {
            return Vec::new();
        };
        self.enter_focus_at(index);
        let mut effects = match self.ring.get_mut(index).and_then(GroupEntry::as_menu_mut) {
            Some(menu) => menu.focus_trigger(stamp),
            None => Vec::new(),
        };
        self.flush_focus_requests(&mut effects);
        effects
    }

    /// Sequential focus traversal reached the group: focus lands on the
    /// active entry.
    pub fn focus_enter(&mut self, stamp: EventStamp) -> Vec<Effect> {
        let Some(id) = self.active_id().cloned() else {
            return Vec::new();
        };
        let mut effects = vec![Effect::FocusTarget(FocusTarget::Entry(id.clone()))];
        effects.extend(self.focus_entry(&id, stamp));
        effects
    }

    /// Input focus left the group. Open menus stay open; the outside-press
    /// and Tab rules decide when they close.
    pub fn blur(&mut self) {
        self.focus_within = false;
        for entry in self.ring.iter_mut() {
            if let Some(menu) = entry.as_menu_mut() {
                menu.blur();
            }
        }
    }

    pub fn handle_key(&mut self, key: MenuKey, stamp: EventStamp) -> Vec<Effect> {
        self.handle_key_outcome(key, stamp).effects
    }

    /// Keyboard input while focus is inside the group.
    ///
    /// The active menu sees the key first. Keys it escalates go to the
    /// top-level ring's hook before the group acts on them: `Consume` stops
    /// the group from acting, `Escalate` reports the key to the host even
    /// when the group used it. Keys the group does not use are escalated.
    pub fn handle_key_outcome(&mut self, key: MenuKey, stamp: EventStamp) -> KeyOutcome {
        if !self.focus_within {
            return KeyOutcome {
                escalate: true,
                ..KeyOutcome::default()
            };
        }
        let mut outcome = KeyOutcome::default();
        let mut escalated = true;
        if let Some(menu) = self.active_menu_mut() {
            let menu_outcome = menu.handle_key(key, stamp);
            outcome.effects = menu_outcome.effects;
            outcome.handled = menu_outcome.handled;
            escalated = menu_outcome.escalate;
        }

        if escalated {
            match self.ring.run_key_hook(key, outcome.handled) {
                HookVerdict::Consume => {
                    debug!(?key, "group key hook consumed key");
                    outcome.handled = true;
                }
                verdict => {
                    let used = self.handle_group_key(key, &mut outcome.effects);
                    outcome.handled |= used;
                    outcome.escalate = !used || verdict == HookVerdict::Escalate;
                }
            }
        }
        self.flush_focus_requests(&mut outcome.effects);
        outcome
    }

    /// Document-level pointer press, routed here by the mounted listener.
    pub fn dismiss_outside(&mut self, press: &PressTarget) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.dismissal {
            OutsideDismissal::Group => {
                let inside = self.ring.iter().filter_map(GroupEntry::as_menu).any(|menu| menu.contains(press));
                if inside {
                    return effects;
                }
                for entry in self.ring.iter_mut() {
                    if let Some(menu) = entry.as_menu_mut() {
                        effects.extend(menu.dismiss(MenuEvent::OutsidePress));
                    }
                }
            }
            OutsideDismissal::PerMenu => {
                for entry in self.ring.iter_mut() {
                    if let Some(menu) = entry.as_menu_mut()
                        && !menu.contains(press)
                    {
                        effects.extend(menu.dismiss(MenuEvent::OutsidePress));
                    }
                }
            }
        }
        if !effects.is_empty() {
            debug!(?press, closed = effects.len(), "outside press dismissed menus");
        }
        effects
    }

    pub fn close_all(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        for entry in self.ring.iter_mut() {
            if let Some(menu) = entry.as_menu_mut() {
                effects.extend(menu.dismiss(MenuEvent::OutsidePress));
            }
        }
        effects
    }

    /// Keys that reach the top level, either directly (plain targets) or
    /// escalated from a menu. Returns whether the key was used.
    fn handle_group_key(&mut self, key: MenuKey, effects: &mut Vec<Effect>) -> bool {
        if let Some(direction) = key.tab_direction() {
            effects.extend(self.close_active(MenuEvent::TabOut));
            self.blur();
            effects.push(Effect::FocusLeave(direction));
            return true;
        }
        if let Some(direction) = self.ring.direction_for(key) {
            self.move_focus(effects, |ring| {
                ring.focus(direction);
            });
            return true;
        }
        match key {
            MenuKey::Home => {
                self.move_focus(effects, |ring| {
                    ring.focus_first();
                });
                true
            }
            MenuKey::End => {
                self.move_focus(effects, |ring| {
                    ring.focus_last();
                });
                true
            }
            MenuKey::Enter | MenuKey::Space => match self.ring.active() {
                Some(GroupEntry::Action(target)) if key == MenuKey::Enter || matches!(target.action, Action::Invoke(_)) => {
                    effects.extend(activate(target));
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Closes the menu being left, moves the ring and focuses the new entry.
    fn move_focus(&mut self, effects: &mut Vec<Effect>, step: impl FnOnce(&mut FocusRing<GroupEntry>)) {
        effects.extend(self.close_active(MenuEvent::SiblingMove));
        if let Some(menu) = self.active_menu_mut() {
            menu.blur();
        }
        step(&mut self.ring);
        let Some(id) = self.active_id().cloned() else {
            return;
        };
        debug!(entry = %id, "group focus moved");
        effects.push(Effect::FocusTarget(FocusTarget::Entry(id)));
        if let Some(menu) = self.active_menu_mut() {
            effects.extend(menu.focus_trigger(0));
        }
    }

    fn close_active(&mut self, event: MenuEvent) -> Vec<Effect> {
        match self.active_menu_mut() {
            Some(menu) if menu.is_open() => menu.dismiss(event),
            _ => Vec::new(),
        }
    }

    fn active_menu_mut(&mut self) -> Option<&mut DisclosureMenu> {
        let index = self.ring.active_index()?;
        self.ring.get_mut(index).and_then(GroupEntry::as_menu_mut)
    }

    /// Marks `index` as the active, focused entry and drops focus from every
    /// other menu.
    fn enter_focus_at(&mut self, index: usize) {
        if self.ring.set_active(index).is_err() {
            return;
        }
        self.focus_within = true;
        for (position, entry) in self.ring.iter_mut().enumerate() {
            if let Some(menu) = entry.as_menu_mut() {
                if position == index {
                    menu.place_focus_on_trigger();
                } else {
                    menu.blur();
                }
            }
        }
    }

    fn flush_focus_requests(&mut self, effects: &mut Vec<Effect>) {
        for entry in self.ring.iter_mut() {
            if let Some(request) = entry.as_menu_mut().and_then(DisclosureMenu::take_focus_request) {
                effects.push(Effect::FocusTarget(request));
            }
        }
    }
}

fn activate(target: &Target) -> Vec<Effect> {
    if !target.enabled {
        return Vec::new();
    }
    vec![Effect::Activate {
        target: target.id.clone(),
        action: target.action.clone(),
    }]
}
