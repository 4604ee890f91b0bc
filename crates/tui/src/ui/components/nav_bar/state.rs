use std::cell::{Ref, RefMut};

use navmenu_engine::{
    DisclosureMenu, EventStamp, GroupEntry, GroupOptions, ItemActivation, MenuConfig, MenuGroup, MountedGroup, OutsideDismissal,
    PointerDocument, RingOptions, Target,
};
use navmenu_types::{Effect, PressTarget, TargetId};
use navmenu_util::{ActivationSetting, DismissalSetting, EntryDefinition, LinkDefinition, NavBarDefinition, VariantSetting};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthStr;

/// Height of the bar row, including button borders.
pub const BAR_HEIGHT: u16 = 3;

/// Suffix drawn after menu trigger labels.
pub const MENU_MARKER: &str = " ▾";

/// What a pointer position landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavHit {
    Entry(TargetId),
    Item { menu: TargetId, index: usize },
    /// Inside an open panel but not on an item row (its border).
    Panel(TargetId),
    Outside,
}

impl NavHit {
    /// The document-level view of this press.
    pub fn press_target(&self) -> PressTarget {
        match self {
            NavHit::Entry(id) => PressTarget::Target(id.clone()),
            NavHit::Item { menu, .. } | NavHit::Panel(menu) => PressTarget::Panel(menu.clone()),
            NavHit::Outside => PressTarget::Elsewhere,
        }
    }
}

/// Last rendered geometry of one open panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelArea {
    pub menu: TargetId,
    pub area: Rect,
    pub item_areas: Vec<Rect>,
}

/// State for the horizontal navigation bar.
///
/// The bar is a single tab stop in the rat-focus tree; movement between its
/// entries is handled by the mounted [`MenuGroup`] (roving focus).
#[derive(Debug)]
pub struct NavBarState {
    group: MountedGroup,
    /// Focus flag for the bar in the global focus tree.
    pub container_focus: FocusFlag,
    /// Last rendered area of the bar row.
    pub last_area: Rect,
    /// Last rendered entry areas, in ring order.
    pub entry_areas: Vec<(TargetId, Rect)>,
    /// Panels drawn during the last frame.
    pub panel_areas: Vec<PanelArea>,
    /// Entry currently under the pointer.
    hovered: Option<TargetId>,
}

impl NavBarState {
    pub fn new(group: MenuGroup, document: &PointerDocument) -> Self {
        Self {
            group: group.mount(document),
            container_focus: FocusFlag::named("nav.horizontal"),
            last_area: Rect::default(),
            entry_areas: Vec::new(),
            panel_areas: Vec::new(),
            hovered: None,
        }
    }

    pub fn from_definition(definition: &NavBarDefinition, document: &PointerDocument) -> Self {
        Self::new(build_group(definition), document)
    }

    pub fn group(&self) -> Ref<'_, MenuGroup> {
        self.group.borrow()
    }

    pub fn group_mut(&self) -> RefMut<'_, MenuGroup> {
        self.group.borrow_mut()
    }

    /// Keeps the group's notion of focus in step with the rat-focus flag.
    ///
    /// Focus arriving through Tab lands on the active entry; focus leaving
    /// (for example a click on the page) blurs the group.
    pub fn sync_focus(&self, stamp: EventStamp) -> Vec<Effect> {
        let focused = self.container_focus.get();
        let mut group = self.group.borrow_mut();
        match (focused, group.has_focus()) {
            (true, false) => group.focus_enter(stamp),
            (false, true) => {
                group.blur();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Resolves a pointer position against the last rendered frame. Open
    /// panels are drawn over the page, so they are tested first.
    pub fn hit_test(&self, column: u16, row: u16) -> NavHit {
        let position = Position::new(column, row);
        for panel in self.panel_areas.iter().rev() {
            if !panel.area.contains(position) {
                continue;
            }
            return match panel.item_areas.iter().position(|area| area.contains(position)) {
                Some(index) => NavHit::Item {
                    menu: panel.menu.clone(),
                    index,
                },
                None => NavHit::Panel(panel.menu.clone()),
            };
        }
        self.entry_areas
            .iter()
            .find(|(_, area)| area.contains(position))
            .map_or(NavHit::Outside, |(id, _)| NavHit::Entry(id.clone()))
    }

    /// Records the entry under the pointer after a move. Returns the entry
    /// only when the pointer has just entered it.
    pub fn pointer_entered(&mut self, hit: &NavHit) -> Option<TargetId> {
        let under = match hit {
            NavHit::Entry(id) => Some(id.clone()),
            _ => None,
        };
        if under == self.hovered {
            return None;
        }
        self.hovered = under.clone();
        under
    }
}

impl HasFocus for NavBarState {
    /// The whole bar is one leaf: a single tab stop.
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

/// Converts a loaded definition into an engine group.
pub fn build_group(definition: &NavBarDefinition) -> MenuGroup {
    let activation = match definition.item_activation {
        ActivationSetting::Link => ItemActivation::Link,
        ActivationSetting::Button => ItemActivation::Button,
    };
    let entries = definition
        .entries
        .iter()
        .map(|entry| match entry {
            EntryDefinition::Menu(menu) => {
                let config = match menu.variant.unwrap_or(definition.variant) {
                    VariantSetting::ClickOnly => MenuConfig::click_only(),
                    VariantSetting::HoverAndFocus => MenuConfig::hover_and_focus(),
                }
                .with_activation(activation);
                let items = menu.items.iter().map(to_target).collect();
                GroupEntry::Menu(DisclosureMenu::new(
                    Target::trigger(menu.id.as_str(), menu.label.as_str()),
                    items,
                    config,
                ))
            }
            EntryDefinition::Link(link) => GroupEntry::Action(to_target(link)),
        })
        .collect();
    let dismissal = match definition.dismissal {
        DismissalSetting::Group => OutsideDismissal::Group,
        DismissalSetting::PerMenu => OutsideDismissal::PerMenu,
    };
    MenuGroup::new(
        entries,
        GroupOptions {
            dismissal,
            ring: RingOptions::horizontal().with_initial_index(definition.initial_index),
        },
    )
}

fn to_target(link: &LinkDefinition) -> Target {
    let target = Target::new(link.id.as_str(), link.label.as_str(), link.action());
    if link.disabled { target.disabled() } else { target }
}

/// Rendered label of a top-level entry.
pub fn entry_label(entry: &GroupEntry) -> String {
    match entry {
        GroupEntry::Menu(menu) => format!("{}{MENU_MARKER}", menu.trigger().label),
        GroupEntry::Action(target) => target.label.clone(),
    }
}

/// Lays entries out left to right, each sized to its label. Entries that do
/// not fit are given empty areas.
pub fn layout_entries(area: Rect, labels: &[String]) -> Vec<Rect> {
    let mut x = area.x;
    let right = area.right();
    labels
        .iter()
        .map(|label| {
            let wanted = (label.width() as u16).saturating_add(4);
            let width = wanted.min(right.saturating_sub(x));
            let rect = Rect::new(x, area.y, width, BAR_HEIGHT.min(area.height));
            x = x.saturating_add(width);
            rect
        })
        .collect()
}

/// Area for a panel opened from `trigger`, clamped to `bounds`. Returns the
/// panel rect and one row per item inside its border.
pub fn layout_panel(trigger: Rect, bounds: Rect, labels: &[&str]) -> (Rect, Vec<Rect>) {
    let widest = labels.iter().map(|label| label.width() as u16).max().unwrap_or(0);
    let width = widest.saturating_add(4).max(trigger.width);
    let height = (labels.len() as u16).saturating_add(2);
    let panel = Rect::new(trigger.x, trigger.bottom(), width, height).intersection(bounds);
    let inner_width = panel.width.saturating_sub(2);
    let rows = (0..labels.len() as u16)
        .map(|offset| Rect::new(panel.x + 1, panel.y + 1 + offset, inner_width, 1).intersection(panel))
        .collect();
    (panel, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> NavBarState {
        let document = PointerDocument::new();
        NavBarState::from_definition(&NavBarDefinition::builtin(), &document)
    }

    #[test]
    fn builtin_definition_builds_the_expected_group() {
        let state = state();
        let group = state.group();
        let labels: Vec<_> = group.entries().map(entry_label).collect();
        assert_eq!(labels, vec!["Student ▾", "Teacher ▾", "Profile"]);
        let teacher = group.menu(&TargetId::from("teacher")).expect("teacher menu");
        assert_eq!(teacher.items().len(), 2);
        assert_eq!(group.dismissal(), OutsideDismissal::Group);
    }

    #[test]
    fn per_menu_override_and_button_activation_are_applied() {
        let mut definition = NavBarDefinition::builtin();
        definition.dismissal = DismissalSetting::PerMenu;
        definition.item_activation = ActivationSetting::Button;
        if let EntryDefinition::Menu(menu) = &mut definition.entries[1] {
            menu.variant = Some(VariantSetting::HoverAndFocus);
        }
        let group = build_group(&definition);
        assert_eq!(group.dismissal(), OutsideDismissal::PerMenu);
        let teacher = group.menu(&TargetId::from("teacher")).expect("teacher menu");
        assert_eq!(teacher.config(), &MenuConfig::hover_and_focus().with_activation(ItemActivation::Button));
        let student = group.menu(&TargetId::from("student")).expect("student menu");
        assert_eq!(student.config(), &MenuConfig::click_only().with_activation(ItemActivation::Button));
    }

    #[test]
    fn entries_are_laid_out_left_to_right() {
        let labels = vec!["Student ▾".to_string(), "Profile".to_string()];
        let rects = layout_entries(Rect::new(0, 0, 40, 3), &labels);
        assert_eq!(rects[0], Rect::new(0, 0, 13, 3));
        assert_eq!(rects[1], Rect::new(13, 0, 11, 3));

        let cramped = layout_entries(Rect::new(0, 0, 15, 3), &labels);
        assert_eq!(cramped[1].width, 2);
    }

    #[test]
    fn panel_opens_below_its_trigger_and_stays_in_bounds() {
        let (panel, rows) = layout_panel(Rect::new(5, 0, 13, 3), Rect::new(0, 0, 20, 10), &["Add a student", "Attendance"]);
        assert_eq!(panel, Rect::new(5, 3, 15, 4));
        assert_eq!(rows, vec![Rect::new(6, 4, 13, 1), Rect::new(6, 5, 13, 1)]);
    }

    #[test]
    fn hit_test_prefers_open_panels_over_entries() {
        let mut state = state();
        state.entry_areas = vec![(TargetId::from("student"), Rect::new(0, 0, 13, 3)), (TargetId::from("teacher"), Rect::new(13, 0, 13, 3))];
        state.panel_areas = vec![PanelArea {
            menu: TargetId::from("student"),
            area: Rect::new(0, 2, 17, 4),
            item_areas: vec![Rect::new(1, 3, 15, 1), Rect::new(1, 4, 15, 1)],
        }];

        assert_eq!(state.hit_test(14, 1), NavHit::Entry(TargetId::from("teacher")));
        assert_eq!(state.hit_test(2, 2), NavHit::Panel(TargetId::from("student")));
        assert_eq!(
            state.hit_test(3, 4),
            NavHit::Item {
                menu: TargetId::from("student"),
                index: 1
            }
        );
        assert_eq!(state.hit_test(30, 8), NavHit::Outside);
        assert_eq!(NavHit::Outside.press_target(), PressTarget::Elsewhere);
        assert_eq!(
            state.hit_test(3, 3).press_target(),
            PressTarget::Panel(TargetId::from("student"))
        );
    }

    #[test]
    fn pointer_enter_fires_once_per_entry_visit() {
        let mut state = state();
        let student = NavHit::Entry(TargetId::from("student"));
        assert_eq!(state.pointer_entered(&student), Some(TargetId::from("student")));
        assert_eq!(state.pointer_entered(&student), None);
        assert_eq!(state.pointer_entered(&NavHit::Outside), None);
        assert_eq!(state.pointer_entered(&student), Some(TargetId::from("student")));
        assert_eq!(
            state.pointer_entered(&NavHit::Entry(TargetId::from("teacher"))),
            Some(TargetId::from("teacher"))
        );
    }

    #[test]
    fn focus_flag_drives_group_focus() {
        let state = state();
        state.container_focus.set(true);
        let effects = state.sync_focus(1);
        assert!(state.group().has_focus());
        assert!(effects.contains(&Effect::FocusTarget(navmenu_types::FocusTarget::Entry(TargetId::from("student")))));

        state.container_focus.set(false);
        assert!(state.sync_focus(2).is_empty());
        assert!(!state.group().has_focus());
    }
}
