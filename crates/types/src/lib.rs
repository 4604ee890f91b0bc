//! Shared vocabulary for the navmenu crates.
//!
//! Everything that crosses a crate boundary lives here: target identities,
//! opaque activation actions, the key and pointer inputs the engine consumes,
//! and the `Effect`s it reports back to a rendering layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a focusable target (menu trigger, menu item or link).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TargetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// What happens when a target is activated.
///
/// The engine never interprets an action; it hands it back to the host inside
/// `Effect::Activate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Navigate to a route such as `/page/profile`.
    Navigate(String),
    /// Invoke a host-defined command by name.
    Invoke(String),
    /// The target has nothing to activate (menu triggers).
    None,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Navigate(href) => write!(f, "navigate {href}"),
            Action::Invoke(command) => write!(f, "invoke {command}"),
            Action::None => f.write_str("none"),
        }
    }
}

/// Axis along which a ring of targets is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Maps a key to a movement direction for this orientation.
    ///
    /// Horizontal rings move with ArrowLeft/ArrowRight, vertical rings with
    /// ArrowUp/ArrowDown. Every other key yields `None`.
    pub fn direction_for(self, key: MenuKey) -> Option<Direction> {
        match (self, key) {
            (Orientation::Horizontal, MenuKey::ArrowRight) | (Orientation::Vertical, MenuKey::ArrowDown) => {
                Some(Direction::Next)
            }
            (Orientation::Horizontal, MenuKey::ArrowLeft) | (Orientation::Vertical, MenuKey::ArrowUp) => {
                Some(Direction::Previous)
            }
            _ => None,
        }
    }
}

/// Movement direction within a ring, or for sequential focus traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Keys the engine understands. Hosts translate their native key events
/// into this enum; anything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Tab,
    BackTab,
    Other,
}

impl MenuKey {
    /// Keys that move focus out of the component in sequential order.
    pub fn is_tab(self) -> bool {
        matches!(self, MenuKey::Tab | MenuKey::BackTab)
    }

    pub fn tab_direction(self) -> Option<Direction> {
        match self {
            MenuKey::Tab => Some(Direction::Next),
            MenuKey::BackTab => Some(Direction::Previous),
            _ => None,
        }
    }
}

/// Identifies the element a document-level pointer press landed on.
///
/// The rendering layer performs hit testing and reports the result; the
/// engine only needs to know whether the press is inside a trigger or panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressTarget {
    /// A top-level target (menu trigger or plain link) with this id.
    Target(TargetId),
    /// The panel (including its items) of the menu with this id.
    Panel(TargetId),
    /// Anything else on the page.
    Elsewhere,
}

/// Where input focus should go after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    /// A top-level target: a menu trigger or a plain link.
    Entry(TargetId),
    /// An item inside the panel of `menu`.
    Item { menu: TargetId, item: TargetId },
}

/// Side effects reported by the engine to its host.
///
/// Handlers return effects rather than acting on the outside world so every
/// transition stays testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A target was selected; the host decides what the action means.
    Activate { target: TargetId, action: Action },
    /// The menu with this id became visible.
    MenuOpened(TargetId),
    /// The menu with this id was hidden.
    MenuClosed(TargetId),
    /// Input focus should move to this target.
    FocusTarget(FocusTarget),
    /// Sequential focus left the component in the given direction.
    FocusLeave(Direction),
}

/// Application level messages for the terminal host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
}
