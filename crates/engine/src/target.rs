use navmenu_types::{Action, TargetId};

/// Anything a [`FocusRing`](crate::FocusRing) can rove over.
///
/// Disabled targets still take part in roving focus; they only refuse
/// activation.
pub trait Focusable {
    fn id(&self) -> &TargetId;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// A focusable, activatable unit: a menu trigger, a menu item or a plain link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: TargetId,
    /// Human readable label rendered by the host.
    pub label: String,
    pub enabled: bool,
    pub action: Action,
}

impl Target {
    pub fn new(id: impl Into<TargetId>, label: impl Into<String>, action: Action) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: true,
            action,
        }
    }

    /// A target that navigates to `href` when activated.
    pub fn link(id: impl Into<TargetId>, label: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(id, label, Action::Navigate(href.into()))
    }

    /// A target without an action of its own, used for menu triggers.
    pub fn trigger(id: impl Into<TargetId>, label: impl Into<String>) -> Self {
        Self::new(id, label, Action::None)
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl Focusable for Target {
    fn id(&self) -> &TargetId {
        &self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
