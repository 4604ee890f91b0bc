//! Document-level pointer press dispatch with scoped listeners.
//!
//! Outside-press dismissal has to be observed above any single menu, so a
//! [`MenuGroup`] subscribes to the [`PointerDocument`] when it is mounted.
//! The subscription is a [`ListenerGuard`]: dropping it (which happens when
//! the [`MountedGroup`] is dropped or unmounted) removes the listener, and the
//! listener itself only holds a weak reference to the group.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use navmenu_types::{Effect, PressTarget};
use tracing::{debug, warn};

use crate::group::MenuGroup;

type Listener = Rc<RefCell<dyn FnMut(&PressTarget) -> Vec<Effect>>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(listener_id, _)| *listener_id == id)
    }
}

/// Receives every pointer press on the page and fans it out to listeners.
#[derive(Clone, Default)]
pub struct PointerDocument {
    registry: Rc<RefCell<Registry>>,
}

impl PointerDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `listener` until the returned guard is dropped.
    pub fn add_listener(&self, listener: impl FnMut(&PressTarget) -> Vec<Effect> + 'static) -> ListenerGuard {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        registry.listeners.push((id, listener));
        debug!(listener = id, "pointer listener attached");
        ListenerGuard {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Delivers a press to every attached listener in attachment order.
    ///
    /// Listeners detached by an earlier listener during the same dispatch
    /// are skipped.
    pub fn dispatch(&self, press: &PressTarget) -> Vec<Effect> {
        let snapshot: Vec<(u64, Listener)> = self.registry.borrow().listeners.clone();
        let mut effects = Vec::new();
        for (id, listener) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut callback) => effects.extend((&mut *callback)(press)),
                Err(_) => warn!(listener = id, "skipping re-entrant pointer dispatch"),
            }
        }
        effects
    }
}

impl fmt::Debug for PointerDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerDocument")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Owned subscription to a [`PointerDocument`].
#[derive(Debug)]
#[must_use = "dropping the guard detaches the listener"]
pub struct ListenerGuard {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
            debug!(listener = self.id, "pointer listener detached");
        }
    }
}

/// A group attached to a document. Outside presses reach the group for as
/// long as this value lives.
#[derive(Debug)]
pub struct MountedGroup {
    group: Rc<RefCell<MenuGroup>>,
    listener: ListenerGuard,
}

impl MenuGroup {
    /// Mounts the group: acquires its single outside-press listener.
    pub fn mount(self, document: &PointerDocument) -> MountedGroup {
        let group = Rc::new(RefCell::new(self));
        let weak = Rc::downgrade(&group);
        let listener = document.add_listener(move |press| {
            let Some(group) = weak.upgrade() else {
                return Vec::new();
            };
            let effects = match group.try_borrow_mut() {
                Ok(mut group) => group.dismiss_outside(press),
                Err(_) => {
                    warn!("menu group busy; outside press ignored");
                    Vec::new()
                }
            };
            effects
        });
        MountedGroup { group, listener }
    }
}

impl MountedGroup {
    pub fn borrow(&self) -> Ref<'_, MenuGroup> {
        self.group.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, MenuGroup> {
        self.group.borrow_mut()
    }

    /// Releases the listener and hands the group back.
    pub fn unmount(self) -> Option<MenuGroup> {
        let MountedGroup { group, listener } = self;
        drop(listener);
        Rc::try_unwrap(group).ok().map(RefCell::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupOptions;

    #[test]
    fn guard_drop_detaches_listener() {
        let document = PointerDocument::new();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let guard = document.add_listener(move |_| {
            *counter.borrow_mut() += 1;
            Vec::new()
        });
        document.dispatch(&PressTarget::Elsewhere);
        assert_eq!(document.listener_count(), 1);

        drop(guard);
        document.dispatch(&PressTarget::Elsewhere);
        assert_eq!(document.listener_count(), 0);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn mounting_acquires_exactly_one_listener() {
        let document = PointerDocument::new();
        let mounted = MenuGroup::new(Vec::new(), GroupOptions::default()).mount(&document);
        assert_eq!(document.listener_count(), 1);

        let group = mounted.unmount().expect("no outstanding borrows");
        assert_eq!(document.listener_count(), 0);
        assert!(group.is_empty());
    }

    #[test]
    fn listener_outliving_its_document_is_harmless() {
        let document = PointerDocument::new();
        let guard = document.add_listener(|_| Vec::new());
        drop(document);
        drop(guard);
    }
}
