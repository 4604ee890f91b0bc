//! # Navmenu Engine
//!
//! Headless interaction model for roving-focus disclosure menus.
//!
//! The engine owns all state that an accessible navigation bar needs and none
//! of the rendering. Hosts feed it resolved input (clicks, hovers, keys,
//! focus changes, document pointer presses) and render from what it reports.
//!
//! ## Building blocks
//!
//! - **`focus_ring`**: ordered targets with one active index and wraparound
//!   movement (roving tabindex)
//! - **`disclosure`**: one trigger plus a panel of items, driven by an explicit
//!   transition table
//! - **`group`**: several menus and plain targets in one horizontal ring, with
//!   outside-press dismissal
//! - **`document`**: document-level pointer presses and the scoped listener a
//!   mounted group holds
//!
//! ## Usage
//!
//! ```rust
//! use navmenu_engine::{DisclosureMenu, GroupEntry, GroupOptions, MenuConfig, MenuGroup, PointerDocument, Target};
//! use navmenu_types::{MenuKey, PressTarget, TargetId};
//!
//! let student = DisclosureMenu::new(
//!     Target::trigger("student", "Student"),
//!     vec![Target::link("add-student", "Add a student", "/page/attend/student")],
//!     MenuConfig::click_only(),
//! );
//! let profile = Target::link("profile", "Profile", "/page/profile");
//! let group = MenuGroup::new(vec![GroupEntry::Menu(student), GroupEntry::Action(profile)], GroupOptions::default());
//!
//! let document = PointerDocument::new();
//! let mounted = group.mount(&document);
//! mounted.borrow_mut().click(&TargetId::from("student"), 1);
//! assert!(mounted.borrow().is_open(&TargetId::from("student")));
//!
//! document.dispatch(&PressTarget::Elsewhere);
//! assert!(mounted.borrow().open_menus().is_empty());
//! mounted.borrow_mut().handle_key(MenuKey::ArrowRight, 2);
//! assert_eq!(mounted.borrow().active_index(), Some(1));
//! ```

pub mod disclosure;
pub mod document;
pub mod error;
pub mod focus_ring;
pub mod group;
pub mod target;

pub use disclosure::{
    DisclosureMenu, EventStamp, FocusIntent, ItemActivation, KeyOutcome, MenuConfig, MenuEvent, MenuFocus, MenuState, Transition,
    transition,
};
pub use document::{ListenerGuard, MountedGroup, PointerDocument};
pub use error::FocusRingError;
pub use focus_ring::{FocusRing, HookVerdict, KeyHook, RingOptions};
pub use group::{GroupEntry, GroupOptions, MenuGroup, OutsideDismissal};
pub use target::{Focusable, Target};
