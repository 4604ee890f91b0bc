//! Horizontal navigation bar component.
//!
//! Renders the top-level entries of a [`navmenu_engine::MenuGroup`] as a row
//! of buttons and draws the panel of every open menu below its trigger. All
//! interaction state lives in the engine; this component resolves terminal
//! input into engine calls:
//! - mouse presses are first dispatched to the pointer document (outside
//!   dismissal), then routed to the entry or item under the pointer
//! - mouse movement over a trigger counts as hover
//! - keys are mapped to [`navmenu_types::MenuKey`] and handed to the group

mod nav_bar_component;
mod state;

pub use nav_bar_component::{NavBarComponent, menu_key};
pub use state::{BAR_HEIGHT, NavBarState, NavHit, PanelArea};
