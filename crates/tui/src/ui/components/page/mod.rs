//! Content pane below the navigation bar. Shows the page the last
//! activated link navigated to and a short activation history.

mod page_component;
mod state;

pub use page_component::PageComponent;
pub use state::{HISTORY_LIMIT, PageState};
