pub mod component;
pub mod nav_bar;
pub mod page;

pub(crate) use component::Component;
pub use nav_bar::{NavBarComponent, NavBarState};
pub use page::{PageComponent, PageState};
