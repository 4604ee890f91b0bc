//! # Navmenu TUI
//!
//! Terminal host for the navmenu engine: a horizontal navigation bar with
//! disclosure menus above a page pane. Built on Ratatui, crossterm input
//! (keyboard and mouse) and rat-focus for moving focus between the bar and
//! the page.

mod app;
mod ui;

use anyhow::Result;
use navmenu_util::NavBarDefinition;

/// Runs the TUI until the user quits.
///
/// # Errors
///
/// Fails when the terminal cannot be put into raw mode or drawn to.
pub async fn run(definition: NavBarDefinition) -> Result<()> {
    ui::runtime::run_app(definition).await
}
