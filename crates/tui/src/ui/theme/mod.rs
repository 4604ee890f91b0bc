//! Theme styling for the navmenu TUI.
//!
//! Two palettes ship (Dracula and Nord). `TUI_THEME` picks one by name;
//! anything else falls back to Dracula.

use std::env;

use tracing::debug;

pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable selecting the palette.
pub const THEME_ENV: &str = "TUI_THEME";

/// Selects a theme from the environment.
pub fn load_from_env() -> Box<dyn Theme> {
    let requested = env::var(THEME_ENV).ok();
    resolve(requested.as_deref())
}

pub fn resolve(name: Option<&str>) -> Box<dyn Theme> {
    match name.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("nord") => Box::new(NordTheme::new()),
        Some("dracula") | None => Box::new(DraculaTheme::new()),
        Some(other) => {
            debug!(theme = other, "unknown theme requested; using dracula");
            Box::new(DraculaTheme::new())
        }
    }
}
