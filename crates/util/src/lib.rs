//! Shared helpers for navmenu: filesystem locations and loading of
//! navigation bar definitions.

pub mod nav_config;
pub mod paths;

pub use nav_config::{
    ActivationSetting, ConfigSource, DismissalSetting, EntryDefinition, LinkDefinition, LoadedNavConfig, MenuDefinition,
    NAV_CONFIG_ENV, NavBarDefinition, NavConfigError, VariantSetting,
};
pub use paths::{config_root, expand_tilde, log_file_path};
