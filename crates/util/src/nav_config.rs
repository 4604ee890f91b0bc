//! Navigation bar definitions for the navmenu TUI.
//!
//! A definition lists the top-level entries of the bar (menus with their
//! items, plain links) plus the interaction variant flags. It can be written
//! as JSON or YAML; the file extension decides the parser.
//!
//! Resolution order:
//! 1. an explicit path (the `--config` flag),
//! 2. the `NAVMENU_CONFIG` environment variable,
//! 3. `navbar.yaml` in the navmenu config directory,
//! 4. the built-in Student / Teacher / Profile bar.
//!
//! Explicit and environment paths must load cleanly. The default file is
//! optional: when it is missing or broken the built-in bar is used and a
//! warning is logged.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use navmenu_types::Action;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::paths::{config_root, expand_tilde};

/// Environment variable allowing callers to override the definition path.
pub const NAV_CONFIG_ENV: &str = "NAVMENU_CONFIG";

/// Default filename inside the config directory.
pub const NAV_CONFIG_FILE_NAME: &str = "navbar.yaml";

#[derive(Debug, Error)]
pub enum NavConfigError {
    #[error("failed to read navigation config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("navigation bar has no entries")]
    NoEntries,
    #[error("duplicate target id '{0}'")]
    DuplicateId(String),
    #[error("menu '{0}' has no items")]
    EmptyMenu(String),
}

/// Outside-press rule for the whole bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalSetting {
    #[default]
    Group,
    PerMenu,
}

/// Which inputs open a menu besides an explicit click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantSetting {
    #[default]
    ClickOnly,
    HoverAndFocus,
}

/// Whether menu items behave like links (Enter) or buttons (Enter/Space).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationSetting {
    #[default]
    Link,
    Button,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavBarDefinition {
    #[serde(default)]
    pub dismissal: DismissalSetting,
    #[serde(default)]
    pub variant: VariantSetting,
    #[serde(default)]
    pub item_activation: ActivationSetting,
    /// Entry that owns the roving tab stop before any navigation happens.
    #[serde(default)]
    pub initial_index: usize,
    pub entries: Vec<EntryDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDefinition {
    Menu(MenuDefinition),
    Link(LinkDefinition),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDefinition {
    pub id: String,
    pub label: String,
    pub items: Vec<LinkDefinition>,
    /// Overrides the bar-wide variant for this menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDefinition {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl LinkDefinition {
    pub fn new(id: &str, label: &str, href: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            href: Some(href.to_string()),
            command: None,
            disabled: false,
        }
    }

    /// `href` wins over `command`; neither means the link does nothing.
    pub fn action(&self) -> Action {
        match (&self.href, &self.command) {
            (Some(href), _) => Action::Navigate(href.clone()),
            (None, Some(command)) => Action::Invoke(command.clone()),
            (None, None) => Action::None,
        }
    }
}

impl EntryDefinition {
    pub fn id(&self) -> &str {
        match self {
            EntryDefinition::Menu(menu) => &menu.id,
            EntryDefinition::Link(link) => &link.id,
        }
    }
}

impl NavBarDefinition {
    /// The bar the application ships with.
    pub fn builtin() -> Self {
        Self {
            dismissal: DismissalSetting::Group,
            variant: VariantSetting::ClickOnly,
            item_activation: ActivationSetting::Link,
            initial_index: 0,
            entries: vec![
                EntryDefinition::Menu(MenuDefinition {
                    id: "student".into(),
                    label: "Student".into(),
                    items: vec![
                        LinkDefinition::new("add-student", "Add a student", "/page/attend/student"),
                        LinkDefinition::new("student-attendance", "Attendance", "/page/create/students"),
                    ],
                    variant: None,
                }),
                EntryDefinition::Menu(MenuDefinition {
                    id: "teacher".into(),
                    label: "Teacher".into(),
                    items: vec![
                        LinkDefinition::new("add-teacher", "Add a teacher", "/page/create/teacher"),
                        LinkDefinition::new("teacher-attendance", "Attendance", "/page/attend/teacher"),
                    ],
                    variant: None,
                }),
                EntryDefinition::Link(LinkDefinition::new("profile", "Profile", "/page/profile")),
            ],
        }
    }

    /// Rejects definitions the engine cannot represent unambiguously.
    pub fn validate(&self) -> Result<(), NavConfigError> {
        if self.entries.is_empty() {
            return Err(NavConfigError::NoEntries);
        }
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.id()) {
                return Err(NavConfigError::DuplicateId(entry.id().to_string()));
            }
            if let EntryDefinition::Menu(menu) = entry {
                if menu.items.is_empty() {
                    return Err(NavConfigError::EmptyMenu(menu.id.clone()));
                }
                for item in &menu.items {
                    if !seen.insert(item.id.as_str()) {
                        return Err(NavConfigError::DuplicateId(item.id.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Where the active definition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Environment(PathBuf),
    DefaultFile(PathBuf),
    BuiltIn,
}

#[derive(Debug, Clone)]
pub struct LoadedNavConfig {
    pub definition: NavBarDefinition,
    pub source: ConfigSource,
}

/// Resolves and loads the navigation bar definition.
pub fn load(explicit: Option<&Path>) -> Result<LoadedNavConfig, NavConfigError> {
    if let Some(path) = explicit {
        let definition = read_definition(path)?;
        return Ok(LoadedNavConfig {
            definition,
            source: ConfigSource::Explicit(path.to_path_buf()),
        });
    }

    if let Ok(value) = env::var(NAV_CONFIG_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            let path = expand_tilde(trimmed);
            let definition = read_definition(&path)?;
            return Ok(LoadedNavConfig {
                definition,
                source: ConfigSource::Environment(path),
            });
        }
    }

    Ok(load_default(&default_config_path()))
}

/// Loads the optional default file, falling back to the built-in bar.
pub fn load_default(path: &Path) -> LoadedNavConfig {
    if !path.exists() {
        debug!(path = %path.display(), "no navigation config file; using built-in bar");
        return LoadedNavConfig {
            definition: NavBarDefinition::builtin(),
            source: ConfigSource::BuiltIn,
        };
    }
    match read_definition(path) {
        Ok(definition) => LoadedNavConfig {
            definition,
            source: ConfigSource::DefaultFile(path.to_path_buf()),
        },
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "Failed to load navigation config; using built-in bar"
            );
            LoadedNavConfig {
                definition: NavBarDefinition::builtin(),
                source: ConfigSource::BuiltIn,
            }
        }
    }
}

/// Reads, parses and validates one definition file.
pub fn read_definition(path: &Path) -> Result<NavBarDefinition, NavConfigError> {
    let data = fs::read_to_string(path).map_err(|source| NavConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let definition = parse_definition(path, &data)?;
    definition.validate()?;
    Ok(definition)
}

fn parse_definition(path: &Path, data: &str) -> Result<NavBarDefinition, NavConfigError> {
    let is_json = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(data).map_err(|source| NavConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(data).map_err(|source| NavConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    config_root().join(NAV_CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
dismissal: per_menu
variant: hover_and_focus
entries:
  - menu:
      id: student
      label: Student
      items:
        - { id: add-student, label: Add a student, href: /page/attend/student }
  - link: { id: logout, label: Log out, command: session.logout }
"#;

    #[test]
    fn builtin_bar_matches_the_shipped_navigation() {
        let definition = NavBarDefinition::builtin();
        definition.validate().expect("builtin is valid");
        let ids: Vec<_> = definition.entries.iter().map(EntryDefinition::id).collect();
        assert_eq!(ids, vec!["student", "teacher", "profile"]);
        let EntryDefinition::Menu(teacher) = &definition.entries[1] else {
            panic!("teacher should be a menu");
        };
        assert_eq!(teacher.items[1].label, "Attendance");
        assert_eq!(teacher.items[1].action(), Action::Navigate("/page/attend/teacher".into()));
    }

    #[test]
    fn parses_yaml_with_variants_and_commands() {
        let definition = parse_definition(Path::new("bar.yaml"), YAML).expect("parse yaml");
        assert_eq!(definition.dismissal, DismissalSetting::PerMenu);
        assert_eq!(definition.variant, VariantSetting::HoverAndFocus);
        assert_eq!(definition.item_activation, ActivationSetting::Link);
        let EntryDefinition::Link(logout) = &definition.entries[1] else {
            panic!("logout should be a link");
        };
        assert_eq!(logout.action(), Action::Invoke("session.logout".into()));
    }

    #[test]
    fn parses_json_by_extension() {
        let json = serde_json::to_string(&NavBarDefinition::builtin()).expect("serialize builtin");
        let definition = parse_definition(Path::new("bar.JSON"), &json).expect("parse json");
        assert_eq!(definition, NavBarDefinition::builtin());
    }

    #[test]
    fn validation_rejects_duplicates_and_empty_menus() {
        let mut duplicate = NavBarDefinition::builtin();
        duplicate.entries.push(EntryDefinition::Link(LinkDefinition::new("add-student", "Again", "/again")));
        assert!(matches!(duplicate.validate(), Err(NavConfigError::DuplicateId(id)) if id == "add-student"));

        let mut empty = NavBarDefinition::builtin();
        if let EntryDefinition::Menu(menu) = &mut empty.entries[0] {
            menu.items.clear();
        }
        assert!(matches!(empty.validate(), Err(NavConfigError::EmptyMenu(id)) if id == "student"));

        let none = NavBarDefinition {
            entries: Vec::new(),
            ..NavBarDefinition::builtin()
        };
        assert!(matches!(none.validate(), Err(NavConfigError::NoEntries)));
    }

    #[test]
    fn explicit_path_errors_are_surfaced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "entries: [").expect("write config");
        assert!(matches!(load(Some(&path)), Err(NavConfigError::Yaml { .. })));
        assert!(matches!(load(Some(&dir.path().join("missing.yaml"))), Err(NavConfigError::Io { .. })));
    }

    #[test]
    fn environment_override_is_used() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bar.yaml");
        fs::write(&path, YAML).expect("write config");
        temp_env::with_var(NAV_CONFIG_ENV, Some(path.to_str().expect("utf-8 path")), || {
            let loaded = load(None).expect("load from env");
            assert_eq!(loaded.source, ConfigSource::Environment(path.clone()));
            assert_eq!(loaded.definition.entries.len(), 2);
        });
    }

    #[test]
    fn broken_default_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = load_default(&dir.path().join(NAV_CONFIG_FILE_NAME));
        assert_eq!(missing.source, ConfigSource::BuiltIn);

        let path = dir.path().join(NAV_CONFIG_FILE_NAME);
        fs::write(&path, "entries: []").expect("write config");
        let broken = load_default(&path);
        assert_eq!(broken.source, ConfigSource::BuiltIn);
        assert_eq!(broken.definition, NavBarDefinition::builtin());

        fs::write(&path, YAML).expect("write config");
        let loaded = load_default(&path);
        assert_eq!(loaded.source, ConfigSource::DefaultFile(path.clone()));
    }
}
