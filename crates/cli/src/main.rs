use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use navmenu_util::{ConfigSource, LoadedNavConfig, NavBarDefinition, log_file_path};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Roving-focus navigation bar for the terminal.
#[derive(Debug, Parser)]
#[command(name = "navmenu", version, about)]
struct Cli {
    /// Navigation bar definition (YAML or JSON). Overrides NAVMENU_CONFIG.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the resolved definition and exit instead of starting the TUI.
    #[arg(long, value_enum, value_name = "FORMAT")]
    print: Option<PrintFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PrintFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // No --print => TUI, which owns stdout; logs go to a file instead.
    let interactive = cli.print.is_none();
    init_tracing(interactive);

    let explicit = cli.config.as_deref().map(|path| navmenu_util::expand_tilde(&path.to_string_lossy()));
    let LoadedNavConfig { definition, source } =
        navmenu_util::nav_config::load(explicit.as_deref()).context("failed to load navigation bar definition")?;
    info!(source = %describe_source(&source), entries = definition.entries.len(), "navigation bar loaded");

    match cli.print {
        Some(format) => print_definition(&definition, format),
        None => navmenu_tui::run(definition).await,
    }
}

/// `RUST_LOG` when set and valid, `info` otherwise.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing(to_file: bool) {
    let filter = log_filter();
    if to_file {
        let path = log_file_path();
        let file = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
        // Without a log file the TUI still runs; logging is just dropped.
        if let Ok(file) = file {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_definition(definition: &NavBarDefinition, format: PrintFormat) -> Result<()> {
    let rendered = match format {
        PrintFormat::Yaml => serde_yaml::to_string(definition)?,
        PrintFormat::Json => serde_json::to_string_pretty(definition)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn describe_source(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Explicit(path) => format!("--config {}", path.display()),
        ConfigSource::Environment(path) => format!("{} {}", navmenu_util::NAV_CONFIG_ENV, path.display()),
        ConfigSource::DefaultFile(path) => path.display().to_string(),
        ConfigSource::BuiltIn => "built-in".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn parses_config_and_print_flags() {
        let cli = Cli::try_parse_from(["navmenu", "--config", "bar.yaml", "--print", "json"]).expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("bar.yaml")));
        assert_eq!(cli.print, Some(PrintFormat::Json));
        assert!(Cli::try_parse_from(["navmenu", "--print", "toml"]).is_err());
    }

    #[test]
    fn rust_log_sets_the_verbosity() {
        temp_env::with_var("RUST_LOG", Some("debug"), || {
            assert_eq!(log_filter().max_level_hint(), Some(LevelFilter::DEBUG));
        });
        temp_env::with_var("RUST_LOG", Some("trace"), || {
            assert_eq!(log_filter().max_level_hint(), Some(LevelFilter::TRACE));
        });
        temp_env::with_var_unset("RUST_LOG", || {
            assert_eq!(log_filter().max_level_hint(), Some(LevelFilter::INFO));
        });
    }

    #[test]
    fn describes_sources_for_logging() {
        assert_eq!(describe_source(&ConfigSource::BuiltIn), "built-in");
        assert_eq!(
            describe_source(&ConfigSource::Explicit(PathBuf::from("/tmp/bar.yaml"))),
            "--config /tmp/bar.yaml"
        );
    }
}
