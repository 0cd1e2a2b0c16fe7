//! `maestro config` command - Configuration management
//!
//! Provides commands to view and modify maestro configuration.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., snapshot, currency)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

/// Keys settable from the command line
const VALID_KEYS: &[(&str, &str)] = &[
    ("snapshot", "Default snapshot file or directory"),
    ("default_format", "Default output format (table, md, csv, json, yaml)"),
    ("recommendations", "Candidates listed per station (minimum 5)"),
    ("currency", "Currency symbol used when printing costs"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, _global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        print_config_value(key, get_config_value(&config, key).as_deref());
    }
    let stage_order = config
        .stage_order
        .as_ref()
        .map(|names| format!("{} stages (custom)", names.len()));
    print_config_value("stage_order", stage_order.as_deref());

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Environment variables (MAESTRO_SNAPSHOT, MAESTRO_FORMAT)");
    println!("  2. Project config (./{})", crate::core::config::PROJECT_CONFIG_FILE);
    match Config::global_config_path() {
        Some(path) => println!("  3. Global config ({})", path.display()),
        None => println!("  3. Global config (unavailable)"),
    }

    Ok(())
}

fn config_path(global: bool) -> Result<PathBuf> {
    if global {
        Config::global_config_path()
            .ok_or_else(|| miette::miette!("Could not determine global config directory"))
    } else {
        Ok(Config::project_config_path())
    }
}

fn read_mapping(path: &Path) -> Result<serde_yml::Value> {
    if !path.exists() {
        return Ok(serde_yml::Value::Mapping(Default::default()));
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    let parsed: serde_yml::Value =
        serde_yml::from_str(&content).unwrap_or(serde_yml::Value::Mapping(Default::default()));
    Ok(if parsed.is_null() {
        serde_yml::Value::Mapping(Default::default())
    } else {
        parsed
    })
}

fn run_set(args: SetArgs) -> Result<()> {
    if !VALID_KEYS.iter().any(|(k, _)| *k == args.key) {
        return Err(miette::miette!(
            "Unknown key '{}'. Run 'maestro config keys' for the list",
            args.key
        ));
    }

    let config_path = config_path(args.global)?;
    let mut config_map = read_mapping(&config_path)?;

    let value = match args.value.parse::<u64>() {
        Ok(n) if args.key == "recommendations" => serde_yml::Value::Number(n.into()),
        Err(_) if args.key == "recommendations" => {
            return Err(miette::miette!("'recommendations' must be a positive integer"));
        }
        _ => serde_yml::Value::String(args.value.clone()),
    };
    if let serde_yml::Value::Mapping(map) = &mut config_map {
        map.insert(serde_yml::Value::String(args.key.clone()), value);
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );

    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    let config_path = config_path(args.global)?;
    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let removed = match &mut config_map {
        serde_yml::Value::Mapping(map) => map
            .remove(&serde_yml::Value::String(args.key.clone()))
            .is_some(),
        _ => false,
    };
    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );

    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    let paths = [
        ("Global:", Config::global_config_path()),
        ("Project:", Some(Config::project_config_path())),
    ];
    for (label, path) in paths {
        match path {
            Some(path) => {
                let state = if path.exists() {
                    style("(exists)").green()
                } else {
                    style("(not created)").dim()
                };
                println!("  {} {} {}", style(label).cyan(), path.display(), state);
            }
            None => println!("  {} {}", style(label).cyan(), style("(unavailable)").dim()),
        }
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }
    println!(
        "  {:<20} {}",
        style("stage_order").cyan(),
        style("Stage sequence (list, edit the YAML file)").dim()
    );

    println!();
    println!(
        "{}",
        style("Use 'maestro config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "snapshot" => config.snapshot.as_ref().map(|p| p.display().to_string()),
        "default_format" => config.default_format.clone(),
        "recommendations" => config.recommendations.map(|n| n.to_string()),
        "currency" => config.currency.clone(),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}
