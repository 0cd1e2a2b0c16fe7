//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    causes::CausesArgs, completions::CompletionsArgs, config::ConfigCommands, delays::DelaysArgs,
    employees::EmployeesArgs, import::ImportArgs, needs::NeedsArgs, parts::PartsArgs,
    recommend::RecommendArgs, shortages::ShortagesArgs, stages::StagesArgs, status::StatusArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "maestro")]
#[command(author, version, about = "Assembly program decision support")]
#[command(long_about = "A Unix-style toolkit that reads a snapshot of an assembly program (stages, stations, employees, parts) and reports part shortages, delay costs, incident root causes and staffing recommendations.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Snapshot file or directory (default: from configuration)
    #[arg(long, short = 's', global = true, env = "MAESTRO_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Production needs: demanded vs. available quantity for every part
    Needs(NeedsArgs),

    /// Parts short of demand, most critical first
    Shortages(ShortagesArgs),

    /// Station delays and their labor cost
    Delays(DelaysArgs),

    /// Incident root causes by 6M category
    Causes(CausesArgs),

    /// Ranked staffing candidates per station
    Recommend(RecommendArgs),

    /// Stages in assembly order
    Stages(StagesArgs),

    /// Employee directory with filters
    Employees(EmployeesArgs),

    /// Parts catalogue with filters and stock totals
    Parts(PartsArgs),

    /// Check snapshot data quality
    Validate(ValidateArgs),

    /// Build a snapshot from MES/ERP/PLM CSV exports
    Import(ImportArgs),

    /// Program dashboard with all key indicators
    Status(StatusArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal, Markdown when piped
    #[default]
    Auto,
    /// Terminal table
    Table,
    /// Markdown tables
    Md,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}
