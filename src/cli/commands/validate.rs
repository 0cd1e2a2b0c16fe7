//! `maestro validate` command - Check snapshot data quality

use console::style;
use miette::Result;
use std::collections::BTreeMap;

use crate::analysis::{validate, FindingKind};
use crate::cli::helpers::load;
use crate::cli::output::{print_structured, resolve_format};
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Strict mode - any finding fails the command
    #[arg(long)]
    pub strict: bool,

    /// Show summary only, don't list individual findings
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let snapshot = load(global, &config)?;

    let findings = validate(&snapshot, &config.stage_order());

    if print_structured(&findings, format)? {
        return strict_result(args.strict, findings.len());
    }

    println!(
        "{} Checking {} employee(s), {} part(s), {} station(s)...\n",
        style("→").blue(),
        snapshot.employees.len(),
        snapshot.parts.len(),
        snapshot.station_count()
    );

    let mut by_kind: BTreeMap<FindingKind, usize> = BTreeMap::new();
    for finding in &findings {
        *by_kind.entry(finding.kind).or_default() += 1;
        if !args.summary && !global.quiet {
            println!(
                "{} {} [{}] {}",
                style("!").yellow(),
                style(&finding.subject).bold(),
                finding.kind,
                finding.message
            );
        }
    }

    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Stations checked: {}", style(snapshot.station_count()).cyan());
    println!("  Findings:         {}", style(findings.len()).yellow());
    for (kind, count) in &by_kind {
        println!("    {:<22} {}", format!("{}:", kind), count);
    }
    println!();

    if findings.is_empty() {
        println!("{} Snapshot passed all checks!", style("✓").green().bold());
    }
    strict_result(args.strict, findings.len())
}

fn strict_result(strict: bool, findings: usize) -> Result<()> {
    if strict && findings > 0 {
        Err(miette::miette!(
            "Validation failed: {} finding(s) in strict mode",
            findings
        ))
    } else {
        Ok(())
    }
}
