//! `maestro status` command - Program dashboard

use console::style;
use miette::Result;

use crate::analysis::Analysis;
use crate::cli::helpers::{format_pct, load};
use crate::cli::output::{money, or_dash, print_structured, resolve_format};
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// With --format json/yaml, emit every report instead of the KPIs only
    #[arg(long)]
    pub full: bool,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let currency = config.currency();
    let snapshot = load(global, &config)?;
    let analysis = Analysis::run(&snapshot, config.recommendations());

    if args.full {
        if print_structured(&analysis, format)? {
            return Ok(());
        }
    } else {
        let status = serde_json::json!({
            "fingerprint": analysis.fingerprint,
            "metadata": snapshot.metadata,
            "employees": snapshot.employees.len(),
            "parts": snapshot.parts.len(),
            "stages": snapshot.stages.len(),
            "stations": snapshot.station_count(),
            "needs": analysis.shortages.needs_kpis,
            "shortages": analysis.shortages.shortage_kpis,
            "delays": analysis.delays.kpis,
            "root_causes": {
                "total_incidents": analysis.root_causes.total_incidents,
                "dominant": analysis.root_causes.dominant,
            },
        });
        if print_structured(&status, format)? {
            return Ok(());
        }
    }

    let width = 66;
    println!("{}", style("Assembly Program Status").bold().underlined());
    println!("{}", "═".repeat(width));
    if let Some(source) = &snapshot.metadata.source {
        println!("Source:      {}", source);
    }
    if let Some(extracted) = snapshot.metadata.extracted_at {
        println!("Extracted:   {}", extracted.format("%Y-%m-%d %H:%M UTC"));
    }
    println!("Fingerprint: {}", style(&analysis.fingerprint[..12.min(analysis.fingerprint.len())]).dim());
    println!(
        "Snapshot:    {} stages, {} stations, {} employees, {} parts",
        snapshot.stages.len(),
        snapshot.station_count(),
        snapshot.employees.len(),
        snapshot.parts.len()
    );
    println!();

    let needs = &analysis.shortages.needs_kpis;
    let shortage = &analysis.shortages.shortage_kpis;
    print_two_columns(
        "PRODUCTION NEEDS",
        &[
            format!("Parts demanded:   {}", needs.total),
            format!("Sufficient:       {}", needs.sufficient),
            format!("Insufficient:     {}", needs.insufficient),
            format!("Critical short:   {}", needs.critical_insufficient),
        ],
        "SHORTAGES",
        &[
            format!("Missing units:  {}", shortage.total_missing),
            format!("Missing cost:   {}", money(shortage.total_cost, currency)),
            format!("Design hours:   {:.1}", shortage.total_design_hours),
            format!("Max lead time:  {} d", shortage.max_lead_time_days),
        ],
    );
    println!();

    let delays = &analysis.delays.kpis;
    let causes = &analysis.root_causes;
    print_two_columns(
        "DELAYS",
        &[
            format!("Delayed stations: {}", delays.delayed_stations),
            format!("Total delay:      {} h", delays.total_delay_hours),
            format!("Delay cost:       {}", money(delays.total_delay_cost, currency)),
            format!("Incident rate:    {}", format_pct(delays.incident_rate)),
        ],
        "ROOT CAUSES",
        &causes
            .categories
            .iter()
            .filter(|c| c.count > 0)
            .map(|c| format!("{:<14} {} ({})", c.category.label(), c.count, format_pct(c.share)))
            .collect::<Vec<_>>(),
    );
    println!();

    let to_restaff = analysis
        .recommendations
        .iter()
        .filter(|r| r.has_incident() && r.improvement() > 0.0)
        .count();
    println!("{}", "═".repeat(width));
    let dominant = or_dash(causes.dominant);
    println!(
        "Dominant cause: {}   Stations to restaff: {}",
        if causes.dominant.is_some() { style(dominant).yellow().bold() } else { style(dominant).dim() },
        if to_restaff > 0 { style(to_restaff).red().bold() } else { style(to_restaff).green() }
    );

    Ok(())
}

fn print_two_columns(title1: &str, lines1: &[String], title2: &str, lines2: &[String]) {
    let col_width = 32;

    println!("{:<col_width$} {}", style(title1).bold(), style(title2).bold());
    println!("{:-<col_width$} {:-<col_width$}", "", "");

    let max_lines = lines1.len().max(lines2.len());
    for i in 0..max_lines {
        let l1 = lines1.get(i).map(|s| s.as_str()).unwrap_or("");
        let l2 = lines2.get(i).map(|s| s.as_str()).unwrap_or("");
        println!("  {:<30} {}", l1, l2);
    }
}
