//! `maestro needs` command - Production needs per part

use console::style;
use miette::Result;

use crate::analysis::{aggregate_needs, analyze_shortages, DataIndex};
use crate::cli::helpers::{load, truncate_str};
use crate::cli::output::{money, or_dash, print_structured, print_summary, resolve_format, Report};
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct NeedsArgs {
    /// Show only parts whose stock does not cover demand
    #[arg(long)]
    pub insufficient: bool,

    /// Show the stations consuming each part
    #[arg(long)]
    pub trace: bool,

    /// Search in reference and designation
    #[arg(long)]
    pub search: Option<String>,
}

pub fn run(args: NeedsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let snapshot = load(global, &config)?;

    let index = DataIndex::build(&snapshot);
    let needs = aggregate_needs(&snapshot, &index);
    let report = analyze_shortages(&needs, &index);

    let needle = args.search.as_deref().map(str::to_lowercase);
    let rows: Vec<_> = report
        .production_needs
        .iter()
        .filter(|n| !args.insufficient || !n.is_sufficient())
        .filter(|n| {
            needle.as_deref().map_or(true, |q| {
                n.reference.to_lowercase().contains(q) || n.designation.to_lowercase().contains(q)
            })
        })
        .collect();

    if print_structured(&serde_json::json!({
        "needs": rows,
        "kpis": report.needs_kpis,
        "unresolved": report.unresolved,
    }), format)?
    {
        return Ok(());
    }

    let mut headers = vec!["Reference", "Designation", "Required", "Available", "Missing", "Criticality", "Cost"];
    if args.trace {
        headers.push("Stations");
    }
    let mut table = Report::new("Production needs", headers);
    for need in &rows {
        let mut row = vec![
            need.reference.clone(),
            truncate_str(&need.designation, 32),
            need.required.to_string(),
            need.available.to_string(),
            need.missing.to_string(),
            or_dash(need.criticality),
            money(need.total_cost, config.currency()),
        ];
        if args.trace {
            let stations: Vec<String> = need.usages.iter().map(|u| u.station.to_string()).collect();
            row.push(stations.join(", "));
        }
        table.push(row);
    }
    table.print(format)?;

    if !global.quiet {
        let kpis = &report.needs_kpis;
        print_summary(
            format,
            &[
                ("Parts demanded", kpis.total.to_string()),
                ("Sufficient", kpis.sufficient.to_string()),
                ("Insufficient", kpis.insufficient.to_string()),
                ("Critical insufficient", kpis.critical_insufficient.to_string()),
            ],
        );

        if !report.unresolved.is_empty() {
            eprintln!(
                "{} {} demanded reference(s) not in the parts catalogue: {}",
                style("!").yellow(),
                report.unresolved.len(),
                report
                    .unresolved
                    .iter()
                    .map(|d| d.reference.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    Ok(())
}
