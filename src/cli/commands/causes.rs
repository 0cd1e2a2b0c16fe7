//! `maestro causes` command - Incident root causes by 6M category

use console::style;
use miette::Result;

use crate::analysis::root_cause::top_labels;
use crate::analysis::{analyze_root_causes, Category};
use crate::cli::helpers::{format_pct, load, truncate_str};
use crate::cli::output::{or_dash, print_structured, print_summary, resolve_format, Report};
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct CausesArgs {
    /// Drill into one category (e.g. Matériel, Méthode, "Main d'œuvre")
    #[arg(long, short = 'c')]
    pub category: Option<Category>,

    /// Number of most frequent incident labels to show
    #[arg(long, default_value_t = crate::analysis::root_cause::DEFAULT_TOP_LABELS)]
    pub top: usize,
}

pub fn run(args: CausesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let snapshot = load(global, &config)?;

    let mut report = analyze_root_causes(&snapshot);

    if let Some(category) = args.category {
        let breakdown = report.category(category);
        if print_structured(&breakdown, format)? {
            return Ok(());
        }

        let mut table = Report::new(
            format!("Incidents classified {}", category),
            ["Stage", "Station", "Incident", "Cause", "Planned", "Actual"],
        );
        for incident in breakdown.map(|b| b.incidents.as_slice()).unwrap_or_default() {
            table.push([
                truncate_str(&incident.stage, 24),
                incident.station.to_string(),
                truncate_str(&incident.label, 36),
                or_dash(incident.cause.as_deref().map(|c| truncate_str(c, 36))),
                or_dash(incident.planned.as_deref()),
                or_dash(incident.actual.as_deref()),
            ]);
        }
        return table.print(format);
    }

    if args.top != crate::analysis::root_cause::DEFAULT_TOP_LABELS {
        let incidents: Vec<_> = report
            .categories
            .iter()
            .flat_map(|c| c.incidents.iter().cloned())
            .collect();
        report.top_labels = top_labels(&incidents, args.top);
    }

    if print_structured(&report, format)? {
        return Ok(());
    }

    let mut table = Report::new("Root causes (6M)", ["Category", "Incidents", "Share"]);
    for breakdown in &report.categories {
        table.push([
            breakdown.category.to_string(),
            breakdown.count.to_string(),
            format_pct(breakdown.share),
        ]);
    }
    table.print(format)?;

    let mut labels = Report::new("Most frequent incidents", ["Incident", "Count"]);
    for label in &report.top_labels {
        labels.push([label.label.clone(), label.count.to_string()]);
    }
    labels.print(format)?;

    if !global.quiet {
        print_summary(
            format,
            &[
                ("Incidents", report.total_incidents.to_string()),
                ("Dominant category", or_dash(report.dominant)),
            ],
        );
        if let Some(unclassified) = report.category(Category::Unclassified).filter(|c| c.count > 0) {
            eprintln!(
                "{} {} incident label(s) matched no known category",
                style("!").yellow(),
                unclassified.count
            );
        }
    }

    Ok(())
}
