//! `maestro shortages` command - Parts short of demand

use miette::Result;

use crate::analysis::shortage::cost_by_supplier;
use crate::analysis::{aggregate_needs, analyze_shortages, DataIndex};
use crate::cli::helpers::{load, truncate_str};
use crate::cli::output::{money, or_dash, print_structured, print_summary, resolve_format, Report};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::entities::Criticality;

#[derive(clap::Args, Debug)]
pub struct ShortagesArgs {
    /// Only shortages of this criticality (Faible, Moyenne, Haute, Critique)
    #[arg(long, short = 'c')]
    pub criticality: Option<Criticality>,

    /// Show missing cost grouped by supplier instead of the part list
    #[arg(long)]
    pub by_supplier: bool,

    /// Show missing units per criticality tier instead of the part list
    #[arg(long)]
    pub by_criticality: bool,

    /// Limit number of rows
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(args: ShortagesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let currency = config.currency();
    let snapshot = load(global, &config)?;

    let index = DataIndex::build(&snapshot);
    let needs = aggregate_needs(&snapshot, &index);
    let report = analyze_shortages(&needs, &index);

    if args.by_supplier {
        let limit = args.limit.unwrap_or(crate::analysis::shortage::DEFAULT_SUPPLIER_LIMIT);
        let suppliers = cost_by_supplier(&report.shortages, limit);
        if print_structured(&suppliers, format)? {
            return Ok(());
        }
        let mut table = Report::new("Shortage cost by supplier", ["Supplier", "Missing", "Cost"]);
        for s in &suppliers {
            table.push([s.supplier.clone(), s.missing.to_string(), money(s.cost, currency)]);
        }
        return table.print(format);
    }

    if args.by_criticality {
        if print_structured(&report.by_criticality, format)? {
            return Ok(());
        }
        let mut table = Report::new("Missing units by criticality", ["Criticality", "Missing"]);
        for tier in &report.by_criticality {
            table.push([or_dash(tier.criticality), tier.missing.to_string()]);
        }
        return table.print(format);
    }

    let mut shortages: Vec<_> = report
        .shortages
        .iter()
        .filter(|s| args.criticality.map_or(true, |c| s.criticality == Some(c)))
        .collect();
    if let Some(limit) = args.limit {
        shortages.truncate(limit);
    }

    if print_structured(&serde_json::json!({
        "shortages": shortages,
        "kpis": report.shortage_kpis,
    }), format)?
    {
        return Ok(());
    }

    let mut table = Report::new(
        "Part shortages",
        ["Reference", "Designation", "Criticality", "Required", "Available", "Missing", "Cost", "Lead time (d)", "Supplier"],
    );
    for s in &shortages {
        table.push([
            s.reference.clone(),
            truncate_str(&s.designation, 28),
            or_dash(s.criticality),
            s.required.to_string(),
            s.available.to_string(),
            s.missing.to_string(),
            money(s.total_cost, currency),
            or_dash(s.lead_time_days),
            or_dash(s.supplier.as_deref()),
        ]);
    }
    table.print(format)?;

    if !global.quiet {
        let kpis = &report.shortage_kpis;
        print_summary(
            format,
            &[
                ("Part types short", kpis.part_types.to_string()),
                ("Missing units", kpis.total_missing.to_string()),
                ("Missing cost", money(kpis.total_cost, currency)),
                ("Design hours", format!("{:.1} h", kpis.total_design_hours)),
                ("Longest lead time", format!("{} d", kpis.max_lead_time_days)),
                ("Critical shortages", kpis.critical_count.to_string()),
            ],
        );
    }

    Ok(())
}
