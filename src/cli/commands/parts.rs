//! `maestro parts` command - Parts catalogue

use miette::Result;

use crate::analysis::directory::{stock_stats, PartFilter};
use crate::cli::helpers::{load, truncate_str};
use crate::cli::output::{money, or_dash, print_structured, print_summary, resolve_format, Report};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::entities::Criticality;

#[derive(clap::Args, Debug)]
pub struct PartsArgs {
    /// Search in reference, designation and supplier
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by supplier (exact, case-insensitive)
    #[arg(long)]
    pub supplier: Option<String>,

    /// Filter by criticality
    #[arg(long, short = 'c')]
    pub criticality: Option<Criticality>,

    /// Show only stock totals
    #[arg(long)]
    pub stats: bool,

    /// Limit number of rows
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(args: PartsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let currency = config.currency();
    let snapshot = load(global, &config)?;

    let filter = PartFilter {
        search: args.search.clone(),
        supplier: args.supplier.clone(),
        criticality: args.criticality,
    };
    let mut parts = filter.apply(&snapshot.parts);
    let stats = stock_stats(parts.iter().copied());

    if args.stats {
        if print_structured(&stats, format)? {
            return Ok(());
        }
    } else {
        if let Some(limit) = args.limit {
            parts.truncate(limit);
        }
        if print_structured(&parts, format)? {
            return Ok(());
        }

        let mut table = Report::new(
            "Parts catalogue",
            ["Reference", "Designation", "Qty", "Unit cost", "Mass (kg)", "Criticality", "Supplier", "Lead time (d)"],
        );
        for part in &parts {
            table.push([
                part.reference.clone(),
                truncate_str(&part.designation, 32),
                part.quantity.to_string(),
                money(part.unit_cost, currency),
                format!("{:.2}", part.mass_kg),
                or_dash(part.criticality),
                or_dash(part.supplier.as_deref()),
                or_dash(part.lead_time_days),
            ]);
        }
        table.print(format)?;

        if global.quiet {
            return Ok(());
        }
    }

    print_summary(
        format,
        &[
            ("Parts", stats.parts.to_string()),
            ("Units in stock", stats.total_quantity.to_string()),
            ("Stock value", money(stats.stock_value, currency)),
            ("Stock mass", format!("{:.1} kg", stats.stock_mass_kg)),
            ("Design hours", format!("{:.1} h", stats.design_hours)),
            ("Suppliers", stats.suppliers.to_string()),
        ],
    );

    Ok(())
}
