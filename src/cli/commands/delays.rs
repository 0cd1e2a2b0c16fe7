//! `maestro delays` command - Station delays and labor cost

use miette::Result;

use crate::analysis::{analyze_delays, DataIndex, StationDelay};
use crate::cli::helpers::{format_minutes, format_pct, load, truncate_str};
use crate::cli::output::{money, or_dash, print_structured, print_summary, resolve_format, Report};
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct DelaysArgs {
    /// Show only stations whose actual time exceeds the plan
    #[arg(long)]
    pub delayed_only: bool,

    /// Show the N stations with the worst deviation from plan
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Only stations of this stage
    #[arg(long)]
    pub stage: Option<String>,
}

pub fn run(args: DelaysArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let currency = config.currency();
    let snapshot = load(global, &config)?;

    let index = DataIndex::build(&snapshot);
    let report = analyze_delays(&snapshot, &index);

    let rows: Vec<&StationDelay> = match args.top {
        Some(n) => report.worst_deviations(n),
        None => report.stations.iter().collect(),
    };
    let rows: Vec<&StationDelay> = rows
        .into_iter()
        .filter(|s| !args.delayed_only || s.is_delayed())
        .filter(|s| {
            args.stage
                .as_deref()
                .map_or(true, |stage| s.stage.eq_ignore_ascii_case(stage))
        })
        .collect();

    if print_structured(&serde_json::json!({
        "stations": rows,
        "kpis": report.kpis,
    }), format)?
    {
        return Ok(());
    }

    let title = match args.top {
        Some(n) => format!("Top {} deviations from plan", n),
        None => "Station delays".to_string(),
    };
    let mut table = Report::new(
        title,
        ["Stage", "Station", "Planned", "Actual", "Delay", "Deviation", "Billed (h)", "Cost", "Incident"],
    );
    for s in &rows {
        table.push([
            truncate_str(&s.stage, 24),
            s.station.to_string(),
            format_minutes(s.planned_minutes.into()),
            format_minutes(s.actual_minutes.into()),
            format_minutes(s.delay_minutes.into()),
            or_dash(s.deviation_pct.map(format_pct)),
            s.billed_hours.to_string(),
            money(s.cost, currency),
            or_dash(s.incident.as_deref().map(|i| truncate_str(i, 32))),
        ]);
    }
    table.print(format)?;

    if !global.quiet {
        let kpis = &report.kpis;
        print_summary(
            format,
            &[
                ("Stations", kpis.station_count.to_string()),
                ("Delayed stations", kpis.delayed_stations.to_string()),
                ("Incidents", format!("{} ({})", kpis.incident_count, format_pct(kpis.incident_rate))),
                ("Total delay", format!("{} h", kpis.total_delay_hours)),
                ("Delay cost", money(kpis.total_delay_cost, currency)),
            ],
        );
    }

    Ok(())
}
