//! `maestro stages` command - Stages in assembly order

use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{format_minutes, load, truncate_str};
use crate::cli::output::{or_dash, print_structured, resolve_format, Report};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::entities::Stage;

#[derive(clap::Args, Debug)]
pub struct StagesArgs {
    /// List the stations of each stage
    #[arg(long)]
    pub stations: bool,
}

#[derive(Debug, Serialize)]
struct StageRow<'a> {
    /// 1-based position in the configured order, absent for unknown names
    position: Option<usize>,
    id: &'a str,
    name: &'a str,
    stations: Vec<u32>,
    incidents: usize,
    planned_minutes: u64,
    actual_minutes: u64,
}

impl<'a> StageRow<'a> {
    fn new(stage: &'a Stage, position: Option<usize>) -> Self {
        Self {
            position: position.map(|p| p + 1),
            id: &stage.id,
            name: &stage.name,
            stations: stage.stations.iter().map(|s| s.id).collect(),
            incidents: stage.incident_count(),
            planned_minutes: stage.stations.iter().map(|s| u64::from(s.planned_minutes())).sum(),
            actual_minutes: stage.stations.iter().map(|s| u64::from(s.actual_minutes())).sum(),
        }
    }
}

pub fn run(args: StagesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let snapshot = load(global, &config)?;
    let order = config.stage_order();

    let rows: Vec<StageRow> = order
        .sort(&snapshot.stages)
        .into_iter()
        .map(|stage| StageRow::new(stage, order.position(&stage.name)))
        .collect();

    if print_structured(&rows, format)? {
        return Ok(());
    }

    let mut headers = vec!["#", "ID", "Stage", "Stations", "Incidents", "Planned", "Actual"];
    if args.stations {
        headers.push("Station ids");
    }
    let mut table = Report::new("Assembly stages", headers);
    for row in &rows {
        let mut cells = vec![
            or_dash(row.position),
            row.id.to_string(),
            truncate_str(row.name, 36),
            row.stations.len().to_string(),
            row.incidents.to_string(),
            format_minutes(row.planned_minutes),
            format_minutes(row.actual_minutes),
        ];
        if args.stations {
            let ids: Vec<String> = row.stations.iter().map(u32::to_string).collect();
            cells.push(ids.join(", "));
        }
        table.push(cells);
    }
    table.print(format)
}
