//! `maestro import` command - Build a snapshot from MES/ERP/PLM CSV exports

use chrono::Utc;
use console::style;
use csv::ReaderBuilder;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::{Metadata, Snapshot};
use crate::entities::employee::parse_skills;
use crate::entities::fields::{parse_station_label, split_list};
use crate::entities::{Employee, Part, Stage, Station};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// MES station log (Poste, Nom, Référence, Temps Prévu, Temps Réel, ...)
    #[arg(long)]
    pub mes: PathBuf,

    /// ERP team roster (Matricule, Prénom, Nom, Qualification, ...)
    #[arg(long)]
    pub erp: PathBuf,

    /// PLM part list (Code / Référence, Désignation, Quantité, ...)
    #[arg(long)]
    pub plm: PathBuf,

    /// Output YAML file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Free-text provenance recorded in the snapshot metadata
    #[arg(long)]
    pub source: Option<String>,
}

/// Import statistics
#[derive(Debug, Default, PartialEq)]
struct ImportStats {
    rows_processed: usize,
    skipped: usize,
}

pub fn run(args: ImportArgs, global: &crate::cli::GlobalOpts) -> Result<()> {
    for path in [&args.mes, &args.erp, &args.plm] {
        if !path.exists() {
            return Err(miette::miette!("File not found: {}", path.display()));
        }
    }

    let mut stats = ImportStats::default();
    let employees = read_roster(open(&args.erp)?, &mut stats)?;
    let parts = read_parts(open(&args.plm)?, &mut stats)?;
    let stages = read_stations(open(&args.mes)?, &employees, &mut stats)?;

    let mut snapshot = Snapshot::new(employees, parts, stages);
    snapshot.metadata = Metadata {
        source: args.source.clone(),
        extracted_at: Some(Utc::now()),
    };

    let yaml = serde_yml::to_string(&snapshot).into_diagnostic()?;
    match &args.output {
        Some(path) => fs::write(path, yaml).into_diagnostic()?,
        None => print!("{}", yaml),
    }

    if !global.quiet {
        eprintln!("{}", style("─".repeat(50)).dim());
        eprintln!("{}", style("Import Summary").bold());
        eprintln!("{}", style("─".repeat(50)).dim());
        eprintln!("  Rows processed: {}", style(stats.rows_processed).cyan());
        eprintln!("  Employees:      {}", style(snapshot.employees.len()).green());
        eprintln!("  Parts:          {}", style(snapshot.parts.len()).green());
        eprintln!(
            "  Stages:         {} ({} stations)",
            style(snapshot.stages.len()).green(),
            snapshot.station_count()
        );
        if stats.skipped > 0 {
            eprintln!("  Skipped:        {}", style(stats.skipped).dim());
        }
        if let Some(path) = &args.output {
            eprintln!("{} Wrote {}", style("✓").green(), style(path.display()).yellow());
        }
    }

    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path).into_diagnostic()?))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Parse a spreadsheet number, accepting a decimal comma
fn parse_number(s: &str) -> Option<f64> {
    s.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Warn about a bad row and count it as skipped
fn skip_row(stats: &mut ImportStats, file: &str, row_num: usize, reason: impl std::fmt::Display) {
    eprintln!("{} {} row {}: {}", style("✗").red(), file, row_num, reason);
    stats.skipped += 1;
}

fn read_roster<R: Read>(reader: R, stats: &mut ImportStats) -> Result<Vec<Employee>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers().into_diagnostic()?.clone();
    let header_map = build_header_map(&headers);

    let mut employees = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let row_num = row_idx + 2;
        stats.rows_processed += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                skip_row(stats, "ERP", row_num, e);
                continue;
            }
        };
        let Some(id) = get_field(&record, &header_map, "matricule") else {
            skip_row(stats, "ERP", row_num, "missing 'Matricule'");
            continue;
        };

        let mut employee = Employee::new(
            id,
            get_field(&record, &header_map, "prénom").unwrap_or_default(),
            get_field(&record, &header_map, "nom").unwrap_or_default(),
        );
        employee.qualification = get_field(&record, &header_map, "qualification");
        employee.experience =
            get_field(&record, &header_map, "niveau d'expérience").and_then(|s| s.parse().ok());
        employee.hourly_cost = get_field(&record, &header_map, "coût horaire (€)")
            .and_then(|s| parse_number(&s))
            .map_or(0.0, |v| v.max(0.0));
        employee.skills = get_field(&record, &header_map, "compétences")
            .map(|s| parse_skills(&s))
            .unwrap_or_default();
        employee.clearances = get_field(&record, &header_map, "habilitations")
            .map(|s| split_list(&s))
            .unwrap_or_default();
        employee.home_station = get_field(&record, &header_map, "poste de montage");
        employees.push(employee);
    }

    debug!(count = employees.len(), "read ERP roster");
    Ok(employees)
}

fn read_parts<R: Read>(reader: R, stats: &mut ImportStats) -> Result<Vec<Part>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers().into_diagnostic()?.clone();
    let header_map = build_header_map(&headers);

    let number = |record: &csv::StringRecord, field: &str| {
        get_field(record, &header_map, field)
            .and_then(|s| parse_number(&s))
            .map(|v| v.max(0.0))
    };

    let mut parts = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let row_num = row_idx + 2;
        stats.rows_processed += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                skip_row(stats, "PLM", row_num, e);
                continue;
            }
        };
        let Some(reference) = get_field(&record, &header_map, "code / référence") else {
            skip_row(stats, "PLM", row_num, "missing 'Code / Référence'");
            continue;
        };

        let mut part = Part::new(
            reference,
            get_field(&record, &header_map, "désignation").unwrap_or_default(),
            number(&record, "quantité").map_or(0, |v| v.min(f64::from(u32::MAX)) as u32),
        );
        part.unit_cost = number(&record, "coût achat pièce (€)").unwrap_or(0.0);
        part.mass_kg = number(&record, "masse (kg)").unwrap_or(0.0);
        part.criticality = get_field(&record, &header_map, "criticité").and_then(|s| s.parse().ok());
        part.supplier = get_field(&record, &header_map, "fournisseur");
        part.lead_time_days = number(&record, "délai approvisionnement")
            .map(|v| v.min(f64::from(u32::MAX)) as u32);
        part.design_hours = number(&record, "temps cao (h)").unwrap_or(0.0);
        parts.push(part);
    }

    debug!(count = parts.len(), "read PLM part list");
    Ok(parts)
}

/// Group MES rows into stages and staff each station from the roster
fn read_stations<R: Read>(reader: R, employees: &[Employee], stats: &mut ImportStats) -> Result<Vec<Stage>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers().into_diagnostic()?.clone();
    let header_map = build_header_map(&headers);

    let mut stages: Vec<Stage> = Vec::new();
    let mut stage_index: HashMap<String, usize> = HashMap::new();

    for (row_idx, result) in rdr.records().enumerate() {
        let row_num = row_idx + 2;
        stats.rows_processed += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                skip_row(stats, "MES", row_num, e);
                continue;
            }
        };
        let Some(station_id) = get_field(&record, &header_map, "poste").and_then(|s| parse_station_label(&s)) else {
            skip_row(stats, "MES", row_num, "missing or non-numeric 'Poste'");
            continue;
        };
        let Some(stage_name) = get_field(&record, &header_map, "nom") else {
            skip_row(stats, "MES", row_num, "missing stage 'Nom'");
            continue;
        };

        let mut station = Station::new(station_id);
        station.references = get_field(&record, &header_map, "référence");
        station.planned = get_field(&record, &header_map, "temps prévu");
        station.actual = get_field(&record, &header_map, "temps réel");
        station.incident = get_field(&record, &header_map, "aléas industriels");
        station.cause = get_field(&record, &header_map, "cause potentielle");
        station.employees = employees
            .iter()
            .filter(|e| e.home_station.as_deref().and_then(parse_station_label) == Some(station_id))
            .map(|e| e.id.clone())
            .collect();

        let position = *stage_index.entry(stage_name.clone()).or_insert_with(|| {
            stages.push(Stage::new(format!("stage_{}", stages.len()), stage_name.clone()));
            stages.len() - 1
        });
        stages[position].stations.push(station);
    }

    debug!(stages = stages.len(), "read MES station log");
    Ok(stages)
}

/// Build a map of lowercase header names to column indices
fn build_header_map(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase().trim().to_string(), i))
        .collect()
}

/// Get a field value from a CSV record
fn get_field(
    record: &csv::StringRecord,
    header_map: &HashMap<String, usize>,
    field: &str,
) -> Option<String> {
    header_map
        .get(field)
        .and_then(|&idx| record.get(idx))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
