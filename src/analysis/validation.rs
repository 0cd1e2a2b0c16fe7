//! Data-quality checks over a loaded snapshot
//!
//! None of these findings stop the analyzers: they describe where the
//! analyzers fell back to a default (zero duration, `Non classifié`, unpriced
//! demand, last record kept).

use serde::Serialize;

use super::root_cause::{classify, Category};
use super::{aggregate_needs, DataIndex};
use crate::core::{Snapshot, StageOrder};
use crate::entities::station::is_malformed_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    DuplicateEmployee,
    DuplicatePart,
    UnresolvedReference,
    UnknownEmployee,
    MalformedDuration,
    UnclassifiedIncident,
    UnknownStage,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FindingKind::DuplicateEmployee => "duplicate employee",
            FindingKind::DuplicatePart => "duplicate part",
            FindingKind::UnresolvedReference => "unresolved reference",
            FindingKind::UnknownEmployee => "unknown employee",
            FindingKind::MalformedDuration => "malformed duration",
            FindingKind::UnclassifiedIncident => "unclassified incident",
            FindingKind::UnknownStage => "unknown stage",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// What the finding is about (id, reference, station)
    pub subject: String,
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// Run every data-quality check, grouped by kind
pub fn validate(snapshot: &Snapshot, stage_order: &StageOrder) -> Vec<Finding> {
    let index = DataIndex::build(snapshot);
    let mut findings = Vec::new();

    for id in index.duplicate_employees() {
        findings.push(Finding::new(
            FindingKind::DuplicateEmployee,
            *id,
            "employee id appears more than once; the last record is used",
        ));
    }

    for reference in index.duplicate_parts() {
        findings.push(Finding::new(
            FindingKind::DuplicatePart,
            *reference,
            "part reference appears more than once; the last record is used",
        ));
    }

    for demand in aggregate_needs(snapshot, &index).unresolved {
        let stations: Vec<String> = demand.usages.iter().map(|u| u.station.to_string()).collect();
        findings.push(Finding::new(
            FindingKind::UnresolvedReference,
            demand.reference,
            format!(
                "{} unit(s) demanded at station(s) {} but not in the parts catalogue",
                demand.required,
                stations.join(", ")
            ),
        ));
    }

    for (stage, station) in snapshot.stations() {
        for id in station.employees.iter().filter(|id| index.employee(id).is_none()) {
            findings.push(Finding::new(
                FindingKind::UnknownEmployee,
                id.as_str(),
                format!("assigned to station {} ({}) but not in the roster", station.id, stage.name),
            ));
        }

        for (field, value) in [("planned", &station.planned), ("actual", &station.actual)] {
            if is_malformed_duration(value.as_deref()) {
                findings.push(Finding::new(
                    FindingKind::MalformedDuration,
                    format!("station {}", station.id),
                    format!(
                        "{} duration '{}' is not HH:MM; counted as 0",
                        field,
                        value.as_deref().unwrap_or_default()
                    ),
                ));
            }
        }

        if let Some(ref label) = station.incident {
            if classify(label) == Category::Unclassified {
                findings.push(Finding::new(
                    FindingKind::UnclassifiedIncident,
                    format!("station {}", station.id),
                    format!("incident '{}' has no 6M category", label),
                ));
            }
        }
    }

    for stage in snapshot.stages.iter().filter(|s| !stage_order.is_known(&s.name)) {
        findings.push(Finding::new(
            FindingKind::UnknownStage,
            stage.id.as_str(),
            format!("stage '{}' is not in the stage order; listed last", stage.name),
        ));
    }

    // Stable: keeps snapshot order within a kind
    findings.sort_by_key(|f| f.kind);
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Employee, Part, Stage, Station};

    fn clean_snapshot() -> Snapshot {
        let mut station = Station::new(1);
        station.planned = Some("01:00".into());
        station.actual = Some("01:10".into());
        station.incident = Some("Usure gabarits".into());
        station.references = Some("P1".into());
        station.employees = vec!["E1".into()];
        let mut stage = Stage::new("s0", "Assemblage cockpit");
        stage.stations.push(station);
        Snapshot::new(
            vec![Employee::new("E1", "Ana", "Martin")],
            vec![Part::new("P1", "Panel", 1)],
            vec![stage],
        )
    }

    #[test]
    fn test_clean_snapshot_has_no_findings() {
        assert!(validate(&clean_snapshot(), &StageOrder::default()).is_empty());
    }

    #[test]
    fn test_reports_every_kind() {
        let mut snapshot = clean_snapshot();
        snapshot.employees.push(Employee::new("E1", "Dup", "Dup"));
        snapshot.parts.push(Part::new("P1", "Dup", 0));
        {
            let station = &mut snapshot.stages[0].stations[0];
            station.references = Some("P1;GHOST".into());
            station.employees.push("E9".into());
            station.actual = Some("bientôt".into());
            station.incident = Some("Invasion de pigeons".into());
        }
        snapshot.stages.push(Stage::new("s9", "Peinture"));

        let findings = validate(&snapshot, &StageOrder::default());
        let kinds: Vec<FindingKind> = findings.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FindingKind::DuplicateEmployee,
                FindingKind::DuplicatePart,
                FindingKind::UnresolvedReference,
                FindingKind::UnknownEmployee,
                FindingKind::MalformedDuration,
                FindingKind::UnclassifiedIncident,
                FindingKind::UnknownStage,
            ]
        );
        assert_eq!(findings[2].subject, "GHOST");
        assert_eq!(findings[3].subject, "E9");
        assert!(findings[4].message.contains("actual"));
    }

    #[test]
    fn test_missing_duration_is_not_malformed() {
        let mut snapshot = clean_snapshot();
        snapshot.stages[0].stations[0].planned = None;
        assert!(validate(&snapshot, &StageOrder::default()).is_empty());
    }
}
