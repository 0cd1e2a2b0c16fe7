//! Part demand aggregated over every station of the program

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::DataIndex;
use crate::core::Snapshot;

/// One consumption of a part at a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub stage: String,
    pub station: u32,
}

/// Required quantity of one part reference with its traceability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Demand {
    pub reference: String,

    /// Number of times the reference appears across all stations
    pub required: u32,

    /// Distinct stage names using the reference, first-seen order
    pub stages: Vec<String>,

    /// Every station consuming the reference (repeated per occurrence)
    pub usages: Vec<Usage>,
}

impl Demand {
    fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            required: 0,
            stages: Vec::new(),
            usages: Vec::new(),
        }
    }

    fn record(&mut self, stage: &str, station: u32) {
        self.required = self.required.saturating_add(1);
        if !self.stages.iter().any(|s| s == stage) {
            self.stages.push(stage.to_string());
        }
        self.usages.push(Usage {
            stage: stage.to_string(),
            station,
        });
    }
}

/// Demand split into references found in the catalogue and unknown ones
#[derive(Debug, Clone, Default, Serialize)]
pub struct NeedsReport {
    pub resolved: Vec<Demand>,
    pub unresolved: Vec<Demand>,
}

impl NeedsReport {
    pub fn total_required(&self) -> u64 {
        self.resolved
            .iter()
            .chain(&self.unresolved)
            .map(|d| u64::from(d.required))
            .sum()
    }
}

/// Tally required quantities per part reference
pub fn aggregate_needs(snapshot: &Snapshot, index: &DataIndex<'_>) -> NeedsReport {
    let mut order: Vec<Demand> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (stage, station) in snapshot.stations() {
        for reference in station.part_references() {
            let position = *positions.entry(reference.to_string()).or_insert_with(|| {
                order.push(Demand::new(reference));
                order.len() - 1
            });
            order[position].record(&stage.name, station.id);
        }
    }

    let (resolved, unresolved): (Vec<Demand>, Vec<Demand>) = order
        .into_iter()
        .partition(|demand| index.part(&demand.reference).is_some());

    for demand in &unresolved {
        warn!(
            reference = %demand.reference,
            required = demand.required,
            "part reference not found in catalogue"
        );
    }
    debug!(
        resolved = resolved.len(),
        unresolved = unresolved.len(),
        "aggregated part demand"
    );

    NeedsReport {
        resolved,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Part, Stage, Station};

    fn station(id: u32, references: &str) -> Station {
        let mut station = Station::new(id);
        station.references = Some(references.to_string());
        station
    }

    fn snapshot(parts: Vec<Part>) -> Snapshot {
        let mut fuselage = Stage::new("s0", "Assemblage fuselage centrale");
        fuselage.stations.push(station(1, "P1;P2; P1 ;;"));
        fuselage.stations.push(station(2, "P3"));
        let mut cockpit = Stage::new("s1", "Assemblage cockpit");
        cockpit.stations.push(station(3, "P2;P1"));
        Snapshot::new(vec![], parts, vec![fuselage, cockpit])
    }

    #[test]
    fn test_counts_repetitions_and_traces_usage() {
        let snapshot = snapshot(vec![
            Part::new("P1", "Panel", 0),
            Part::new("P2", "Rivet", 0),
            Part::new("P3", "Bracket", 0),
        ]);
        let index = DataIndex::build(&snapshot);
        let report = aggregate_needs(&snapshot, &index);

        let refs: Vec<&str> = report.resolved.iter().map(|d| d.reference.as_str()).collect();
        assert_eq!(refs, vec!["P1", "P2", "P3"]);

        let p1 = &report.resolved[0];
        assert_eq!(p1.required, 3);
        assert_eq!(p1.stages, vec!["Assemblage fuselage centrale", "Assemblage cockpit"]);
        assert_eq!(p1.usages.len(), 3);
        assert_eq!(p1.usages[2], Usage { stage: "Assemblage cockpit".into(), station: 3 });
        assert!(report.unresolved.is_empty());
        assert_eq!(report.total_required(), 6);
    }

    #[test]
    fn test_unknown_references_are_unresolved() {
        let snapshot = snapshot(vec![Part::new("P2", "Rivet", 0)]);
        let index = DataIndex::build(&snapshot);
        let report = aggregate_needs(&snapshot, &index);

        assert_eq!(report.resolved.len(), 1);
        let unresolved: Vec<(&str, u32)> = report
            .unresolved
            .iter()
            .map(|d| (d.reference.as_str(), d.required))
            .collect();
        assert_eq!(unresolved, vec![("P1", 3), ("P3", 1)]);
    }

    #[test]
    fn test_empty_parts_leaves_everything_unresolved() {
        let snapshot = snapshot(vec![]);
        let index = DataIndex::build(&snapshot);
        let report = aggregate_needs(&snapshot, &index);
        assert!(report.resolved.is_empty());
        assert_eq!(report.unresolved.len(), 3);
    }

    #[test]
    fn test_references_are_case_sensitive() {
        let mut stage = Stage::new("s0", "Assemblage cockpit");
        stage.stations.push(station(1, "p1;P1"));
        let snapshot = Snapshot::new(vec![], vec![Part::new("P1", "Panel", 0)], vec![stage]);
        let index = DataIndex::build(&snapshot);
        let report = aggregate_needs(&snapshot, &index);
        assert_eq!(report.resolved[0].required, 1);
        assert_eq!(report.unresolved[0].reference, "p1");
    }
}
