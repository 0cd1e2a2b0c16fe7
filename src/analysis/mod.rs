//! Derived decision-support reports
//!
//! Every analyzer is a pure function of a borrowed [`Snapshot`]:
//!
//! ```text
//! Snapshot ──► DataIndex ──┬──► needs ──► shortage
//!                          ├──► delay
//!                          ├──► root_cause
//!                          └──► compatibility
//! ```
//!
//! [`Analysis::run`] computes all of them in one pass for callers that need
//! the whole picture (status dashboard, JSON export).

pub mod compatibility;
pub mod delay;
pub mod directory;
pub mod index;
pub mod needs;
pub mod root_cause;
pub mod shortage;
pub mod validation;

pub use compatibility::{recommend, Candidate, ScoreBreakdown, StationRecommendation};
pub use delay::{analyze_delays, DelayKpis, DelayReport, StationDelay};
pub use index::DataIndex;
pub use needs::{aggregate_needs, Demand, NeedsReport, Usage};
pub use root_cause::{analyze_root_causes, classify, Category, RootCauseReport};
pub use shortage::{analyze_shortages, PartNeed, ShortageReport};
pub use validation::{validate, Finding, FindingKind};

use serde::Serialize;
use tracing::debug;

use crate::core::Snapshot;

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// All reports derived from one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Content fingerprint of the analyzed snapshot
    pub fingerprint: String,
    pub needs: NeedsReport,
    pub shortages: ShortageReport,
    pub delays: DelayReport,
    pub root_causes: RootCauseReport,
    pub recommendations: Vec<StationRecommendation>,
}

impl Analysis {
    pub fn run(snapshot: &Snapshot, candidates: usize) -> Self {
        let index = DataIndex::build(snapshot);
        let needs = aggregate_needs(snapshot, &index);
        let shortages = analyze_shortages(&needs, &index);
        let delays = analyze_delays(snapshot, &index);
        let root_causes = analyze_root_causes(snapshot);
        let recommendations = recommend(snapshot, &index, candidates);

        debug!(
            shortages = shortages.shortages.len(),
            incidents = root_causes.total_incidents,
            stations = recommendations.len(),
            "analysis complete"
        );

        Self {
            fingerprint: snapshot.fingerprint(),
            needs,
            shortages,
            delays,
            root_causes,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Employee, Part, Stage, Station};

    #[test]
    fn test_round1() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(51.666), 51.7);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_run_is_deterministic() {
        let mut employee = Employee::new("E1", "Ana", "Martin");
        employee.hourly_cost = 20.0;
        let mut station = Station::new(1);
        station.planned = Some("01:00".into());
        station.actual = Some("01:31".into());
        station.incident = Some("Usure gabarits".into());
        station.references = Some("P1;P1;UNKNOWN".into());
        station.employees = vec!["E1".into()];
        let mut stage = Stage::new("s0", "Assemblage cockpit");
        stage.stations.push(station);
        let snapshot = Snapshot::new(vec![employee], vec![Part::new("P1", "Panel", 1)], vec![stage]);

        let first = Analysis::run(&snapshot, 5);
        let second = Analysis::run(&snapshot, 5);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.recommendations, second.recommendations);
        assert_eq!(first.shortages.shortage_kpis.total_missing, 1);
        assert_eq!(first.needs.unresolved.len(), 1);
        assert!((first.delays.kpis.total_delay_cost - 20.0).abs() < 1e-9);
        assert_eq!(first.root_causes.dominant, Some(Category::Materiel));
    }
}
