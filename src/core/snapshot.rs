//! Snapshot of the assembly program and canonical stage ordering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::entities::{Employee, Part, Stage, Station};

/// Canonical sequence of the aircraft assembly stages
pub const CANONICAL_STAGE_ORDER: [&str; 23] = [
    "Assemblage fuselage centrale",
    "Montage train atterissage",
    "Assemblage moteur / fuselage / train atterissage",
    "Assemblage visserie fuselage partie basse",
    "Assemblage visserie train atterissage",
    "Assemblage queue avion",
    "Assemblage cockpit",
    "Assemblage réacteurs",
    "Assemblage aile gauche",
    "Assemblage train atterissage gauche",
    "Fixation réacteur aile gauche",
    "Fixation aile gauche avion / train atterissage",
    "Assemblage aile droite",
    "Assemblage train atterissage droit",
    "Fixation réacteur aile droite",
    "Fixation aile droit avion / train atterissage",
    "Fixation bout ailes",
    "Passage faisceaux électrique ailes",
    "Fixation lumières bout ailes",
    "Stickers cockpit",
    "Stickers réacteur",
    "Stickers fuselage gauche",
    "Stickers fuselage droit",
];

/// Provenance of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Free-text description of where the data came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// When the source systems were extracted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.extracted_at.is_none()
    }
}

/// Read-only snapshot of employees, parts and stages
///
/// All three collections are required; a document missing one of them is a
/// load-time error rather than an empty collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,

    pub employees: Vec<Employee>,

    pub parts: Vec<Part>,

    pub stages: Vec<Stage>,
}

impl Snapshot {
    pub fn new(employees: Vec<Employee>, parts: Vec<Part>, stages: Vec<Stage>) -> Self {
        Self {
            metadata: Metadata::default(),
            employees,
            parts,
            stages,
        }
    }

    /// All stations with their owning stage, in snapshot order
    pub fn stations(&self) -> impl Iterator<Item = (&Stage, &Station)> {
        self.stages
            .iter()
            .flat_map(|stage| stage.stations.iter().map(move |station| (stage, station)))
    }

    pub fn station_count(&self) -> usize {
        self.stages.iter().map(|s| s.stations.len()).sum()
    }

    /// SHA-256 of the canonical JSON encoding, usable as a memoization key
    pub fn fingerprint(&self) -> String {
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        format!("{:x}", hasher.finalize())
    }
}

/// Total order over stage names used to sequence the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOrder {
    names: Vec<String>,
}

impl Default for StageOrder {
    fn default() -> Self {
        Self::new(CANONICAL_STAGE_ORDER.iter().map(|s| s.to_string()).collect())
    }
}

impl StageOrder {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of a stage name in the canonical order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name.trim())
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Stages in canonical order; unknown names go last, keeping input order
    pub fn sort<'a>(&self, stages: &'a [Stage]) -> Vec<&'a Stage> {
        let mut sorted: Vec<&Stage> = stages.iter().collect();
        sorted.sort_by_key(|stage| self.position(&stage.name).unwrap_or(usize::MAX));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(id: &str, name: &str) -> Stage {
        Stage::new(id, name)
    }

    #[test]
    fn test_sort_canonical_stages() {
        let stages = vec![
            stage("s0", "Stickers cockpit"),
            stage("s1", "Assemblage fuselage centrale"),
            stage("s2", "Assemblage cockpit"),
        ];
        let sorted: Vec<&str> = StageOrder::default()
            .sort(&stages)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(sorted, vec!["s1", "s2", "s0"]);
    }

    #[test]
    fn test_unknown_stages_sort_last_in_original_order() {
        let stages = vec![
            stage("x1", "Peinture"),
            stage("s0", "Fixation bout ailes"),
            stage("x2", "Essais moteurs"),
            stage("s1", "Assemblage queue avion"),
            stage("x3", "Livraison"),
        ];
        let sorted: Vec<&str> = StageOrder::default()
            .sort(&stages)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(sorted, vec!["s1", "s0", "x1", "x2", "x3"]);
    }

    #[test]
    fn test_custom_stage_order() {
        let order = StageOrder::new(vec!["B".into(), "A".into()]);
        let stages = vec![stage("a", "A"), stage("c", "C"), stage("b", "B")];
        let sorted: Vec<&str> = order.sort(&stages).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(sorted, vec!["b", "a", "c"]);
        assert!(!order.is_known("C"));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut snapshot = Snapshot::new(vec![], vec![Part::new("P1", "Panel", 3)], vec![]);
        let first = snapshot.fingerprint();
        assert_eq!(first, snapshot.fingerprint());
        assert_eq!(first.len(), 64);

        snapshot.parts[0].quantity = 4;
        assert_ne!(first, snapshot.fingerprint());
    }

    #[test]
    fn test_missing_collection_is_rejected() {
        let result: Result<Snapshot, _> = serde_yml::from_str("employees: []\nparts: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_stations_iterates_all_stages() {
        let mut a = stage("a", "A");
        a.stations.push(Station::new(1));
        a.stations.push(Station::new(2));
        let mut b = stage("b", "B");
        b.stations.push(Station::new(3));
        let snapshot = Snapshot::new(vec![], vec![], vec![a, b]);
        let ids: Vec<u32> = snapshot.stations().map(|(_, s)| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(snapshot.station_count(), 3);
    }
}
