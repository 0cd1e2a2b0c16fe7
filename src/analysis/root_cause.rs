//! 6M root-cause classification of station incidents

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::round1;
use crate::core::Snapshot;

/// Default number of labels in the most-frequent list
pub const DEFAULT_TOP_LABELS: usize = 6;

/// Ishikawa category of an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Matériel")]
    Materiel,
    #[serde(rename = "Matière")]
    Matiere,
    #[serde(rename = "Méthode")]
    Methode,
    #[serde(rename = "Main d'œuvre")]
    MainDOeuvre,
    Milieu,
    Mesure,
    #[serde(rename = "Non classifié")]
    Unclassified,
}

impl Category {
    /// The six 6M categories in reporting order
    pub const SIX_M: [Category; 6] = [
        Category::Materiel,
        Category::Matiere,
        Category::Methode,
        Category::MainDOeuvre,
        Category::Milieu,
        Category::Mesure,
    ];

    /// Every category a label can classify into
    pub const ALL: [Category; 7] = [
        Category::Materiel,
        Category::Matiere,
        Category::Methode,
        Category::MainDOeuvre,
        Category::Milieu,
        Category::Mesure,
        Category::Unclassified,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Materiel => "Matériel",
            Category::Matiere => "Matière",
            Category::Methode => "Méthode",
            Category::MainDOeuvre => "Main d'œuvre",
            Category::Milieu => "Milieu",
            Category::Mesure => "Mesure",
            Category::Unclassified => "Non classifié",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase ASCII letters only, accents folded
fn fold(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c.to_lowercase().next().unwrap_or(c) {
            'é' | 'è' | 'ê' => Some('e'),
            'œ' => Some('o'),
            c if c.is_ascii_alphabetic() => Some(c),
            _ => None,
        })
        .collect()
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold(s);
        if wanted == "maindoeuvre" || wanted == "mo" {
            return Ok(Category::MainDOeuvre);
        }
        Category::ALL
            .into_iter()
            .find(|c| fold(c.label()) == wanted)
            .ok_or_else(|| {
                format!(
                    "Invalid category: {}. Use Matériel, Matière, Méthode, Main d'œuvre, Milieu, Mesure or \"Non classifié\"",
                    s
                )
            })
    }
}

/// Known incident labels and their category (exact match)
pub const INCIDENT_CATEGORIES: [(&str, Category); 55] = [
    ("Rupture outillage spécifique", Category::Materiel),
    ("Dysfonctionnement machine soudure", Category::Materiel),
    ("Problème température atelier", Category::Milieu),
    ("Défaillance contrôle qualité", Category::Mesure),
    ("Usure équipements serrage", Category::Materiel),
    ("Incident logiciel robots", Category::Materiel),
    ("Panne système ventilation", Category::Milieu),
    ("Défaut synchronisation", Category::Methode),
    ("Interruption réseau", Category::Materiel),
    ("Incident manutention", Category::Methode),
    ("Dérive calibration optique", Category::Mesure),
    ("Usure gabarits", Category::Materiel),
    ("Contamination zone", Category::Milieu),
    ("Défaillance refroidissement", Category::Materiel),
    ("Perte traçabilité", Category::Methode),
    ("Dysfonctionnement guidage", Category::Materiel),
    ("Incident maintenance", Category::Materiel),
    ("Problème lubrification", Category::Materiel),
    ("Défaut communication", Category::Methode),
    ("Déformation supports", Category::Materiel),
    ("Impact variations pression", Category::Milieu),
    ("Incident ventilation", Category::Milieu),
    ("Dérive calibration", Category::Mesure),
    ("Contamination", Category::Milieu),
    ("Dysfonctionnement transport", Category::Materiel),
    ("Surchauffe critique", Category::Milieu),
    ("Perte référencement", Category::Methode),
    ("Usure systèmes serrage", Category::Materiel),
    ("Incident électrique", Category::Materiel),
    ("Défaillance majeure systèmes", Category::Materiel),
    ("Problème communication inter-systèmes", Category::Methode),
    ("Dysfonctionnement guidage automatisé", Category::Materiel),
    ("Contamination zone travail sensible", Category::Milieu),
    ("Défaillance critique système contrôle", Category::Mesure),
    ("Usure prématurée outillages précision", Category::Materiel),
    ("Impact variations thermiques", Category::Milieu),
    ("Désynchronisation postes travail", Category::Methode),
    ("Incident ventilation affectant qualité", Category::Milieu),
    ("Dérive calibration instruments", Category::Mesure),
    ("Contamination zones critiques", Category::Milieu),
    ("Dysfonctionnement transport pièces", Category::Materiel),
    ("Défaillance protocoles sécurité industrielle", Category::Methode),
    ("Problème calibration systèmes", Category::Mesure),
    ("Impact vibrations sur précision", Category::Milieu),
    ("Perte traçabilité composants", Category::Methode),
    ("Dysfonctionnement systèmes guidage", Category::Materiel),
    ("Contamination environnement production", Category::Milieu),
    ("Défaillance critique contrôle qualité", Category::Mesure),
    ("Dérive paramètres production", Category::Mesure),
    ("Problème connectique électrique", Category::Materiel),
    ("Défaut adhérence supports", Category::Matiere),
    ("Problème impression marquages", Category::Materiel),
    ("Défaut positionnement étiquettes", Category::Methode),
    ("Instabilité processus marquage", Category::Methode),
    ("Erreur placement stickers", Category::MainDOeuvre),
];

/// Classify an incident label; unknown labels are `Unclassified`
pub fn classify(label: &str) -> Category {
    INCIDENT_CATEGORIES
        .iter()
        .find(|(known, _)| *known == label)
        .map_or(Category::Unclassified, |(_, category)| *category)
}

/// A station incident with its classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub station: u32,
    pub stage: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub count: usize,

    /// Percentage of all incidents, one decimal
    pub share: f64,
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RootCauseReport {
    pub total_incidents: usize,

    /// One entry per category, 6M order then `Non classifié`
    pub categories: Vec<CategoryBreakdown>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant: Option<Category>,

    pub top_labels: Vec<LabelCount>,
}

impl RootCauseReport {
    pub fn category(&self, category: Category) -> Option<&CategoryBreakdown> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Every incident of the snapshot, in station order
pub fn collect_incidents(snapshot: &Snapshot) -> Vec<Incident> {
    snapshot
        .stations()
        .filter_map(|(stage, station)| {
            let label = station.incident.as_deref()?;
            Some(Incident {
                station: station.id,
                stage: stage.name.clone(),
                label: label.to_string(),
                cause: station.cause.clone(),
                category: classify(label),
                planned: station.planned.clone(),
                actual: station.actual.clone(),
            })
        })
        .collect()
}

/// Most frequent raw labels, count descending then label
pub fn top_labels(incidents: &[Incident], limit: usize) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for incident in incidents {
        *counts.entry(incident.label.as_str()).or_default() += 1;
    }

    let mut labels: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    labels.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    labels.truncate(limit);
    labels
}

/// Tally incidents per category with drill-down
pub fn analyze_root_causes(snapshot: &Snapshot) -> RootCauseReport {
    let incidents = collect_incidents(snapshot);
    let total = incidents.len();

    let categories: Vec<CategoryBreakdown> = Category::ALL
        .iter()
        .map(|&category| {
            let members: Vec<Incident> = incidents
                .iter()
                .filter(|i| i.category == category)
                .cloned()
                .collect();
            let share = if total == 0 {
                0.0
            } else {
                round1(members.len() as f64 / total as f64 * 100.0)
            };
            CategoryBreakdown {
                category,
                count: members.len(),
                share,
                incidents: members,
            }
        })
        .collect();

    // First maximum in 6M order wins ties
    let dominant = categories
        .iter()
        .filter(|c| c.category != Category::Unclassified && c.count > 0)
        .fold(None::<&CategoryBreakdown>, |best, c| match best {
            Some(b) if b.count >= c.count => Some(b),
            _ => Some(c),
        })
        .map(|c| c.category);

    RootCauseReport {
        total_incidents: total,
        top_labels: top_labels(&incidents, DEFAULT_TOP_LABELS),
        categories,
        dominant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Stage, Station};

    fn snapshot(labels: &[Option<&str>]) -> Snapshot {
        let mut stage = Stage::new("s0", "Assemblage cockpit");
        for (i, label) in labels.iter().enumerate() {
            let mut station = Station::new(i as u32 + 1);
            station.incident = label.map(str::to_string);
            station.cause = label.map(|_| "Cause".to_string());
            stage.stations.push(station);
        }
        Snapshot::new(vec![], vec![], vec![stage])
    }

    #[test]
    fn test_classify_known_labels() {
        assert_eq!(classify("Rupture outillage spécifique"), Category::Materiel);
        assert_eq!(classify("Problème température atelier"), Category::Milieu);
        assert_eq!(classify("Défaillance contrôle qualité"), Category::Mesure);
        assert_eq!(classify("Défaut synchronisation"), Category::Methode);
        assert_eq!(classify("Défaut adhérence supports"), Category::Matiere);
        assert_eq!(classify("Erreur placement stickers"), Category::MainDOeuvre);
    }

    #[test]
    fn test_classify_is_exact_match() {
        assert_eq!(classify("Contamination"), Category::Milieu);
        assert_eq!(classify("contamination"), Category::Unclassified);
        assert_eq!(classify("Pluie de grenouilles"), Category::Unclassified);
    }

    #[test]
    fn test_table_has_no_duplicate_labels() {
        let mut labels: Vec<&str> = INCIDENT_CATEGORIES.iter().map(|(l, _)| *l).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), INCIDENT_CATEGORIES.len());
    }

    #[test]
    fn test_report_counts_and_shares() {
        let snapshot = snapshot(&[
            Some("Usure gabarits"),
            Some("Incident électrique"),
            Some("Contamination"),
            None,
            Some("Inconnu au bataillon"),
        ]);
        let report = analyze_root_causes(&snapshot);

        assert_eq!(report.total_incidents, 4);
        let materiel = report.category(Category::Materiel).unwrap();
        assert_eq!(materiel.count, 2);
        assert_eq!(materiel.share, 50.0);
        assert_eq!(materiel.incidents[0].station, 1);
        assert_eq!(materiel.incidents[0].cause.as_deref(), Some("Cause"));
        assert_eq!(report.category(Category::Unclassified).unwrap().count, 1);
        assert_eq!(report.dominant, Some(Category::Materiel));

        let sum: usize = report.categories.iter().map(|c| c.count).sum();
        assert_eq!(sum, report.total_incidents);
    }

    #[test]
    fn test_dominant_tie_goes_to_first_in_order() {
        let snapshot = snapshot(&[Some("Contamination"), Some("Usure gabarits")]);
        assert_eq!(analyze_root_causes(&snapshot).dominant, Some(Category::Materiel));
    }

    #[test]
    fn test_no_incidents() {
        let report = analyze_root_causes(&snapshot(&[None, None]));
        assert_eq!(report.total_incidents, 0);
        assert_eq!(report.dominant, None);
        assert!(report.categories.iter().all(|c| c.share == 0.0));
    }

    #[test]
    fn test_only_unclassified_has_no_dominant() {
        let report = analyze_root_causes(&snapshot(&[Some("???")]));
        assert_eq!(report.dominant, None);
        assert_eq!(report.category(Category::Unclassified).unwrap().share, 100.0);
    }

    #[test]
    fn test_top_labels() {
        let snapshot = snapshot(&[
            Some("Usure gabarits"),
            Some("Contamination"),
            Some("Usure gabarits"),
            Some("Contamination"),
            Some("Incident maintenance"),
        ]);
        let report = analyze_root_causes(&snapshot);
        let top: Vec<(&str, usize)> = report
            .top_labels
            .iter()
            .map(|l| (l.label.as_str(), l.count))
            .collect();
        assert_eq!(
            top,
            vec![("Contamination", 2), ("Usure gabarits", 2), ("Incident maintenance", 1)]
        );
    }

    #[test]
    fn test_category_serializes_french_label() {
        let json = serde_json::to_string(&Category::MainDOeuvre).unwrap();
        assert_eq!(json, "\"Main d'œuvre\"");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("materiel".parse::<Category>().unwrap(), Category::Materiel);
        assert_eq!("Matière".parse::<Category>().unwrap(), Category::Matiere);
        assert_eq!("main-d-oeuvre".parse::<Category>().unwrap(), Category::MainDOeuvre);
        assert_eq!("Non classifié".parse::<Category>().unwrap(), Category::Unclassified);
        assert!("Machine".parse::<Category>().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::entities::{Stage, Station};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_category_counts_sum_to_incidents(picks in prop::collection::vec(0usize..60, 0..40)) {
            let mut stage = Stage::new("s0", "Assemblage cockpit");
            for (i, pick) in picks.iter().enumerate() {
                let mut station = Station::new(i as u32);
                station.incident = Some(
                    INCIDENT_CATEGORIES
                        .get(*pick)
                        .map_or_else(|| format!("Label {}", pick), |(l, _)| l.to_string()),
                );
                stage.stations.push(station);
            }
            let report = analyze_root_causes(&Snapshot::new(vec![], vec![], vec![stage]));

            let sum: usize = report.categories.iter().map(|c| c.count).sum();
            prop_assert_eq!(sum, picks.len());
            prop_assert_eq!(report.total_incidents, picks.len());
        }
    }
}
