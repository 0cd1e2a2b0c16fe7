//! Station and Stage entities - the assembly program structure

use serde::{Deserialize, Deserializer, Serialize};

use super::fields;

/// Delimiter between part references in a station's reference field
pub const REFERENCE_DELIMITER: char = ';';

/// Convert an `HH:MM` (or `HH:MM:SS`) duration into minutes
///
/// Missing or malformed values yield 0; seconds are ignored.
pub fn parse_minutes(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    let mut parts = value.trim().split(':');
    let hours = parts.next().and_then(|h| h.trim().parse::<u32>().ok());
    let minutes = parts.next().and_then(|m| m.trim().parse::<u32>().ok());
    match (hours, minutes) {
        (Some(h), Some(m)) => h.saturating_mul(60).saturating_add(m),
        _ => 0,
    }
}

/// Whether a duration string is present but cannot be converted
pub fn is_malformed_duration(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => {
            let mut parts = v.trim().split(':');
            let hours = parts.next().map(|h| h.trim().parse::<u32>().is_ok());
            let minutes = parts.next().map(|m| m.trim().parse::<u32>().is_ok());
            !(hours == Some(true) && minutes == Some(true))
        }
    }
}

/// Split a reference field into trimmed, non-empty part references
pub fn split_references(field: &str) -> impl Iterator<Item = &str> {
    field
        .split(REFERENCE_DELIMITER)
        .map(str::trim)
        .filter(|r| !r.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Assignment {
    Record {
        #[serde(alias = "Matricule", alias = "matricule", deserialize_with = "fields::text")]
        id: String,
    },
    Plain(#[serde(deserialize_with = "fields::text")] String),
}

fn assignment_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<Assignment>>::deserialize(deserializer)?;
    Ok(value
        .unwrap_or_default()
        .into_iter()
        .map(|a| match a {
            Assignment::Record { id } | Assignment::Plain(id) => id,
        })
        .filter(|id| !id.is_empty())
        .collect())
}

/// A work station ("poste") within a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Station number
    #[serde(alias = "poste_id", alias = "Poste", deserialize_with = "fields::station_id")]
    pub id: u32,

    /// Planned duration (`HH:MM`)
    #[serde(
        default,
        alias = "temps_prevu",
        alias = "Temps Prévu",
        deserialize_with = "fields::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub planned: Option<String>,

    /// Actual duration (`HH:MM`)
    #[serde(
        default,
        alias = "temps_reel",
        alias = "Temps Réel",
        deserialize_with = "fields::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual: Option<String>,

    /// Incident label, at most one per station
    #[serde(
        default,
        alias = "aleas",
        alias = "Aléas Industriels",
        deserialize_with = "fields::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub incident: Option<String>,

    /// Narrative root cause of the incident
    #[serde(
        default,
        alias = "Cause Potentielle",
        deserialize_with = "fields::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cause: Option<String>,

    /// Consumed part references, `;`-delimited; repetition means quantity
    #[serde(
        default,
        alias = "reference",
        alias = "Référence",
        deserialize_with = "fields::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub references: Option<String>,

    /// Identifiers of the employees assigned to the station
    #[serde(
        default,
        deserialize_with = "assignment_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub employees: Vec<String>,
}

impl Station {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            planned: None,
            actual: None,
            incident: None,
            cause: None,
            references: None,
            employees: Vec::new(),
        }
    }

    pub fn planned_minutes(&self) -> u32 {
        parse_minutes(self.planned.as_deref())
    }

    pub fn actual_minutes(&self) -> u32 {
        parse_minutes(self.actual.as_deref())
    }

    pub fn has_incident(&self) -> bool {
        self.incident.is_some()
    }

    /// Consumed part references in declaration order (repeats preserved)
    pub fn part_references(&self) -> impl Iterator<Item = &str> {
        self.references.as_deref().into_iter().flat_map(split_references)
    }

    pub fn is_assigned(&self, employee_id: &str) -> bool {
        self.employees.iter().any(|e| e == employee_id)
    }
}

/// A production stage ("étape") grouping ordered stations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    #[serde(deserialize_with = "fields::text")]
    pub id: String,

    #[serde(deserialize_with = "fields::text")]
    pub name: String,

    #[serde(default, alias = "postes")]
    pub stations: Vec<Station>,
}

impl Stage {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stations: Vec::new(),
        }
    }

    pub fn incident_count(&self) -> usize {
        self.stations.iter().filter(|s| s.has_incident()).count()
    }
}
