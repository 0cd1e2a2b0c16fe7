//! Employee entity - assembly operators with skills and clearances

use serde::{Deserialize, Deserializer, Serialize};

use super::fields::{self, ListOrText};

/// Experience tier, ordered from least to most experienced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Débutant", alias = "Debutant")]
    Debutant,
    #[serde(rename = "Junior")]
    Junior,
    #[serde(rename = "Intermédiaire", alias = "Intermediaire")]
    Intermediaire,
    #[serde(rename = "Confirmé", alias = "Confirme")]
    Confirme,
    #[serde(rename = "Expert")]
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::Debutant,
        ExperienceLevel::Junior,
        ExperienceLevel::Intermediaire,
        ExperienceLevel::Confirme,
        ExperienceLevel::Expert,
    ];

    /// Ordinal from 1 (Débutant) to 5 (Expert)
    pub fn ordinal(self) -> u8 {
        match self {
            ExperienceLevel::Debutant => 1,
            ExperienceLevel::Junior => 2,
            ExperienceLevel::Intermediaire => 3,
            ExperienceLevel::Confirme => 4,
            ExperienceLevel::Expert => 5,
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceLevel::Debutant => write!(f, "Débutant"),
            ExperienceLevel::Junior => write!(f, "Junior"),
            ExperienceLevel::Intermediaire => write!(f, "Intermédiaire"),
            ExperienceLevel::Confirme => write!(f, "Confirmé"),
            ExperienceLevel::Expert => write!(f, "Expert"),
        }
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "débutant" | "debutant" => Ok(ExperienceLevel::Debutant),
            "junior" => Ok(ExperienceLevel::Junior),
            "intermédiaire" | "intermediaire" => Ok(ExperienceLevel::Intermediaire),
            "confirmé" | "confirme" => Ok(ExperienceLevel::Confirme),
            "expert" => Ok(ExperienceLevel::Expert),
            _ => Err(format!(
                "Unknown experience level: {}. Use Débutant, Junior, Intermédiaire, Confirmé or Expert",
                s
            )),
        }
    }
}

/// Experience ordinal of an optional tier; unknown tiers count as 0
pub fn experience_ordinal(level: Option<ExperienceLevel>) -> u8 {
    level.map_or(0, ExperienceLevel::ordinal)
}

fn lenient_experience<'de, D>(deserializer: D) -> Result<Option<ExperienceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = fields::opt_text(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// A declared skill with its proficiency level (1-5)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,

    /// Proficiency level; `None` when the source did not carry a usable level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl Skill {
    /// Parse `"Soudure Niveau 4"` into a skill; the level must be 1-5
    pub fn parse(token: &str) -> Option<Skill> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let marker = token.rfind("Niveau").or_else(|| token.rfind("niveau"));
        if let Some(pos) = marker {
            let name = token[..pos].trim();
            let level = token[pos + "niveau".len()..]
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|l| (1..=5).contains(l));
            if !name.is_empty() {
                return Some(Skill {
                    name: name.to_string(),
                    level,
                });
            }
        }

        Some(Skill {
            name: token.to_string(),
            level: None,
        })
    }

    /// Whether this skill covers a required skill name (case-insensitive)
    pub fn covers(&self, required: &str) -> bool {
        self.name.to_lowercase().contains(&required.trim().to_lowercase())
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            Some(level) => write!(f, "{} Niveau {}", self.name, level),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillEntry {
    Structured {
        name: String,
        #[serde(default, deserialize_with = "fields::opt_u32")]
        level: Option<u32>,
    },
    Text(String),
}

/// Parse a compound skills string (`"Soudure Niveau 4, Assemblage Niveau 3"`)
pub fn parse_skills(s: &str) -> Vec<Skill> {
    s.split(',').filter_map(Skill::parse).collect()
}

fn skill_list<'de, D>(deserializer: D) -> Result<Vec<Skill>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ListOrText<SkillEntry>>::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(ListOrText::Text(s)) => parse_skills(&s),
        Some(ListOrText::List(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                SkillEntry::Structured { name, level } => {
                    let name = name.trim().to_string();
                    (!name.is_empty()).then(|| Skill {
                        name,
                        level: level
                            .and_then(|l| u8::try_from(l).ok())
                            .filter(|l| (1..=5).contains(l)),
                    })
                }
                SkillEntry::Text(s) => Skill::parse(&s),
            })
            .collect(),
    })
}

/// An Employee record from the team roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier (badge number)
    #[serde(alias = "Matricule", alias = "matricule", deserialize_with = "fields::text")]
    pub id: String,

    #[serde(default, alias = "Prénom", alias = "prenom", deserialize_with = "fields::text")]
    pub first_name: String,

    #[serde(default, alias = "Nom", alias = "nom", deserialize_with = "fields::text")]
    pub last_name: String,

    /// Qualification tier (free text, e.g. "Technicien")
    #[serde(
        default,
        alias = "Qualification",
        deserialize_with = "fields::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub qualification: Option<String>,

    #[serde(
        default,
        alias = "Niveau d'expérience",
        deserialize_with = "lenient_experience",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience: Option<ExperienceLevel>,

    /// Hourly labor cost in euros
    #[serde(
        default,
        alias = "Coût horaire (€)",
        deserialize_with = "fields::non_negative_f64"
    )]
    pub hourly_cost: f64,

    #[serde(
        default,
        alias = "Compétences",
        deserialize_with = "skill_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub skills: Vec<Skill>,

    /// Clearances and authorizations (e.g. electrical habilitations)
    #[serde(
        default,
        alias = "Habilitations",
        deserialize_with = "fields::tag_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub clearances: Vec<String>,

    /// Home assembly station label from the roster (e.g. "Poste 3")
    #[serde(
        default,
        alias = "Poste de montage",
        deserialize_with = "fields::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub home_station: Option<String>,
}

impl Employee {
    pub fn new(id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            qualification: None,
            experience: None,
            hourly_cost: 0.0,
            skills: Vec::new(),
            clearances: Vec::new(),
            home_station: None,
        }
    }

    /// Display name ("First Last"), falling back to the identifier
    pub fn name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.id.clone()
        } else {
            name.to_string()
        }
    }

    pub fn experience_ordinal(&self) -> u8 {
        experience_ordinal(self.experience)
    }

    /// Mean of the parsed skill levels; 0 when no level could be parsed
    pub fn average_skill_level(&self) -> f64 {
        let levels: Vec<f64> = self
            .skills
            .iter()
            .filter_map(|s| s.level)
            .map(f64::from)
            .collect();
        if levels.is_empty() {
            0.0
        } else {
            levels.iter().sum::<f64>() / levels.len() as f64
        }
    }

    /// First declared skill covering the required skill name
    pub fn find_skill(&self, required: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.covers(required))
    }

    pub fn has_clearance(&self, clearance: &str) -> bool {
        let wanted = clearance.trim().to_lowercase();
        self.clearances
            .iter()
            .any(|c| c.to_lowercase().contains(&wanted))
    }
}
