//! Part entity - catalogue entries from the product data (PLM) export

use serde::{Deserialize, Deserializer, Serialize};

use super::fields;

/// Shortage criticality tier, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criticality {
    Faible,
    Moyenne,
    Haute,
    Critique,
}

impl Criticality {
    pub const ALL: [Criticality; 4] = [
        Criticality::Critique,
        Criticality::Haute,
        Criticality::Moyenne,
        Criticality::Faible,
    ];

    /// Sort rank for shortage lists: Critique first
    pub fn rank(self) -> u8 {
        match self {
            Criticality::Critique => 0,
            Criticality::Haute => 1,
            Criticality::Moyenne => 2,
            Criticality::Faible => 3,
        }
    }
}

/// Sort rank of an optional tier; unknown tiers sort after Faible
pub fn criticality_rank(criticality: Option<Criticality>) -> u8 {
    criticality.map_or(4, Criticality::rank)
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criticality::Faible => write!(f, "Faible"),
            Criticality::Moyenne => write!(f, "Moyenne"),
            Criticality::Haute => write!(f, "Haute"),
            Criticality::Critique => write!(f, "Critique"),
        }
    }
}

impl std::str::FromStr for Criticality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "faible" => Ok(Criticality::Faible),
            "moyenne" => Ok(Criticality::Moyenne),
            "haute" => Ok(Criticality::Haute),
            "critique" => Ok(Criticality::Critique),
            _ => Err(format!(
                "Invalid criticality: {}. Use Faible, Moyenne, Haute or Critique",
                s
            )),
        }
    }
}

fn lenient_criticality<'de, D>(deserializer: D) -> Result<Option<Criticality>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = fields::opt_text(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// A Part record from the catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Reference code (unique, case-sensitive)
    #[serde(alias = "Code / Référence", deserialize_with = "fields::text")]
    pub reference: String,

    #[serde(default, alias = "Désignation", deserialize_with = "fields::text")]
    pub designation: String,

    /// Quantity available in stock
    #[serde(
        default,
        alias = "available",
        alias = "Quantité",
        deserialize_with = "fields::non_negative_u32"
    )]
    pub quantity: u32,

    /// Purchase cost per unit in euros
    #[serde(
        default,
        alias = "Coût achat pièce (€)",
        deserialize_with = "fields::non_negative_f64"
    )]
    pub unit_cost: f64,

    #[serde(default, alias = "Masse (kg)", deserialize_with = "fields::non_negative_f64")]
    pub mass_kg: f64,

    #[serde(
        default,
        alias = "Criticité",
        deserialize_with = "lenient_criticality",
        skip_serializing_if = "Option::is_none"
    )]
    pub criticality: Option<Criticality>,

    #[serde(
        default,
        alias = "Fournisseur",
        deserialize_with = "fields::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub supplier: Option<String>,

    /// Procurement lead time in days
    #[serde(
        default,
        alias = "Délai Approvisionnement",
        deserialize_with = "fields::opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub lead_time_days: Option<u32>,

    /// Design (CAD) hours needed per unit
    #[serde(
        default,
        alias = "Temps CAO (h)",
        deserialize_with = "fields::non_negative_f64"
    )]
    pub design_hours: f64,
}

impl Part {
    pub fn new(reference: impl Into<String>, designation: impl Into<String>, quantity: u32) -> Self {
        Self {
            reference: reference.into(),
            designation: designation.into(),
            quantity,
            unit_cost: 0.0,
            mass_kg: 0.0,
            criticality: None,
            supplier: None,
            lead_time_days: None,
            design_hours: 0.0,
        }
    }

    /// Reference as used for lookups (trimmed)
    pub fn key(&self) -> &str {
        self.reference.trim()
    }

    /// Value of the stock on hand
    pub fn stock_value(&self) -> f64 {
        self.unit_cost * f64::from(self.quantity)
    }

    /// Mass of the stock on hand in kilograms
    pub fn stock_mass(&self) -> f64 {
        self.mass_kg * f64::from(self.quantity)
    }
}
