//! Lenient field deserializers for snapshot records
//!
//! Snapshots come out of spreadsheet exports, so numbers may arrive as
//! strings, blanks arrive as `null`, and negative quantities occasionally
//! slip through. These helpers normalize all of that at load time so the
//! analyzers only ever see clean values.

use serde::{Deserialize, Deserializer};

/// A scalar that may have been exported as either a number or text
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) if v.is_finite() => Some(*v),
            Scalar::Float(_) => None,
            Scalar::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite()),
            Scalar::Bool(_) => None,
        }
    }

    fn into_text(self) -> Option<String> {
        let text = match self {
            Scalar::Int(v) => v.to_string(),
            Scalar::Float(v) if v.fract() == 0.0 && v.is_finite() => format!("{}", v as i64),
            Scalar::Float(v) => v.to_string(),
            Scalar::Text(s) => s,
            Scalar::Bool(b) => b.to_string(),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Non-negative float; missing, blank, unparsable or negative values become 0
pub fn non_negative_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.and_then(|s| s.as_f64()).map_or(0.0, |v| v.max(0.0)))
}

/// Non-negative integer quantity; fractional input is truncated
pub fn non_negative_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value
        .and_then(|s| s.as_f64())
        .map_or(0, |v| v.max(0.0).min(u32::MAX as f64) as u32))
}

/// Optional non-negative integer (e.g. lead time in days)
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value
        .and_then(|s| s.as_f64())
        .map(|v| v.max(0.0).min(u32::MAX as f64) as u32))
}

/// Optional text; numbers are stringified, blanks become `None`
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.and_then(Scalar::into_text))
}

/// Required text that may have been exported as a number
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.and_then(Scalar::into_text).unwrap_or_default())
}

/// Station identifiers: `3`, `"3"` or `"Poste 3"`
pub fn station_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Scalar::deserialize(deserializer)?;
    match value {
        Scalar::Int(v) => u32::try_from(v).map_err(|_| {
            serde::de::Error::custom(format!("station identifier out of range: {}", v))
        }),
        Scalar::Float(v) if v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v) => {
            Ok(v as u32)
        }
        Scalar::Float(v) if v.fract() == 0.0 => Err(serde::de::Error::custom(format!(
            "station identifier out of range: {}",
            v
        ))),
        Scalar::Text(s) => parse_station_label(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid station identifier: '{}'", s))
        }),
        _ => Err(serde::de::Error::custom(
            "station identifier must be a non-negative integer",
        )),
    }
}

/// Parse a station label such as `"Poste 12"` or `"12"` into its number
pub fn parse_station_label(label: &str) -> Option<u32> {
    let trimmed = label.trim();
    let digits = trimmed
        .strip_prefix("Poste")
        .or_else(|| trimmed.strip_prefix("poste"))
        .unwrap_or(trimmed)
        .trim();
    digits.parse().ok()
}

/// Either a list of items or a single comma-separated string
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListOrText<T> {
    List(Vec<T>),
    Text(String),
}

/// Split a comma-separated string into trimmed, non-empty tokens
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tags given either as a list or as `"H0B0, BR"`
pub fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ListOrText<String>>::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(ListOrText::List(items)) => items
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(ListOrText::Text(s)) => split_list(&s),
    })
}
