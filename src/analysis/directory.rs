//! Employee directory and parts catalogue queries

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::entities::fields::parse_station_label;
use crate::entities::{Criticality, Employee, ExperienceLevel, Part};

/// Label for employees without a qualification
pub const UNSPECIFIED_QUALIFICATION: &str = "Non spécifié";

/// Filter criteria for employee queries; empty criteria match everyone
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Substring of the id, first or last name (case-insensitive)
    pub search: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<ExperienceLevel>,
    /// Substring of a skill name (case-insensitive)
    pub skill: Option<String>,
    /// Minimum level of the matching skill (any skill when `skill` is unset)
    pub min_level: Option<u8>,
    pub clearance: Option<String>,
    pub home_station: Option<u32>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let hit = [&employee.id, &employee.first_name, &employee.last_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(ref qualification) = self.qualification {
            let found = employee
                .qualification
                .as_deref()
                .is_some_and(|q| q.eq_ignore_ascii_case(qualification.trim()));
            if !found {
                return false;
            }
        }

        if self.experience.is_some() && employee.experience != self.experience {
            return false;
        }

        let skill_level_ok = match (&self.skill, self.min_level) {
            (Some(name), min) => employee
                .skills
                .iter()
                .filter(|s| s.covers(name))
                .any(|s| min.map_or(true, |m| s.level.is_some_and(|l| l >= m))),
            (None, Some(min)) => employee.skills.iter().any(|s| s.level.is_some_and(|l| l >= min)),
            (None, None) => true,
        };
        if !skill_level_ok {
            return false;
        }

        if let Some(ref clearance) = self.clearance {
            if !employee.has_clearance(clearance) {
                return false;
            }
        }

        if let Some(station) = self.home_station {
            let home = employee.home_station.as_deref().and_then(parse_station_label);
            if home != Some(station) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        employees.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Distinct values available for filtering the employee directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeFacets {
    pub skills: Vec<String>,
    pub clearances: Vec<String>,
    pub qualifications: Vec<String>,
}

pub fn employee_facets(employees: &[Employee]) -> EmployeeFacets {
    let mut skills = BTreeSet::new();
    let mut clearances = BTreeSet::new();
    let mut qualifications = BTreeSet::new();

    for employee in employees {
        skills.extend(employee.skills.iter().map(|s| s.name.clone()));
        clearances.extend(employee.clearances.iter().cloned());
        qualifications.extend(employee.qualification.iter().cloned());
    }

    EmployeeFacets {
        skills: skills.into_iter().collect(),
        clearances: clearances.into_iter().collect(),
        qualifications: qualifications.into_iter().collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualificationCount {
    pub qualification: String,
    pub count: usize,
}

/// Headcount per qualification, largest first then by name
pub fn workforce_by_qualification(employees: &[Employee]) -> Vec<QualificationCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for employee in employees {
        let qualification = employee
            .qualification
            .as_deref()
            .unwrap_or(UNSPECIFIED_QUALIFICATION);
        *counts.entry(qualification).or_default() += 1;
    }

    let mut rows: Vec<QualificationCount> = counts
        .into_iter()
        .map(|(qualification, count)| QualificationCount {
            qualification: qualification.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.qualification.cmp(&b.qualification)));
    rows
}

/// Filter criteria for the parts catalogue
#[derive(Debug, Clone, Default)]
pub struct PartFilter {
    /// Substring of the reference, designation or supplier (case-insensitive)
    pub search: Option<String>,
    pub supplier: Option<String>,
    pub criticality: Option<Criticality>,
}

impl PartFilter {
    pub fn matches(&self, part: &Part) -> bool {
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let hit = part.reference.to_lowercase().contains(&needle)
                || part.designation.to_lowercase().contains(&needle)
                || part
                    .supplier
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(ref supplier) = self.supplier {
            let found = part
                .supplier
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(supplier.trim()));
            if !found {
                return false;
            }
        }

        if self.criticality.is_some() && part.criticality != self.criticality {
            return false;
        }

        true
    }

    pub fn apply<'a>(&self, parts: &'a [Part]) -> Vec<&'a Part> {
        parts.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Totals over a set of catalogue parts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockStats {
    pub parts: usize,
    pub total_quantity: u64,
    pub stock_value: f64,
    pub stock_mass_kg: f64,
    pub design_hours: f64,
    pub suppliers: usize,
}

pub fn stock_stats<'a>(parts: impl IntoIterator<Item = &'a Part>) -> StockStats {
    let mut stats = StockStats::default();
    let mut suppliers = BTreeSet::new();

    for part in parts {
        stats.parts += 1;
        stats.total_quantity += u64::from(part.quantity);
        stats.stock_value += part.stock_value();
        stats.stock_mass_kg += part.stock_mass();
        stats.design_hours += part.design_hours;
        if let Some(ref supplier) = part.supplier {
            suppliers.insert(supplier.as_str());
        }
    }

    stats.suppliers = suppliers.len();
    stats
}
