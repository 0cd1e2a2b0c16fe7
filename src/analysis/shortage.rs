//! Required vs. available stock for every demanded part

use serde::Serialize;
use std::collections::HashMap;

use super::needs::{Demand, NeedsReport, Usage};
use super::DataIndex;
use crate::entities::part::criticality_rank;
use crate::entities::Criticality;

/// Supplier label used when a part has none
pub const UNKNOWN_SUPPLIER: &str = "Inconnu";

/// Default number of suppliers listed in the cost breakdown
pub const DEFAULT_SUPPLIER_LIMIT: usize = 8;

/// Stock position of one demanded, catalogued part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartNeed {
    pub reference: String,
    pub designation: String,
    pub required: u32,
    pub available: u32,

    /// `max(0, required - available)`
    pub missing: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Criticality>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,

    pub unit_cost: f64,

    /// Design hours per unit times missing units
    pub design_hours: f64,

    /// Unit cost times missing units
    pub total_cost: f64,

    pub stages: Vec<String>,
    pub usages: Vec<Usage>,
}

impl PartNeed {
    pub fn is_sufficient(&self) -> bool {
        self.missing == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShortageKpis {
    pub part_types: usize,
    pub total_missing: u64,
    pub total_cost: f64,
    pub total_design_hours: f64,
    pub max_lead_time_days: u32,
    pub critical_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NeedsKpis {
    pub total: usize,
    pub sufficient: usize,
    pub insufficient: usize,
    pub critical_insufficient: usize,
}

/// Missing units and cost attributable to one supplier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierExposure {
    pub supplier: String,
    pub missing: u64,
    pub cost: f64,
}

/// Missing units for one criticality tier (`None` for unrated parts)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalityTotal {
    pub criticality: Option<Criticality>,
    pub missing: u64,
}

/// Everything the stock analysis produces
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShortageReport {
    /// Parts with missing units, most critical first
    pub shortages: Vec<PartNeed>,
    pub shortage_kpis: ShortageKpis,

    /// Every catalogued demand, insufficient first
    pub production_needs: Vec<PartNeed>,
    pub needs_kpis: NeedsKpis,

    pub by_supplier: Vec<SupplierExposure>,
    pub by_criticality: Vec<CriticalityTotal>,

    /// Demanded references absent from the catalogue
    pub unresolved: Vec<Demand>,
}

/// Compare each resolved demand against the catalogue stock
pub fn evaluate_needs(needs: &NeedsReport, index: &DataIndex<'_>) -> Vec<PartNeed> {
    needs
        .resolved
        .iter()
        .filter_map(|demand| {
            let part = index.part(&demand.reference)?;
            let missing = demand.required.saturating_sub(part.quantity);
            Some(PartNeed {
                reference: demand.reference.clone(),
                designation: part.designation.clone(),
                required: demand.required,
                available: part.quantity,
                missing,
                criticality: part.criticality,
                supplier: part.supplier.clone(),
                lead_time_days: part.lead_time_days,
                unit_cost: part.unit_cost,
                design_hours: part.design_hours * f64::from(missing),
                total_cost: part.unit_cost * f64::from(missing),
                stages: demand.stages.clone(),
                usages: demand.usages.clone(),
            })
        })
        .collect()
}

/// Parts with missing units, by criticality rank then missing descending
pub fn shortage_list(needs: &[PartNeed]) -> Vec<PartNeed> {
    let mut shortages: Vec<PartNeed> = needs.iter().filter(|n| !n.is_sufficient()).cloned().collect();
    shortages.sort_by(|a, b| {
        criticality_rank(a.criticality)
            .cmp(&criticality_rank(b.criticality))
            .then(b.missing.cmp(&a.missing))
    });
    shortages
}

/// Every demand, insufficient first, then by designation
pub fn production_needs(needs: &[PartNeed]) -> Vec<PartNeed> {
    let mut sorted = needs.to_vec();
    sorted.sort_by(|a, b| {
        a.is_sufficient()
            .cmp(&b.is_sufficient())
            .then_with(|| a.designation.to_lowercase().cmp(&b.designation.to_lowercase()))
            .then_with(|| a.designation.cmp(&b.designation))
    });
    sorted
}

pub fn shortage_kpis(shortages: &[PartNeed]) -> ShortageKpis {
    ShortageKpis {
        part_types: shortages.len(),
        total_missing: shortages.iter().map(|s| u64::from(s.missing)).sum(),
        total_cost: shortages.iter().map(|s| s.total_cost).sum(),
        total_design_hours: shortages.iter().map(|s| s.design_hours).sum(),
        max_lead_time_days: shortages
            .iter()
            .filter_map(|s| s.lead_time_days)
            .max()
            .unwrap_or(0),
        critical_count: shortages
            .iter()
            .filter(|s| s.criticality == Some(Criticality::Critique))
            .count(),
    }
}

pub fn needs_kpis(needs: &[PartNeed]) -> NeedsKpis {
    let insufficient: Vec<&PartNeed> = needs.iter().filter(|n| !n.is_sufficient()).collect();
    NeedsKpis {
        total: needs.len(),
        sufficient: needs.len() - insufficient.len(),
        insufficient: insufficient.len(),
        critical_insufficient: insufficient
            .iter()
            .filter(|n| n.criticality == Some(Criticality::Critique))
            .count(),
    }
}

/// Shortage cost grouped by supplier, highest cost first
pub fn cost_by_supplier(shortages: &[PartNeed], limit: usize) -> Vec<SupplierExposure> {
    let mut groups: Vec<SupplierExposure> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for shortage in shortages {
        let supplier = shortage.supplier.as_deref().unwrap_or(UNKNOWN_SUPPLIER);
        let position = *positions.entry(supplier).or_insert_with(|| {
            groups.push(SupplierExposure {
                supplier: supplier.to_string(),
                missing: 0,
                cost: 0.0,
            });
            groups.len() - 1
        });
        groups[position].missing += u64::from(shortage.missing);
        groups[position].cost += shortage.total_cost;
    }

    groups.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    groups.truncate(limit);
    groups
}

/// Missing units per criticality tier, most severe first
///
/// Unrated parts are listed last, and only when they are missing units.
pub fn missing_by_criticality(needs: &[PartNeed]) -> Vec<CriticalityTotal> {
    let total_for = |tier: Option<Criticality>| -> u64 {
        needs
            .iter()
            .filter(|n| n.criticality == tier)
            .map(|n| u64::from(n.missing))
            .sum()
    };

    let mut totals: Vec<CriticalityTotal> = Criticality::ALL
        .iter()
        .map(|&tier| CriticalityTotal {
            criticality: Some(tier),
            missing: total_for(Some(tier)),
        })
        .collect();

    let unrated = total_for(None);
    if unrated > 0 {
        totals.push(CriticalityTotal {
            criticality: None,
            missing: unrated,
        });
    }
    totals
}

/// Run the full stock analysis over aggregated demand
pub fn analyze_shortages(needs: &NeedsReport, index: &DataIndex<'_>) -> ShortageReport {
    let evaluated = evaluate_needs(needs, index);
    let shortages = shortage_list(&evaluated);

    ShortageReport {
        shortage_kpis: shortage_kpis(&shortages),
        by_supplier: cost_by_supplier(&shortages, DEFAULT_SUPPLIER_LIMIT),
        needs_kpis: needs_kpis(&evaluated),
        by_criticality: missing_by_criticality(&evaluated),
        production_needs: production_needs(&evaluated),
        shortages,
        unresolved: needs.unresolved.clone(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::analysis::needs::aggregate_needs;
    use crate::core::Snapshot;
    use crate::entities::{Part, Stage, Station};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_missing_is_required_minus_available(available in 0u32..50, demanded in 0usize..50) {
            let mut stage = Stage::new("s0", "Assemblage cockpit");
            let mut station = Station::new(1);
            station.references = Some(vec!["P1"; demanded].join(";"));
            stage.stations.push(station);
            let snapshot = Snapshot::new(vec![], vec![Part::new("P1", "Panel", available)], vec![stage]);

            let index = DataIndex::build(&snapshot);
            let needs = aggregate_needs(&snapshot, &index);
            let evaluated = evaluate_needs(&needs, &index);

            let expected = (demanded as u32).saturating_sub(available);
            let missing = evaluated.first().map(|n| n.missing).unwrap_or(0);
            prop_assert_eq!(missing, expected);
            prop_assert_eq!(shortage_list(&evaluated).len(), usize::from(expected > 0));
        }
    }
}
