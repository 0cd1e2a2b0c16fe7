//! Station delays and their labor cost

use serde::Serialize;
use tracing::debug;

use super::{round1, DataIndex};
use crate::core::Snapshot;
use crate::entities::{Stage, Station};

/// Hours billed for a delay: every started hour counts in full
pub fn billed_hours(delay_minutes: u32) -> u32 {
    delay_minutes.div_ceil(60)
}

/// Delay, cost and deviation of one station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDelay {
    pub stage: String,
    pub station: u32,
    pub planned_minutes: u32,
    pub actual_minutes: u32,

    /// `max(0, actual - planned)`
    pub delay_minutes: u32,
    pub billed_hours: u32,

    /// Sum of the hourly costs of the assigned, known employees
    pub team_hourly_cost: f64,
    pub cost: f64,

    /// `(actual - planned) / planned * 100`, absent when nothing was planned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation_pct: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident: Option<String>,
}

impl StationDelay {
    pub fn is_delayed(&self) -> bool {
        self.delay_minutes > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DelayKpis {
    pub station_count: usize,
    pub incident_count: usize,

    /// Percentage of stations reporting an incident, one decimal
    pub incident_rate: f64,
    pub delayed_stations: usize,
    pub total_delay_minutes: u64,

    /// Total delay in whole hours (rounded to nearest)
    pub total_delay_hours: u64,
    pub total_delay_cost: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DelayReport {
    pub stations: Vec<StationDelay>,
    pub kpis: DelayKpis,
}

impl DelayReport {
    /// Stations with the largest positive deviation, worst first
    pub fn worst_deviations(&self, limit: usize) -> Vec<&StationDelay> {
        let mut ranked: Vec<&StationDelay> = self
            .stations
            .iter()
            .filter(|s| s.deviation_pct.is_some_and(|d| d > 0.0))
            .collect();
        ranked.sort_by(|a, b| {
            let a = a.deviation_pct.unwrap_or(0.0);
            let b = b.deviation_pct.unwrap_or(0.0);
            b.total_cmp(&a)
        });
        ranked.truncate(limit);
        ranked
    }
}

/// Compute the delay record of a single station
pub fn station_delay(stage: &Stage, station: &Station, index: &DataIndex<'_>) -> StationDelay {
    let planned = station.planned_minutes();
    let actual = station.actual_minutes();
    let delay = actual.saturating_sub(planned);
    let hours = billed_hours(delay);

    let team_hourly_cost: f64 = station
        .employees
        .iter()
        .filter_map(|id| index.employee(id))
        .map(|e| e.hourly_cost)
        .sum();

    let deviation_pct = (planned > 0)
        .then(|| round1((f64::from(actual) - f64::from(planned)) / f64::from(planned) * 100.0));

    StationDelay {
        stage: stage.name.clone(),
        station: station.id,
        planned_minutes: planned,
        actual_minutes: actual,
        delay_minutes: delay,
        billed_hours: hours,
        team_hourly_cost,
        cost: f64::from(hours) * team_hourly_cost,
        deviation_pct,
        incident: station.incident.clone(),
    }
}

pub fn delay_kpis(stations: &[StationDelay]) -> DelayKpis {
    let station_count = stations.len();
    let incident_count = stations.iter().filter(|s| s.incident.is_some()).count();
    let total_delay_minutes: u64 = stations.iter().map(|s| u64::from(s.delay_minutes)).sum();

    let incident_rate = if station_count == 0 {
        0.0
    } else {
        round1(incident_count as f64 / station_count as f64 * 100.0)
    };

    DelayKpis {
        station_count,
        incident_count,
        incident_rate,
        delayed_stations: stations.iter().filter(|s| s.is_delayed()).count(),
        total_delay_minutes,
        total_delay_hours: (total_delay_minutes as f64 / 60.0).round() as u64,
        total_delay_cost: stations.iter().map(|s| s.cost).sum(),
    }
}

/// Delay and cost for every station of the snapshot
pub fn analyze_delays(snapshot: &Snapshot, index: &DataIndex<'_>) -> DelayReport {
    let stations: Vec<StationDelay> = snapshot
        .stations()
        .map(|(stage, station)| station_delay(stage, station, index))
        .collect();
    let kpis = delay_kpis(&stations);

    debug!(
        stations = kpis.station_count,
        delayed = kpis.delayed_stations,
        cost = kpis.total_delay_cost,
        "computed station delays"
    );

    DelayReport { stations, kpis }
}
