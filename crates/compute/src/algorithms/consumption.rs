//! Per-entry fuel consumption from an unordered refuelling log.
//!
//! Each record is compared with its predecessor: the nearest earlier record
//! of the same equipment in canonical order. Sparse data is normal (first
//! fill-up, missing odometer, meter swap) and yields `None`, never an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use fleetops_core::{EquipmentId, RecordId, UsageRecord};

use super::ordering::group_canonical;

/// Consumption derived for one usage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedConsumption {
    pub record_id: RecordId,
    pub equipment_id: EquipmentId,
    /// Odometer distance since the predecessor, when positive.
    pub distance_km: Option<f64>,
    pub rate_km_per_liter: Option<f64>,
    /// Fuel burn per running hour, for hour-meter equipment.
    pub liters_per_hour: Option<f64>,
}

impl DerivedConsumption {
    fn empty(record: &UsageRecord) -> Self {
        Self {
            record_id: record.id.clone(),
            equipment_id: record.equipment_id.clone(),
            distance_km: None,
            rate_km_per_liter: None,
            liters_per_hour: None,
        }
    }
}

/// Positive, finite delta between two readings.
fn positive_delta(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let delta = current? - previous?;
    (delta.is_finite() && delta > 0.0).then_some(delta)
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Derive consumption for one record given its predecessor.
pub fn consumption_between(record: &UsageRecord, prev: Option<&UsageRecord>) -> DerivedConsumption {
    let mut derived = DerivedConsumption::empty(record);
    let Some(prev) = prev else {
        return derived;
    };

    let distance = positive_delta(record.odometer_value(), prev.odometer_value());
    let hours = positive_delta(record.hour_meter_value(), prev.hour_meter_value());
    let liters = record.fuel_liters();

    derived.distance_km = distance;
    if let (Some(distance), Some(liters)) = (distance, liters) {
        derived.rate_km_per_liter = finite(distance / liters);
    }
    if let (Some(hours), Some(liters)) = (hours, liters) {
        derived.liters_per_hour = finite(liters / hours);
    }
    derived
}

/// Derive consumption for every record.
///
/// Output has one entry per input record, in input order.
pub fn compute_consumption(records: &[UsageRecord]) -> Vec<DerivedConsumption> {
    let mut out: Vec<Option<DerivedConsumption>> = vec![None; records.len()];

    for indices in group_canonical(records).values() {
        let mut prev: Option<&UsageRecord> = None;
        for &idx in indices {
            let record = &records[idx];
            out[idx] = Some(consumption_between(record, prev));
            prev = Some(record);
        }
    }

    let derived: Vec<DerivedConsumption> = out
        .into_iter()
        .zip(records)
        .map(|(d, r)| d.unwrap_or_else(|| DerivedConsumption::empty(r)))
        .collect();

    debug!(
        records = records.len(),
        rated = derived.iter().filter(|d| d.rate_km_per_liter.is_some()).count(),
        "consumption computed"
    );

    derived
}

/// Consumption for one equipment unit's records, in canonical order.
pub fn equipment_consumption(ordered: &[&UsageRecord]) -> Vec<DerivedConsumption> {
    let mut prev: Option<&UsageRecord> = None;
    ordered
        .iter()
        .map(|&record| {
            let derived = consumption_between(record, prev);
            prev = Some(record);
            derived
        })
        .collect()
}
