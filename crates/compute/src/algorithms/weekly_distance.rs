//! Distance travelled during the current calendar week (Sunday to Saturday).
//!
//! The distance is the span between the week's lowest and highest odometer
//! readings, not a sum of consecutive deltas, so out-of-order fill-ups within
//! the week do not matter. Fewer than two readings in the week give 0.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use fleetops_core::{EquipmentId, UsageRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDistance {
    pub equipment_id: EquipmentId,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub distance_km: f64,
    /// Odometer readings that fell inside the week.
    pub readings: usize,
}

/// Sunday and Saturday of the week containing `reference`.
pub fn week_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = reference.weekday().num_days_from_sunday() as i64;
    let start = reference - Duration::days(back);
    (start, start + Duration::days(6))
}

/// Weekly distance for a single equipment unit.
pub fn weekly_distance_for<'a, I>(
    equipment_id: &str,
    records: I,
    reference: NaiveDate,
) -> WeeklyDistance
where
    I: IntoIterator<Item = &'a UsageRecord>,
{
    let (week_start, week_end) = week_bounds(reference);

    let mut readings = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for record in records {
        if record.equipment_id != equipment_id {
            continue;
        }
        let day = record.timestamp.date_naive();
        if day < week_start || day > week_end {
            continue;
        }
        if let Some(odometer) = record.odometer_value() {
            readings += 1;
            min = min.min(odometer);
            max = max.max(odometer);
        }
    }

    let distance_km = if readings < 2 { 0.0 } else { max - min };

    WeeklyDistance {
        equipment_id: equipment_id.to_string(),
        week_start,
        week_end,
        distance_km,
        readings,
    }
}

/// Weekly distance for each requested equipment, in the order given.
pub fn compute_weekly_distance(
    records: &[UsageRecord],
    equipment_ids: &[EquipmentId],
    reference: NaiveDate,
) -> Vec<WeeklyDistance> {
    let mut by_equipment: HashMap<&str, Vec<&UsageRecord>> = HashMap::new();
    for record in records {
        by_equipment
            .entry(record.equipment_id.as_str())
            .or_default()
            .push(record);
    }

    let out: Vec<WeeklyDistance> = equipment_ids
        .iter()
        .map(|id| {
            let group = by_equipment.get(id.as_str()).into_iter().flatten().copied();
            weekly_distance_for(id, group, reference)
        })
        .collect();

    debug!(
        equipment = equipment_ids.len(),
        reference = %reference,
        moving = out.iter().filter(|w| w.distance_km > 0.0).count(),
        "weekly distance computed"
    );

    out
}
