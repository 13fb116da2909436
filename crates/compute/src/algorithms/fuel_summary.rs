use serde::{Deserialize, Serialize};

use fleetops_core::{EquipmentId, UsageRecord};

use super::consumption::DerivedConsumption;

/// Fuel totals and averages for one equipment unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelSummary {
    pub equipment_id: EquipmentId,
    /// Records with a positive liters value.
    pub fill_ups: usize,
    pub total_liters: f64,
    pub total_cost: f64,
    /// Mean of the per-entry rates that could be computed.
    pub average_km_per_liter: Option<f64>,
    /// Cost over liters, counting only records that carry both.
    pub cost_per_liter: Option<f64>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Summarise one equipment unit's fuel log.
///
/// `consumption` may cover more equipment than `equipment_id`; only matching
/// entries are used.
pub fn summarize_fuel<'a, I>(
    equipment_id: &str,
    records: I,
    consumption: &[DerivedConsumption],
) -> FuelSummary
where
    I: IntoIterator<Item = &'a UsageRecord>,
{
    let mut fill_ups = 0usize;
    let mut total_liters = 0.0;
    let mut total_cost = 0.0;
    let mut priced_liters = 0.0;

    for record in records {
        if record.equipment_id != equipment_id {
            continue;
        }
        let Some(liters) = record.fuel_liters() else {
            continue;
        };
        fill_ups += 1;
        total_liters += liters;
        if let Some(cost) = record.cost_value() {
            total_cost += cost;
            priced_liters += liters;
        }
    }

    let rates: Vec<f64> = consumption
        .iter()
        .filter(|d| d.equipment_id == equipment_id)
        .filter_map(|d| d.rate_km_per_liter)
        .collect();

    let cost_per_liter = (priced_liters > 0.0)
        .then(|| total_cost / priced_liters)
        .filter(|v| v.is_finite());

    FuelSummary {
        equipment_id: equipment_id.to_string(),
        fill_ups,
        total_liters,
        total_cost,
        average_km_per_liter: mean(&rates).filter(|v| v.is_finite()),
        cost_per_liter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::consumption::compute_consumption;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn totals_and_averages() {
        let records = vec![
            UsageRecord::new("r1", "E1", at(1)).with_odometer(1000.0).with_fuel(10.0, Some(15.0)),
            UsageRecord::new("r2", "E1", at(2)).with_odometer(1100.0).with_fuel(10.0, Some(16.0)),
            UsageRecord::new("r3", "E1", at(3)).with_odometer(1300.0).with_fuel(10.0, None),
        ];
        let consumption = compute_consumption(&records);
        let s = summarize_fuel("E1", &records, &consumption);

        assert_eq!(s.fill_ups, 3);
        assert_eq!(s.total_liters, 30.0);
        assert_eq!(s.total_cost, 31.0);
        assert_eq!(s.cost_per_liter, Some(1.55));
        // Rates 10 and 20.
        assert_eq!(s.average_km_per_liter, Some(15.0));
    }

    #[test]
    fn no_fuel_data() {
        let records = vec![UsageRecord::new("r1", "E1", at(1)).with_odometer(1000.0)];
        let s = summarize_fuel("E1", &records, &compute_consumption(&records));
        assert_eq!(s.fill_ups, 0);
        assert_eq!(s.total_liters, 0.0);
        assert!(s.average_km_per_liter.is_none());
        assert!(s.cost_per_liter.is_none());
    }

    #[test]
    fn other_equipment_excluded() {
        let records = vec![
            UsageRecord::new("a", "E1", at(1)).with_fuel(10.0, Some(20.0)),
            UsageRecord::new("b", "E2", at(1)).with_fuel(99.0, Some(500.0)),
        ];
        let s = summarize_fuel("E1", &records, &compute_consumption(&records));
        assert_eq!(s.fill_ups, 1);
        assert_eq!(s.total_cost, 20.0);
    }
}
