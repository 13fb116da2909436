use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentId;

/// Caller-assigned record identifier.
pub type RecordId = String;

/// One fuel or usage log entry: a fill-up, or an odometer/hour-meter check-in.
///
/// At least one of `odometer`/`hour_meter` is expected when `liters` is set,
/// but nothing here relies on it: missing or non-finite values are read as
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub id: RecordId,
    pub equipment_id: EquipmentId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub odometer: Option<f64>,
    #[serde(default)]
    pub hour_meter: Option<f64>,
    #[serde(default)]
    pub liters: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

impl UsageRecord {
    pub fn new(
        id: impl Into<RecordId>,
        equipment_id: impl Into<EquipmentId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            equipment_id: equipment_id.into(),
            timestamp,
            odometer: None,
            hour_meter: None,
            liters: None,
            total_cost: None,
        }
    }

    pub fn with_odometer(mut self, odometer: f64) -> Self {
        self.odometer = Some(odometer);
        self
    }

    pub fn with_hour_meter(mut self, hour_meter: f64) -> Self {
        self.hour_meter = Some(hour_meter);
        self
    }

    pub fn with_fuel(mut self, liters: f64, total_cost: Option<f64>) -> Self {
        self.liters = Some(liters);
        self.total_cost = total_cost;
        self
    }

    pub fn odometer_value(&self) -> Option<f64> {
        finite(self.odometer)
    }

    pub fn hour_meter_value(&self) -> Option<f64> {
        finite(self.hour_meter)
    }

    /// Liters dispensed, only when strictly positive.
    pub fn fuel_liters(&self) -> Option<f64> {
        finite(self.liters).filter(|l| *l > 0.0)
    }

    pub fn cost_value(&self) -> Option<f64> {
        finite(self.total_cost)
    }

    /// Tie-break reading for canonical ordering: odometer, else hour meter,
    /// else 0.
    pub fn ordering_reading(&self) -> f64 {
        self.odometer_value()
            .or_else(|| self.hour_meter_value())
            .unwrap_or(0.0)
    }
}
