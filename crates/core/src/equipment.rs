use serde::{Deserialize, Serialize};

/// Caller-assigned equipment identifier (e.g. "E1", a fleet number).
pub type EquipmentId = String;

/// Whole running hours. Maintenance offsets, plan baselines, and absolute
/// thresholds are all expressed in this unit.
pub type Hours = i64;

/// One piece of equipment as of "now".
///
/// Created and edited elsewhere; the scheduling core only reads the two
/// counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: EquipmentId,
    #[serde(default)]
    pub name: Option<String>,
    pub current_hour_meter: f64,
    #[serde(default)]
    pub current_odometer: Option<f64>,
}

impl Equipment {
    pub fn new(id: impl Into<EquipmentId>, current_hour_meter: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            current_hour_meter,
            current_odometer: None,
        }
    }

    pub fn with_odometer(mut self, odometer: f64) -> Self {
        self.current_odometer = Some(odometer);
        self
    }

    /// Hour meter truncated to whole hours, used as the baseline of a fresh
    /// plan epoch. Non-finite or negative readings collapse to 0.
    pub fn hour_meter_floor(&self) -> Hours {
        if self.current_hour_meter.is_finite() && self.current_hour_meter > 0.0 {
            self.current_hour_meter.floor() as Hours
        } else {
            0
        }
    }
}
