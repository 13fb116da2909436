use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fleetops_core::{
    CompletionState, Config, Equipment, EquipmentId, Hours, MaintenanceTemplate, Result,
    UsageRecord,
};

use crate::algorithms::consumption::{equipment_consumption, DerivedConsumption};
use crate::algorithms::disclosure::{disclose, DisclosurePolicy};
use crate::algorithms::fuel_summary::{summarize_fuel, FuelSummary};
use crate::algorithms::ordering::group_canonical;
use crate::algorithms::plan::{build_plan_view, ThresholdView};
use crate::algorithms::weekly_distance::{week_bounds, weekly_distance_for, WeeklyDistance};

/// Plan epoch and checklist state for one equipment unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentPlan {
    /// Hour-meter reading when the plan snapshot was taken.
    pub baseline_hour_meter: Hours,
    #[serde(default)]
    pub completion: CompletionState,
}

/// A consistent snapshot of everything the facade reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetInput {
    pub equipment: Vec<Equipment>,
    pub template: MaintenanceTemplate,
    #[serde(default)]
    pub records: Vec<UsageRecord>,
    #[serde(default)]
    pub plans: BTreeMap<EquipmentId, EquipmentPlan>,
    pub reference_date: NaiveDate,
}

/// Visible offsets for a single plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub equipment_id: EquipmentId,
    pub visible_offsets: Vec<Hours>,
}

/// Everything derived for one equipment unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentView {
    pub equipment_id: EquipmentId,
    pub current_hour_meter: f64,
    pub current_odometer: Option<f64>,
    pub baseline_hour_meter: Hours,
    pub visible_offsets: Vec<Hours>,
    pub next_locked_offset: Option<Hours>,
    pub thresholds: Vec<ThresholdView>,
    /// Canonical order.
    pub consumption: Vec<DerivedConsumption>,
    pub weekly_distance: WeeklyDistance,
    pub fuel: FuelSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub reference_date: NaiveDate,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub equipment: Vec<EquipmentView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacadeSettings {
    pub policy: DisclosurePolicy,
    pub parallel: bool,
}

impl Default for FacadeSettings {
    fn default() -> Self {
        Self {
            policy: DisclosurePolicy::default(),
            parallel: true,
        }
    }
}

impl From<&Config> for FacadeSettings {
    fn from(config: &Config) -> Self {
        Self {
            policy: DisclosurePolicy::from(&config.disclosure),
            parallel: config.compute.parallel,
        }
    }
}

/// Visible offsets for one equipment plan under the default floor.
pub fn compute_schedule(
    equipment: &Equipment,
    template: &MaintenanceTemplate,
    state: &CompletionState,
    baseline: Hours,
) -> Result<ScheduleView> {
    let disclosure = disclose(template, state, baseline, &DisclosurePolicy::default())?;
    Ok(ScheduleView {
        equipment_id: equipment.id.clone(),
        visible_offsets: disclosure.offsets,
    })
}

/// Runs both engines per equipment and assembles a read-only snapshot.
///
/// Holds no state between calls; identical input gives identical output in
/// parallel and sequential mode.
pub struct SchedulingFacade {
    settings: FacadeSettings,
}

impl SchedulingFacade {
    pub fn new(settings: FacadeSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(FacadeSettings::from(config))
    }

    pub fn settings(&self) -> &FacadeSettings {
        &self.settings
    }

    /// Derive the full fleet view.
    ///
    /// Fails only on an invalid template; data gaps surface as `None`/0 in
    /// the per-equipment views.
    pub fn snapshot(&self, input: &FleetInput) -> Result<FleetSnapshot> {
        let start = Instant::now();

        input.template.validate()?;

        let groups = group_canonical(&input.records);
        let build = |equipment: &Equipment| {
            let indices = groups
                .get(equipment.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let ordered: Vec<&UsageRecord> = indices.iter().map(|&i| &input.records[i]).collect();
            self.equipment_view(equipment, input, &ordered)
        };

        let views: Vec<EquipmentView> = if self.settings.parallel {
            input.equipment.par_iter().map(build).collect::<Result<_>>()?
        } else {
            input.equipment.iter().map(build).collect::<Result<_>>()?
        };

        let orphan_plans = input
            .plans
            .keys()
            .filter(|id| !input.equipment.iter().any(|e| &e.id == *id))
            .count();
        if orphan_plans > 0 {
            debug!(orphan_plans, "plans without matching equipment ignored");
        }

        let (week_start, week_end) = week_bounds(input.reference_date);

        info!(
            equipment = views.len(),
            records = input.records.len(),
            parallel = self.settings.parallel,
            elapsed_us = start.elapsed().as_micros(),
            "fleet snapshot computed"
        );

        Ok(FleetSnapshot {
            reference_date: input.reference_date,
            week_start,
            week_end,
            equipment: views,
        })
    }

    fn equipment_view(
        &self,
        equipment: &Equipment,
        input: &FleetInput,
        ordered: &[&UsageRecord],
    ) -> Result<EquipmentView> {
        let fresh = CompletionState::new();
        let (baseline, completion) = match input.plans.get(&equipment.id) {
            Some(plan) => (plan.baseline_hour_meter, &plan.completion),
            // No plan yet: a new epoch starts at the current reading.
            None => (equipment.hour_meter_floor(), &fresh),
        };

        let disclosure = disclose(&input.template, completion, baseline, &self.settings.policy)?;
        let thresholds = build_plan_view(
            &input.template,
            completion,
            baseline,
            equipment.current_hour_meter,
            &disclosure,
        );

        let consumption = equipment_consumption(ordered);
        let weekly_distance =
            weekly_distance_for(&equipment.id, ordered.iter().copied(), input.reference_date);
        let fuel = summarize_fuel(&equipment.id, ordered.iter().copied(), &consumption);

        debug!(
            equipment = %equipment.id,
            baseline,
            visible = disclosure.offsets.len(),
            records = ordered.len(),
            weekly_km = weekly_distance.distance_km,
            "equipment view built"
        );

        Ok(EquipmentView {
            equipment_id: equipment.id.clone(),
            current_hour_meter: equipment.current_hour_meter,
            current_odometer: equipment.current_odometer,
            baseline_hour_meter: baseline,
            visible_offsets: disclosure.offsets,
            next_locked_offset: disclosure.next_locked,
            thresholds,
            consumption,
            weekly_distance,
            fuel,
        })
    }
}

impl Default for SchedulingFacade {
    fn default() -> Self {
        Self::new(FacadeSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fleetops_core::{FleetError, MaintenanceActivity};

    fn ladder() -> MaintenanceTemplate {
        MaintenanceTemplate::from_offsets(vec![0, 300, 600, 900, 1200, 1500])
            .with_activity(MaintenanceActivity::new("oil"))
    }

    fn input() -> FleetInput {
        let day = |d: u32| Utc.with_ymd_and_hms(2024, 1, d, 8, 0, 0).unwrap();
        let mut plans = BTreeMap::new();
        plans.insert(
            "E1".to_string(),
            EquipmentPlan {
                baseline_hour_meter: 1000,
                completion: CompletionState::new().with("oil", 1600, true),
            },
        );
        FleetInput {
            equipment: vec![
                Equipment::new("E1", 1650.0).with_odometer(1100.0),
                Equipment::new("E2", 412.7),
            ],
            template: ladder(),
            records: vec![
                UsageRecord::new("f2", "E1", day(9)).with_odometer(1100.0).with_fuel(10.0, Some(14.0)),
                UsageRecord::new("f1", "E1", day(8)).with_odometer(1000.0).with_fuel(10.0, Some(13.0)),
            ],
            plans,
            reference_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        }
    }

    #[test]
    fn compute_schedule_matches_disclosure() {
        let view = compute_schedule(
            &Equipment::new("E1", 1000.0),
            &ladder(),
            &CompletionState::new(),
            1000,
        )
        .unwrap();
        assert_eq!(view.equipment_id, "E1");
        assert_eq!(view.visible_offsets, vec![0, 300, 600]);
    }

    #[test]
    fn snapshot_builds_every_equipment() {
        let snap = SchedulingFacade::default().snapshot(&input()).unwrap();
        assert_eq!(snap.equipment.len(), 2);

        let e1 = &snap.equipment[0];
        assert_eq!(e1.visible_offsets, vec![0, 300, 600, 900]);
        assert_eq!(e1.next_locked_offset, Some(1200));
        assert_eq!(e1.consumption[0].record_id, "f1");
        assert_eq!(e1.consumption[1].rate_km_per_liter, Some(10.0));
        assert_eq!(e1.weekly_distance.distance_km, 100.0);
        assert_eq!(e1.fuel.fill_ups, 2);
    }

    #[test]
    fn equipment_without_plan_starts_fresh_epoch() {
        let snap = SchedulingFacade::default().snapshot(&input()).unwrap();
        let e2 = &snap.equipment[1];
        assert_eq!(e2.baseline_hour_meter, 412);
        assert_eq!(e2.visible_offsets, vec![0, 300, 600]);
        assert!(e2.consumption.is_empty());
        assert_eq!(e2.weekly_distance.distance_km, 0.0);
    }

    #[test]
    fn invalid_template_fails_whole_snapshot() {
        let mut bad = input();
        bad.template = MaintenanceTemplate::from_offsets(vec![300, 0]);
        let err = SchedulingFacade::default().snapshot(&bad).unwrap_err();
        assert!(matches!(err, FleetError::InvalidTemplate(_)));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let parallel = SchedulingFacade::new(FacadeSettings { parallel: true, ..Default::default() });
        let sequential = SchedulingFacade::new(FacadeSettings { parallel: false, ..Default::default() });
        let input = input();
        assert_eq!(
            parallel.snapshot(&input).unwrap(),
            sequential.snapshot(&input).unwrap()
        );
    }

    #[test]
    fn orphan_plans_are_inert() {
        let mut with_orphan = input();
        with_orphan.plans.insert(
            "ghost".to_string(),
            EquipmentPlan {
                baseline_hour_meter: 0,
                completion: CompletionState::new().with("oil", 600, true),
            },
        );
        let facade = SchedulingFacade::default();
        assert_eq!(
            facade.snapshot(&with_orphan).unwrap(),
            facade.snapshot(&input()).unwrap()
        );
    }

    #[test]
    fn week_bounds_reported() {
        let snap = SchedulingFacade::default().snapshot(&input()).unwrap();
        assert_eq!(snap.week_start, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(snap.week_end, NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
    }
}
