//! Checklist rows for the visible maintenance thresholds of one plan.

use serde::{Deserialize, Serialize};

use fleetops_core::{CompletionState, Hours, MaintenanceTemplate};

use super::disclosure::Disclosure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdStatus {
    /// Every activity due at the threshold is checked off.
    Completed,
    /// Hour meter has reached the threshold with work outstanding.
    Overdue,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatus {
    pub activity_id: String,
    pub done: bool,
}

/// One visible threshold with its activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdView {
    pub offset: Hours,
    pub absolute_hour: Hours,
    pub hours_remaining: f64,
    pub activities: Vec<ActivityStatus>,
    pub status: ThresholdStatus,
}

fn classify(activities: &[ActivityStatus], absolute_hour: Hours, current_hour_meter: f64) -> ThresholdStatus {
    if !activities.is_empty() && activities.iter().all(|a| a.done) {
        ThresholdStatus::Completed
    } else if current_hour_meter >= absolute_hour as f64 {
        ThresholdStatus::Overdue
    } else {
        ThresholdStatus::Upcoming
    }
}

/// Build one row per visible offset.
pub fn build_plan_view(
    template: &MaintenanceTemplate,
    state: &CompletionState,
    baseline: Hours,
    current_hour_meter: f64,
    disclosure: &Disclosure,
) -> Vec<ThresholdView> {
    disclosure
        .offsets
        .iter()
        .map(|&offset| {
            let absolute_hour = baseline.saturating_add(offset);
            let activities: Vec<ActivityStatus> = template
                .activities_at(offset)
                .into_iter()
                .map(|a| ActivityStatus {
                    activity_id: a.id.clone(),
                    done: state.is_done(&a.id, absolute_hour),
                })
                .collect();
            let status = classify(&activities, absolute_hour, current_hour_meter);
            ThresholdView {
                offset,
                absolute_hour,
                hours_remaining: absolute_hour as f64 - current_hour_meter,
                activities,
                status,
            }
        })
        .collect()
}
