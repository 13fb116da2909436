//! Progressive disclosure of preventive-maintenance thresholds.
//!
//! Offsets at or below the guaranteed-visibility floor are always shown.
//! Each offset above it unlocks only when some activity was checked off at
//! the immediately preceding offset's absolute hour. The first offset that
//! fails this gate stops the scan, so later offsets never appear even if
//! their own predecessor happens to be done.

use serde::{Deserialize, Serialize};
use tracing::debug;

use fleetops_core::config::{DisclosureConfig, DEFAULT_FLOOR_HOURS};
use fleetops_core::{CompletionState, Hours, MaintenanceTemplate, Result};

/// How much of the offset ladder is shown unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosurePolicy {
    pub floor_hours: Hours,
}

impl Default for DisclosurePolicy {
    fn default() -> Self {
        Self {
            floor_hours: DEFAULT_FLOOR_HOURS,
        }
    }
}

impl From<&DisclosureConfig> for DisclosurePolicy {
    fn from(config: &DisclosureConfig) -> Self {
        Self {
            floor_hours: config.floor_hours,
        }
    }
}

/// Result of one disclosure pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disclosure {
    /// Visible offsets, ascending.
    pub offsets: Vec<Hours>,
    /// Largest visible offset, never below the floor.
    pub max_visible: Hours,
    /// First offset held back by its gate, if any.
    pub next_locked: Option<Hours>,
}

/// Compute the visible offsets for one equipment plan.
///
/// `baseline` is the hour-meter reading at which the plan epoch started;
/// completion keys are looked up at `baseline + offset`.
pub fn disclose(
    template: &MaintenanceTemplate,
    state: &CompletionState,
    baseline: Hours,
    policy: &DisclosurePolicy,
) -> Result<Disclosure> {
    template.validate()?;

    let offsets = &template.due_offsets;
    let split = offsets.partition_point(|&o| o <= policy.floor_hours);

    let mut visible = offsets[..split].to_vec();
    let mut max_visible = policy.floor_hours;
    let mut next_locked = None;

    let done_hours = state.done_hours();

    for idx in split..offsets.len() {
        let candidate = offsets[idx];
        // No predecessor to gate on, or a predecessor hour past the meter
        // range: either way the offset stays locked.
        let unlocked = idx
            .checked_sub(1)
            .and_then(|prev| baseline.checked_add(offsets[prev]))
            .is_some_and(|prev_hour| done_hours.contains(&prev_hour));

        if !unlocked {
            next_locked = Some(candidate);
            break;
        }
        visible.push(candidate);
        max_visible = candidate;
    }

    debug!(
        baseline,
        floor = policy.floor_hours,
        visible = visible.len(),
        max_visible,
        next_locked = ?next_locked,
        "disclosure computed"
    );

    Ok(Disclosure {
        offsets: visible,
        max_visible,
        next_locked,
    })
}

/// Visible offsets under the default 600-hour floor.
pub fn compute_visible_offsets(
    template: &MaintenanceTemplate,
    state: &CompletionState,
    baseline: Hours,
) -> Result<Vec<Hours>> {
    Ok(disclose(template, state, baseline, &DisclosurePolicy::default())?.offsets)
}
