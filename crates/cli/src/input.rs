use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use fleetops_compute::{EquipmentPlan, FleetInput};
use fleetops_core::{CompletionState, Equipment, EquipmentId, MaintenanceTemplate, UsageRecord};

/// On-disk snapshot. Template and reference date are optional here because
/// the CLI can supply them from flags or config.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub records: Vec<UsageRecord>,
    #[serde(default)]
    pub plans: BTreeMap<EquipmentId, EquipmentPlan>,
    #[serde(default)]
    pub template: Option<MaintenanceTemplate>,
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl SnapshotFile {
    pub fn into_input(self, template: MaintenanceTemplate, reference_date: NaiveDate) -> FleetInput {
        FleetInput {
            equipment: self.equipment,
            template,
            records: self.records,
            plans: self.plans,
            reference_date,
        }
    }
}

/// Completion files come either as legacy flat keys or as entry lists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompletionFile {
    Flat(BTreeMap<String, bool>),
    Entries(CompletionState),
}

pub fn load_snapshot(path: &Path) -> Result<SnapshotFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot '{}'", path.display()))?;
    let file: SnapshotFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot '{}'", path.display()))?;
    debug!(
        equipment = file.equipment.len(),
        records = file.records.len(),
        plans = file.plans.len(),
        "snapshot loaded"
    );
    Ok(file)
}

pub fn load_completion(path: &Path) -> Result<CompletionState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read completion file '{}'", path.display()))?;
    parse_completion(&raw).with_context(|| format!("bad completion file '{}'", path.display()))
}

fn parse_completion(raw: &str) -> Result<CompletionState> {
    match serde_json::from_str::<CompletionFile>(raw)? {
        CompletionFile::Flat(flat) => Ok(CompletionState::from_flat(flat)?),
        CompletionFile::Entries(state) => Ok(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flat_completion_parses() {
        let state = parse_completion(r#"{"oil-1600": true, "air-filter-1900": false}"#).unwrap();
        assert!(state.is_done("oil", 1600));
        assert!(!state.is_done("air-filter", 1900));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn entry_list_completion_parses() {
        let state =
            parse_completion(r#"[{"activityId":"oil","absoluteHour":1600,"done":true}]"#).unwrap();
        assert!(state.is_done("oil", 1600));
    }

    #[test]
    fn malformed_flat_key_rejected() {
        assert!(parse_completion(r#"{"oil": true}"#).is_err());
    }

    #[test]
    fn snapshot_file_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"equipment":[{{"id":"E1","currentHourMeter":120.0}}]}}"#
        )
        .unwrap();

        let snap = load_snapshot(file.path()).unwrap();
        assert_eq!(snap.equipment.len(), 1);
        assert!(snap.records.is_empty());
        assert!(snap.template.is_none());
        assert!(snap.reference_date.is_none());
    }

    #[test]
    fn shipped_sample_snapshot_loads() {
        let raw = include_str!("../../../data/samples/fleet-snapshot.json");
        let snap: SnapshotFile = serde_json::from_str(raw).unwrap();
        assert!(!snap.equipment.is_empty());
        assert!(!snap.records.is_empty());
    }
}
