use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::equipment::Hours;
use crate::error::{FleetError, Result};

/// One maintenance task in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceActivity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Subset of the template's shared offsets at which this task recurs.
    /// `None` means every offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsets: Option<Vec<Hours>>,
}

impl MaintenanceActivity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            offsets: None,
        }
    }

    pub fn due_at(&self, offset: Hours) -> bool {
        self.offsets
            .as_ref()
            .map_or(true, |offsets| offsets.contains(&offset))
    }
}

/// Static catalog of maintenance tasks sharing one ascending sequence of
/// hour offsets, e.g. `[0, 300, 600, 900, 1200, 1500]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub due_offsets: Vec<Hours>,
    #[serde(default)]
    pub activities: Vec<MaintenanceActivity>,
}

impl MaintenanceTemplate {
    /// Template with the given offsets and no named activities.
    pub fn from_offsets(due_offsets: Vec<Hours>) -> Self {
        Self {
            id: String::new(),
            name: None,
            due_offsets,
            activities: Vec::new(),
        }
    }

    pub fn with_activity(mut self, activity: MaintenanceActivity) -> Self {
        self.activities.push(activity);
        self
    }

    /// Check the offset sequence and activity subsets.
    ///
    /// Offsets must be non-empty, non-negative, and strictly ascending.
    /// Activity IDs must be unique and their offsets must come from the
    /// shared sequence.
    pub fn validate(&self) -> Result<()> {
        validate_offsets(&self.due_offsets)?;

        let shared: HashSet<Hours> = self.due_offsets.iter().copied().collect();
        let mut seen = HashSet::new();
        for activity in &self.activities {
            if activity.id.is_empty() {
                return Err(FleetError::InvalidTemplate(
                    "activity id must not be empty".to_string(),
                ));
            }
            if !seen.insert(activity.id.as_str()) {
                return Err(FleetError::InvalidTemplate(format!(
                    "duplicate activity id '{}'",
                    activity.id
                )));
            }
            if let Some(offsets) = &activity.offsets {
                if let Some(bad) = offsets.iter().find(|o| !shared.contains(o)) {
                    return Err(FleetError::InvalidTemplate(format!(
                        "activity '{}' uses offset {} which is not in the shared sequence",
                        activity.id, bad
                    )));
                }
            }
        }
        Ok(())
    }

    /// Activities that recur at `offset`.
    pub fn activities_at(&self, offset: Hours) -> Vec<&MaintenanceActivity> {
        self.activities.iter().filter(|a| a.due_at(offset)).collect()
    }
}

/// Offsets must be non-empty, non-negative, and strictly ascending.
pub fn validate_offsets(offsets: &[Hours]) -> Result<()> {
    if offsets.is_empty() {
        return Err(FleetError::InvalidTemplate(
            "due offsets must not be empty".to_string(),
        ));
    }
    if let Some(neg) = offsets.iter().find(|o| **o < 0) {
        return Err(FleetError::InvalidTemplate(format!(
            "due offset {neg} is negative"
        )));
    }
    if let Some(pair) = offsets.windows(2).find(|w| w[0] >= w[1]) {
        return Err(FleetError::InvalidTemplate(format!(
            "due offsets must be strictly ascending ({} is followed by {})",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> MaintenanceTemplate {
        MaintenanceTemplate::from_offsets(vec![0, 300, 600, 900, 1200, 1500])
            .with_activity(MaintenanceActivity::new("oil"))
            .with_activity(MaintenanceActivity {
                id: "hydraulic".to_string(),
                name: Some("Hydraulic filter".to_string()),
                offsets: Some(vec![600, 1200]),
            })
    }

    #[test]
    fn standard_template_is_valid() {
        standard().validate().unwrap();
    }

    #[test]
    fn empty_offsets_rejected() {
        let err = MaintenanceTemplate::from_offsets(vec![]).validate().unwrap_err();
        assert!(matches!(err, FleetError::InvalidTemplate(_)));
    }

    #[test]
    fn non_ascending_offsets_rejected() {
        assert!(validate_offsets(&[0, 300, 300, 600]).is_err());
        assert!(validate_offsets(&[0, 600, 300]).is_err());
        assert!(validate_offsets(&[-300, 0]).is_err());
        assert!(validate_offsets(&[0]).is_ok());
    }

    #[test]
    fn activity_offsets_must_be_shared() {
        let t = MaintenanceTemplate::from_offsets(vec![0, 300]).with_activity(MaintenanceActivity {
            id: "oil".to_string(),
            name: None,
            offsets: Some(vec![450]),
        });
        let err = t.validate().unwrap_err();
        assert!(err.to_string().contains("450"));
    }

    #[test]
    fn duplicate_activity_rejected() {
        let t = MaintenanceTemplate::from_offsets(vec![0, 300])
            .with_activity(MaintenanceActivity::new("oil"))
            .with_activity(MaintenanceActivity::new("oil"));
        assert!(t.validate().is_err());
    }

    #[test]
    fn activities_at_respects_subsets() {
        let t = standard();
        let ids: Vec<&str> = t.activities_at(600).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["oil", "hydraulic"]);
        let ids: Vec<&str> = t.activities_at(900).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["oil"]);
    }
}
