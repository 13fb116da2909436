//! Maintenance completion state keyed by `(activity, absolute hour)`.
//!
//! Callers historically store completion as flat `"<activityId>-<absoluteHour>"`
//! string keys. [`CompletionState::from_flat`] parses that shape once at the
//! boundary; everything downstream works on the structured key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equipment::Hours;
use crate::error::{FleetError, Result};

/// Identifies one checkbox: an activity at an absolute hour-meter threshold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompletionKey {
    pub activity_id: String,
    pub absolute_hour: Hours,
}

impl CompletionKey {
    pub fn new(activity_id: impl Into<String>, absolute_hour: Hours) -> Self {
        Self {
            activity_id: activity_id.into(),
            absolute_hour,
        }
    }
}

impl fmt::Display for CompletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.activity_id, self.absolute_hour)
    }
}

impl FromStr for CompletionKey {
    type Err = FleetError;

    /// Splits at the last `-`, so activity IDs may themselves contain dashes.
    fn from_str(s: &str) -> Result<Self> {
        let (activity, hour) = s
            .rsplit_once('-')
            .ok_or_else(|| FleetError::InvalidCompletionKey(format!("'{s}' has no '-'")))?;
        if activity.is_empty() {
            return Err(FleetError::InvalidCompletionKey(format!(
                "'{s}' has an empty activity id"
            )));
        }
        let absolute_hour = hour.trim().parse::<Hours>().map_err(|e| {
            FleetError::InvalidCompletionKey(format!("'{s}' has a bad hour '{hour}': {e}"))
        })?;
        Ok(Self::new(activity, absolute_hour))
    }
}

/// Wire form of a single completion entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub activity_id: String,
    pub absolute_hour: Hours,
    pub done: bool,
}

/// Which maintenance items have been checked off for one equipment plan.
///
/// Absence of a key means "not yet addressed", not "not due".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CompletionEntry>", into = "Vec<CompletionEntry>")]
pub struct CompletionState {
    entries: BTreeMap<CompletionKey, bool>,
}

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse legacy flat keys (`"oil-1900" -> true`).
    pub fn from_flat<I, K>(flat: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let mut state = Self::new();
        for (key, done) in flat {
            let key: CompletionKey = key.as_ref().parse()?;
            state.entries.insert(key, done);
        }
        Ok(state)
    }

    pub fn set(&mut self, activity_id: impl Into<String>, absolute_hour: Hours, done: bool) {
        self.entries
            .insert(CompletionKey::new(activity_id, absolute_hour), done);
    }

    pub fn with(mut self, activity_id: impl Into<String>, absolute_hour: Hours, done: bool) -> Self {
        self.set(activity_id, absolute_hour, done);
        self
    }

    pub fn is_done(&self, activity_id: &str, absolute_hour: Hours) -> bool {
        self.entries
            .get(&CompletionKey::new(activity_id, absolute_hour))
            .copied()
            .unwrap_or(false)
    }

    /// True if any activity was checked off at `absolute_hour`.
    pub fn any_done_at(&self, absolute_hour: Hours) -> bool {
        self.entries
            .iter()
            .any(|(k, done)| *done && k.absolute_hour == absolute_hour)
    }

    /// Every absolute hour with at least one completed activity.
    pub fn done_hours(&self) -> BTreeSet<Hours> {
        self.entries
            .iter()
            .filter(|(_, done)| **done)
            .map(|(k, _)| k.absolute_hour)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<CompletionEntry>> for CompletionState {
    fn from(entries: Vec<CompletionEntry>) -> Self {
        let mut state = Self::new();
        for e in entries {
            state.set(e.activity_id, e.absolute_hour, e.done);
        }
        state
    }
}

impl From<CompletionState> for Vec<CompletionEntry> {
    fn from(state: CompletionState) -> Self {
        state
            .entries
            .into_iter()
            .map(|(k, done)| CompletionEntry {
                activity_id: k.activity_id,
                absolute_hour: k.absolute_hour,
                done,
            })
            .collect()
    }
}
