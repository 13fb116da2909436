//! Canonical chronological ordering of usage records.
//!
//! Within one equipment unit records sort by ascending timestamp, then by
//! ascending `odometer ?? hour_meter ?? 0`. Complete ties keep their input
//! position, so the order is the same on every call.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use fleetops_core::UsageRecord;

/// Compare two records of the same equipment in canonical order.
pub fn canonical_cmp(a: &UsageRecord, b: &UsageRecord) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| a.ordering_reading().total_cmp(&b.ordering_reading()))
}

/// Group record indices by equipment, each group in canonical order.
///
/// Indices point into `records`, which lets callers map derived values back
/// to input positions.
pub fn group_canonical(records: &[UsageRecord]) -> BTreeMap<&str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        groups
            .entry(record.equipment_id.as_str())
            .or_default()
            .push(idx);
    }

    for indices in groups.values_mut() {
        // Stable sort: equal keys stay in input order.
        indices.sort_by(|&a, &b| canonical_cmp(&records[a], &records[b]));
    }

    groups
}

/// Records of one equipment unit in canonical order.
pub fn canonical_order<'a>(records: &'a [UsageRecord], equipment_id: &str) -> Vec<&'a UsageRecord> {
    let mut ordered: Vec<&UsageRecord> = records
        .iter()
        .filter(|r| r.equipment_id == equipment_id)
        .collect();
    ordered.sort_by(|a, b| canonical_cmp(a, b));
    ordered
}
