//! Deterministic union of two spot sequences keyed by id
//!
//! `primary` wins every id collision outright; the losing record is dropped,
//! never field-merged. In every reconciliation pass `primary` is the local
//! device set and `secondary` the freshly loaded remote set, so an unsynced
//! local write is never shadowed by a remote copy of the same id.
//!
//! Output order: surviving `secondary` records in their original order,
//! followed by all `primary` records in their original order. Within one
//! input, the first record carrying an id wins.

use std::collections::HashSet;

use flavormap_common::Spot;

pub fn merge(primary: &[Spot], secondary: &[Spot]) -> Vec<Spot> {
    let primary_ids: HashSet<&str> = primary.iter().map(|s| s.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(primary.len() + secondary.len());
    let mut merged = Vec::with_capacity(primary.len() + secondary.len());

    for spot in secondary {
        if primary_ids.contains(spot.id.as_str()) {
            continue;
        }
        if seen.insert(spot.id.as_str()) {
            merged.push(spot.clone());
        }
    }

    for spot in primary {
        if seen.insert(spot.id.as_str()) {
            merged.push(spot.clone());
        }
    }

    merged
}
