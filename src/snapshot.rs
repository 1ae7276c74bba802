//! Named point-in-time copies of the whole document.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{PlannerError, Result};
use crate::model::{Document, SavedPlan, short_id};

/// Stores a deep copy of `doc` under `name` and returns the new id. The copy
/// has its own saved-plan list emptied so snapshots never nest.
pub fn save_snapshot(doc: &mut Document, name: &str, now: DateTime<Utc>) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlannerError::EmptyName);
    }

    let mut snapshot = doc.clone();
    snapshot.saved_plans.clear();

    let mut id = short_id("p_");
    while doc.saved_plans.iter().any(|p| p.id == id) {
        id = short_id("p_");
    }

    info!(%id, name, "saved plan snapshot");
    doc.saved_plans.push(SavedPlan {
        id: id.clone(),
        name: name.to_string(),
        date_saved: now,
        snapshot,
    });
    Ok(id)
}

/// Replaces the live document with a copy of the snapshot. The list of saved
/// plans itself is kept.
pub fn restore_snapshot(doc: &mut Document, id: &str) -> Result<()> {
    let plan = find(doc, id)?;
    info!(id = %plan.id, name = %plan.name, "restoring plan snapshot");
    let mut restored = plan.snapshot.clone();
    restored.saved_plans = std::mem::take(&mut doc.saved_plans);
    *doc = restored;
    Ok(())
}

pub fn delete_snapshot(doc: &mut Document, id: &str) -> Result<SavedPlan> {
    let id = find(doc, id)?.id.clone();
    let pos = doc
        .saved_plans
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| PlannerError::SnapshotNotFound(id.clone()))?;
    Ok(doc.saved_plans.remove(pos))
}

/// Exact id, unique id prefix, or exact (case-insensitive) name.
pub fn find<'a>(doc: &'a Document, query: &str) -> Result<&'a SavedPlan> {
    let query = query.trim();
    if let Some(plan) = doc.saved_plans.iter().find(|p| p.id == query) {
        return Ok(plan);
    }
    let mut matches = doc.saved_plans.iter().filter(|p| {
        (!query.is_empty() && p.id.starts_with(query)) || p.name.eq_ignore_ascii_case(query)
    });
    match (matches.next(), matches.next()) {
        (Some(plan), None) => Ok(plan),
        (Some(_), Some(_)) => Err(PlannerError::AmbiguousSnapshot(query.to_string())),
        _ => Err(PlannerError::SnapshotNotFound(query.to_string())),
    }
}
