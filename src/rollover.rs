//! Day-boundary rollover.
//!
//! When the stored "last seen" day differs from the current day, open tasks
//! from that stale day are copied forward into the current day's bucket.
//! Only the single most recent stale bucket is migrated: if the planner sat
//! unused for several days, open tasks from the days in between are not
//! cascaded forward.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::model::Document;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RolloverReport {
    /// Stale day the tasks came from; `None` when nothing had to happen.
    pub from: Option<NaiveDate>,
    pub carried: usize,
    pub skipped_duplicates: usize,
    /// Whether the document was modified and needs saving.
    pub changed: bool,
}

pub fn reconcile_day(doc: &mut Document, current: NaiveDate, now: DateTime<Utc>) -> RolloverReport {
    let Some(stale) = doc.last_seen_day else {
        doc.last_seen_day = Some(current);
        return RolloverReport {
            changed: true,
            ..RolloverReport::default()
        };
    };
    if stale == current {
        return RolloverReport::default();
    }

    let unfinished: Vec<_> = doc
        .bucket(stale)
        .iter()
        .filter(|task| !task.done)
        .cloned()
        .collect();

    doc.bucket_mut(current);

    let mut report = RolloverReport {
        from: Some(stale),
        changed: true,
        ..RolloverReport::default()
    };
    for task in unfinished {
        if doc.has_open_duplicate(current, &task.text, &task.category) {
            report.skipped_duplicates += 1;
            continue;
        }
        let copy = task.carried_copy(doc.new_task_id(), now);
        doc.bucket_mut(current).push(copy);
        report.carried += 1;
    }

    doc.last_seen_day = Some(current);
    info!(
        from = %stale,
        to = %current,
        carried = report.carried,
        skipped = report.skipped_duplicates,
        "rolled over unfinished tasks"
    );
    report
}
