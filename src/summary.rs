//! Daily totals, break counts and history-derived analytics.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::clock::day_before;
use crate::model::{Document, History, PlannerConfig};
use crate::plan::break_count;
use crate::util::round2;

pub const TRAILING_DAYS: u64 = 7;
pub const STREAK_LOOKBACK_DAYS: u64 = 30;
pub const SUGGEST_WINDOW_DAYS: u64 = 21;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub day: NaiveDate,
    pub total: f64,
    pub breaks: u32,
    pub previous_day_hours: f64,
    pub trailing_7_day_average: f64,
}

/// Computes the summary for `day` and overwrites `history[day]` with the
/// total. History is a cache of the latest computation, not a log.
pub fn summarize(
    durations: &[f64],
    history: &mut History,
    day: NaiveDate,
    config: &PlannerConfig,
) -> Summary {
    let sum: f64 = durations
        .iter()
        .filter(|d| d.is_finite() && **d > 0.0)
        .sum();
    let total = if sum == 0.0 || !sum.is_finite() {
        config.study_target_hours.max(0.0)
    } else {
        sum
    };
    let total = round2(total);

    let previous_day_hours = history
        .get(&day_before(day, 1))
        .copied()
        .unwrap_or(0.0);

    let present: Vec<f64> = (1..=TRAILING_DAYS)
        .filter_map(|i| history.get(&day_before(day, i)).copied())
        .collect();
    let trailing_7_day_average = if present.is_empty() {
        0.0
    } else {
        round2(present.iter().sum::<f64>() / present.len() as f64)
    };

    history.insert(day, total);

    Summary {
        day,
        total,
        breaks: break_count(total, config.effective_break_length()),
        previous_day_hours,
        trailing_7_day_average,
    }
}

/// Re-summarizes `day` from its live bucket.
pub fn refresh_summary(doc: &mut Document, day: NaiveDate) -> Summary {
    let durations: Vec<f64> = doc.bucket(day).iter().map(|t| t.hours_or_zero()).collect();
    let summary = summarize(&durations, &mut doc.history, day, &doc.config);
    debug!(%day, total = summary.total, "summary refreshed");
    summary
}

/// Consecutive days with at least one completed task, ending today. A day
/// in progress with nothing done yet does not break the streak.
pub fn completion_streak(doc: &Document, today: NaiveDate, lookback: u64) -> u32 {
    let has_completion = |day: NaiveDate| doc.bucket(day).iter().any(|t| t.done);

    let start = if has_completion(today) { 0 } else { 1 };
    let mut streak = 0u32;
    for offset in start..start + lookback {
        if has_completion(day_before(today, offset)) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub total: usize,
    pub done: usize,
}

impl CategoryStat {
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

/// Per-category completion over the last `window` days (today included),
/// weakest category first. Ties go to the category with more tasks.
pub fn category_suggestions(doc: &Document, today: NaiveDate, window: u64) -> Vec<CategoryStat> {
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for offset in 0..window {
        for task in doc.bucket(day_before(today, offset)) {
            let entry = counts.entry(task.category.to_lowercase()).or_default();
            entry.0 += 1;
            if task.done {
                entry.1 += 1;
            }
        }
    }

    let mut stats: Vec<CategoryStat> = counts
        .into_iter()
        .map(|(category, (total, done))| CategoryStat {
            category,
            total,
            done,
        })
        .collect();
    stats.sort_by(|a, b| {
        a.completion_rate()
            .total_cmp(&b.completion_rate())
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| a.category.cmp(&b.category))
    });
    stats
}
