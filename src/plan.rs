//! Daily plan generation from the weekly template.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::estimate::estimate;
use crate::model::{Document, PlannerConfig, Task, WeeklyTemplate};
use crate::util::round2;

pub const FALLBACK_DESCRIPTION: &str = "General study";
pub const FALLBACK_SUBJECT: &str = "General";
const SUBJECT_LABEL_MAX_CHARS: usize = 20;

/// Subject label and the keywords that map a task segment to it.
pub const SUBJECT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Math",
        &["math", "algebra", "geometry", "calculus", "trigonometry", "arithmetic"],
    ),
    (
        "Science",
        &["science", "physics", "chemistry", "biology"],
    ),
    (
        "Social Studies",
        &["social", "history", "geography", "civics", "economics", "sst"],
    ),
    ("Hindi", &["hindi"]),
    (
        "English",
        &["english", "grammar", "literature", "essay", "comprehension"],
    ),
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlannedTask {
    pub subject_guess: String,
    pub description: String,
    pub duration_hours: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedPlan {
    pub weekday: Weekday,
    pub tasks: Vec<PlannedTask>,
    pub total_hours: f64,
    pub breaks: u32,
}

pub fn generate_plan(
    weekly: &WeeklyTemplate,
    config: &PlannerConfig,
    weekday: Weekday,
) -> GeneratedPlan {
    let template = weekly.day(weekday);

    let primary = split_primary(&template.primary);
    let mut tasks: Vec<PlannedTask> = if !primary.is_empty() {
        primary
            .into_iter()
            .map(|segment| PlannedTask {
                subject_guess: guess_subject(segment),
                description: segment.to_string(),
                duration_hours: estimate(segment),
            })
            .collect()
    } else {
        template
            .subjects
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|subject| PlannedTask {
                subject_guess: subject.to_string(),
                description: format!("Study {subject}"),
                duration_hours: 0.0,
            })
            .collect()
    };

    if tasks.is_empty() {
        tasks.push(PlannedTask {
            subject_guess: FALLBACK_SUBJECT.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
            duration_hours: 0.0,
        });
    }

    reconcile_durations(&mut tasks, config.study_target_hours);

    let total_hours = round2(tasks.iter().map(|t| t.duration_hours).sum());
    let breaks = break_count(total_hours, config.effective_break_length());
    debug!(?weekday, tasks = tasks.len(), total_hours, breaks, "generated plan");

    GeneratedPlan {
        weekday,
        tasks,
        total_hours,
        breaks,
    }
}

/// Aligns task durations with the daily target. An all-zero plan is split
/// evenly; a plan short of target gives the shortfall to its zero-duration
/// tasks only. A plan with no zero-duration tasks stays below target.
pub fn reconcile_durations(tasks: &mut [PlannedTask], target: f64) {
    if tasks.is_empty() || target <= 0.0 {
        return;
    }
    let sum: f64 = tasks.iter().map(|t| t.duration_hours).sum();

    if sum == 0.0 {
        let each = round2(target / tasks.len() as f64);
        for task in tasks.iter_mut() {
            task.duration_hours = each;
        }
        return;
    }

    if sum < target {
        let zeros = tasks.iter().filter(|t| t.duration_hours == 0.0).count();
        if zeros == 0 {
            return;
        }
        let each = round2((target - sum) / zeros as f64);
        for task in tasks.iter_mut().filter(|t| t.duration_hours == 0.0) {
            task.duration_hours = each;
        }
    }
}

pub fn break_count(total_hours: f64, break_length: f64) -> u32 {
    if total_hours <= 0.0 || break_length <= 0.0 {
        return 0;
    }
    (total_hours / break_length).floor() as u32
}

/// Splits a primary task list on newline, `/`, `;` or `,`.
pub fn split_primary(primary: &str) -> Vec<&str> {
    primary
        .split(['\n', '/', ';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn guess_subject(segment: &str) -> String {
    let lower = segment.to_lowercase();
    for (label, keywords) in SUBJECT_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return label.to_string();
        }
    }

    let head = segment
        .split([':', '-', '(', '|'])
        .next()
        .unwrap_or(segment)
        .trim();
    head.chars().take(SUBJECT_LABEL_MAX_CHARS).collect::<String>().trim_end().to_string()
}

/// Appends a generated plan to the bucket for `day`, skipping entries that
/// are already open there. Returns how many tasks were added.
pub fn apply_plan(
    doc: &mut Document,
    day: NaiveDate,
    plan: &GeneratedPlan,
    now: DateTime<Utc>,
) -> usize {
    let mut added = 0usize;
    for planned in &plan.tasks {
        if doc.has_open_duplicate(day, &planned.description, &planned.subject_guess) {
            continue;
        }
        let mut task = Task::new(
            doc.new_task_id(),
            planned.description.clone(),
            planned.subject_guess.clone(),
            now,
        );
        task.hours = Some(planned.duration_hours);
        doc.bucket_mut(day).push(task);
        added += 1;
    }
    added
}
