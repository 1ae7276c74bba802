use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::util::{lenient_f64, lenient_opt_f64};

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_BREAK_LENGTH_HOURS: f64 = 0.5;

pub fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_study_target_hours() -> f64 {
    4.0
}

/// Per-day "hours studied" cache, overwritten by every summary computation.
pub type History = BTreeMap<NaiveDate, f64>;

/// `prefix` + 8 hex chars.
pub fn short_id(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &raw[..8])
}

/// The whole persisted state. JSON keys are camelCase so documents exported
/// by the browser version of the planner import as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    #[serde(alias = "lastLocalDate")]
    pub last_seen_day: Option<NaiveDate>,
    pub config: PlannerConfig,
    pub weekly: WeeklyTemplate,
    pub tasks_by_date: BTreeMap<NaiveDate, Vec<Task>>,
    pub history: History,
    pub saved_plans: Vec<SavedPlan>,
}

impl Document {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            last_seen_day: Some(today),
            ..Self::default()
        }
    }

    pub fn bucket(&self, day: NaiveDate) -> &[Task] {
        self.tasks_by_date
            .get(&day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Touching a bucket materializes it as an (possibly empty) array.
    pub fn bucket_mut(&mut self, day: NaiveDate) -> &mut Vec<Task> {
        self.tasks_by_date.entry(day).or_default()
    }

    pub fn contains_task_id(&self, id: &str) -> bool {
        self.tasks_by_date
            .values()
            .flatten()
            .any(|task| task.id == id)
    }

    pub fn new_task_id(&self) -> String {
        loop {
            let id = short_id("t_");
            if !self.contains_task_id(&id) {
                return id;
            }
        }
    }

    /// Locates a task by exact id or unique id prefix.
    pub fn locate_task(&self, query: &str) -> Result<(NaiveDate, usize)> {
        let query = query.trim();
        let mut matches: Vec<(NaiveDate, usize)> = Vec::new();

        for (day, tasks) in &self.tasks_by_date {
            for (pos, task) in tasks.iter().enumerate() {
                if task.id == query {
                    return Ok((*day, pos));
                }
                if !query.is_empty() && task.id.starts_with(query) {
                    matches.push((*day, pos));
                }
            }
        }

        match matches.len() {
            0 => Err(PlannerError::TaskNotFound(query.to_string())),
            1 => Ok(matches[0]),
            _ => Err(PlannerError::AmbiguousTask(query.to_string())),
        }
    }

    pub fn task(&self, query: &str) -> Result<(NaiveDate, &Task)> {
        let (day, pos) = self.locate_task(query)?;
        Ok((day, &self.tasks_by_date[&day][pos]))
    }

    pub fn task_mut(&mut self, query: &str) -> Result<&mut Task> {
        let (day, pos) = self.locate_task(query)?;
        Ok(&mut self.bucket_mut(day)[pos])
    }

    pub fn remove_task(&mut self, query: &str) -> Result<(NaiveDate, Task)> {
        let (day, pos) = self.locate_task(query)?;
        let task = self.bucket_mut(day).remove(pos);
        Ok((day, task))
    }

    /// True when `day` already holds an open task with the same text and category.
    pub fn has_open_duplicate(&self, day: NaiveDate, text: &str, category: &str) -> bool {
        self.bucket(day)
            .iter()
            .any(|t| !t.done && t.text == text && t.category == category)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, alias = "time", skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    /// Planned duration in hours; unset counts as 0 in summaries.
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub hours: Option<f64>,
    #[serde(default)]
    pub done: bool,
    #[serde(default, with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: String, text: String, category: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            category,
            scheduled_time: None,
            hours: None,
            done: false,
            created_at: now,
            completed_at: None,
        }
    }

    pub fn mark_done(&mut self, now: DateTime<Utc>) {
        if !self.done {
            self.done = true;
            self.completed_at = Some(now);
        }
    }

    pub fn mark_undone(&mut self) {
        self.done = false;
        self.completed_at = None;
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.done {
            self.mark_undone();
        } else {
            self.mark_done(now);
        }
    }

    /// Fresh open copy used when a task moves to another day.
    pub fn carried_copy(&self, id: String, now: DateTime<Utc>) -> Task {
        Task {
            id,
            created_at: now,
            done: false,
            completed_at: None,
            ..self.clone()
        }
    }

    pub fn hours_or_zero(&self) -> f64 {
        self.hours.filter(|h| *h > 0.0).unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerConfig {
    #[serde(
        default = "default_study_target_hours",
        deserialize_with = "lenient_f64"
    )]
    pub study_target_hours: f64,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub break_length_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wake_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_end: Option<String>,
    #[serde(default)]
    pub school_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            study_target_hours: default_study_target_hours(),
            break_length_hours: None,
            wake_time: None,
            sleep_time: None,
            school_start: None,
            school_end: None,
            school_enabled: false,
            mission: None,
        }
    }
}

impl PlannerConfig {
    /// Break length used for break counts; unset or non-positive means 0.5h.
    pub fn effective_break_length(&self) -> f64 {
        self.break_length_hours
            .filter(|len| *len > 0.0)
            .unwrap_or(DEFAULT_BREAK_LENGTH_HOURS)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayTemplate {
    /// Comma list of subjects.
    pub subjects: String,
    /// Concrete tasks separated by newline, `/`, `;` or `,`.
    pub primary: String,
    pub suggest: String,
}

impl DayTemplate {
    pub fn is_empty(&self) -> bool {
        self.subjects.trim().is_empty()
            && self.primary.trim().is_empty()
            && self.suggest.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyTemplate {
    #[serde(alias = "Monday")]
    pub monday: DayTemplate,
    #[serde(alias = "Tuesday")]
    pub tuesday: DayTemplate,
    #[serde(alias = "Wednesday")]
    pub wednesday: DayTemplate,
    #[serde(alias = "Thursday")]
    pub thursday: DayTemplate,
    #[serde(alias = "Friday")]
    pub friday: DayTemplate,
    #[serde(alias = "Saturday")]
    pub saturday: DayTemplate,
    #[serde(alias = "Sunday")]
    pub sunday: DayTemplate,
}

impl WeeklyTemplate {
    pub fn day(&self, weekday: Weekday) -> &DayTemplate {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DayTemplate {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlan {
    pub id: String,
    pub name: String,
    pub date_saved: DateTime<Utc>,
    pub snapshot: Document,
}
