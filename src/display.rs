use chrono::{NaiveDate, Weekday};
use owo_colors::OwoColorize;

use crate::clock::{day_before, weekday_name, weekday_of};
use crate::model::{
    DEFAULT_CATEGORY, DayTemplate, History, PlannerConfig, SavedPlan, Task, WeeklyTemplate,
};
use crate::plan::GeneratedPlan;
use crate::summary::{CategoryStat, Summary};

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn print_day(day: NaiveDate, view: &[&Task], color: bool) {
    println!(
        "{}",
        format_header(&format!("{day} ({})", weekday_name(weekday_of(day))), color)
    );
    if view.is_empty() {
        println!("No tasks.");
        return;
    }

    for task in view {
        for line in task_lines(task, color) {
            println!("{line}");
        }
    }
}

pub fn task_lines_plain(task: &Task) -> Vec<String> {
    task_lines(task, false)
}

fn task_lines(task: &Task, color: bool) -> Vec<String> {
    let status = format_status(task.done, color);
    let id = format_id(&task.id, color);
    let text = format_title(&task.text, color);
    let mut lines = vec![format!("[{status}] {id}  {text}")];

    let mut meta_parts: Vec<String> = Vec::new();
    if !task.category.eq_ignore_ascii_case(DEFAULT_CATEGORY) {
        meta_parts.push(format!(
            "{} {}",
            format_label("category:", color),
            task.category
        ));
    }
    if let Some(time) = task.scheduled_time.as_deref() {
        meta_parts.push(format!("{} {time}", format_label("time:", color)));
    }
    if let Some(hours) = task.hours {
        meta_parts.push(format!(
            "{} {}",
            format_label("hours:", color),
            format_hours(hours)
        ));
    }

    if !meta_parts.is_empty() {
        lines.push(format!("    {}", meta_parts.join(" | ")));
    }

    lines
}

pub fn print_task_view(day: NaiveDate, task: &Task, color: bool) {
    println!("{} {}", format_label("ID:", color), format_id(&task.id, color));
    println!(
        "{} {}",
        format_label("Text:", color),
        format_title(&task.text, color)
    );
    println!("{} {day}", format_label("Day:", color));
    println!("{} {}", format_label("Category:", color), task.category);
    if let Some(time) = task.scheduled_time.as_deref() {
        println!("{} {time}", format_label("Time:", color));
    }
    if let Some(hours) = task.hours {
        println!("{} {}", format_label("Hours:", color), format_hours(hours));
    }
    println!(
        "{} {}",
        format_label("Status:", color),
        format_status(task.done, color)
    );
    println!(
        "{} {}",
        format_label("Created:", color),
        format_dimmed(&task.created_at.to_rfc3339(), color)
    );
    if let Some(completed) = task.completed_at {
        println!(
            "{} {}",
            format_label("Completed:", color),
            format_dimmed(&completed.to_rfc3339(), color)
        );
    }
}

pub fn print_plan(day: NaiveDate, plan: &GeneratedPlan, template: &DayTemplate, color: bool) {
    println!(
        "{}",
        format_header(&format!("Plan for {day} ({})", weekday_name(plan.weekday)), color)
    );
    for (idx, task) in plan.tasks.iter().enumerate() {
        println!(
            "{:>2}. {}  {} {}",
            idx + 1,
            format_title(&task.description, color),
            format_label("subject:", color),
            task.subject_guess
        );
        println!("    {} {}", format_label("hours:", color), format_hours(task.duration_hours));
    }
    println!(
        "{} {}  {} {}",
        format_label("Total:", color),
        format_hours(plan.total_hours),
        format_label("Breaks:", color),
        plan.breaks
    );
    let suggest = template.suggest.trim();
    if !suggest.is_empty() {
        println!("{} {suggest}", format_label("Suggestion:", color));
    }
}

pub fn print_summary(summary: &Summary, config: &PlannerConfig, color: bool) {
    println!(
        "{}",
        format_header(&format!("Summary for {}", summary.day), color)
    );
    if let Some(mission) = config.mission.as_deref() {
        println!("Mission:        {mission}");
    }
    println!("Total:          {}", format_hours(summary.total));
    println!("Target:         {}", format_hours(config.study_target_hours));
    println!("Breaks:         {}", summary.breaks);
    println!("Previous day:   {}", format_hours(summary.previous_day_hours));
    println!(
        "7-day average:  {}",
        format_hours(summary.trailing_7_day_average)
    );
}

pub fn print_history(history: &History, today: NaiveDate, days: u64, color: bool) {
    let mut any = false;
    for offset in (0..days).rev() {
        let day = day_before(today, offset);
        let Some(hours) = history.get(&day) else {
            continue;
        };
        any = true;
        let bar = "#".repeat((hours * 2.0).round().clamp(0.0, 60.0) as usize);
        println!(
            "{day}  {:>7}  {}",
            format_hours(*hours),
            format_dimmed(&bar, color)
        );
    }
    if !any {
        println!("No history.");
    }
}

pub fn print_weekly(weekly: &WeeklyTemplate, only: Option<Weekday>, color: bool) {
    let days: Vec<Weekday> = match only {
        Some(day) => vec![day],
        None => ALL_WEEKDAYS.to_vec(),
    };
    for weekday in days {
        let template = weekly.day(weekday);
        println!("{}", format_header(weekday_name(weekday), color));
        if template.is_empty() {
            println!("    (empty)");
            continue;
        }
        print_template_field("subjects:", &template.subjects, color);
        print_template_field("primary:", &template.primary, color);
        print_template_field("suggest:", &template.suggest, color);
    }
}

fn print_template_field(label: &str, value: &str, color: bool) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    println!(
        "    {} {}",
        format_label(label, color),
        value.replace('\n', " / ")
    );
}

pub fn print_config(config: &PlannerConfig) {
    println!("study_target_hours: {}", config.study_target_hours);
    match config.break_length_hours {
        Some(len) => println!("break_length_hours: {len}"),
        None => println!(
            "break_length_hours: - (using {})",
            config.effective_break_length()
        ),
    }
    println!("wake_time:          {}", or_dash(config.wake_time.as_deref()));
    println!("sleep_time:         {}", or_dash(config.sleep_time.as_deref()));
    println!("school_start:       {}", or_dash(config.school_start.as_deref()));
    println!("school_end:         {}", or_dash(config.school_end.as_deref()));
    println!("school_enabled:     {}", config.school_enabled);
    println!("mission:            {}", or_dash(config.mission.as_deref()));
}

pub fn print_snapshots(plans: &[SavedPlan], color: bool) {
    if plans.is_empty() {
        println!("No saved snapshots.");
        return;
    }
    for plan in plans {
        let tasks: usize = plan.snapshot.tasks_by_date.values().map(Vec::len).sum();
        println!(
            "{}  {}  {}  ({tasks} tasks)",
            format_id(&plan.id, color),
            format_title(&plan.name, color),
            format_dimmed(&plan.date_saved.format("%Y-%m-%d %H:%M").to_string(), color)
        );
    }
}

pub fn print_stats(streak: u32, stats: &[CategoryStat], window: u64, color: bool) {
    println!("Streak:   {streak} day(s)");
    if stats.is_empty() {
        return;
    }
    println!("\nCategories (last {window} days, weakest first):");
    for stat in stats {
        let rate = (stat.completion_rate() * 100.0).round();
        let line = format!(
            "  {:<16} {}/{} done ({rate}%)",
            stat.category, stat.done, stat.total
        );
        if color && stat.completion_rate() < 0.5 {
            println!("{}", line.yellow());
        } else {
            println!("{line}");
        }
    }
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2} h")
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn format_status(done: bool, color: bool) -> String {
    if done {
        if color {
            format!("{}", "done".green())
        } else {
            "done".to_string()
        }
    } else if color {
        format!("{}", "todo".yellow())
    } else {
        "todo".to_string()
    }
}

fn format_id(id: &str, color: bool) -> String {
    if color {
        format!("{}", id.dimmed())
    } else {
        id.to_string()
    }
}

fn format_title(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold())
    } else {
        title.to_string()
    }
}

fn format_label(label: &str, color: bool) -> String {
    if color {
        format!("{}", label.dimmed())
    } else {
        label.to_string()
    }
}

fn format_dimmed(value: &str, color: bool) -> String {
    if color {
        format!("{}", value.dimmed())
    } else {
        value.to_string()
    }
}

fn format_header(text: &str, color: bool) -> String {
    let text = format!("== {text} ==");
    if color {
        format!("{}", text.bold())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_task_lines_plain_shows_non_default_meta() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let mut task = Task::new("t_1".into(), "Essay".into(), "english".into(), now);
        task.scheduled_time = Some("17:00".into());
        task.hours = Some(1.5);
        let lines = task_lines_plain(&task);
        assert_eq!(lines[0], "[todo] t_1  Essay");
        assert_eq!(lines[1], "    category: english | time: 17:00 | hours: 1.50 h");

        let plain = Task::new("t_2".into(), "Chores".into(), DEFAULT_CATEGORY.into(), now);
        assert_eq!(task_lines_plain(&plain), vec!["[todo] t_2  Chores".to_string()]);
    }
}
