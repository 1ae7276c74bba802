use clap::{CommandFactory, Parser};
use clap_complete::generate;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::clock::{Moment, parse_weekday, resolve_day, weekday_of};
use crate::cli::{Cli, Commands, PlanCommands, SnapshotCommands};
use crate::display::{
    print_config, print_day, print_history, print_plan, print_snapshots, print_stats,
    print_summary, print_task_view, print_weekly,
};
use crate::edit::{edit_interactive, parse_hours_input};
use crate::error::{PlannerError, Result};
use crate::estimate::estimate;
use crate::export::render_export;
use crate::model::{DayTemplate, Document, PlannerConfig, Task, default_category};
use crate::plan::{apply_plan, generate_plan};
use crate::rollover::{RolloverReport, reconcile_day};
use crate::snapshot::{delete_snapshot, restore_snapshot, save_snapshot};
use crate::storage::{document_path, import_document, load_document, save_document};
use crate::summary::{
    STREAK_LOOKBACK_DAYS, SUGGEST_WINDOW_DAYS, category_suggestions, completion_streak,
    refresh_summary,
};
use crate::util::{normalize_text, prompt_input};

pub const LOG_ENV: &str = "STUDYPLAN_LOG";

struct Session {
    path: PathBuf,
    moment: Moment,
    color: bool,
}

impl Session {
    fn save(&self, doc: &Document) -> Result<()> {
        save_document(&self.path, doc)
    }

    fn day(&self, arg: Option<&str>) -> Result<chrono::NaiveDate> {
        resolve_day(arg, self.moment.day)
    }
}

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let path = document_path().unwrap_or_else(|e| fail(e));
    let moment = Moment::capture();
    let mut doc = load_document(&path, moment.day);

    let session = Session {
        path,
        moment,
        color: resolve_color(&cli),
    };

    let report = start_day(&mut doc, moment.day, moment.instant);
    if report.changed {
        session.save(&doc).unwrap_or_else(|e| fail(e));
    }
    if let Some(from) = report.from.filter(|_| report.carried > 0) {
        eprintln!(
            "Carried {} unfinished task(s) over from {from}",
            report.carried
        );
    }

    if let Err(e) = execute(cli.command, &mut doc, &session) {
        fail(e);
    }
}

/// Rolls the document over to `day` and re-summarizes it when tasks were
/// carried in, so `history[day]` reflects the carried durations.
pub fn start_day(
    doc: &mut Document,
    day: chrono::NaiveDate,
    now: chrono::DateTime<chrono::Utc>,
) -> RolloverReport {
    let report = reconcile_day(doc, day, now);
    if report.carried > 0 {
        refresh_summary(doc, day);
    }
    report
}

fn fail(e: PlannerError) -> ! {
    eprintln!("{e}");
    std::process::exit(e.exit_code());
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_color(cli: &Cli) -> bool {
    if cli.no_color {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn execute(command: Commands, doc: &mut Document, session: &Session) -> Result<()> {
    let now = session.moment.instant;
    let color = session.color;

    match command {
        Commands::Completions { .. } => {
            // Handled before the document is loaded.
        }

        Commands::Add {
            text,
            category,
            time,
            hours,
            day,
        } => {
            let day = session.day(day.as_deref())?;
            let text = normalize_text(Some(text)).ok_or(PlannerError::EmptyText)?;
            let hours = match hours {
                Some(raw) => Some(parse_hours_input(&raw).ok_or_else(|| {
                    PlannerError::InvalidValue {
                        field: "hours".into(),
                        message: format!("'{raw}' is not a duration"),
                    }
                })?),
                None => Some(estimate(&text)).filter(|h| *h > 0.0),
            };

            let id = doc.new_task_id();
            let category = normalize_text(category).unwrap_or_else(default_category);
            let mut task = Task::new(id.clone(), text, category, now);
            task.scheduled_time = normalize_text(time);
            task.hours = hours;
            doc.bucket_mut(day).push(task);

            refresh_summary(doc, day);
            session.save(doc)?;
            println!("Added {id} to {day}");
        }

        Commands::List { day, all } => {
            let day = session.day(day.as_deref())?;
            let view: Vec<&Task> = doc
                .bucket(day)
                .iter()
                .filter(|t| all || !t.done)
                .collect();
            print_day(day, &view, color);
        }

        Commands::View { id } => {
            let (day, task) = doc.task(&id)?;
            print_task_view(day, task, color);
        }

        Commands::Edit {
            id,
            text,
            category,
            time,
            hours,
            clear_time,
            clear_hours,
        } => {
            let (day, pos) = doc.locate_task(&id)?;
            let is_interactive = text.is_none()
                && category.is_none()
                && time.is_none()
                && hours.is_none()
                && !clear_time
                && !clear_hours;

            let hours = hours
                .map(|raw| {
                    parse_hours_input(&raw).ok_or_else(|| PlannerError::InvalidValue {
                        field: "hours".into(),
                        message: format!("'{raw}' is not a duration"),
                    })
                })
                .transpose()?;

            let task = &mut doc.bucket_mut(day)[pos];
            if is_interactive {
                edit_interactive(task);
            } else {
                if let Some(text) = normalize_text(text) {
                    task.text = text;
                }
                if let Some(category) = normalize_text(category) {
                    task.category = category;
                }
                if clear_time {
                    task.scheduled_time = None;
                } else if let Some(time) = normalize_text(time) {
                    task.scheduled_time = Some(time);
                }
                if clear_hours {
                    task.hours = None;
                } else if let Some(hours) = hours {
                    task.hours = Some(hours);
                }
            }
            let id = task.id.clone();

            refresh_summary(doc, day);
            session.save(doc)?;
            println!("Updated {id}");
        }

        Commands::Done { id } => {
            let (day, pos) = doc.locate_task(&id)?;
            let task = &mut doc.bucket_mut(day)[pos];
            task.mark_done(now);
            let id = task.id.clone();
            refresh_summary(doc, day);
            session.save(doc)?;
            println!("Done {id}");
        }

        Commands::Undone { id } => {
            let (day, pos) = doc.locate_task(&id)?;
            let task = &mut doc.bucket_mut(day)[pos];
            task.mark_undone();
            let id = task.id.clone();
            refresh_summary(doc, day);
            session.save(doc)?;
            println!("Undone {id}");
        }

        Commands::Toggle { id } => {
            let (day, pos) = doc.locate_task(&id)?;
            let task = &mut doc.bucket_mut(day)[pos];
            task.toggle(now);
            let id = task.id.clone();
            refresh_summary(doc, day);
            session.save(doc)?;
            println!("Toggled {id}");
        }

        Commands::Delete { id } => {
            let (day, task) = doc.remove_task(&id)?;
            refresh_summary(doc, day);
            session.save(doc)?;
            println!("Deleted {}", task.id);
        }

        Commands::Plan { command } => match command {
            PlanCommands::Show { day } => {
                let day = session.day(day.as_deref())?;
                let weekday = weekday_of(day);
                let plan = generate_plan(&doc.weekly, &doc.config, weekday);
                print_plan(day, &plan, doc.weekly.day(weekday), color);
            }
            PlanCommands::Apply { day } => {
                let day = session.day(day.as_deref())?;
                let weekday = weekday_of(day);
                let plan = generate_plan(&doc.weekly, &doc.config, weekday);
                let added = apply_plan(doc, day, &plan, now);
                let summary = refresh_summary(doc, day);
                session.save(doc)?;

                print_plan(day, &plan, doc.weekly.day(weekday), color);
                println!("\nAdded {added} task(s) to {day}\n");
                print_summary(&summary, &doc.config, color);
            }
        },

        Commands::Week {
            weekday,
            subjects,
            primary,
            suggest,
            clear,
        } => {
            let weekday = weekday.as_deref().map(parse_weekday).transpose()?;
            if let Some(weekday) = weekday {
                let template = doc.weekly.day_mut(weekday);
                let mut changed = false;
                if clear {
                    *template = DayTemplate::default();
                    changed = true;
                }
                if let Some(subjects) = subjects {
                    template.subjects = subjects.trim().to_string();
                    changed = true;
                }
                if let Some(primary) = primary {
                    template.primary = primary.trim().to_string();
                    changed = true;
                }
                if let Some(suggest) = suggest {
                    template.suggest = suggest.trim().to_string();
                    changed = true;
                }
                if changed {
                    session.save(doc)?;
                }
            }
            print_weekly(&doc.weekly, weekday, color);
        }

        Commands::Summary { day } => {
            let day = session.day(day.as_deref())?;
            let summary = refresh_summary(doc, day);
            session.save(doc)?;
            print_summary(&summary, &doc.config, color);
        }

        Commands::History { days } => {
            print_history(&doc.history, session.moment.day, days, color);
        }

        Commands::Stats => {
            let today = session.moment.day;
            let streak = completion_streak(doc, today, STREAK_LOOKBACK_DAYS);
            let stats = category_suggestions(doc, today, SUGGEST_WINDOW_DAYS);
            print_stats(streak, &stats, SUGGEST_WINDOW_DAYS, color);
        }

        Commands::Snapshot { command } => match command {
            SnapshotCommands::Save { name } => {
                let name = name.unwrap_or_else(|| prompt_input("Snapshot name: "));
                let id = save_snapshot(doc, &name, now)?;
                session.save(doc)?;
                println!("Saved snapshot {id}");
            }
            SnapshotCommands::List => {
                print_snapshots(&doc.saved_plans, color);
            }
            SnapshotCommands::Restore { id } => {
                restore_snapshot(doc, &id)?;
                reconcile_day(doc, session.moment.day, now);
                refresh_summary(doc, session.moment.day);
                session.save(doc)?;
                println!("Restored snapshot {id}");
            }
            SnapshotCommands::Delete { id } => {
                let removed = delete_snapshot(doc, &id)?;
                session.save(doc)?;
                println!("Deleted snapshot {} ({})", removed.id, removed.name);
            }
        },

        Commands::Export { format, day, out } => {
            let day = session.day(day.as_deref())?;
            let mut rendered = render_export(doc, day, format)?;
            if !rendered.ends_with('\n') {
                rendered.push('\n');
            }
            match out {
                Some(file) => {
                    std::fs::write(&file, rendered).map_err(|e| PlannerError::io(&file, e))?;
                    eprintln!("Exported to {file}");
                }
                None => print!("{rendered}"),
            }
        }

        Commands::Import { file } => {
            let imported = import_document(std::path::Path::new(&file), session.moment.day)?;
            *doc = imported;
            reconcile_day(doc, session.moment.day, now);
            refresh_summary(doc, session.moment.day);
            session.save(doc)?;
            let tasks: usize = doc.tasks_by_date.values().map(Vec::len).sum();
            println!(
                "Imported {} day(s), {tasks} task(s)",
                doc.tasks_by_date.len()
            );
        }

        Commands::Config {
            target,
            break_length,
            wake,
            sleep,
            school_start,
            school_end,
            school_enabled,
            mission,
        } => {
            let changed = update_config(
                &mut doc.config,
                ConfigUpdate {
                    target,
                    break_length,
                    wake,
                    sleep,
                    school_start,
                    school_end,
                    school_enabled,
                    mission,
                },
            )?;
            if changed {
                session.save(doc)?;
            }
            print_config(&doc.config);
        }
    }

    Ok(())
}

struct ConfigUpdate {
    target: Option<f64>,
    break_length: Option<f64>,
    wake: Option<String>,
    sleep: Option<String>,
    school_start: Option<String>,
    school_end: Option<String>,
    school_enabled: Option<bool>,
    mission: Option<String>,
}

fn non_negative(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PlannerError::InvalidValue {
            field: field.to_string(),
            message: "must be a non-negative number".to_string(),
        })
    }
}

/// Applies the given settings; an empty string clears an optional text field.
fn update_config(config: &mut PlannerConfig, update: ConfigUpdate) -> Result<bool> {
    let mut changed = false;
    if let Some(target) = update.target {
        config.study_target_hours = non_negative("target", target)?;
        changed = true;
    }
    if let Some(len) = update.break_length {
        let len = non_negative("break-length", len)?;
        config.break_length_hours = if len > 0.0 { Some(len) } else { None };
        changed = true;
    }
    for (slot, value) in [
        (&mut config.wake_time, update.wake),
        (&mut config.sleep_time, update.sleep),
        (&mut config.school_start, update.school_start),
        (&mut config.school_end, update.school_end),
        (&mut config.mission, update.mission),
    ] {
        if let Some(value) = value {
            *slot = normalize_text(Some(value));
            changed = true;
        }
    }
    if let Some(enabled) = update.school_enabled {
        config.school_enabled = enabled;
        changed = true;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_update() -> ConfigUpdate {
        ConfigUpdate {
            target: None,
            break_length: None,
            wake: None,
            sleep: None,
            school_start: None,
            school_end: None,
            school_enabled: None,
            mission: None,
        }
    }

    #[test]
    fn test_update_config_sets_and_clears_fields() {
        let mut config = PlannerConfig::default();
        assert!(!update_config(&mut config, empty_update()).unwrap());

        let changed = update_config(
            &mut config,
            ConfigUpdate {
                target: Some(6.0),
                break_length: Some(0.25),
                mission: Some("Boards".into()),
                school_enabled: Some(true),
                ..empty_update()
            },
        )
        .unwrap();
        assert!(changed);
        assert_eq!(config.study_target_hours, 6.0);
        assert_eq!(config.break_length_hours, Some(0.25));
        assert_eq!(config.mission.as_deref(), Some("Boards"));
        assert!(config.school_enabled);

        update_config(
            &mut config,
            ConfigUpdate {
                mission: Some("  ".into()),
                break_length: Some(0.0),
                ..empty_update()
            },
        )
        .unwrap();
        assert_eq!(config.mission, None);
        assert_eq!(config.break_length_hours, None);
    }

    #[test]
    fn test_update_config_rejects_negative_target() {
        let mut config = PlannerConfig::default();
        let result = update_config(
            &mut config,
            ConfigUpdate {
                target: Some(-1.0),
                ..empty_update()
            },
        );
        assert!(matches!(result, Err(PlannerError::InvalidValue { .. })));
        assert_eq!(config.study_target_hours, 4.0);
    }

    #[test]
    fn test_start_day_refreshes_history_for_carried_tasks() {
        use chrono::{NaiveDate, TimeZone, Utc};

        let yesterday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 6, 0, 0).unwrap();

        let mut doc = Document::new(yesterday);
        let mut task = Task::new(doc.new_task_id(), "Algebra drill".into(), "Math".into(), now);
        task.hours = Some(2.0);
        doc.bucket_mut(yesterday).push(task);
        doc.history.insert(today, 4.0);

        let report = start_day(&mut doc, today, now);
        assert_eq!(report.carried, 1);
        assert_eq!(doc.history.get(&today), Some(&2.0));

        // A second start on the same day carries nothing and keeps history.
        doc.history.insert(today, 9.0);
        assert!(!start_day(&mut doc, today, now).changed);
        assert_eq!(doc.history.get(&today), Some(&9.0));
    }
}
