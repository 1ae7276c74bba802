//! End-to-end flow over the library API against a temporary document.

use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use tempfile::TempDir;

use studyplan::app::start_day;
use studyplan::clock::{Moment, weekday_of};
use studyplan::model::{DayTemplate, Document, Task};
use studyplan::plan::{apply_plan, generate_plan};
use studyplan::snapshot::{restore_snapshot, save_snapshot};
use studyplan::storage::{export_document, import_document, load_document, save_document};
use studyplan::summary::refresh_summary;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn at(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, d, h, 0, 0).unwrap()
}

/// Mirrors a CLI start: load, repair, roll over, persist.
fn start_session(path: &std::path::Path, moment: Moment) -> Document {
    let mut doc = load_document(path, moment.day);
    if start_day(&mut doc, moment.day, moment.instant).changed {
        save_document(path, &doc).unwrap();
    }
    doc
}

#[test]
fn test_plan_rollover_and_summary_across_two_days() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("planner.json");

    // Day one (Saturday 2026-10-17): configure and apply a plan.
    let moment = Moment::fixed(day(17), at(17, 7));
    let mut doc = start_session(&path, moment);
    assert_eq!(weekday_of(day(17)), Weekday::Sat);
    doc.config.study_target_hours = 5.0;
    *doc.weekly.day_mut(Weekday::Sat) = DayTemplate {
        primary: "10 pages biology / 20 questions algebra / read novel".into(),
        ..DayTemplate::default()
    };

    let plan = generate_plan(&doc.weekly, &doc.config, Weekday::Sat);
    let durations: Vec<f64> = plan.tasks.iter().map(|t| t.duration_hours).collect();
    assert_eq!(durations, vec![2.0, 2.0, 1.0]);
    assert_eq!(apply_plan(&mut doc, day(17), &plan, moment.instant), 3);

    let summary = refresh_summary(&mut doc, day(17));
    assert_eq!(summary.total, 5.0);
    assert_eq!(summary.breaks, 10);

    doc.bucket_mut(day(17))[0].mark_done(at(17, 10));
    refresh_summary(&mut doc, day(17));
    save_document(&path, &doc).unwrap();

    // Day two: the two open tasks roll over, the done one stays behind.
    let moment = Moment::fixed(day(18), at(18, 6));
    let mut doc = start_session(&path, moment);
    assert_eq!(doc.last_seen_day, Some(day(18)));
    assert_eq!(doc.history.get(&day(18)), Some(&3.0));
    let carried: Vec<&Task> = doc.bucket(day(18)).iter().collect();
    assert_eq!(carried.len(), 2);
    assert!(carried.iter().all(|t| !t.done && t.completed_at.is_none()));
    assert_eq!(carried[0].text, "20 questions algebra");
    assert_eq!(carried[0].category, "Math");
    assert_eq!(carried[0].hours, Some(2.0));
    assert_eq!(doc.bucket(day(17)).len(), 3);

    let summary = refresh_summary(&mut doc, day(18));
    assert_eq!(summary.total, 3.0);
    assert_eq!(summary.previous_day_hours, 5.0);
    assert_eq!(summary.trailing_7_day_average, 5.0);

    // A second start on the same day changes nothing.
    save_document(&path, &doc).unwrap();
    let again = start_session(&path, moment);
    assert_eq!(again, doc);
}

#[test]
fn test_export_import_round_trip_and_snapshot_restore() {
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("export.json");

    let mut doc = Document::new(day(18));
    doc.config.mission = Some("Finals".into());
    doc.weekly.day_mut(Weekday::Sun).subjects = "Math,Science".into();
    let plan = generate_plan(&doc.weekly, &doc.config, Weekday::Sun);
    apply_plan(&mut doc, day(18), &plan, at(18, 8));
    refresh_summary(&mut doc, day(18));
    let snapshot_id = save_snapshot(&mut doc, "Sunday baseline", at(18, 9)).unwrap();

    std::fs::write(&export_path, export_document(&doc).unwrap()).unwrap();
    let mut imported = import_document(&export_path, day(18)).unwrap();
    assert_eq!(imported, doc);

    // History is a derived cache: recomputing it leaves the document equal.
    refresh_summary(&mut imported, day(18));
    assert_eq!(imported, doc);

    imported.bucket_mut(day(18)).clear();
    restore_snapshot(&mut imported, &snapshot_id).unwrap();
    assert_eq!(imported.bucket(day(18)).len(), 2);
    assert_eq!(imported.saved_plans.len(), 1);
}

#[test]
fn test_browser_export_with_legacy_keys_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("planner.json");
    std::fs::write(
        &path,
        r#"{
            "lastLocalDate": "2026-10-16",
            "tasksByDate": {
                "2026-10-16": [
                    {"id": "t_lx1", "text": "Revise chapter 2", "category": "science",
                     "time": "18:00", "done": false, "createdAt": 1760600000000}
                ]
            },
            "meta": {}
        }"#,
    )
    .unwrap();

    let moment = Moment::fixed(day(18), at(18, 6));
    let doc = start_session(&path, moment);
    let today = doc.bucket(day(18));
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].text, "Revise chapter 2");
    assert_eq!(today[0].scheduled_time.as_deref(), Some("18:00"));
    assert_ne!(today[0].id, "t_lx1");
    // Carried without hours, so the day's cached total falls back to target.
    assert_eq!(doc.history.get(&day(18)), Some(&4.0));
    assert_eq!(doc.config.study_target_hours, 4.0);
}
