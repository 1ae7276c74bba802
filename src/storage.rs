use chrono::NaiveDate;
use dirs::data_local_dir;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::error::{PlannerError, Result};
use crate::model::Document;

pub const HOME_ENV: &str = "STUDYPLAN_HOME";
const DOCUMENT_FILE: &str = "planner.json";

fn base_dir() -> Result<PathBuf> {
    let base = match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            // ~/.local/share/studyplan or the platform equivalent
            let mut base = data_local_dir().ok_or(PlannerError::DataDir)?;
            base.push("studyplan");
            base
        }
    };
    fs::create_dir_all(&base).map_err(|e| PlannerError::io(&base, e))?;
    Ok(base)
}

pub fn document_path() -> Result<PathBuf> {
    let mut base = base_dir()?;
    base.push(DOCUMENT_FILE);
    Ok(base)
}

/// Loads and repairs the document at `path`. A missing or unreadable file
/// yields a fresh default document; this never fails.
pub fn load_document(path: &Path, today: NaiveDate) -> Document {
    let Ok(bytes) = fs::read(path) else {
        debug!(path = %path.display(), "no stored document, starting fresh");
        return Document::new(today);
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(raw) => repair(raw, today),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "stored document is not valid JSON, resetting");
            Document::new(today)
        }
    }
}

pub fn save_document(path: &Path, doc: &Document) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(doc)?;
    fs::write(path, bytes).map_err(|e| PlannerError::io(path, e))?;
    debug!(path = %path.display(), "document saved");
    Ok(())
}

/// Reads a whole-document export. Unlike [`load_document`] a file that is
/// not JSON at all is rejected so a bad import never wipes the live state.
pub fn import_document(path: &Path, today: NaiveDate) -> Result<Document> {
    let bytes = fs::read(path).map_err(|e| PlannerError::io(path, e))?;
    let raw: Value = serde_json::from_slice(&bytes)?;
    info!(path = %path.display(), "importing document");
    Ok(repair(raw, today))
}

pub fn export_document(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Shape repair applied at the load boundary. Each known top-level key is
/// taken from `raw` when it deserializes, otherwise its default is used.
/// Pure and total: any JSON value produces a valid document.
pub fn repair(raw: Value, today: NaiveDate) -> Document {
    let Value::Object(mut map) = raw else {
        warn!("document root is not an object, using defaults");
        return Document::new(today);
    };

    let defaults = Document::default();
    Document {
        last_seen_day: Some(
            take(&mut map, &["lastSeenDay", "lastLocalDate"]).unwrap_or(today),
        ),
        config: take(&mut map, &["config"]).unwrap_or(defaults.config),
        weekly: take(&mut map, &["weekly"]).unwrap_or(defaults.weekly),
        tasks_by_date: take(&mut map, &["tasksByDate"]).unwrap_or(defaults.tasks_by_date),
        history: take(&mut map, &["history"]).unwrap_or(defaults.history),
        saved_plans: take(&mut map, &["savedPlans"]).unwrap_or(defaults.saved_plans),
    }
}

fn take<T: DeserializeOwned>(map: &mut Map<String, Value>, keys: &[&str]) -> Option<T> {
    let (key, value) = keys
        .iter()
        .find_map(|key| map.remove(*key).map(|value| (*key, value)))?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(key, error = %e, "malformed document section replaced with default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, default_category};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_repair_non_object_gives_defaults() {
        let doc = repair(json!([1, 2, 3]), day(18));
        assert_eq!(doc, Document::new(day(18)));
        let doc = repair(json!("text"), day(18));
        assert_eq!(doc.last_seen_day, Some(day(18)));
    }

    #[test]
    fn test_repair_fills_missing_keys_and_keeps_present_ones() {
        let raw = json!({
            "lastLocalDate": "2026-10-15",
            "tasksByDate": {
                "2026-10-15": [
                    {"id": "t_1", "text": "Essay", "category": "english", "done": false, "createdAt": 1}
                ]
            }
        });
        let doc = repair(raw, day(18));
        assert_eq!(doc.last_seen_day, Some(day(15)));
        assert_eq!(doc.bucket(day(15)).len(), 1);
        assert_eq!(doc.config.study_target_hours, 4.0);
        assert!(doc.history.is_empty());
        assert!(doc.saved_plans.is_empty());
    }

    #[test]
    fn test_repair_defaults_malformed_section_only() {
        let raw = json!({
            "lastSeenDay": "2026-10-17",
            "history": "not a map",
            "config": {"studyTargetHours": 6}
        });
        let doc = repair(raw, day(18));
        assert!(doc.history.is_empty());
        assert_eq!(doc.config.study_target_hours, 6.0);
        assert_eq!(doc.last_seen_day, Some(day(17)));
    }

    #[test]
    fn test_load_missing_and_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("planner.json");

        let doc = load_document(&path, day(18));
        assert_eq!(doc, Document::new(day(18)));

        fs::write(&path, b"{ not json").unwrap();
        let doc = load_document(&path, day(18));
        assert_eq!(doc, Document::new(day(18)));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("planner.json");

        let mut doc = Document::new(day(18));
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 7, 30, 0).unwrap();
        let mut task = Task::new("t_1".into(), "10 pages".into(), default_category(), now);
        task.hours = Some(2.0);
        doc.bucket_mut(day(18)).push(task);
        doc.history.insert(day(17), 3.5);
        doc.config.mission = Some("Boards".into());

        save_document(&path, &doc).unwrap();
        let loaded = load_document(&path, day(20));
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_oversized_number_in_task_text_keeps_history() {
        use crate::estimate::estimate;
        use crate::summary::refresh_summary;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("planner.json");
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 7, 30, 0).unwrap();

        let mut doc = Document::new(day(18));
        doc.history.insert(day(10), 3.0);
        doc.history.insert(day(11), 2.0);
        let text = format!("{} hours", "9".repeat(400));
        let mut task = Task::new("t_1".into(), text.clone(), default_category(), now);
        task.hours = Some(estimate(&text));
        doc.bucket_mut(day(18)).push(task);

        let summary = refresh_summary(&mut doc, day(18));
        assert!(summary.total.is_finite());
        assert_eq!(summary.total, 4.0);
        assert_eq!(summary.breaks, 8);

        save_document(&path, &doc).unwrap();
        let loaded = load_document(&path, day(18));
        assert_eq!(loaded.history.len(), 3);
        assert_eq!(loaded.history.get(&day(10)), Some(&3.0));
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_import_rejects_non_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, b"hello").unwrap();
        assert!(matches!(
            import_document(&path, day(18)),
            Err(PlannerError::Json(_))
        ));
        assert!(matches!(
            import_document(&dir.path().join("missing.json"), day(18)),
            Err(PlannerError::Io { .. })
        ));
    }
}
