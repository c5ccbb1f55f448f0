//! Settings-driven debug file logger.
//!
//! Writes one JSON file per entry into a log directory, gated on the debug
//! settings: nothing is written unless `debug.enabled` and
//! `debug.log_to_file` are on and the entry's level passes
//! `debug.log_level`. Old files are pruned so at most
//! `debug.max_log_files` remain.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::StoreResult;
use crate::settings::{DebugSettings, LogLevel};

/// File logger configured from the debug settings category.
#[derive(Debug, Clone)]
pub struct DebugLog {
    dir: PathBuf,
    enabled: bool,
    level: LogLevel,
    max_files: usize,
}

impl DebugLog {
    /// Build a logger writing into `dir`, gated by the given settings.
    pub fn new<P: Into<PathBuf>>(dir: P, settings: &DebugSettings) -> Self {
        Self {
            dir: dir.into(),
            enabled: settings.enabled && settings.log_to_file,
            level: settings.log_level,
            max_files: settings.max_log_files as usize,
        }
    }

    /// Whether an entry at `level` would be written at all.
    pub fn would_log(&self, level: LogLevel) -> bool {
        self.enabled && level <= self.level
    }

    /// Write one entry; returns the path of the created file, or `None`
    /// when the entry was filtered out.
    ///
    /// `name` becomes the file-name prefix and is sanitized to
    /// `[A-Za-z0-9._-]`.
    pub fn write(&self, name: &str, level: LogLevel, data: &Value) -> StoreResult<Option<PathBuf>> {
        if !self.would_log(level) {
            return Ok(None);
        }

        fs::create_dir_all(&self.dir)?;

        let entry = json!({
            "date": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            "level": level.to_string(),
            "type": value_type(data),
            "data": data,
        });

        let file_name = format!("{}-{}.json", sanitize(name), Utc::now().timestamp_millis());
        let path = self.dir.join(file_name);
        fs::write(&path, serde_json::to_string_pretty(&entry)?)?;
        debug!(path = %path.display(), "wrote debug log entry");

        self.prune()?;
        Ok(Some(path))
    }

    /// Remove the oldest `.json` files beyond the retention cap.
    fn prune(&self) -> StoreResult<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();

        if files.len() <= self.max_files {
            return Ok(());
        }

        // Timestamped names sort oldest-first lexicographically per prefix;
        // fall back to mtime ordering across prefixes.
        files.sort_by_key(|path| {
            fs::metadata(path)
                .and_then(|meta| meta.modified())
                .ok()
                .map(|modified| (modified, path.clone()))
        });

        let excess = files.len() - self.max_files;
        for path in files.into_iter().take(excess) {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "log".to_string()
    } else {
        cleaned
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn settings(enabled: bool, level: LogLevel) -> DebugSettings {
        DebugSettings {
            enabled,
            log_level: level,
            max_log_files: 3,
            ..Default::default()
        }
    }

    #[test]
    fn disabled_logger_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let log = DebugLog::new(dir.path(), &settings(false, LogLevel::Debug));
        let written = log.write("event", LogLevel::Error, &json!("x")).unwrap();
        assert!(written.is_none());
        assert!(!dir.path().exists() || fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn entries_below_threshold_are_dropped() {
        let dir = TempDir::new().unwrap();
        let log = DebugLog::new(dir.path(), &settings(true, LogLevel::Warning));
        assert!(log.would_log(LogLevel::Error));
        assert!(log.would_log(LogLevel::Warning));
        assert!(!log.would_log(LogLevel::Info));
        assert!(!log.would_log(LogLevel::Debug));

        assert!(log.write("event", LogLevel::Info, &json!(1)).unwrap().is_none());
        assert!(log.write("event", LogLevel::Error, &json!(1)).unwrap().is_some());
    }

    #[test]
    fn entry_files_contain_date_level_type_and_data() {
        let dir = TempDir::new().unwrap();
        let log = DebugLog::new(dir.path(), &settings(true, LogLevel::Debug));
        let path = log
            .write("rate-limit", LogLevel::Warning, &json!({"hits": 101}))
            .unwrap()
            .unwrap();

        let entry: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entry["level"], json!("warning"));
        assert_eq!(entry["type"], json!("object"));
        assert_eq!(entry["data"], json!({"hits": 101}));
        assert!(entry["date"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn file_names_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let log = DebugLog::new(dir.path(), &settings(true, LogLevel::Debug));
        let path = log
            .write("../evil name", LogLevel::Error, &json!(null))
            .unwrap()
            .unwrap();
        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with("..-evil-name-"));
        assert_eq!(path.parent().unwrap(), dir.path());
    }

    #[test]
    fn prune_keeps_at_most_max_files() {
        let dir = TempDir::new().unwrap();
        let log = DebugLog::new(dir.path(), &settings(true, LogLevel::Debug));
        for i in 0..6 {
            log.write(&format!("e{i}"), LogLevel::Error, &json!(i)).unwrap();
        }
        let count = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 3);
    }
}
