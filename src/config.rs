use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use anyhow::Context;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_latency_ms: u64,
    pub upload_latency_ms: u64,
    pub seed_students: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_latency_ms: 800,
            upload_latency_ms: 1000,
            seed_students: true,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn catalog_latency(&self) -> Duration {
        Duration::from_millis(self.catalog_latency_ms)
    }

    pub fn upload_latency(&self) -> Duration {
        Duration::from_millis(self.upload_latency_ms)
    }
}

fn config_path() -> PathBuf {
    std::env::var("ROSTERD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("rosterd.toml"))
}

/// Defaults, then the flat TOML file (if any), then environment variables.
/// Bad values are reported and skipped rather than aborting startup; this
/// runs before the subscriber exists, so problems are returned as notes.
pub fn load_settings() -> (Settings, Vec<String>) {
    let mut settings = Settings::default();
    let mut notes = Vec::new();

    let path = config_path();
    if let Ok(raw) = fs::read_to_string(&path) {
        match parse_file(&raw) {
            Ok(file_cfg) => apply(&mut settings, &file_cfg, &mut notes),
            Err(e) => notes.push(format!("ignoring {}: {e:#}", path.to_string_lossy())),
        }
    }

    let mut env_cfg = HashMap::new();
    for (key, var) in [
        ("catalog_latency_ms", "ROSTERD_CATALOG_LATENCY_MS"),
        ("upload_latency_ms", "ROSTERD_UPLOAD_LATENCY_MS"),
        ("seed_students", "ROSTERD_SEED_STUDENTS"),
    ] {
        if let Ok(v) = std::env::var(var) {
            env_cfg.insert(key.to_string(), v);
        }
    }
    if let Ok(v) = std::env::var("ROSTERD_LOG").or_else(|_| std::env::var("RUST_LOG")) {
        env_cfg.insert("log_filter".to_string(), v);
    }
    apply(&mut settings, &env_cfg, &mut notes);

    (settings, notes)
}

fn parse_file(raw: &str) -> anyhow::Result<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(raw).context("invalid TOML")?;
    Ok(table
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            (k, v)
        })
        .collect())
}

fn apply(settings: &mut Settings, cfg: &HashMap<String, String>, notes: &mut Vec<String>) {
    if let Some(v) = cfg.get("catalog_latency_ms") {
        match v.trim().parse() {
            Ok(ms) => settings.catalog_latency_ms = ms,
            Err(_) => notes.push(format!("catalog_latency_ms: not a number: {v}")),
        }
    }
    if let Some(v) = cfg.get("upload_latency_ms") {
        match v.trim().parse() {
            Ok(ms) => settings.upload_latency_ms = ms,
            Err(_) => notes.push(format!("upload_latency_ms: not a number: {v}")),
        }
    }
    if let Some(v) = cfg.get("seed_students") {
        match parse_bool(v) {
            Some(b) => settings.seed_students = b,
            None => notes.push(format!("seed_students: not a boolean: {v}")),
        }
    }
    if let Some(v) = cfg.get("log_filter") {
        if !v.trim().is_empty() {
            settings.log_filter = v.trim().to_string();
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Subscriber filter for `log_filter`. A directive string that does not
/// parse falls back to `info` and leaves a note explaining why.
pub fn env_filter(settings: &Settings, notes: &mut Vec<String>) -> EnvFilter {
    match EnvFilter::try_new(&settings.log_filter) {
        Ok(filter) => filter,
        Err(e) => {
            notes.push(format!(
                "log_filter: invalid directives {:?} ({e}), using \"info\"",
                settings.log_filter
            ));
            EnvFilter::new("info")
        }
    }
}

pub fn report_notes(notes: &[String]) {
    for note in notes {
        warn!(%note, "settings");
    }
}
