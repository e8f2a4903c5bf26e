use std::io::Write;
use std::path::PathBuf;

/// Append-only JSON-lines record of mutating API calls.
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    pub fn open_default() -> Self {
        let path = std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config/csops/audit.jsonl"));
        Self { path }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Best effort: a failed audit write never fails the caller.
    pub fn record(&self, action: &str, data: serde_json::Value) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let event = serde_json::json!({
            "ts": unix_now(),
            "action": action,
            "data": data
        });
        let line = format!("{}\n", event);
        let written = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| f.write_all(line.as_bytes()));
        if let Err(e) = written {
            tracing::debug!(path = %path.display(), error = %e, "audit write failed");
        }
    }
}

fn unix_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    ts.to_string()
}
