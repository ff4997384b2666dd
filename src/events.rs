//! Append-only event log.
//!
//! Every unit outcome of a run (and a few administrative actions) is appended
//! as one JSON object per line to `.tintforge/events/events.ndjson`. The log
//! is a record for humans and scripts; the pipeline never reads it back.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `init`, `ideate`, `style`, `variant` or `lock_clear`
//! - `actor`: `user@HOST`
//! - `task`, `scheme`: present when the event concerns one
//! - `details`: outcome, artifact path, error message

use crate::context::ProjectContext;
use crate::error::{ForgeError, Result};
use crate::locks::owner_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Project initialized
    Init,
    /// Stage 0 unit
    Ideate,
    /// Stage 1 unit
    Style,
    /// Stage 2 unit
    Variant,
    /// Claim cleared manually
    LockClear,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Init => "init",
            EventAction::Ideate => "ideate",
            EventAction::Style => "style",
            EventAction::Variant => "variant",
            EventAction::LockClear => "lock_clear",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    pub actor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    pub details: Value,
}

impl Event {
    /// New event stamped now, attributed to the current user and host.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: owner_string(),
            task: None,
            scheme: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task = Some(task_id.into());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Single-line JSON for the NDJSON log.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForgeError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append an event to the log, creating the file and directory as needed.
pub fn append_event(ctx: &ProjectContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    let events_dir = ctx.events_dir();
    if !events_dir.exists() {
        fs::create_dir_all(&events_dir).map_err(|e| {
            ForgeError::UserError(format!(
                "failed to create events directory '{}': {}",
                events_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            ForgeError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        ForgeError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Append an event, downgrading any failure to a warning.
///
/// Losing a log line must never cost a generated artifact.
pub fn record_event(ctx: &ProjectContext, event: &Event) {
    if let Err(e) = append_event(ctx, event) {
        eprintln!("Warning: failed to record {} event: {}", event.action, e);
    }
}

#[cfg(test)]
pub(crate) fn read_events(ctx: &ProjectContext) -> Vec<Event> {
    fs::read_to_string(ctx.events_file())
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_project() -> (TempDir, ProjectContext) {
        let temp_dir = TempDir::new().unwrap();
        let ctx = ProjectContext::new(temp_dir.path(), &Config::default());
        (temp_dir, ctx)
    }

    #[test]
    fn test_event_builder() {
        let event = Event::new(EventAction::Style)
            .with_task("forest/owl")
            .with_scheme("Dusk")
            .with_details(json!({"outcome": "completed"}));

        assert_eq!(event.action, EventAction::Style);
        assert!(event.actor.contains('@'));
        assert_eq!(event.task.as_deref(), Some("forest/owl"));
        assert_eq!(event.scheme.as_deref(), Some("Dusk"));
        assert_eq!(event.details["outcome"], "completed");
    }

    #[test]
    fn test_ndjson_line_is_single_line() {
        let event = Event::new(EventAction::Ideate)
            .with_task("owl")
            .with_details(json!({"error": "line one\nline two"}));
        let line = event.to_ndjson_line().unwrap();

        assert!(!line.contains('\n'));
        assert!(line.contains("\"action\":\"ideate\""));
        assert!(!line.contains("\"scheme\""));
    }

    #[test]
    fn test_append_creates_file_and_appends() {
        let (_temp_dir, ctx) = create_test_project();

        append_event(&ctx, &Event::new(EventAction::Init)).unwrap();
        append_event(
            &ctx,
            &Event::new(EventAction::Variant).with_task("owl").with_scheme("Dusk"),
        )
        .unwrap();

        let events = read_events(&ctx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, EventAction::Init);
        assert_eq!(events[1].action, EventAction::Variant);
        assert_eq!(events[1].scheme.as_deref(), Some("Dusk"));
    }

    #[test]
    fn test_record_event_swallows_failures() {
        let (temp_dir, ctx) = create_test_project();
        // A file where the state directory should be makes the append fail.
        std::fs::write(temp_dir.path().join(".tintforge"), "").unwrap();

        record_event(&ctx, &Event::new(EventAction::Init));
        assert!(append_event(&ctx, &Event::new(EventAction::Init)).is_err());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(EventAction::LockClear.to_string(), "lock_clear");
        assert_eq!(
            serde_json::to_string(&EventAction::LockClear).unwrap(),
            "\"lock_clear\""
        );
    }
}
