use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;

/// What happened before a notification is sent. Only the timestamp is
/// guaranteed; everything else is filled in when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_millis"
    )]
    pub duration_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// Accepts whole or fractional milliseconds, rounded to the nearest one.
fn deserialize_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(millis) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !millis.is_finite() || millis < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "durationMs must be a non-negative number, got {}",
            millis
        )));
    }
    Ok(Some(millis.round() as u64))
}

impl TriggerEvent {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            command: None,
            exit_code: None,
            duration_ms: None,
            timestamp,
            working_directory: None,
            user: None,
            repository: None,
            branch: None,
            commit: None,
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    /// `None` when no exit code was recorded.
    pub fn succeeded(&self) -> Option<bool> {
        self.exit_code.map(|code| code == 0)
    }

    /// Last component of the working directory, e.g. `api` for `/srv/api`.
    pub fn project_name(&self) -> Option<&str> {
        let dir = self.working_directory.as_deref()?;
        Path::new(dir)
            .file_name()
            .and_then(|name| name.to_str())
            .or(Some(dir).filter(|d| !d.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_minimal_event_has_only_timestamp() {
        let event: TriggerEvent =
            serde_json::from_str(r#"{"timestamp": "2025-08-01T09:30:00Z"}"#).unwrap();

        assert_eq!(event, TriggerEvent::new(fixed_time()));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"timestamp": "2025-08-01T09:30:00Z"})
        );
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        let result: std::result::Result<TriggerEvent, _> =
            serde_json::from_str(r#"{"command": "cargo test"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_camel_case_fields() {
        let event = TriggerEvent::new(fixed_time())
            .with_command("cargo test")
            .with_exit_code(101)
            .with_duration(Duration::from_millis(12_500))
            .with_working_directory("/home/dev/cc-hook")
            .with_branch("main");
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["exitCode"], 101);
        assert_eq!(value["durationMs"], 12_500);
        assert_eq!(value["workingDirectory"], "/home/dev/cc-hook");
        assert!(value.get("commit").is_none());
    }

    #[test]
    fn test_fractional_duration_is_rounded() {
        let event: TriggerEvent = serde_json::from_str(
            r#"{"timestamp": "2025-08-01T09:30:00Z", "durationMs": 1500.5, "exitCode": 0}"#,
        )
        .unwrap();
        assert_eq!(event.duration_ms, Some(1501));
        assert_eq!(event.duration(), Some(Duration::from_millis(1501)));

        let whole: TriggerEvent =
            serde_json::from_str(r#"{"timestamp": "2025-08-01T09:30:00Z", "durationMs": 12123}"#)
                .unwrap();
        assert_eq!(whole.duration_ms, Some(12_123));

        let negative: std::result::Result<TriggerEvent, _> =
            serde_json::from_str(r#"{"timestamp": "2025-08-01T09:30:00Z", "durationMs": -1}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn test_with_duration_keeps_milliseconds() {
        let event = TriggerEvent::new(fixed_time()).with_duration(Duration::from_millis(12_123));
        assert_eq!(event.duration_ms, Some(12_123));
    }

    #[test]
    fn test_derived_accessors() {
        let event = TriggerEvent::new(fixed_time())
            .with_exit_code(0)
            .with_duration(Duration::from_secs(3))
            .with_working_directory("/home/dev/cc-hook");

        assert_eq!(event.succeeded(), Some(true));
        assert_eq!(event.duration(), Some(Duration::from_secs(3)));
        assert_eq!(event.project_name(), Some("cc-hook"));

        let bare = TriggerEvent::new(fixed_time());
        assert_eq!(bare.succeeded(), None);
        assert_eq!(bare.project_name(), None);
    }

    #[test]
    fn test_project_name_without_separator() {
        let event = TriggerEvent::new(fixed_time()).with_working_directory("scratch");
        assert_eq!(event.project_name(), Some("scratch"));

        let root = TriggerEvent::new(fixed_time()).with_working_directory("/");
        assert_eq!(root.project_name(), Some("/"));
    }
}
