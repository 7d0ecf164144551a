use crate::core::transcript::{SummaryLimits, Transcript, TranscriptSummary};
use crate::domain::TriggerEvent;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// JSON that Claude Code writes to a Stop hook's stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopHookInput {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_event_name: Option<String>,
    /// Set when Claude Code is already continuing because of a stop hook.
    #[serde(default)]
    pub stop_hook_active: bool,
}

impl StopHookInput {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Summary of the session transcript, if one was passed and can be read.
    pub fn transcript_summary(&self, limits: &SummaryLimits) -> Option<TranscriptSummary> {
        let path = self.transcript_path.as_deref().filter(|p| !p.is_empty())?;
        if !Path::new(path).is_file() {
            tracing::warn!("Transcript {} does not exist, skipping summary", path);
            return None;
        }

        match Transcript::from_file(path) {
            Ok(transcript) => {
                if transcript.skipped_lines() > 0 {
                    tracing::debug!(
                        "Skipped {} unparsable lines in {}",
                        transcript.skipped_lines(),
                        path
                    );
                }
                Some(transcript.summarize(limits))
            }
            Err(e) => {
                tracing::warn!("{}; continuing without transcript details", e);
                None
            }
        }
    }

    /// Best-effort event: transcript problems leave the derived fields empty.
    pub fn trigger_event(&self, now: DateTime<Utc>) -> TriggerEvent {
        let mut event = TriggerEvent::new(now);
        if let Some(cwd) = self.cwd.as_deref().filter(|c| !c.is_empty()) {
            event = event.with_working_directory(cwd);
        }

        if let Some(summary) = self.transcript_summary(&SummaryLimits::default()) {
            if let Some(prompt) = summary.last_prompt {
                event = event.with_command(prompt);
            }
            if let Some(duration) = summary.duration {
                event = event.with_duration(duration);
            }
        }

        event
    }
}
