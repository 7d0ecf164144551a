//! Reads a Claude Code session transcript (one JSON object per line) and
//! pulls out what a notification can report: the last user prompt, the most
//! recent tool output and how long the session ran.

use crate::utils::error::{HookError, Result};
use crate::utils::text::truncate_chars;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

/// Numeric timestamps above this are milliseconds since the epoch.
const MILLIS_THRESHOLD: f64 = 10_000_000_000.0;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryMessage {
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub message: Option<EntryMessage>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_output: Option<Value>,
}

impl TranscriptEntry {
    /// Plain text of the entry, from `content` or `message.content`.
    pub fn text(&self) -> Option<String> {
        let content = self
            .content
            .as_ref()
            .or_else(|| self.message.as_ref().and_then(|m| m.content.as_ref()))?;
        text_of(content).filter(|text| !text.trim().is_empty())
    }

    pub fn tool_output_text(&self) -> Option<String> {
        let output = match self.tool_output.as_ref()? {
            Value::String(output) => Some(output.clone()),
            Value::Object(map) => map.get("output").and_then(Value::as_str).map(str::to_string),
            _ => None,
        };
        output.filter(|output| !output.is_empty())
    }

    /// Milliseconds since the epoch.
    pub fn timestamp_millis(&self) -> Option<i64> {
        match self.timestamp.as_ref()? {
            Value::String(raw) => parse_timestamp_str(raw),
            Value::Number(n) => n
                .as_i64()
                .map(normalize_epoch_millis)
                .or_else(|| n.as_f64().and_then(float_epoch_millis)),
            _ => None,
        }
    }
}

/// Integer epochs at or below the threshold are seconds.
fn normalize_epoch_millis(value: i64) -> i64 {
    if value as f64 > MILLIS_THRESHOLD {
        value
    } else {
        value.saturating_mul(1000)
    }
}

fn float_epoch_millis(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value > MILLIS_THRESHOLD { value } else { value * 1000.0 };
    Some(millis.round() as i64)
}

fn parse_timestamp_str(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .map(normalize_epoch_millis)
        .or_else(|| raw.parse::<f64>().ok().and_then(float_epoch_millis))
}

fn text_of(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(blocks) => {
            let parts: Vec<&str> = blocks
                .iter()
                .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("\n"))
            }
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub prompt_chars: usize,
    pub tool_output_chars: usize,
    pub tool_count: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            prompt_chars: 300,
            tool_output_chars: 200,
            tool_count: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptSummary {
    pub last_prompt: Option<String>,
    /// Newest first, formatted as `[tool] output`.
    pub tool_summaries: Vec<String>,
    pub duration: Option<Duration>,
}

impl TranscriptSummary {
    pub fn response_summary(&self) -> Option<String> {
        if self.tool_summaries.is_empty() {
            None
        } else {
            Some(self.tool_summaries.join("\n"))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    skipped_lines: usize,
}

impl Transcript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| HookError::TranscriptError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut transcript = Transcript::default();
        for (idx, raw) in reader.split(b'\n').enumerate() {
            let mut raw = raw?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            match String::from_utf8(raw) {
                Ok(line) => transcript.push_line(idx + 1, &line),
                Err(e) => {
                    tracing::debug!("Skipping transcript line {}: {}", idx + 1, e);
                    transcript.skipped_lines += 1;
                }
            }
        }
        Ok(transcript)
    }

    pub fn from_jsonl(content: &str) -> Self {
        let mut transcript = Transcript::default();
        for (idx, line) in content.lines().enumerate() {
            transcript.push_line(idx + 1, line);
        }
        transcript
    }

    fn push_line(&mut self, line_no: usize, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match serde_json::from_str::<TranscriptEntry>(line) {
            Ok(entry) => self.entries.push(entry),
            Err(e) => {
                tracing::debug!("Skipping transcript line {}: {}", line_no, e);
                self.skipped_lines += 1;
            }
        }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn last_user_prompt(&self, max_chars: usize) -> Option<String> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.kind == "user")
            .find_map(TranscriptEntry::text)
            .map(|text| truncate_chars(&text, max_chars))
    }

    pub fn tool_summaries(&self, limit: usize, max_chars: usize) -> Vec<String> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.kind == "tool_result")
            .filter_map(|entry| {
                let name = entry.tool_name.as_deref().filter(|n| !n.is_empty())?;
                let output = entry.tool_output_text()?;
                Some(format!("[{}] {}", name, truncate_chars(&output, max_chars)))
            })
            .take(limit)
            .collect()
    }

    /// Span between the first and last timestamped entries, in file order.
    pub fn duration(&self) -> Option<Duration> {
        let mut stamps = self.entries.iter().filter_map(TranscriptEntry::timestamp_millis);
        let first = stamps.next()?;
        let last = stamps.last()?;
        if first < last {
            u64::try_from(last - first).ok().map(Duration::from_millis)
        } else {
            None
        }
    }

    pub fn summarize(&self, limits: &SummaryLimits) -> TranscriptSummary {
        TranscriptSummary {
            last_prompt: self.last_user_prompt(limits.prompt_chars),
            tool_summaries: self.tool_summaries(limits.tool_count, limits.tool_output_chars),
            duration: self.duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"{"type":"user","content":"first question","timestamp":"2025-08-01T09:30:00Z"}
{"type":"tool_result","tool_name":"Bash","tool_output":{"output":"cargo build ok"},"timestamp":"2025-08-01T09:30:05Z"}
not json at all
{"type":"user","message":{"role":"user","content":[{"type":"text","text":"run the tests"}]},"timestamp":"2025-08-01T09:31:00Z"}
{"type":"tool_result","tool_name":"Read","tool_output":"fn main() {}","timestamp":"2025-08-01T09:31:10Z"}
{"type":"tool_result","tool_name":"Bash","tool_output":{"output":"test result: ok"},"timestamp":"2025-08-01T09:32:30Z"}
"#;

    #[test]
    fn test_malformed_lines_are_skipped() {
        let transcript = Transcript::from_jsonl(SESSION);
        assert_eq!(transcript.entries().len(), 5);
        assert_eq!(transcript.skipped_lines(), 1);
    }

    #[test]
    fn test_last_user_prompt_reads_message_blocks() {
        let transcript = Transcript::from_jsonl(SESSION);
        assert_eq!(transcript.last_user_prompt(300).as_deref(), Some("run the tests"));
        assert_eq!(transcript.last_user_prompt(3).as_deref(), Some("run..."));
    }

    #[test]
    fn test_user_entries_without_text_are_passed_over() {
        let transcript = Transcript::from_jsonl(
            r#"{"type":"user","content":"real prompt"}
{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"x","content":"..."}]}}
{"type":"user","content":""}"#,
        );
        assert_eq!(transcript.last_user_prompt(300).as_deref(), Some("real prompt"));
    }

    #[test]
    fn test_tool_summaries_newest_first() {
        let transcript = Transcript::from_jsonl(SESSION);
        assert_eq!(
            transcript.tool_summaries(2, 200),
            vec![
                "[Bash] test result: ok".to_string(),
                "[Read] fn main() {}".to_string()
            ]
        );
        assert_eq!(transcript.tool_summaries(2, 4)[0], "[Bash] test...");
    }

    #[test]
    fn test_tool_results_without_name_or_output_are_ignored() {
        let transcript = Transcript::from_jsonl(
            r#"{"type":"tool_result","tool_output":"orphan"}
{"type":"tool_result","tool_name":"Bash","tool_output":{"exit":0}}
{"type":"tool_result","tool_name":"Bash","tool_output":42}"#,
        );
        assert!(transcript.tool_summaries(2, 200).is_empty());
    }

    #[test]
    fn test_duration_from_iso_timestamps() {
        let transcript = Transcript::from_jsonl(SESSION);
        assert_eq!(transcript.duration(), Some(Duration::from_secs(150)));
    }

    #[test]
    fn test_duration_from_millisecond_numbers() {
        let transcript = Transcript::from_jsonl(
            r#"{"type":"user","timestamp":1754040600000}
{"type":"assistant","timestamp":"1754040612500"}"#,
        );
        assert_eq!(transcript.duration(), Some(Duration::from_millis(12_500)));
    }

    #[test]
    fn test_duration_keeps_fractional_milliseconds() {
        let transcript = Transcript::from_jsonl(
            r#"{"type":"user","timestamp":"2025-08-01T09:30:00.000Z"}
{"type":"assistant","timestamp":"2025-08-01T09:30:12.123Z"}"#,
        );
        assert_eq!(transcript.duration(), Some(Duration::from_millis(12_123)));

        let numeric = Transcript::from_jsonl(
            r#"{"type":"user","timestamp":1754040600000}
{"type":"assistant","timestamp":1754040612123}"#,
        );
        assert_eq!(numeric.duration(), Some(Duration::from_millis(12_123)));
    }

    #[test]
    fn test_duration_from_second_numbers() {
        let transcript = Transcript::from_jsonl(
            r#"{"type":"user","timestamp":1754040600}
{"type":"assistant","timestamp":1754040612.5}"#,
        );
        assert_eq!(transcript.duration(), Some(Duration::from_millis(12_500)));
    }

    #[test]
    fn test_duration_needs_two_increasing_timestamps() {
        let single =
            Transcript::from_jsonl(r#"{"type":"user","timestamp":"2025-08-01T09:30:00Z"}"#);
        assert_eq!(single.duration(), None);

        let backwards = Transcript::from_jsonl(
            r#"{"type":"user","timestamp":"2025-08-01T09:31:00Z"}
{"type":"user","timestamp":"2025-08-01T09:30:00Z"}"#,
        );
        assert_eq!(backwards.duration(), None);

        let unparsable = Transcript::from_jsonl(
            r#"{"type":"user","timestamp":"yesterday"}
{"type":"user","timestamp":true}"#,
        );
        assert_eq!(unparsable.duration(), None);
    }

    #[test]
    fn test_summarize() {
        let summary = Transcript::from_jsonl(SESSION).summarize(&SummaryLimits::default());
        assert_eq!(summary.last_prompt.as_deref(), Some("run the tests"));
        assert_eq!(
            summary.response_summary().as_deref(),
            Some("[Bash] test result: ok\n[Read] fn main() {}")
        );
        assert_eq!(summary.duration, Some(Duration::from_secs(150)));

        assert_eq!(TranscriptSummary::default().response_summary(), None);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut bytes = br#"{"type":"user","content":"first"}"#.to_vec();
        bytes.extend_from_slice(b"\n{\"type\":\"user\",\"content\":\"\xff\xfe\"}\r\n");
        bytes.extend_from_slice(br#"{"type":"user","content":"last"}"#);

        let transcript = Transcript::from_reader(&bytes[..]).unwrap();
        assert_eq!(transcript.entries().len(), 2);
        assert_eq!(transcript.skipped_lines(), 1);
        assert_eq!(transcript.last_user_prompt(300).as_deref(), Some("last"));
    }

    #[test]
    fn test_missing_file_is_a_transcript_error() {
        let err = Transcript::from_file("/definitely/not/here.jsonl").unwrap_err();
        assert!(matches!(err, HookError::TranscriptError { .. }));
    }
}
