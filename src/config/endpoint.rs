use crate::config::source::{self, ConfigFormat};
use crate::domain::TriggerEvent;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_true() -> bool {
    true
}

/// Where messages go and which event details they may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub webhook_url: String,
    /// Signing secret of the robot; the signature itself is computed by the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub message_title: String,
    #[serde(default = "default_true")]
    pub include_duration: bool,
    #[serde(default = "default_true")]
    pub include_exit_code: bool,
}

impl EndpointConfig {
    pub fn new(webhook_url: impl Into<String>, message_title: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            secret: None,
            message_title: message_title.into(),
            include_duration: true,
            include_exit_code: true,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_include_duration(mut self, include: bool) -> Self {
        self.include_duration = include;
        self
    }

    pub fn with_include_exit_code(mut self, include: bool) -> Self {
        self.include_exit_code = include;
        self
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub fn message_title(&self) -> &str {
        &self.message_title
    }

    /// An empty secret means the robot is not signed.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::parse(content, ConfigFormat::Json)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, ConfigFormat::Toml)
    }

    /// 從檔案載入並驗證 (依副檔名選擇 JSON 或 TOML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = source::parse_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Self = source::parse_str(content, format)?;
        config.validate()?;
        Ok(config)
    }

    /// The event as this endpoint is allowed to report it: duration and exit
    /// code are dropped when their include flag is off.
    pub fn visible_event(&self, event: &TriggerEvent) -> TriggerEvent {
        let mut visible = event.clone();
        if !self.include_duration {
            visible.duration_ms = None;
        }
        if !self.include_exit_code {
            visible.exit_code = None;
        }
        visible
    }
}

impl Validate for EndpointConfig {
    fn validate(&self) -> Result<()> {
        validate_url("webhookUrl", &self.webhook_url)?;
        validate_non_empty_string("messageTitle", &self.message_title)?;
        Ok(())
    }
}
