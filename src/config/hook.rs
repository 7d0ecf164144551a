use crate::config::endpoint::EndpointConfig;
use crate::config::source;
use crate::domain::TriggerEvent;
use crate::utils::error::{HookError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_FILE_NAME: &str = ".cc-hook-config.json";
pub const ROBOT_SEND_URL: &str = "https://oapi.dingtalk.com/robot/send";
pub const DEFAULT_TITLE: &str = "Claude Code 执行完成";

/// `~/.cc-hook-config.json`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or_else(|| HookError::ConfigError {
            message: "Failed to determine home directory".to_string(),
        })
}

fn default_true() -> bool {
    true
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_true")]
    pub include_duration: bool,
    #[serde(default = "default_true")]
    pub include_exit_code: bool,
    #[serde(default = "default_true")]
    pub include_working_dir: bool,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_duration: true,
            include_exit_code: true,
            include_working_dir: true,
        }
    }
}

/// Which outcomes trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRules {
    #[serde(default = "default_true")]
    pub on_success: bool,
    #[serde(default = "default_true")]
    pub on_failure: bool,
    /// Failures of the hook itself, reported by the caller.
    #[serde(default = "default_true")]
    pub on_error: bool,
}

impl Default for NotificationRules {
    fn default() -> Self {
        Self {
            on_success: true,
            on_failure: true,
            on_error: true,
        }
    }
}

/// The hook's settings file. Every key is optional and falls back to its
/// default, so a file holding only `access_token` is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub access_token: String,
    /// Older files store the full robot URL instead of the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub message_template: MessageTemplate,
    #[serde(default)]
    pub notifications: NotificationRules,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            webhook_url: None,
            secret: String::new(),
            enabled: true,
            message_template: MessageTemplate::default(),
            notifications: NotificationRules::default(),
        }
    }
}

impl HookConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        source::parse_file(path.as_ref())
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        source::parse_str(content, source::ConfigFormat::Json)
    }

    /// A missing file yields the defaults; nothing is written back. A file that
    /// exists but does not parse is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No hook configuration at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// The explicit token, else the `access_token` query parameter of `webhook_url`.
    pub fn access_token(&self) -> Option<String> {
        if !self.access_token.trim().is_empty() {
            return Some(self.access_token.trim().to_string());
        }

        let webhook_url = self.webhook_url.as_deref()?;
        let url = match Url::parse(webhook_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Ignoring unparsable webhook_url '{}': {}", webhook_url, e);
                return None;
            }
        };
        url.query_pairs()
            .find(|(key, _)| key == "access_token")
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty())
    }

    pub fn webhook_url(&self) -> Result<String> {
        let token = self.access_token();
        let token = validate_required_field("access_token", &token)?;

        let mut url = Url::parse(ROBOT_SEND_URL).map_err(|e| HookError::ConfigError {
            message: format!("invalid robot URL: {}", e),
        })?;
        url.query_pairs_mut().append_pair("access_token", token);
        Ok(url.into())
    }

    pub fn endpoint(&self) -> Result<EndpointConfig> {
        let mut endpoint = EndpointConfig::new(self.webhook_url()?, &self.message_template.title)
            .with_include_duration(self.message_template.include_duration)
            .with_include_exit_code(self.message_template.include_exit_code);
        if !self.secret.is_empty() {
            endpoint = endpoint.with_secret(&self.secret);
        }
        endpoint.validate()?;
        Ok(endpoint)
    }

    /// Whether `event` should produce a notification under these settings.
    pub fn should_notify(&self, event: &TriggerEvent) -> bool {
        if !self.enabled {
            return false;
        }
        match event.succeeded() {
            Some(false) => self.notifications.on_failure,
            _ => self.notifications.on_success,
        }
    }

    pub fn should_notify_error(&self) -> bool {
        self.enabled && self.notifications.on_error
    }
}

impl Validate for HookConfig {
    fn validate(&self) -> Result<()> {
        if self.enabled {
            self.endpoint()?;
        }
        Ok(())
    }
}
