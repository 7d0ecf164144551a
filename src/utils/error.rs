use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed at {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Message does not conform to msgtype '{kind}': {reason}")]
    MessageConformanceError { kind: String, reason: String },

    #[error("Webhook endpoint returned errcode {code}: {message}")]
    EndpointError { code: i64, message: String },

    #[error("Transcript error ({path}): {message}")]
    TranscriptError { path: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Schema,
    Endpoint,
    Io,
    Transcript,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HookError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HookError::IoError(_) => ErrorCategory::Io,
            HookError::SerializationError(_)
            | HookError::MessageConformanceError { .. }
            | HookError::ValidationError { .. } => ErrorCategory::Schema,
            HookError::ConfigError { .. }
            | HookError::MissingConfigError { .. }
            | HookError::InvalidConfigValueError { .. }
            | HookError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            HookError::EndpointError { .. } => ErrorCategory::Endpoint,
            HookError::TranscriptError { .. } => ErrorCategory::Transcript,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // transcript data only enriches an event
            HookError::TranscriptError { .. } => ErrorSeverity::Low,
            HookError::EndpointError { .. } => ErrorSeverity::Medium,
            HookError::SerializationError(_)
            | HookError::MessageConformanceError { .. }
            | HookError::ValidationError { .. }
            | HookError::ConfigError { .. }
            | HookError::MissingConfigError { .. }
            | HookError::InvalidConfigValueError { .. }
            | HookError::ConfigValidationError { .. } => ErrorSeverity::High,
            HookError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            HookError::IoError(_) => {
                "Check that the file exists and is readable by the current user".to_string()
            }
            HookError::SerializationError(_) => {
                "Check that the payload is well-formed JSON with the expected field names"
                    .to_string()
            }
            HookError::ConfigError { .. } | HookError::ConfigValidationError { .. } => {
                "Review the configuration file syntax and values".to_string()
            }
            HookError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file", field)
            }
            HookError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration file", field)
            }
            HookError::MessageConformanceError { kind, .. } => format!(
                "Populate exactly the '{}' payload for msgtype '{}'",
                kind, kind
            ),
            HookError::EndpointError { code, .. } => match code {
                310000 => "Check the robot's signing secret, keywords and IP allowlist".to_string(),
                _ => "Inspect errmsg and the robot settings of the chat group".to_string(),
            },
            HookError::TranscriptError { .. } => {
                "The notification can be sent without transcript details".to_string()
            }
            HookError::ValidationError { .. } => {
                "Fill in the required fields before sending".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HookError::IoError(e) => format!("File access failed: {}", e),
            HookError::SerializationError(e) => format!("Invalid JSON: {}", e),
            HookError::ConfigError { message } => format!("Configuration problem: {}", message),
            HookError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            HookError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            HookError::ConfigValidationError { field, message } => {
                format!("Configuration '{}' is invalid: {}", field, message)
            }
            HookError::MessageConformanceError { kind, reason } => {
                format!("The {} message is malformed: {}", kind, reason)
            }
            HookError::EndpointError { code, message } => {
                format!("The webhook rejected the message ({}): {}", code, message)
            }
            HookError::TranscriptError { path, message } => {
                format!("Could not read transcript {}: {}", path, message)
            }
            HookError::ValidationError { message } => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_and_severity() {
        let err = HookError::EndpointError {
            code: 300001,
            message: "token is not exist".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Endpoint);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("300001"));

        let err = HookError::MissingConfigError {
            field: "access_token".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.recovery_suggestion().contains("access_token"));

        let err = HookError::TranscriptError {
            path: "/tmp/t.jsonl".to_string(),
            message: "missing".to_string(),
        };
        assert!(err.severity() < ErrorSeverity::High);
    }

    #[test]
    fn test_io_error_conversion() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.json")?)
        }

        let err = read().unwrap_err();
        assert!(matches!(err, HookError::IoError(_)));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
