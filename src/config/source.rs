use crate::utils::error::{HookError, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

fn env_var_pattern() -> Result<Regex> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| HookError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })
}

fn substitute_with(re: &Regex, text: &str) -> String {
    re.replace_all(text, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

/// 替換環境變數 (例如 ${WEBHOOK_SECRET})，未設定的變數保持原樣
pub fn substitute_env_vars(text: &str) -> Result<String> {
    Ok(substitute_with(&env_var_pattern()?, text))
}

/// Substitutes inside string values only, so a value may hold quotes or
/// backslashes without touching the document structure.
fn substitute_in_value(re: &Regex, value: &mut Value) {
    match value {
        Value::String(text) => {
            if re.is_match(text) {
                *text = substitute_with(re, text);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| substitute_in_value(re, item)),
        Value::Object(map) => map.values_mut().for_each(|item| substitute_in_value(re, item)),
        _ => {}
    }
}

pub fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> Result<T> {
    let mut document: Value = match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
            HookError::ConfigValidationError {
                field: "json_parsing".to_string(),
                message: format!("JSON parsing error: {}", e),
            }
        })?,
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| {
            HookError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            }
        })?,
    };

    substitute_in_value(&env_var_pattern()?, &mut document);

    serde_json::from_value(document).map_err(|e| HookError::ConfigValidationError {
        field: "schema".to_string(),
        message: format!("{:?} configuration does not match: {}", format, e),
    })
}

pub fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = ConfigFormat::from_path(path);
    tracing::debug!("Loading {:?} configuration from {}", format, path.display());
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}
