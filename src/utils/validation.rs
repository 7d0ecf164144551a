use crate::utils::error::{HookError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Webhook URLs must be http or https.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    let url = parse_absolute_url(field_name, url_str)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(HookError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Unsupported URL scheme: {}", scheme),
        }),
    }
}

/// Message links may use app schemes (e.g. `dingtalk://`), so any scheme is accepted.
pub fn validate_link(field_name: &str, url_str: &str) -> Result<()> {
    parse_absolute_url(field_name, url_str).map(|_| ())
}

fn parse_absolute_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.trim().is_empty() {
        return Err(HookError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    Url::parse(url_str).map_err(|e| HookError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: url_str.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HookError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| HookError::MissingConfigError {
        field: field_name.to_string(),
    })
}
