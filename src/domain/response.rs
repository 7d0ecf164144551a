use crate::utils::error::{HookError, Result};
use serde::{Deserialize, Serialize};

/// Reply body of the webhook endpoint. `errcode` 0 means the message was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "errcode")]
    pub error_code: i64,
    #[serde(rename = "errmsg")]
    pub error_message: String,
}

impl Response {
    pub const SUCCESS_CODE: i64 = 0;

    pub fn success() -> Self {
        Self {
            error_code: Self::SUCCESS_CODE,
            error_message: "ok".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_code == Self::SUCCESS_CODE
    }

    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            tracing::debug!(
                "Webhook endpoint rejected message: errcode={} errmsg={}",
                self.error_code,
                self.error_message
            );
            Err(HookError::EndpointError {
                code: self.error_code,
                message: self.error_message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = Response::from_json(r#"{"errcode": 0, "errmsg": "ok"}"#).unwrap();
        assert!(response.is_success());
        assert!(response.into_result().is_ok());
    }

    #[test]
    fn test_failure_response_maps_to_endpoint_error() {
        let response =
            Response::from_json(r#"{"errcode": 310000, "errmsg": "keywords not in content"}"#)
                .unwrap();
        assert!(!response.is_success());

        match response.into_result() {
            Err(HookError::EndpointError { code, message }) => {
                assert_eq!(code, 310000);
                assert_eq!(message, "keywords not in content");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_negative_codes_are_failures() {
        let response = Response {
            error_code: -1,
            error_message: "system busy".to_string(),
        };
        assert!(!response.is_success());
    }

    #[test]
    fn test_missing_errmsg_is_rejected() {
        assert!(Response::from_json(r#"{"errcode": 0}"#).is_err());
    }
}
