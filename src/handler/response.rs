//! Response envelope.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{LOOKUP_ERROR_MESSAGE, WARMUP_MESSAGE};

/// Status code plus JSON body, serialized as `{"statusCode": .., "body": ".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    /// HTTP status code
    pub status_code: u16,
    /// JSON document, already serialized
    pub body: String,
}

impl HandlerResponse {
    /// 200 with `value` as the body.
    pub fn ok_json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(value)?,
        })
    }

    /// 200 `{"message":"Warmup successful"}`
    pub fn warmup() -> Self {
        Self {
            status_code: 200,
            body: json!({ "message": WARMUP_MESSAGE }).to_string(),
        }
    }

    /// 500 with the generic error message and nothing else.
    pub fn lookup_failed() -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": LOOKUP_ERROR_MESSAGE }).to_string(),
        }
    }

    /// True for 2xx responses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
