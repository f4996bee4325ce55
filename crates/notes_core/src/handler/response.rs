//! Response formatting.
//!
//! # Invariants
//! - Every response carries the same content-type and CORS headers.
//! - Error bodies contain only the error message.

use crate::config::ErrorStatusPolicy;
use crate::handler::error::HandlerError;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const ALLOWED_ORIGIN: &str = "*";
pub const ALLOWED_METHODS: &str = "OPTIONS,GET,POST,PUT,DELETE";
pub const ALLOWED_HEADERS: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Fixed header set attached to every response.
pub fn cors_headers() -> BTreeMap<String, String> {
    [
        ("Content-Type", JSON_CONTENT_TYPE),
        ("Access-Control-Allow-Origin", ALLOWED_ORIGIN),
        ("Access-Control-Allow-Methods", ALLOWED_METHODS),
        ("Access-Control-Allow-Headers", ALLOWED_HEADERS),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

/// Response handed back to the routing tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    /// 200 with `body` serialized as JSON.
    pub fn ok(body: &Value) -> Self {
        Self::with_status(200, body.to_string())
    }

    /// 204 preflight answer with an empty body.
    pub fn no_content() -> Self {
        Self::with_status(204, String::new())
    }

    /// Error response for `err`; the body only carries `err`'s message.
    pub fn from_error(err: &HandlerError, policy: ErrorStatusPolicy) -> Self {
        let body = json!({ "error": err.to_string() });
        Self::with_status(err.status_code(policy), body.to_string())
    }

    /// Parses the body back into JSON; `Value::Null` for an empty body.
    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
    }

    fn with_status(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            headers: cors_headers(),
            body,
        }
    }
}
