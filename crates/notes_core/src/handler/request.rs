//! Normalized inbound request.

use crate::handler::error::HandlerError;
use crate::model::item::Item;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

const PATH_ID_PARAMETER: &str = "id";

/// Recognized request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl Method {
    /// Parses a method token; matching is case-sensitive.
    pub fn parse(value: &str) -> Result<Self, HandlerError> {
        match value {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            other => Err(HandlerError::UnsupportedMethod(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request as handed over by the routing tier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiRequest {
    /// Raw method token; validated during dispatch.
    pub method: String,
    /// `{id}` path parameter; empty ids are normalized to `None`.
    pub path_id: Option<String>,
    /// Raw body text.
    pub body: Option<String>,
}

/// Subset of an API-Gateway proxy event the handler reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyEvent {
    http_method: String,
    #[serde(default)]
    path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    body: Option<String>,
}

impl ApiRequest {
    pub fn new(
        method: impl Into<String>,
        path_id: Option<impl Into<String>>,
        body: Option<impl Into<String>>,
    ) -> Self {
        Self {
            method: method.into(),
            path_id: path_id.map(Into::into).filter(|id: &String| !id.is_empty()),
            body: body.map(Into::into),
        }
    }

    /// Builds a request from a proxy event document.
    ///
    /// Reads `httpMethod`, `pathParameters.id` and `body`; every other field
    /// is ignored.
    pub fn from_proxy_event(event: &str) -> Result<Self, serde_json::Error> {
        let event: ProxyEvent = serde_json::from_str(event)?;
        let path_id = event
            .path_parameters
            .and_then(|mut params| params.remove(PATH_ID_PARAMETER));
        Ok(Self::new(event.http_method, path_id, event.body))
    }

    /// Parses the body as a partial item; absent or blank bodies are `{}`.
    pub fn parse_body(&self) -> Result<Item, HandlerError> {
        let text = match self.body.as_deref().map(str::trim) {
            None | Some("") => return Ok(Item::new()),
            Some(text) => text,
        };

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(HandlerError::MalformedBody(
                "expected a JSON object".to_string(),
            )),
            Err(err) => Err(HandlerError::MalformedBody(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiRequest, Method};
    use crate::handler::error::HandlerError;

    #[test]
    fn method_parse_is_case_sensitive() {
        assert_eq!(Method::parse("DELETE").unwrap(), Method::Delete);
        assert!(matches!(
            Method::parse("get"),
            Err(HandlerError::UnsupportedMethod(method)) if method == "get"
        ));
    }

    #[test]
    fn proxy_event_fields_are_extracted() {
        let request = ApiRequest::from_proxy_event(
            r#"{"httpMethod":"PUT","pathParameters":{"id":"abc"},"body":"{\"text\":\"x\"}","headers":{}}"#,
        )
        .unwrap();
        assert_eq!(request.method, "PUT");
        assert_eq!(request.path_id.as_deref(), Some("abc"));
        assert_eq!(request.body.as_deref(), Some(r#"{"text":"x"}"#));
    }

    #[test]
    fn proxy_event_without_path_parameters_has_no_id() {
        let request =
            ApiRequest::from_proxy_event(r#"{"httpMethod":"GET","pathParameters":null}"#).unwrap();
        assert_eq!(request.path_id, None);
        assert_eq!(request.body, None);
    }

    #[test]
    fn empty_path_id_is_treated_as_absent() {
        let request = ApiRequest::new("GET", Some(""), None::<String>);
        assert_eq!(request.path_id, None);
    }

    #[test]
    fn blank_body_parses_as_empty_object() {
        let request = ApiRequest::new("POST", None::<String>, Some("  "));
        assert!(request.parse_body().unwrap().is_empty());
    }

    #[test]
    fn non_object_body_is_malformed() {
        let request = ApiRequest::new("POST", None::<String>, Some("[1,2]"));
        assert!(matches!(
            request.parse_body(),
            Err(HandlerError::MalformedBody(_))
        ));

        let request = ApiRequest::new("POST", None::<String>, Some("{not json"));
        assert!(matches!(
            request.parse_body(),
            Err(HandlerError::MalformedBody(_))
        ));
    }
}
