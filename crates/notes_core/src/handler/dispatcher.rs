//! Request dispatcher.
//!
//! # Responsibility
//! - Classify a request by method and path id presence.
//! - Issue exactly one item store call per request.
//! - Catch every failure once, log it, and format it.
//!
//! # Invariants
//! - Identity and creation time are assigned here, never taken from callers.
//! - Updates are rejected before reaching the store when nothing is mutable.
//! - PUT and DELETE without a path id never reach the store.

use crate::config::ErrorStatusPolicy;
use crate::handler::error::HandlerError;
use crate::handler::request::{ApiRequest, Method};
use crate::handler::response::ApiResponse;
use crate::model::item::stamp_new_item;
use crate::model::key::generate_item_id;
use crate::store::ItemStore;
use crate::update::UpdateExpressionBuilder;
use chrono::Utc;
use crate::logging::sanitize_log_field;
use log::{debug, info, log};
use serde_json::{json, Value};
use std::error::Error;
use std::time::Instant;

/// Successful dispatch result before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// 200 with a JSON body.
    Body(Value),
    /// 204 with no body.
    NoContent,
}

/// Stateless request dispatcher over an injected item store.
pub struct RequestDispatcher<S: ItemStore> {
    store: S,
    builder: UpdateExpressionBuilder<'static>,
    error_status: ErrorStatusPolicy,
}

impl<S: ItemStore> RequestDispatcher<S> {
    /// Creates a dispatcher using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self {
            store,
            builder: UpdateExpressionBuilder::default(),
            error_status: ErrorStatusPolicy::default(),
        }
    }

    /// Selects how failures map to status codes.
    pub fn with_error_status(mut self, policy: ErrorStatusPolicy) -> Self {
        self.error_status = policy;
        self
    }

    /// Backing store, for wiring and inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn error_status(&self) -> ErrorStatusPolicy {
        self.error_status
    }

    /// Handles a raw proxy event document end to end.
    pub fn handle_proxy_event(&self, event: &str) -> ApiResponse {
        match ApiRequest::from_proxy_event(event) {
            Ok(request) => self.handle(&request),
            Err(err) => {
                let err = HandlerError::MalformedBody(format!("invalid proxy event: {err}"));
                log!(
                    err.log_level(),
                    "event=request module=handler status=error error_code={} error={}",
                    err.code(),
                    error_detail(&err)
                );
                ApiResponse::from_error(&err, self.error_status)
            }
        }
    }

    /// Handles one request; never fails, errors become error responses.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let started_at = Instant::now();
        let method = sanitize_log_field(&request.method);
        info!(
            "event=request module=handler status=start method={} has_id={}",
            method,
            request_id(request).is_some()
        );

        match self.dispatch(request) {
            Ok(outcome) => {
                let response = match outcome {
                    DispatchOutcome::Body(body) => ApiResponse::ok(&body),
                    DispatchOutcome::NoContent => ApiResponse::no_content(),
                };
                info!(
                    "event=request module=handler status=ok method={} status_code={} duration_ms={}",
                    method,
                    response.status_code,
                    started_at.elapsed().as_millis()
                );
                response
            }
            Err(err) => {
                let response = ApiResponse::from_error(&err, self.error_status);
                log!(
                    err.log_level(),
                    "event=request module=handler status=error method={} status_code={} duration_ms={} error_code={} error={}",
                    method,
                    response.status_code,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    error_detail(&err)
                );
                response
            }
        }
    }

    /// Routes one request to its store operation.
    ///
    /// | method  | path id | action                     |
    /// |---------|---------|----------------------------|
    /// | GET     | yes     | `get(id)`                  |
    /// | GET     | no      | `scan()`                   |
    /// | POST    | any     | `put(new item)`            |
    /// | PUT     | yes     | `update(id, plan)`         |
    /// | DELETE  | yes     | `delete(id)`               |
    /// | OPTIONS | any     | no store call              |
    pub fn dispatch(&self, request: &ApiRequest) -> Result<DispatchOutcome, HandlerError> {
        let method = Method::parse(&request.method)?;

        match (method, request_id(request)) {
            (Method::Options, _) => Ok(DispatchOutcome::NoContent),
            (Method::Get, Some(id)) => self.read_item(id),
            (Method::Get, None) => self.list_items(),
            (Method::Post, _) => self.create_item(request),
            (Method::Put, Some(id)) => self.update_item(id, request),
            (Method::Delete, Some(id)) => self.delete_item(id),
            (Method::Put | Method::Delete, None) => {
                Err(HandlerError::MissingIdentifier(method.as_str()))
            }
        }
    }

    fn read_item(&self, id: &str) -> Result<DispatchOutcome, HandlerError> {
        let item = self
            .store
            .get(id)?
            .ok_or_else(|| HandlerError::NotFound(id.to_string()))?;
        Ok(DispatchOutcome::Body(json!({ "Item": Value::Object(item) })))
    }

    fn list_items(&self) -> Result<DispatchOutcome, HandlerError> {
        let items = self.store.scan()?;
        let count = items.len();
        let items = items.into_iter().map(Value::Object).collect::<Vec<_>>();
        Ok(DispatchOutcome::Body(
            json!({ "Items": items, "Count": count }),
        ))
    }

    fn create_item(&self, request: &ApiRequest) -> Result<DispatchOutcome, HandlerError> {
        let fields = request.parse_body()?;
        let item = stamp_new_item(fields, generate_item_id(), Utc::now());
        self.store.put(&item)?;
        Ok(DispatchOutcome::Body(json!({
            "message": "Item created successfully",
            "item": Value::Object(item),
        })))
    }

    fn update_item(&self, id: &str, request: &ApiRequest) -> Result<DispatchOutcome, HandlerError> {
        let patch = request.parse_body()?;
        let plan = self.builder.build(&patch)?;
        debug!(
            "event=update_plan module=handler status=ok clauses={} directive={}",
            plan.directive.len(),
            plan.directive
        );

        let item = self.store.update(id, &plan.directive, &plan.bindings)?;
        Ok(DispatchOutcome::Body(json!({
            "message": "Item updated successfully",
            "item": Value::Object(item),
        })))
    }

    fn delete_item(&self, id: &str) -> Result<DispatchOutcome, HandlerError> {
        self.store.delete(id)?;
        Ok(DispatchOutcome::Body(json!({
            "message": format!("Item with id {id} deleted."),
        })))
    }
}

/// Path id of `request`; an empty id counts as absent.
fn request_id(request: &ApiRequest) -> Option<&str> {
    request.path_id.as_deref().filter(|id| !id.is_empty())
}

/// Joins an error with its `source()` chain, flattened for one log record.
fn error_detail(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    sanitize_log_field(&rendered)
}
