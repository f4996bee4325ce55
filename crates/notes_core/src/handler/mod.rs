//! HTTP-style request handling for the item collection.
//!
//! # Responsibility
//! - Normalize inbound proxy events into [`ApiRequest`]s.
//! - Dispatch each request to exactly one item store call.
//! - Format outcomes and failures into [`ApiResponse`]s with CORS headers.
//!
//! # Invariants
//! - No mutable state is shared between requests; the store is the only
//!   shared dependency.
//! - Every failure is logged with full detail and reaches the caller as a
//!   message-only `{"error": ...}` body.

pub mod dispatcher;
pub mod error;
pub mod request;
pub mod response;

pub use dispatcher::{DispatchOutcome, RequestDispatcher};
pub use error::HandlerError;
pub use request::{ApiRequest, Method};
pub use response::{cors_headers, ApiResponse};
