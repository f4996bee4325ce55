//! Core of the notes CRUD service.
//! Translates HTTP-style requests into item store calls over a schemaless
//! collection, with injection-safe partial updates.

pub mod app;
pub mod config;
pub mod db;
pub mod handler;
pub mod logging;
pub mod model;
pub mod store;
pub mod update;

pub use app::{bootstrap, BootstrapError};
pub use config::{ConfigError, ErrorStatusPolicy, NotesConfig};
pub use handler::{
    ApiRequest, ApiResponse, DispatchOutcome, HandlerError, Method, RequestDispatcher,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::item::{Item, ItemId, CREATED_AT_ATTRIBUTE, ID_ATTRIBUTE, PROTECTED_ATTRIBUTES};
pub use model::key::generate_item_id;
pub use store::{ItemStore, MemoryItemStore, SqliteItemStore, StoreError, StoreResult};
pub use update::{
    UpdateBindings, UpdateBuildError, UpdateDirective, UpdateExpressionBuilder, UpdatePlan,
};
