//! Partial-update directives.
//!
//! # Responsibility
//! - Turn a caller-supplied partial object into a structured `SET` directive
//!   plus placeholder bindings (`builder`).
//! - Apply a directive to a stored document for adapters that do not have a
//!   native update command (`apply`).
//!
//! # Invariants
//! - Field names and values only ever travel as bindings; the directive text
//!   contains placeholders exclusively.
//! - The identifier attribute is never the target of an assignment.

pub mod apply;
pub mod builder;

pub use apply::{apply_update, ApplyError};
pub use builder::{
    Assignment, UpdateBindings, UpdateBuildError, UpdateDirective, UpdateExpressionBuilder,
    UpdatePlan,
};
