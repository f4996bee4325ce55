//! Schemaless item model shared by the store and the request handler.
//!
//! # Responsibility
//! - Define the document shape used for items and partial-update payloads.
//! - Own identifier generation and creation timestamps.
//!
//! # Invariants
//! - Every stored item carries a server-assigned `id` that never changes.
//! - `createdAt` is written once, at creation.

pub mod item;
pub mod key;
