//! Ephemeral Query Module
//!
//! Answers key-enumeration, value-enumeration and predicate-query requests
//! against an already-materialized index. Every request submits its own
//! short-lived cluster job, collects the full result set, and purges the
//! job's remote state on every exit path. Nothing here is persisted or
//! cached.
//!
//! ## Submodules
//! - **`predicate`**: The boolean key expression and its URL wire form.
//! - **`orchestrator`**: Submit-poll-collect-purge around one iteration job.
//! - **`protocol`**: HTTP DTOs for the result sets.
//! - **`handlers`**: Axum request handlers.

pub mod handlers;
pub mod orchestrator;
pub mod predicate;
pub mod protocol;
