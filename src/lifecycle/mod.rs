//! Index Lifecycle Module
//!
//! The orchestration core. An index name moves from "submitted as a cluster
//! job" to "materialized as a local artifact"; this module tracks that journey
//! and never exposes a partial result while it is in flight.
//!
//! ## Architecture Overview
//! Status is a derived value, recomputed on every request:
//! 1. **Local first**: an artifact in the store is authoritative and terminal.
//! 2. **Remote second**: names carrying the job prefix are looked up on the
//!    cluster; a `ready` job is collapsed into a chunk list, persisted with an
//!    atomic rename, and its remote state purged.
//! 3. **Re-check**: after the remote call the store is consulted again, so a
//!    concurrent request that won the materialization race is honored instead
//!    of overwritten needlessly.
//!
//! ## Submodules
//! - **`types`**: The `DataSet` submission payload.
//! - **`manager`**: The status-resolution state machine plus submission,
//!   replacement and deletion.
//! - **`protocol`**: HTTP DTOs for the index resource endpoints.
//! - **`handlers`**: Axum request handlers.

pub mod handlers;
pub mod manager;
pub mod protocol;
pub mod types;

#[cfg(test)]
mod tests;
