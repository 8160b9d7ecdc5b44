//! Distributed Key-Value Index Service Library
//!
//! This library crate defines the core modules that make up the index service.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems plus shared plumbing:
//!
//! - **`cluster`**: The remote execution boundary. Defines the job vocabulary
//!   (names, statuses, specs) and the client used to submit, poll and purge
//!   jobs on the compute cluster.
//! - **`store`**: The durable state layer. A flat directory of index artifacts
//!   with atomic replace semantics, so readers never observe partial writes.
//! - **`lifecycle`**: The orchestration core. Resolves an index name to its
//!   current status, materializes completed build jobs into local artifacts,
//!   and handles submission, replacement and deletion.
//! - **`query`**: On-demand data access. Runs short-lived cluster jobs that
//!   enumerate keys or values of an index, or evaluate a boolean key
//!   predicate, and guarantees the job is purged afterwards.
//!
//! `config` carries runtime settings and `error` the service-wide error type.

pub mod cluster;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod query;
pub mod store;
