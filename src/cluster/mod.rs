//! Remote Execution Boundary Module
//!
//! Everything the service knows about the compute cluster lives here. The
//! cluster builds indices and answers chunk-iteration jobs; this module only
//! observes, submits and purges that work. It never schedules anything
//! itself.
//!
//! ## Submodules
//! - **`types`**: The shared job vocabulary (names, statuses, specs) used by
//!   every other module.
//! - **`protocol`**: Wire DTOs spoken to the cluster master over HTTP.
//! - **`client`**: The `ClusterClient` trait plus the `HttpCluster`
//!   implementation with timeout-bounded, jittered-retry transport.
//! - **`mock`** *(test only)*: An in-memory cluster with scripted job
//!   outcomes and purge accounting.

pub mod client;
pub mod protocol;
pub mod types;

#[cfg(test)]
pub mod mock;
