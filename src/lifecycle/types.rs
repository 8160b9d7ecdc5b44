use serde::{Deserialize, Serialize};

/// A submission-time description of the inputs to an indexing job.
///
/// Transient: it is translated into a job spec and never persisted. The
/// routine names select which parsing, record-routing and chunk-balancing
/// code the cluster applies while building the chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSet {
    /// Locations of the raw input data.
    pub input: Vec<String>,
    /// Number of index chunks the build should produce.
    #[serde(default = "default_nr_ichunks")]
    pub nr_ichunks: usize,
    #[serde(default = "default_parser")]
    pub parser: String,
    #[serde(default = "default_demux")]
    pub demux: String,
    #[serde(default = "default_balancer")]
    pub balancer: String,
}

fn default_nr_ichunks() -> usize {
    10
}

fn default_parser() -> String {
    "parse".to_string()
}

fn default_demux() -> String {
    "demux".to_string()
}

fn default_balancer() -> String {
    "balance".to_string()
}
