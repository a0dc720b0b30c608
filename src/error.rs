use std::path::PathBuf;

use thiserror::Error;

/// Failures outside the calculators' domain: the caller handed over something
/// that is not an input set at all. Validation problems are never reported here.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read input payload from {path}: {source}")]
    ReadPayload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {calculator} payload: {source}")]
    Payload {
        calculator: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize {calculator} result: {source}")]
    Serialize {
        calculator: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
