// Fixed values the compiler stamps into every manifest.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CARDINAL_OTLP_ENDPOINT: &str = "https://otelhttp.intake.us-east-2.aws.cardinalhq.io";
pub const CARDINAL_API_KEY_HEADER: &str = "x-cardinalhq-api-key";

/// Policy constants for manifest rendering. Not derived from user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    /// Secret the chart creates for the organization API keys
    pub api_keys_secret_name: String,
    /// Replicas for each of ingestLogs, ingestMetrics, ingestTraces in production
    pub ingest_replicas: u32,
    /// Replicas for queryApi in production
    pub query_replicas: u32,
    pub otlp_endpoint: String,
    pub otlp_api_key_header: String,
    /// Shortest accepted Cardinal Cloud API key, after trimming
    pub min_cardinal_api_key_len: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            api_keys_secret_name: "apikeys".to_string(),
            ingest_replicas: 3,
            query_replicas: 2,
            otlp_endpoint: CARDINAL_OTLP_ENDPOINT.to_string(),
            otlp_api_key_header: CARDINAL_API_KEY_HEADER.to_string(),
            min_cardinal_api_key_len: 10,
        }
    }
}

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("failed to read policy file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Policy {
    /// Loads a JSON policy override. Keys left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| PolicyError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
