use crate::types::dataset::Dataset;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to read CSV data")]
    Csv(#[from] csv::Error),

    #[error("Invalid value '{value}' for column '{column}' on line {line}")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Network request failed for {dataset} dataset at {url}")]
    NetworkRequest {
        dataset: Dataset,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {dataset} dataset from {url} (status {status})")]
    HttpStatus {
        dataset: Dataset,
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Timed out after {timeout:?} fetching {dataset} dataset")]
    Timeout { dataset: Dataset, timeout: Duration },

    #[error("Fetching the {dataset} dataset was cancelled")]
    Cancelled { dataset: Dataset },

    #[error("Failed to decode {dataset} dataset")]
    Decode {
        dataset: Dataset,
        #[source]
        source: DecodeError,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl DatasetError {
    /// The dataset the failure belongs to, if it is tied to one.
    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            DatasetError::NetworkRequest { dataset, .. }
            | DatasetError::HttpStatus { dataset, .. }
            | DatasetError::Timeout { dataset, .. }
            | DatasetError::Cancelled { dataset }
            | DatasetError::Decode { dataset, .. } => Some(*dataset),
            DatasetError::TaskJoin(_) => None,
        }
    }
}
