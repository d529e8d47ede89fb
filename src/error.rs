use crate::config::ConfigError;
use crate::datasets::error::DatasetError;
use crate::types::dataset::Dataset;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DashboardError {
    /// The memoized load failed; every caller sees the same failure.
    #[error(transparent)]
    Load(Arc<DatasetError>),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DashboardError {
    /// The dataset a load failure belongs to, if any.
    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            DashboardError::Load(err) => err.dataset(),
            DashboardError::Config(_) => None,
        }
    }
}

impl From<DatasetError> for DashboardError {
    fn from(err: DatasetError) -> Self {
        DashboardError::Load(Arc::new(err))
    }
}
