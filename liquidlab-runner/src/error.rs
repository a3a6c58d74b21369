use crate::config::ConfigError;
use liquidlab_core::allocation::AllocationError;
use liquidlab_core::data::SchemaError;
use liquidlab_core::domain::InvalidRiskTolerance;
use liquidlab_core::features::FeatureError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the feature extractor or the allocator.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data load error: {0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Report(#[from] anyhow::Error),
}

impl From<InvalidRiskTolerance> for PipelineError {
    fn from(e: InvalidRiskTolerance) -> Self {
        Self::Allocation(AllocationError::InvalidRiskTolerance(e))
    }
}

pub(crate) fn create_dir(path: &std::path::Path) -> Result<(), PipelineError> {
    std::fs::create_dir_all(path).map_err(|source| PipelineError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
