use crate::density::error::ComputeError;
use crate::export::ExportError;
use crate::retrieval::error::RetrievalError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Era5DensityError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
