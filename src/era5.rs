//! This module provides the main entry point for fetching ERA5 reanalysis
//! data. It wires credentials, the on-disk cache, and the retrieval
//! pipeline together behind a small client struct.

use crate::clients::reanalysis_client::ReanalysisClient;
use crate::error::Era5DensityError;
use crate::retrieval::cds_client::CdsClient;
use crate::retrieval::credentials::CdsCredentials;
use crate::retrieval::frame_fetcher::FrameFetcher;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use std::path::PathBuf;

/// The main client struct for accessing ERA5 reanalysis data.
///
/// The client resolves Climate Data Store credentials, manages a local
/// parquet cache of downloaded results, and hands out request builders
/// via [`Era5::reanalysis`].
///
/// Create an instance using [`Era5::new()`] for default behavior (standard
/// cache directory, credentials from the environment or `~/.cdsapirc`) or
/// [`Era5::with_cache_folder()`] for custom cache locations.
///
/// # Examples
///
/// ```no_run
/// # use era5_density::{Era5, Era5DensityError};
/// # async fn run() -> Result<(), Era5DensityError> {
/// let client = Era5::new().await?;
/// // Use the client to fetch reanalysis data.
/// # Ok(())
/// # }
/// ```
pub struct Era5 {
    fetcher: FrameFetcher,
}

impl Era5 {
    /// Creates a client with a specified cache directory and credentials
    /// resolved from the environment or `~/.cdsapirc`.
    ///
    /// # Errors
    ///
    /// Returns [`Era5DensityError::CacheDirCreation`] if the directory
    /// cannot be created, and [`Era5DensityError::Retrieval`] variants if
    /// no credentials can be resolved.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, Era5DensityError> {
        let credentials = CdsCredentials::resolve()?;
        Self::with_cache_folder_and_credentials(cache_folder, credentials).await
    }

    /// Creates a client with explicit credentials, bypassing resolution.
    ///
    /// Useful when credentials come from somewhere other than the standard
    /// locations, e.g. a secret store in a larger application.
    pub async fn with_cache_folder_and_credentials(
        cache_folder: PathBuf,
        credentials: CdsCredentials,
    ) -> Result<Self, Era5DensityError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| Era5DensityError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            fetcher: FrameFetcher::new(&cache_folder, CdsClient::new(credentials)),
        })
    }

    /// Creates a client using the default cache directory.
    ///
    /// This is the simplest way to get started. The default cache
    /// directory is determined using the `dirs` crate, typically located
    /// in the user's cache directory (e.g. `~/.cache/era5_density_cache`
    /// on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`Era5DensityError::CacheDirResolution`] if the default
    /// cache directory cannot be found, plus the failure modes of
    /// [`Era5::with_cache_folder`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use era5_density::{Era5, Era5DensityError};
    /// # async fn run() -> Result<(), Era5DensityError> {
    /// let client = Era5::new().await?;
    /// // ... use client ...
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new() -> Result<Self, Era5DensityError> {
        let cache_folder = get_cache_dir().map_err(Era5DensityError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Returns a builder for hourly single-levels reanalysis retrievals.
    ///
    /// See [`ReanalysisClient`] for the available builder methods.
    pub fn reanalysis(&self) -> ReanalysisClient<'_> {
        ReanalysisClient::new(self)
    }

    pub(crate) fn fetcher(&self) -> &FrameFetcher {
        &self.fetcher
    }
}
