//! Turns raw archive downloads into cached, query-ready frames.

use crate::retrieval::cds_client::CdsClient;
use crate::retrieval::error::RetrievalError;
use crate::retrieval::request::{DataRequest, COL_DATETIME};
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

const RAW_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct ReanalysisLoader {
    cache_dir: PathBuf,
    client: CdsClient,
}

impl ReanalysisLoader {
    pub fn new(cache_dir: &Path, client: CdsClient) -> ReanalysisLoader {
        ReanalysisLoader {
            cache_dir: cache_dir.to_path_buf(),
            client,
        }
    }

    /// Loads the frame for a request. Handles caching and downloading.
    /// Returns a LazyFrame with the request's column names and a sorted,
    /// typed timestamp column.
    pub async fn get_frame(&self, request: &DataRequest) -> Result<LazyFrame, RetrievalError> {
        let slug = request.cache_slug();
        let parquet_path = self.cache_dir.join(format!("{slug}.parquet"));

        if fs::metadata(&parquet_path).await.is_ok() {
            info!("Cache hit for request '{}' at {:?}", slug, parquet_path);
        } else {
            warn!(
                "Cache miss for request '{}'. Downloading and processing.",
                slug
            );

            let raw_bytes = self.client.retrieve(request).await?;
            let df = Self::csv_to_dataframe(raw_bytes, request).await?;

            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|e| RetrievalError::CacheDirCreation(self.cache_dir.clone(), e))?;

            Self::cache_dataframe(df, &parquet_path).await?;
            info!("Cached request '{}' to {:?}", slug, parquet_path);
        }

        LazyFrame::scan_parquet(&parquet_path, Default::default())
            .map_err(|e| RetrievalError::ParquetScan(parquet_path.clone(), e))
    }

    /// Parses raw headerless CSV bytes into a DataFrame using a blocking
    /// task, names the columns per the request, and normalizes timestamps.
    async fn csv_to_dataframe(
        bytes: Vec<u8>,
        request: &DataRequest,
    ) -> Result<DataFrame, RetrievalError> {
        let slug = request.cache_slug();
        let schema_names = request.schema_column_names();

        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new().map_err(|e| RetrievalError::CsvReadIo {
                slug: slug.clone(),
                source: e,
            })?;
            temp_file
                .write_all(&bytes)
                .map_err(|e| RetrievalError::CsvReadIo {
                    slug: slug.clone(),
                    source: e,
                })?;
            temp_file.flush().map_err(|e| RetrievalError::CsvReadIo {
                slug: slug.clone(),
                source: e,
            })?;

            let mut df = CsvReadOptions::default()
                .with_has_header(false)
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(|e| RetrievalError::CsvReadPolars {
                    slug: slug.clone(),
                    source: e,
                })?
                .finish()
                .map_err(|e| RetrievalError::CsvReadPolars {
                    slug: slug.clone(),
                    source: e,
                })?;

            if df.width() != schema_names.len() {
                warn!(
                    "CSV column count ({}) does not match requested schema length ({}) for request '{}'",
                    df.width(),
                    schema_names.len(),
                    slug
                );
                return Err(RetrievalError::SchemaMismatch {
                    slug,
                    expected: schema_names.len(),
                    found: df.width(),
                });
            }

            df.set_column_names(schema_names.iter().copied())
                .map_err(|e| RetrievalError::ColumnRename {
                    slug: slug.clone(),
                    source: e,
                })?;

            Self::normalize_timestamps(df, &slug)
        })
        .await?
    }

    /// Parses the raw timestamp strings into a millisecond datetime column
    /// and sorts on it, so downstream consumers see a monotonically
    /// non-decreasing series.
    fn normalize_timestamps(df: DataFrame, slug: &str) -> Result<DataFrame, RetrievalError> {
        df.lazy()
            .with_columns([col(COL_DATETIME).str().to_datetime(
                Some(TimeUnit::Milliseconds),
                None,
                StrptimeOptions {
                    format: Some(RAW_DATETIME_FORMAT.into()),
                    ..Default::default()
                },
                lit("raise"),
            )])
            .sort([COL_DATETIME], Default::default())
            .collect()
            .map_err(|e| RetrievalError::CsvReadPolars {
                slug: slug.to_string(),
                source: e,
            })
    }

    /// Writes a DataFrame to a parquet file using spawn_blocking.
    async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), RetrievalError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let file = std::fs::File::create(&path_buf)
                .map_err(|e| RetrievalError::ParquetWriteIo(path_buf.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| RetrievalError::ParquetWritePolars(path_buf, e))?;
            Ok::<(), RetrievalError>(())
        })
        .await??;
        Ok(())
    }
}
