//! Flat CSV export of derived records.

use crate::types::observation::DerivedRecord;
use log::info;
use polars::error::PolarsError;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The exported columns, in their stable documented order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "timestamp",
    "u_wind",
    "v_wind",
    "temperature",
    "pressure",
    "wind_speed",
    "air_density",
];

const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create export file '{0}'")]
    FileCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to build export DataFrame")]
    FrameBuild(#[source] PolarsError),

    #[error("Failed to write CSV export")]
    CsvWrite(#[source] PolarsError),
}

/// Builds the flat export table from derived records.
///
/// The columns are exactly [`EXPORT_COLUMNS`], in that order; timestamps
/// are stored as timezone-naive UTC datetimes.
pub fn records_to_dataframe(records: &[DerivedRecord]) -> Result<DataFrame, ExportError> {
    let timestamps: Vec<chrono::NaiveDateTime> =
        records.iter().map(|r| r.timestamp.naive_utc()).collect();

    df!(
        EXPORT_COLUMNS[0] => timestamps,
        EXPORT_COLUMNS[1] => records.iter().map(|r| r.u_wind).collect::<Vec<_>>(),
        EXPORT_COLUMNS[2] => records.iter().map(|r| r.v_wind).collect::<Vec<_>>(),
        EXPORT_COLUMNS[3] => records.iter().map(|r| r.temperature).collect::<Vec<_>>(),
        EXPORT_COLUMNS[4] => records.iter().map(|r| r.pressure).collect::<Vec<_>>(),
        EXPORT_COLUMNS[5] => records.iter().map(|r| r.wind_speed).collect::<Vec<_>>(),
        EXPORT_COLUMNS[6] => records.iter().map(|r| r.air_density).collect::<Vec<_>>(),
    )
    .map_err(ExportError::FrameBuild)
}

/// Writes derived records to a CSV file with a header row.
///
/// An empty record slice produces a header-only file; an exhausted batch
/// is a valid (if empty) result, not an error.
pub fn write_csv(records: &[DerivedRecord], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut df = records_to_dataframe(records)?;

    let file =
        File::create(path).map_err(|e| ExportError::FileCreation(path.to_path_buf(), e))?;
    CsvWriter::new(file)
        .include_header(true)
        .with_datetime_format(Some(EXPORT_DATETIME_FORMAT.to_string()))
        .finish(&mut df)
        .map_err(ExportError::CsvWrite)?;

    info!(
        "Exported {} derived records to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_records() -> Vec<DerivedRecord> {
        vec![
            DerivedRecord {
                timestamp: Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(),
                u_wind: 3.0,
                v_wind: 4.0,
                temperature: 288.15,
                pressure: 101_325.0,
                wind_speed: 5.0,
                air_density: 1.225,
            },
            DerivedRecord {
                timestamp: Utc.with_ymd_and_hms(2001, 1, 1, 1, 0, 0).unwrap(),
                u_wind: 1.0,
                v_wind: 2.0,
                temperature: 280.0,
                pressure: 100_000.0,
                wind_speed: 5.0_f64.sqrt(),
                air_density: 1.244,
            },
        ]
    }

    #[test]
    fn dataframe_has_documented_column_order() {
        let df = records_to_dataframe(&sample_records()).unwrap();
        assert_eq!(df.get_column_names(), EXPORT_COLUMNS);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("derived.csv");

        write_csv(&sample_records(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,u_wind,v_wind,temperature,pressure,wind_speed,air_density")
        );
        let first_row = lines.next().unwrap();
        assert!(first_row.starts_with("2001-01-01 00:00:00,3.0,4.0,"));
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn empty_records_write_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_csv(&[], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
