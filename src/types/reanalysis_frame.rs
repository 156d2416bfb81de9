//! Contains the `ReanalysisLazyFrame` structure for lazy operations on
//! retrieved reanalysis data.

use crate::retrieval::error::RetrievalError;
use crate::retrieval::request::COL_DATETIME;
use crate::types::observation::Observation;
use crate::types::variable::Variable;
use chrono::{DateTime, Utc};
use log::warn;
use polars::prelude::*;

/// A wrapper around a Polars `LazyFrame` holding hourly reanalysis data.
///
/// The frame carries one `datetime` column (timezone-naive UTC,
/// millisecond precision) plus one column per retrieved [`Variable`],
/// sorted by timestamp. Filtering methods stay lazy; only
/// [`collect_observations`](Self::collect_observations) materializes data.
///
/// Instances are obtained via [`crate::Era5::reanalysis`].
#[derive(Clone)]
pub struct ReanalysisLazyFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl ReanalysisLazyFrame {
    /// Wraps a `LazyFrame` assumed to follow the reanalysis schema.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Applies an arbitrary Polars predicate lazily.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use era5_density::{Era5, Area, LatLon};
    /// use polars::prelude::{col, lit};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Era5::new().await?;
    /// let frame = client
    ///     .reanalysis()
    ///     .area(Area::around(LatLon(49.5, -98.125)))
    ///     .years(vec![2020])
    ///     .call()
    ///     .await?;
    ///
    /// // Keep only hours with surface pressure above one bar.
    /// let high_pressure = frame.filter(col("sp").gt(lit(100_000.0f64)));
    /// let df = high_pressure.frame.collect()?;
    /// println!("{}", df);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> ReanalysisLazyFrame {
        ReanalysisLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Restricts the frame to timestamps within `[start, end]`, inclusive.
    ///
    /// The bounds are converted to timezone-naive UTC for comparison with
    /// the frame's `datetime` column.
    pub fn get_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> ReanalysisLazyFrame {
        let start_naive = start.naive_utc();
        let end_naive = end.naive_utc();

        self.filter(
            col(COL_DATETIME)
                .gt_eq(lit(start_naive))
                .and(col(COL_DATETIME).lt_eq(lit(end_naive))),
        )
    }

    /// Collects the frame and converts each row into an [`Observation`].
    ///
    /// Rows with a missing value in any required column are skipped with a
    /// logged diagnostic rather than failing the whole series; order is
    /// preserved among the surviving rows.
    pub fn collect_observations(&self) -> Result<Vec<Observation>, RetrievalError> {
        let df = self.frame.clone().collect()?;
        observations_from_dataframe(&df)
    }
}

pub(crate) fn observations_from_dataframe(
    df: &DataFrame,
) -> Result<Vec<Observation>, RetrievalError> {
    let datetime = datetime_column(df)?;
    let u_wind = float_column(df, Variable::WindU100.column())?;
    let v_wind = float_column(df, Variable::WindV100.column())?;
    let temperature = float_column(df, Variable::Temperature2m.column())?;
    let pressure = float_column(df, Variable::SurfacePressure.column())?;

    let mut observations = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let fields = (
            datetime_value(datetime, row),
            u_wind.get(row),
            v_wind.get(row),
            temperature.get(row),
            pressure.get(row),
        );
        match fields {
            (Some(timestamp), Some(u), Some(v), Some(t), Some(p)) => {
                observations.push(Observation::new(timestamp, u, v, t, p));
            }
            _ => warn!("Skipping row {} with missing values", row),
        }
    }
    Ok(observations)
}

fn float_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked, RetrievalError> {
    df.column(name)
        .map_err(|e| RetrievalError::ColumnNotFound(name.to_string(), e))?
        .f64()
        .map_err(RetrievalError::DataFrameProcessing)
}

fn datetime_column(df: &DataFrame) -> Result<&DatetimeChunked, RetrievalError> {
    df.column(COL_DATETIME)
        .map_err(|e| RetrievalError::ColumnNotFound(COL_DATETIME.to_string(), e))?
        .datetime()
        .map_err(RetrievalError::DataFrameProcessing)
}

fn datetime_value(ca: &DatetimeChunked, row: usize) -> Option<DateTime<Utc>> {
    let raw = ca.get(row)?;
    match ca.time_unit() {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(raw),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(raw)),
    }
}
