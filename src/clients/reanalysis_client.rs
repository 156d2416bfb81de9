//! Provides the `ReanalysisClient` for initiating ERA5 single-levels
//! retrievals.
//!
//! This client acts as an intermediate builder, obtained via
//! [`Era5::reanalysis()`], allowing the user to specify the spatial and
//! temporal selection before executing the request against the archive.

use crate::retrieval::error::RetrievalError;
use crate::retrieval::request::DataRequest;
use crate::types::area::Area;
use crate::types::reanalysis_frame::ReanalysisLazyFrame;
use crate::types::variable::Variable;
use crate::{Era5, Era5DensityError};
use bon::bon;
use polars::prelude::{concat, LazyFrame, UnionArgs};

/// Years fetched per archive request. Long selections are split into
/// blocks of this size to keep individual result files manageable, and
/// each block is cached separately.
pub(crate) const YEARS_PER_REQUEST: usize = 3;

/// A client builder for fetching hourly reanalysis data.
///
/// Instances are created by calling [`Era5::reanalysis()`]. The builder
/// requires an [`Area`] and a year selection; variables and months default
/// to the full derived-metrics set over the whole calendar.
///
/// Calling `.call().await` executes the request (per cached year block)
/// and returns a [`ReanalysisLazyFrame`].
pub struct ReanalysisClient<'a> {
    client: &'a Era5,
}

#[bon]
impl<'a> ReanalysisClient<'a> {
    /// Creates a new `ReanalysisClient`.
    ///
    /// This is typically called internally by [`Era5::reanalysis()`] and
    /// not directly by users.
    pub(crate) fn new(client: &'a Era5) -> Self {
        Self { client }
    }

    /// Initiates a builder to fetch reanalysis data for a bounding box.
    ///
    /// # Arguments (Initial Builder Method)
    ///
    /// * `area` - The [`Area`] to retrieve, passed to the initial
    ///   `.area()` call. Use [`Area::around`] for a single site.
    ///
    /// # Required Builder Methods
    ///
    /// * `.years(Vec<i32>)`: The calendar years to cover. Years are
    ///   deduplicated, sorted, and fetched in blocks of three, matching
    ///   the archive's practical result-size limits; each block lands in
    ///   the on-disk cache independently.
    ///
    /// # Optional Builder Methods
    ///
    /// * `.variables(Vec<Variable>)`: Restricts or extends the retrieved
    ///   variable set. Defaults to [`Variable::default_set`].
    /// * `.months(Vec<u32>)`: Restricts the calendar months (1–12).
    ///   Defaults to all twelve.
    ///
    /// # Returns
    ///
    /// After `.call().await`, a `Result` containing a
    /// [`ReanalysisLazyFrame`] over the concatenated year blocks, or an
    /// [`Era5DensityError`] on failure.
    ///
    /// # Errors
    ///
    /// * [`RetrievalError::EmptyYearSelection`] if `years` is empty.
    /// * [`Era5DensityError::Retrieval`] variants for credential, network,
    ///   archive-task, parse, or cache failures on any block.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use era5_density::{Era5, Era5DensityError, Area, LatLon};
    /// #
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Era5DensityError> {
    /// let client = Era5::new().await?;
    ///
    /// let frame = client
    ///     .reanalysis()
    ///     .area(Area::around(LatLon(49.5, -98.125)))
    ///     .years((2001..=2006).collect())
    ///     .call()
    ///     .await?;
    ///
    /// let observations = frame.collect_observations()?;
    /// println!("Fetched {} hourly observations", observations.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = area)]
    #[doc(hidden)]
    pub async fn build_area(
        &self,
        #[builder(start_fn)] area: Area,
        years: Vec<i32>,
        variables: Option<Vec<Variable>>,
        months: Option<Vec<u32>>,
    ) -> Result<ReanalysisLazyFrame, Era5DensityError> {
        if years.is_empty() {
            return Err(RetrievalError::EmptyYearSelection.into());
        }

        let variables = variables.unwrap_or_else(Variable::default_set);
        let months = months.unwrap_or_else(|| (1..=12).collect());

        let mut frames: Vec<LazyFrame> = Vec::new();
        for block in year_blocks(&years, YEARS_PER_REQUEST) {
            let request = DataRequest::new(area, block)
                .with_variables(variables.clone())
                .with_months(months.clone());
            let frame = self.client.fetcher().get_cache_lazyframe(&request).await?;
            frames.push(frame);
        }

        let combined = concat(frames, UnionArgs::default())
            .map_err(|e| Era5DensityError::Retrieval(RetrievalError::DataFrameProcessing(e)))?;
        Ok(ReanalysisLazyFrame::new(combined))
    }
}

/// Splits a year selection into sorted, deduplicated retrieval blocks.
pub(crate) fn year_blocks(years: &[i32], block_size: usize) -> Vec<Vec<i32>> {
    let mut sorted: Vec<i32> = years.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.chunks(block_size).map(|c| c.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_blocks_chunks_in_request_sized_groups() {
        let blocks = year_blocks(&[2001, 2002, 2003, 2004, 2005, 2006, 2007], 3);
        assert_eq!(
            blocks,
            vec![
                vec![2001, 2002, 2003],
                vec![2004, 2005, 2006],
                vec![2007]
            ]
        );
    }

    #[test]
    fn year_blocks_sorts_and_deduplicates() {
        let blocks = year_blocks(&[2003, 2001, 2001, 2002], 3);
        assert_eq!(blocks, vec![vec![2001, 2002, 2003]]);
    }

    #[test]
    fn year_blocks_of_empty_selection_is_empty() {
        assert!(year_blocks(&[], 3).is_empty());
    }
}
