//! Describes one retrieval against the reanalysis archive.

use crate::types::area::Area;
use crate::types::variable::Variable;
use serde_json::{json, Value};

/// Dataset identifier for ERA5 hourly data on single levels.
pub const DEFAULT_DATASET: &str = "reanalysis-era5-single-levels";

/// Name of the timestamp column in loaded frames.
pub(crate) const COL_DATETIME: &str = "datetime";

/// A single archive request: which variables, over which period, where.
///
/// Requests are value objects; the same request always produces the same
/// API body and the same cache key, so results can be cached on disk and
/// reused across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    /// Archive dataset identifier.
    pub dataset: String,
    /// Variables to retrieve.
    pub variables: Vec<Variable>,
    /// Calendar years to cover.
    pub years: Vec<i32>,
    /// Calendar months to cover, 1–12.
    pub months: Vec<u32>,
    /// Bounding box of the retrieval.
    pub area: Area,
}

impl DataRequest {
    /// A request for the default variable set over every hour of the
    /// given years.
    pub fn new(area: Area, years: Vec<i32>) -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            variables: Variable::default_set(),
            years,
            months: (1..=12).collect(),
            area,
        }
    }

    /// Replaces the variable selection.
    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    /// Replaces the month selection (1–12).
    pub fn with_months(mut self, months: Vec<u32>) -> Self {
        self.months = months;
        self
    }

    /// JSON body for the archive's retrieve endpoint. Every day and hour
    /// is requested; the archive drops days that do not exist in a month.
    pub(crate) fn to_body(&self) -> Value {
        json!({
            "product_type": "reanalysis",
            "variable": self.variables.iter().map(|v| v.api_name()).collect::<Vec<_>>(),
            "year": self.years.iter().map(|y| y.to_string()).collect::<Vec<_>>(),
            "month": self.months.iter().map(|m| format!("{m:02}")).collect::<Vec<_>>(),
            "day": all_days(),
            "time": all_times(),
            "area": self.area.to_bounds(),
            "format": "csv",
        })
    }

    /// Stable cache identifier: dataset, year span, and area corner.
    pub(crate) fn cache_slug(&self) -> String {
        let first = self.years.iter().min().copied().unwrap_or(0);
        let last = self.years.iter().max().copied().unwrap_or(0);
        format!("{}-{}-{}-{}", self.dataset, first, last, self.area.slug())
    }

    /// Column layout of the flattened CSV the archive returns: the
    /// timestamp first, then one column per requested variable.
    pub(crate) fn schema_column_names(&self) -> Vec<&'static str> {
        let mut names = vec![COL_DATETIME];
        names.extend(self.variables.iter().map(|v| v.column()));
        names
    }
}

fn all_days() -> Vec<String> {
    (1..=31).map(|d| format!("{d:02}")).collect()
}

fn all_times() -> Vec<String> {
    (0..24).map(|h| format!("{h:02}:00")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::area::LatLon;

    fn sample_request() -> DataRequest {
        DataRequest::new(Area::around(LatLon(49.5, -98.125)), vec![2001, 2002, 2003])
    }

    #[test]
    fn body_carries_full_hourly_coverage() {
        let body = sample_request().to_body();
        assert_eq!(body["product_type"], "reanalysis");
        assert_eq!(body["format"], "csv");
        assert_eq!(body["year"][0], "2001");
        assert_eq!(body["month"].as_array().unwrap().len(), 12);
        assert_eq!(body["day"].as_array().unwrap().len(), 31);
        assert_eq!(body["time"].as_array().unwrap().len(), 24);
        assert_eq!(body["day"][0], "01");
        assert_eq!(body["time"][0], "00:00");
        assert_eq!(body["time"][23], "23:00");
    }

    #[test]
    fn body_names_variables_for_the_api() {
        let body = sample_request().to_body();
        let variables = body["variable"].as_array().unwrap();
        assert_eq!(variables.len(), 4);
        assert_eq!(variables[0], "100m_u_component_of_wind");
        assert_eq!(variables[3], "surface_pressure");
    }

    #[test]
    fn body_orders_area_north_west_south_east() {
        let body = sample_request().to_body();
        let area = body["area"].as_array().unwrap();
        assert_eq!(area[0], 49.5);
        assert_eq!(area[1], -98.125);
    }

    #[test]
    fn cache_slug_is_deterministic() {
        assert_eq!(sample_request().cache_slug(), sample_request().cache_slug());
        assert_eq!(
            sample_request().cache_slug(),
            "reanalysis-era5-single-levels-2001-2003-49.500_-98.125"
        );
    }

    #[test]
    fn schema_starts_with_timestamp_column() {
        let names = sample_request().schema_column_names();
        assert_eq!(names, ["datetime", "u100", "v100", "t2m", "sp"]);
    }
}
