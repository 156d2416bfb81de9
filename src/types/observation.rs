//! Core data model: raw atmospheric samples and the records derived from them.

use crate::density::error::ComputeError;
use chrono::{DateTime, Utc};

/// One time/location sample of raw reanalysis variables.
///
/// Temperatures are absolute (kelvin), pressures in pascals, and the wind
/// components signed, in m/s. The optional relative humidity (0–1 range)
/// is not part of the single-levels retrieval and can be supplied from
/// site measurements when the humidity-corrected density method is used.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Sample time, UTC.
    pub timestamp: DateTime<Utc>,
    /// Eastward wind component, m/s.
    pub u_wind: f64,
    /// Northward wind component, m/s.
    pub v_wind: f64,
    /// Air temperature, kelvin. Must be positive to be computable.
    pub temperature: f64,
    /// Surface pressure, pascals. Must be positive to be computable.
    pub pressure: f64,
    /// Relative humidity in the 0–1 range, if measured.
    pub relative_humidity: Option<f64>,
}

impl Observation {
    /// Creates an observation without a humidity measurement.
    pub fn new(
        timestamp: DateTime<Utc>,
        u_wind: f64,
        v_wind: f64,
        temperature: f64,
        pressure: f64,
    ) -> Self {
        Self {
            timestamp,
            u_wind,
            v_wind,
            temperature,
            pressure,
            relative_humidity: None,
        }
    }

    /// Attaches a measured relative humidity (0–1 range).
    pub fn with_relative_humidity(mut self, relative_humidity: f64) -> Self {
        self.relative_humidity = Some(relative_humidity);
        self
    }
}

/// An analysis-ready record: one [`Observation`] plus its derived metrics.
///
/// The fields double as the CSV export schema; their order here is the
/// stable column order of the export:
/// `timestamp, u_wind, v_wind, temperature, pressure, wind_speed, air_density`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    /// Sample time, UTC.
    pub timestamp: DateTime<Utc>,
    /// Eastward wind component, m/s.
    pub u_wind: f64,
    /// Northward wind component, m/s.
    pub v_wind: f64,
    /// Air temperature, kelvin.
    pub temperature: f64,
    /// Surface pressure, pascals.
    pub pressure: f64,
    /// Magnitude of the horizontal wind vector, m/s. Non-negative.
    pub wind_speed: f64,
    /// Air density, kg/m³. Positive for valid inputs.
    pub air_density: f64,
}

/// An observation dropped during batch computation, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedObservation {
    /// Position of the observation in the input sequence.
    pub index: usize,
    /// Timestamp of the dropped observation.
    pub timestamp: DateTime<Utc>,
    /// The validation failure that caused the drop.
    pub error: ComputeError,
}

/// The result of a batch computation.
///
/// `records` preserves the input order of the successfully computed
/// observations; `skipped` holds the per-item failures. An outcome with
/// empty `records` is valid — total exhaustion of valid input is not an
/// error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Derived records, in input order.
    pub records: Vec<DerivedRecord>,
    /// Observations dropped for failing validation, in input order.
    pub skipped: Vec<SkippedObservation>,
}

impl BatchOutcome {
    /// Number of observations dropped from the batch.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn with_relative_humidity_sets_field() {
        let observation = Observation::new(
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            3.0,
            4.0,
            288.15,
            101_325.0,
        );
        assert_eq!(observation.relative_humidity, None);

        let with_humidity = observation.with_relative_humidity(0.8);
        assert_eq!(with_humidity.relative_humidity, Some(0.8));
    }
}
