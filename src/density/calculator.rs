//! Derived wind-resource metrics: wind speed and air density.
//!
//! Everything in this module is a pure function of its arguments. No state
//! is carried between calls, so the functions can be used from concurrent
//! tasks without synchronization, and repeated calls on the same input
//! produce bit-identical results.

use crate::density::error::{ComputeError, MeasurementField};
use crate::types::observation::{BatchOutcome, DerivedRecord, Observation, SkippedObservation};
use log::warn;

/// Specific gas constant of dry air, J/(kg·K).
pub const R_DRY_AIR: f64 = 287.05;

/// Specific gas constant of water vapor, J/(kg·K).
pub const R_WATER_VAPOR: f64 = 461.5;

/// Relative humidity assumed when an observation carries no measurement
/// and the humidity-corrected method is selected.
pub const DEFAULT_RELATIVE_HUMIDITY: f64 = 0.5;

/// Selects the air density formula applied by [`compute_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DensityMethod {
    /// Ideal-gas relation for dry air: `ρ = p / (R_DRY_AIR × T)`.
    #[default]
    DryAir,
    /// The IEC 61400-12 variant that subtracts the water vapor
    /// contribution, using the observation's relative humidity or
    /// [`DEFAULT_RELATIVE_HUMIDITY`] when none was measured.
    HumidityCorrected,
}

/// Magnitude of the horizontal wind vector, m/s.
///
/// # Examples
///
/// ```
/// use era5_density::wind_speed;
///
/// assert_eq!(wind_speed(3.0, 4.0), 5.0);
/// assert_eq!(wind_speed(0.0, 0.0), 0.0);
/// ```
pub fn wind_speed(u_wind: f64, v_wind: f64) -> f64 {
    (u_wind * u_wind + v_wind * v_wind).sqrt()
}

fn check_positive(field: MeasurementField, value: f64) -> Result<(), ComputeError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ComputeError::InvalidMeasurement {
            field,
            value,
            constraint: "> 0",
        })
    }
}

/// Dry-air density from the ideal gas law, kg/m³.
///
/// Temperature is in kelvin, pressure in pascals; both must be positive,
/// otherwise the call fails with [`ComputeError::InvalidMeasurement`]
/// naming the offending field.
///
/// # Examples
///
/// ```
/// use era5_density::air_density;
///
/// let rho = air_density(288.15, 101_325.0).unwrap();
/// assert!((rho - 1.225).abs() < 1e-3);
/// ```
pub fn air_density(temperature: f64, pressure: f64) -> Result<f64, ComputeError> {
    check_positive(MeasurementField::Temperature, temperature)?;
    check_positive(MeasurementField::Pressure, pressure)?;
    Ok(pressure / (R_DRY_AIR * temperature))
}

/// Air density corrected for water vapor content, kg/m³, per IEC 61400-12.
///
/// The vapor pressure is approximated as `0.0000205 · exp(0.0631846 · T)`
/// and weighted by the relative humidity, which must lie within the 0–1
/// range. At zero humidity this reduces to the dry-air relation.
pub fn air_density_with_humidity(
    temperature: f64,
    pressure: f64,
    relative_humidity: f64,
) -> Result<f64, ComputeError> {
    check_positive(MeasurementField::Temperature, temperature)?;
    check_positive(MeasurementField::Pressure, pressure)?;
    if !(0.0..=1.0).contains(&relative_humidity) {
        return Err(ComputeError::InvalidMeasurement {
            field: MeasurementField::RelativeHumidity,
            value: relative_humidity,
            constraint: "within 0..=1",
        });
    }

    let vapor_pressure = 0.000_020_5 * (0.063_184_6 * temperature).exp();
    Ok((1.0 / temperature)
        * (pressure / R_DRY_AIR
            - relative_humidity * vapor_pressure * (1.0 / R_DRY_AIR - 1.0 / R_WATER_VAPOR)))
}

/// Transforms a raw observation into an analysis-ready record using the
/// dry-air density method.
///
/// Pure function: no side effects beyond the returned record, and calling
/// it twice on the same observation yields bit-identical results.
///
/// # Errors
///
/// Fails with [`ComputeError::InvalidMeasurement`] when the observation's
/// temperature or pressure is not positive, regardless of the wind
/// components.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use era5_density::{compute, Observation};
///
/// let observation = Observation::new(
///     Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
///     3.0,
///     4.0,
///     288.15,
///     101_325.0,
/// );
/// let record = compute(&observation).unwrap();
/// assert_eq!(record.wind_speed, 5.0);
/// assert!((record.air_density - 1.225).abs() < 1e-3);
/// ```
pub fn compute(observation: &Observation) -> Result<DerivedRecord, ComputeError> {
    compute_with(observation, DensityMethod::DryAir)
}

/// Like [`compute`], with an explicit choice of density formula.
pub fn compute_with(
    observation: &Observation,
    method: DensityMethod,
) -> Result<DerivedRecord, ComputeError> {
    let density = match method {
        DensityMethod::DryAir => air_density(observation.temperature, observation.pressure)?,
        DensityMethod::HumidityCorrected => {
            let humidity = observation
                .relative_humidity
                .unwrap_or(DEFAULT_RELATIVE_HUMIDITY);
            air_density_with_humidity(observation.temperature, observation.pressure, humidity)?
        }
    };

    Ok(DerivedRecord {
        timestamp: observation.timestamp,
        u_wind: observation.u_wind,
        v_wind: observation.v_wind,
        temperature: observation.temperature,
        pressure: observation.pressure,
        wind_speed: wind_speed(observation.u_wind, observation.v_wind),
        air_density: density,
    })
}

/// Computes derived records for a whole series using the dry-air method.
///
/// Input order is preserved among the successfully computed records. An
/// observation that fails validation is dropped from the output, logged,
/// and reported in the outcome's `skipped` list; it never aborts the rest
/// of the batch.
pub fn compute_batch<I>(observations: I) -> BatchOutcome
where
    I: IntoIterator<Item = Observation>,
{
    compute_batch_with(observations, DensityMethod::DryAir)
}

/// Like [`compute_batch`], with an explicit choice of density formula.
pub fn compute_batch_with<I>(observations: I, method: DensityMethod) -> BatchOutcome
where
    I: IntoIterator<Item = Observation>,
{
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (index, observation) in observations.into_iter().enumerate() {
        match compute_with(&observation, method) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(
                    "Skipping observation {} at {}: {}",
                    index, observation.timestamp, error
                );
                skipped.push(SkippedObservation {
                    index,
                    timestamp: observation.timestamp,
                    error,
                });
            }
        }
    }

    BatchOutcome { records, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 21, 13, 0, 0).unwrap()
    }

    fn valid_observation() -> Observation {
        Observation::new(sample_time(), 3.0, 4.0, 288.15, 101_325.0)
    }

    #[test]
    fn wind_speed_is_euclidean_norm() {
        assert_eq!(wind_speed(3.0, 4.0), 5.0);
        assert_eq!(wind_speed(-3.0, -4.0), 5.0);
        assert_eq!(wind_speed(0.0, -2.5), 2.5);
    }

    #[test]
    fn dry_air_density_matches_ideal_gas_law() {
        let record = compute(&valid_observation()).unwrap();
        assert_eq!(record.air_density, 101_325.0 / (R_DRY_AIR * 288.15));
        assert!((record.air_density - 1.2250).abs() < 1e-3);
    }

    #[test]
    fn compute_populates_all_fields_from_source() {
        let observation = valid_observation();
        let record = compute(&observation).unwrap();
        assert_eq!(record.timestamp, observation.timestamp);
        assert_eq!(record.u_wind, 3.0);
        assert_eq!(record.v_wind, 4.0);
        assert_eq!(record.temperature, 288.15);
        assert_eq!(record.pressure, 101_325.0);
        assert_eq!(record.wind_speed, 5.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let observation = valid_observation();
        let first = compute(&observation).unwrap();
        let second = compute(&observation).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.air_density.to_bits(),
            second.air_density.to_bits()
        );
        assert_eq!(first.wind_speed.to_bits(), second.wind_speed.to_bits());
    }

    #[test]
    fn non_positive_temperature_is_rejected() {
        let observation = Observation::new(sample_time(), 0.0, 0.0, 0.0, 101_325.0);
        let error = compute(&observation).unwrap_err();
        assert_eq!(
            error,
            ComputeError::InvalidMeasurement {
                field: MeasurementField::Temperature,
                value: 0.0,
                constraint: "> 0",
            }
        );
    }

    #[test]
    fn non_positive_pressure_is_rejected() {
        let observation = Observation::new(sample_time(), 10.0, -10.0, 288.15, -5.0);
        let error = compute(&observation).unwrap_err();
        assert_eq!(
            error,
            ComputeError::InvalidMeasurement {
                field: MeasurementField::Pressure,
                value: -5.0,
                constraint: "> 0",
            }
        );
    }

    #[test]
    fn humidity_correction_reduces_to_dry_air_at_zero_humidity() {
        let dry = air_density(288.15, 101_325.0).unwrap();
        let corrected = air_density_with_humidity(288.15, 101_325.0, 0.0).unwrap();
        assert!((dry - corrected).abs() < 1e-12);
    }

    #[test]
    fn humid_air_is_less_dense_than_dry_air() {
        let dry = air_density(288.15, 101_325.0).unwrap();
        let corrected = air_density_with_humidity(288.15, 101_325.0, 1.0).unwrap();
        assert!(corrected < dry);
        // Roughly 1.218 kg/m³ at saturation and standard conditions.
        assert!((corrected - 1.218).abs() < 5e-3);
    }

    #[test]
    fn out_of_range_humidity_is_rejected() {
        let error = air_density_with_humidity(288.15, 101_325.0, 1.5).unwrap_err();
        assert_eq!(
            error,
            ComputeError::InvalidMeasurement {
                field: MeasurementField::RelativeHumidity,
                value: 1.5,
                constraint: "within 0..=1",
            }
        );
    }

    #[test]
    fn humidity_corrected_uses_default_when_unmeasured() {
        let observation = valid_observation();
        let default = compute_with(&observation, DensityMethod::HumidityCorrected).unwrap();
        let explicit = compute_with(
            &observation.with_relative_humidity(DEFAULT_RELATIVE_HUMIDITY),
            DensityMethod::HumidityCorrected,
        )
        .unwrap();
        assert_eq!(default, explicit);
    }

    #[test]
    fn batch_preserves_order_and_reports_skips() {
        let start = sample_time();
        let observations = vec![
            Observation::new(start, 1.0, 0.0, 280.0, 100_000.0),
            Observation::new(start + Duration::hours(1), 0.0, 0.0, 0.0, 101_325.0),
            Observation::new(start + Duration::hours(2), 2.0, 0.0, 285.0, 99_500.0),
        ];

        let outcome = compute_batch(observations);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].timestamp, start);
        assert_eq!(outcome.records[1].timestamp, start + Duration::hours(2));

        assert_eq!(outcome.skipped_count(), 1);
        assert_eq!(outcome.skipped[0].index, 1);
        assert_eq!(
            outcome.skipped[0].error,
            ComputeError::InvalidMeasurement {
                field: MeasurementField::Temperature,
                value: 0.0,
                constraint: "> 0",
            }
        );
    }

    #[test]
    fn all_invalid_batch_yields_empty_records_without_error() {
        let observations = vec![
            Observation::new(sample_time(), 1.0, 1.0, -1.0, 100_000.0),
            Observation::new(sample_time(), 1.0, 1.0, 280.0, 0.0),
        ];

        let outcome = compute_batch(observations);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped_count(), 2);
    }
}
