use std::fmt;
use thiserror::Error;

/// Identifies which measurement of an observation failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementField {
    Temperature,
    Pressure,
    RelativeHumidity,
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasurementField::Temperature => "temperature",
            MeasurementField::Pressure => "pressure",
            MeasurementField::RelativeHumidity => "relative humidity",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error("Invalid {field} measurement {value}: must be {constraint}")]
    InvalidMeasurement {
        field: MeasurementField,
        value: f64,
        constraint: &'static str,
    },
}
