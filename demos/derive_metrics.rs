//! Derives metrics for hand-entered observations; no network needed.

use chrono::{TimeZone, Utc};
use era5_density::{compute, compute_with, DensityMethod, Observation};

fn main() {
    let observation = Observation::new(
        Utc.with_ymd_and_hms(2023, 1, 21, 13, 0, 0).unwrap(),
        3.0,
        4.0,
        288.15,
        101_325.0,
    );

    let record = compute(&observation).expect("observation is physically valid");
    println!("wind speed:                 {:.2} m/s", record.wind_speed);
    println!("dry-air density:            {:.4} kg/m³", record.air_density);

    let humid = compute_with(
        &observation.with_relative_humidity(0.8),
        DensityMethod::HumidityCorrected,
    )
    .expect("observation is physically valid");
    println!("humidity-corrected density: {:.4} kg/m³", humid.air_density);
}
