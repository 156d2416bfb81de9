//! End-to-end pipeline: fetch two decades of hourly reanalysis data for a
//! wind site, derive wind speed and air density, and export to CSV.
//!
//! Requires Climate Data Store credentials (CDSAPI_KEY or ~/.cdsapirc).

use era5_density::{compute_batch, write_csv, Area, Era5, Era5DensityError, LatLon};

#[tokio::main]
async fn main() -> Result<(), Era5DensityError> {
    let client = Era5::new().await?;

    // St. Leon, Manitoba.
    let site = Area::around(LatLon(49.5, -98.125));

    let frame = client
        .reanalysis()
        .area(site)
        .years((2001..=2020).collect())
        .call()
        .await?;

    let observations = frame.collect_observations()?;
    println!("Fetched {} hourly observations", observations.len());

    let outcome = compute_batch(observations);
    if outcome.skipped_count() > 0 {
        println!("Skipped {} invalid observations", outcome.skipped_count());
    }

    write_csv(&outcome.records, "era5_site_derived.csv")?;
    println!(
        "Wrote {} rows to era5_site_derived.csv",
        outcome.records.len()
    );

    Ok(())
}
