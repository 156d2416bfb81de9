use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use era5_density::{compute_batch, Observation};

fn synthetic_observations(count: usize) -> Vec<Observation> {
    let start = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            Observation::new(
                start + Duration::hours(i as i64),
                3.0 + (i % 17) as f64 * 0.25,
                -4.0 + (i % 11) as f64 * 0.5,
                260.0 + (i % 40) as f64,
                98_000.0 + (i % 500) as f64 * 10.0,
            )
        })
        .collect()
}

fn bench_compute_batch(c: &mut Criterion) {
    // One year of hourly observations.
    let observations = synthetic_observations(8760);
    c.bench_function("compute_batch_one_year_hourly", |b| {
        b.iter(|| compute_batch(black_box(observations.clone())))
    });
}

criterion_group!(benches, bench_compute_batch);
criterion_main!(benches);
