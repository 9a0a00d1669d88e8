use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use clockfit::linear_fit::{TrajectoryModel, TrendLine};
use clockfit::samples::{DeletionPolicy, Sample, SampleStore};
use clockfit::time::{reading_from_raw_text, ClockReading};

/// Noisy constant-velocity track starting at 10:00:00, one mark per second.
fn make_track(rng: &mut StdRng, n: usize) -> Vec<(ClockReading, Point2<f64>)> {
    (0..n)
        .map(|i| {
            let t = i as u32;
            let reading = ClockReading::from_hms(10, t / 60 % 60, t % 60).unwrap();
            let x = 100.0 + 3.0 * i as f64 + rng.random_range(-0.5..0.5);
            let y = 400.0 - 2.0 * i as f64 + rng.random_range(-0.5..0.5);
            (reading, Point2::new(x, y))
        })
        .collect()
}

fn bench_trajectory_fit(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC10C);

    for n in [2usize, 16, 256] {
        let track = make_track(&mut rng, n);
        c.bench_function(&format!("trajectory_fit/n={n}"), |b| {
            b.iter(|| {
                let model = TrajectoryModel::fit(black_box(&track)).unwrap();
                black_box(model.position_at(black_box(36_600.0)))
            })
        });
    }
}

fn bench_trend_line(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x7E4D);
    let positions: Vec<_> = make_track(&mut rng, 256)
        .into_iter()
        .map(|(_, p)| p)
        .collect();

    c.bench_function("trend_line/n=256", |b| {
        b.iter(|| black_box(TrendLine::fit(black_box(positions.iter().copied())).unwrap()))
    });
}

fn bench_remove_nearest(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDE1E7E);
    let track = make_track(&mut rng, 256);

    c.bench_function("remove_nearest/n=256", |b| {
        b.iter_batched(
            || {
                let mut store = SampleStore::new();
                for (reading, p) in &track {
                    store.push(Sample::with_reading(*p, *reading));
                }
                store
            },
            |mut store| {
                black_box(
                    store.remove_nearest(&Point2::new(500.0, 150.0), DeletionPolicy::RemoveSingle),
                )
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_clock_extraction(c: &mut Criterion) {
    let raw = "CAM-02  2024/05/11  13:07:42  REC\n";
    c.bench_function("clock_from_raw_text", |b| {
        b.iter(|| black_box(reading_from_raw_text(black_box(raw)).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_trajectory_fit,
    bench_trend_line,
    bench_remove_nearest,
    bench_clock_extraction
);
criterion_main!(benches);
