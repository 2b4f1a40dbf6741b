//! Turntable Benchmark Suite
//!
//! Performance targets:
//!   level_from_experience ............ < 1μs
//!   add_experience_multi_level ....... < 1μs
//!   vinyl_record_frame_update ........ < 5μs

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use turntable_client::engine::{Camera, KeyboardState, MeshCache};
use turntable_client::scene::TransformTree;
use turntable_client::{ClientConfig, FrameContext, VinylRecord};
use turntable_core::leveling::LevelCurve;
use turntable_core::profile::Profile;

/// Benchmark: Level lookup from a large experience total (target: < 1μs).
fn bench_level_from_experience(c: &mut Criterion) {
    let curve = LevelCurve::default();
    c.bench_function("level_from_experience", |b| {
        b.iter(|| black_box(curve.level_from_experience(black_box(987_654_321))));
    });
}

/// Benchmark: A grant that crosses several levels (target: < 1μs).
fn bench_add_experience(c: &mut Criterion) {
    let curve = LevelCurve::default();
    c.bench_function("add_experience_multi_level", |b| {
        b.iter(|| {
            let mut profile = Profile::new();
            black_box(profile.add_experience(black_box(250_000), &curve));
        });
    });
}

/// Benchmark: One frame of prop animation and uniform upload (target: < 5μs).
fn bench_vinyl_update(c: &mut Criterion) {
    let config = ClientConfig::default();
    let mut transforms = TransformTree::new();
    let mut meshes = MeshCache::new();
    let mut record = VinylRecord::new(&config.prop, &config.lighting, &mut meshes, &mut transforms)
        .expect("prop");
    let keys = KeyboardState::new();
    let camera = Camera::default();

    c.bench_function("vinyl_record_frame_update", |b| {
        b.iter(|| {
            let frame = FrameContext {
                delta_seconds: black_box(1.0 / 60.0),
                time_seconds: 10.0,
                camera: &camera,
                input: &keys,
            };
            record.update(&frame, &mut transforms);
        });
    });
}

criterion_group!(
    benches,
    bench_level_from_experience,
    bench_add_experience,
    bench_vinyl_update,
);
criterion_main!(benches);
