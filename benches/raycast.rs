use bird_watch::audio::{AudioEngine, Sample};
use bird_watch::math::{click_to_ndc, hits_sphere, unproject_direction, Ray, HIT_RADIUS};
use bird_watch::render::{Canvas, Viewport};
use bird_watch::{create_city_scene, Mode, ObserveMode, Settings};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Mat4, UVec2, Vec3};
use std::sync::Arc;

/// Benchmark: discriminant test alone, hit and miss
fn bench_sphere_hit(c: &mut Criterion) {
    let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
    let hit = Vec3::new(0.0, 0.05, -10.0);
    let miss = Vec3::new(3.0, 0.0, -10.0);

    c.bench_function("sphere_hit", |b| {
        b.iter(|| hits_sphere(black_box(&ray), black_box(hit), HIT_RADIUS))
    });
    c.bench_function("sphere_miss", |b| {
        b.iter(|| hits_sphere(black_box(&ray), black_box(miss), HIT_RADIUS))
    });
}

/// Benchmark: pixel to world direction
fn bench_unproject(c: &mut Criterion) {
    let viewport = Viewport::new(1920, 1080);
    let projection = Mat4::perspective_infinite_rh(1.0, viewport.aspect(), 0.01);
    let world_to_local = Mat4::look_at_rh(Vec3::new(5.0, 5.0, 3.0), Vec3::ZERO, Vec3::Z);

    c.bench_function("unproject_direction", |b| {
        b.iter(|| {
            let ndc = click_to_ndc(black_box(811.0), black_box(402.0), viewport);
            unproject_direction(ndc, projection, world_to_local)
        })
    });
}

/// Benchmark: full click handling over the demo city
fn bench_raycast_click(c: &mut Criterion) {
    let mut scene = create_city_scene();
    let noise = Arc::new(Sample::from_frames(vec![0.0; 64]));
    let mut mode = match ObserveMode::new(&mut scene, AudioEngine::new(), &noise, Settings::default()) {
        Ok(mode) => mode,
        Err(e) => panic!("demo scene should have cameras: {}", e),
    };
    let viewport = Viewport::new(1280, 720);

    c.bench_function("raycast_click_city", |b| {
        b.iter(|| mode.raycast_click(black_box(640.0), black_box(300.0), viewport))
    });
}

/// Benchmark: one software frame at several sizes
fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("observe_draw");
    let mut scene = create_city_scene();
    let noise = Arc::new(Sample::from_frames(vec![0.0; 64]));
    let mut mode = match ObserveMode::new(&mut scene, AudioEngine::new(), &noise, Settings::default()) {
        Ok(mode) => mode,
        Err(e) => panic!("demo scene should have cameras: {}", e),
    };

    for (width, height) in [(320u32, 200u32), (960, 600), (1920, 1080)] {
        let mut canvas = Canvas::new(width, height);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &UVec2::new(width, height),
            |b, size| {
                b.iter(|| {
                    mode.update(1.0 / 60.0);
                    mode.draw(*size, &mut canvas);
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sphere_hit, bench_unproject, bench_raycast_click, bench_draw);
criterion_main!(benches);
