use criterion::{Criterion, criterion_group, criterion_main};
use ndarray::{Array2, ArrayD, IxDyn};
use plot_profile::topo::{TopographicMode, build_view, build_volumes};
use plot_profile::{ImageLayer, Path, resample};
use std::hint::black_box;

fn ramp_image(n: usize) -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(&[n, n]), |i| (i[0] + i[1]) as f64)
}

fn height_field(n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |(y, x)| {
        let (y, x) = (y as f64 / n as f64, x as f64 / n as f64);
        40.0 * (6.0 * x).sin() * (4.0 * y).cos()
    })
}

fn bench_resample(c: &mut Criterion) {
    let layer = ImageLayer::new("ramp", ramp_image(1024));
    let path = Path::from_rows(&[vec![10.0, 10.0], vec![900.0, 500.0], vec![50.0, 1000.0]])
        .expect("valid path");

    c.bench_function("resample_1000", |b| {
        b.iter(|| resample(black_box(&path), black_box(&layer), 1000))
    });
}

fn bench_volumes(c: &mut Criterion) {
    let field = height_field(256);
    c.bench_function("build_volumes_256", |b| {
        b.iter(|| build_volumes(black_box(field.view()), 1))
    });
}

fn bench_surface(c: &mut Criterion) {
    let field = height_field(64);
    c.bench_function("surface_64", |b| {
        b.iter(|| build_view(black_box(field.view()), TopographicMode::Surface, 2))
    });
}

criterion_group!(benches, bench_resample, bench_volumes, bench_surface);
criterion_main!(benches);
