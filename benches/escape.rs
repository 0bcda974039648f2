#[macro_use]
extern crate criterion;
extern crate escapetime;
extern crate num;

use criterion::Criterion;
use escapetime::{FractalKind, PlaneRect, PointCalculator, Sampler};
use num::Complex;

// A point just outside the seahorse valley: escapes, but slowly, so
// the loop body dominates the measurement.
fn bench_iterate(c: &mut Criterion) {
    let calc = PointCalculator::new(2000, 10.0);
    c.bench_function("iterate seahorse point", move |b| {
        b.iter(|| calc.iterate(Complex::new(0.0, 0.0), Complex::new(-0.745, 0.113)))
    });
}

fn bench_sample_pixel(c: &mut Criterion) {
    let sampler = Sampler::new(
        PointCalculator::new(1000, 10.0),
        FractalKind::Mandelbrot,
        3,
        true,
    );
    let rect = PlaneRect {
        x1: -0.7455,
        x2: -0.7445,
        y1: 0.1135,
        y2: 0.1125,
    };
    c.bench_function("sample boundary pixel 3x3", move |b| {
        b.iter(|| sampler.sample_pixel(&rect))
    });
}

criterion_group!(benches, bench_iterate, bench_sample_pixel);
criterion_main!(benches);
