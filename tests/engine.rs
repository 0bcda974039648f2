//! End-to-end scenarios against the engine's public surface: the
//! same calls an external renderer would make, no reaching into the
//! pipeline internals.

extern crate escapetime;
extern crate num;

use escapetime::{ColorCoder, Engine, EngineConfig, FractalKind, Pixel, Viewport, INSIDE_COLOR};
use num::Complex;

fn config(max_iterations: u32, fractal: FractalKind, coders: Vec<ColorCoder>) -> EngineConfig {
    EngineConfig {
        max_iterations,
        escape_radius: 2.0,
        sub_samples: 1,
        bands: 0,
        workers: 2,
        fractal,
        coders,
    }
}

#[test]
fn mandelbrot_interior_and_exterior_land_where_they_should() {
    let viewport = Viewport::new(100, 100, Complex::new(-0.5, 0.0), 0.03);
    let coders = vec![ColorCoder::smooth_gray(100, 5.45656)];
    let mut engine = Engine::new(config(100, FractalKind::Mandelbrot, coders), viewport).unwrap();
    engine.render_frame();

    // The pixel nearest the plane origin sits deep inside the set.
    let Pixel(ox, oy) = engine
        .viewport()
        .point_to_pixel(&Complex::new(0.0, 0.0))
        .unwrap();
    assert_eq!(engine.grid().get(ox, oy).n, 100);
    assert_eq!(engine.rgb_buffer()[oy * 100 + ox], INSIDE_COLOR);

    // The top-right corner pixel is far outside and escapes almost
    // immediately.
    let corner = engine.grid().get(99, 0);
    assert!(corner.n < 10, "corner escaped only at n={}", corner.n);
    assert!(corner.rr >= 4.0);
}

#[test]
fn frames_are_partition_invariant() {
    let viewport = Viewport::new(60, 40, Complex::new(-0.5, 0.0), 0.05);
    let coders = vec![ColorCoder::banded_gray(120)];

    let mut serial_cfg = config(120, FractalKind::Mandelbrot, coders.clone());
    serial_cfg.bands = 1;
    serial_cfg.workers = 1;
    serial_cfg.sub_samples = 2;
    let mut serial = Engine::new(serial_cfg, viewport).unwrap();
    serial.render_frame();

    let mut banded_cfg = config(120, FractalKind::Mandelbrot, coders);
    banded_cfg.bands = 17;
    banded_cfg.workers = 4;
    banded_cfg.sub_samples = 2;
    let mut banded = Engine::new(banded_cfg, viewport).unwrap();
    banded.render_frame();

    assert_eq!(serial.rgb_buffer(), banded.rgb_buffer());
    serial.grid().for_each(|x, y, result| {
        assert_eq!(result, banded.grid().get(x, y));
    });
}

#[test]
fn zoom_on_the_center_pixel_recenters_identically() {
    let viewport = Viewport::new(100, 100, Complex::new(-0.5, 0.0), 0.03);
    let coders = vec![ColorCoder::banded_gray(60)];
    let mut engine = Engine::new(config(60, FractalKind::Mandelbrot, coders), viewport).unwrap();
    engine.render_frame();

    engine.on_zoom_request(50, 50, 25, 25);

    assert_eq!(engine.viewport().center, Complex::new(-0.5, 0.0));
    assert_eq!(engine.viewport().pixel_size, 0.03 / 4.0);
    // The zoomed frame was recomputed under the new, tighter mapping:
    // its pixels all carry real measurements.
    engine.grid().for_each(|_, _, result| assert!(result.n >= 1));
}

#[test]
fn julia_frames_use_the_fixed_parameter() {
    let c = Complex::new(-0.835, -0.2321);
    let viewport = Viewport::new(40, 40, Complex::new(0.0, 0.0), 0.1);
    let coders = vec![ColorCoder::smooth_rgb(100, 5.45656)];
    let mut engine = Engine::new(config(100, FractalKind::Julia(c), coders), viewport).unwrap();
    engine.render_frame();

    // The corner starts at radius 2.8, outside the escape disc, so it
    // is gone after a single iteration.
    assert_eq!(engine.grid().get(0, 0).n, 1);
    engine.grid().for_each(|_, _, result| {
        assert!(result.n >= 1 && result.n <= 100);
    });
}

#[test]
fn relief_coder_gets_a_tracked_derivative_end_to_end() {
    let viewport = Viewport::new(30, 30, Complex::new(-0.5, 0.0), 0.1);
    let coders = vec![ColorCoder::relief(80, 120.0, 1.4, None)];
    let mut engine = Engine::new(config(80, FractalKind::Mandelbrot, coders), viewport).unwrap();
    engine.render_frame();

    // Escaping pixels carry a nonzero derivative for the coder.
    let corner = engine.grid().get(0, 0);
    assert!(corner.n < 80);
    assert_ne!(corner.der, Complex::new(0.0, 0.0));
}
