// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time point calculator.
//!
//! A complex number Zc is in the Mandelbrot set if Zn+1 = Zn^2 + Zc
//! stays bounded for very large n, starting from Z0 = 0.  The Julia
//! set for a fixed Zc asks the same question about the starting point
//! instead.  Either way, the measurable thing about a point is how
//! *quickly* it leaves a disc of a chosen escape radius, and that
//! velocity is what everything downstream turns into color.
//!
//! The calculator also knows how to drag the analytic derivative
//! dz/dc along with the orbit (d ← 2·z·d + 1).  Only the relief
//! coder needs it, so there is a second entry point that skips the
//! extra multiplies; both entry points produce bit-identical n, rr
//! and z, because the derivative never feeds back into the orbit.

use num::Complex;

/// Which family of fractal a sampled point belongs to.  The two
/// families share one iteration; they only disagree about which of
/// (start, c) is the sampled point and which is fixed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalKind {
    /// Iterate from Z0 = 0 with the sampled point as c.
    Mandelbrot,
    /// Iterate from the sampled point with a fixed parameter c.
    Julia(Complex<f64>),
}

impl FractalKind {
    /// Splits a sampled plane point into the (start, c) pair the
    /// calculator wants.
    pub fn seed(&self, sample: Complex<f64>) -> (Complex<f64>, Complex<f64>) {
        match *self {
            FractalKind::Mandelbrot => (Complex::new(0.0, 0.0), sample),
            FractalKind::Julia(c) => (sample, c),
        }
    }
}

/// One escape-time measurement for one starting point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationResult {
    /// Completed iterations, from 1 to the configured cap.  A value
    /// equal to the cap means the orbit never escaped and the point is
    /// treated as inside the set.
    pub n: u32,
    /// Squared modulus |z|^2 at the moment the loop stopped.
    pub rr: f64,
    /// The orbit value z at the moment the loop stopped.
    pub z: Complex<f64>,
    /// The derivative dz/dc at the moment the loop stopped, or zero
    /// when derivative tracking was skipped.
    pub der: Complex<f64>,
}

impl IterationResult {
    /// A placeholder for grid cells that have not been computed yet.
    /// `n` is zero, which no real measurement can produce.
    pub fn empty() -> IterationResult {
        IterationResult {
            n: 0,
            rr: 0.0,
            z: Complex::new(0.0, 0.0),
            der: Complex::new(0.0, 0.0),
        }
    }

    /// True when the orbit survived the full iteration cap.
    pub fn is_inside(&self, max_iterations: u32) -> bool {
        self.n >= max_iterations
    }
}

/// The calculator holds the two iteration bounds: the iteration cap
/// and the (squared, so the loop never takes a square root) escape
/// radius.  It is cheap to copy and completely stateless between
/// calls, which is what lets the frame scheduler share one across all
/// of its workers.
#[derive(Copy, Clone, Debug)]
pub struct PointCalculator {
    max_iterations: u32,
    escape_rr: f64,
}

impl PointCalculator {
    /// Takes the iteration cap and the escape radius (not squared).
    pub fn new(max_iterations: u32, escape_radius: f64) -> PointCalculator {
        PointCalculator {
            max_iterations,
            escape_rr: escape_radius * escape_radius,
        }
    }

    /// The configured iteration cap.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Iterates z ← z² + c from `start`, tracking the derivative.
    ///
    /// The loop body always runs at least once, so `n` is never zero,
    /// and it is unconditionally bounded by the iteration cap, so it
    /// always terminates.  The derivative update reads the current z,
    /// so it has to happen before z advances.
    pub fn iterate(&self, start: Complex<f64>, c: Complex<f64>) -> IterationResult {
        let mut x = start.re;
        let mut y = start.im;
        let mut xx = x * x;
        let mut yy = y * y;
        let mut dx = 1.0;
        let mut dy = 0.0;
        let mut n: u32 = 0;
        let mut rr: f64;
        loop {
            let new_dx = 2.0 * (dx * x - dy * y) + 1.0;
            dy = 2.0 * (dx * y + dy * x);
            dx = new_dx;

            n += 1;
            y = 2.0 * (x * y) + c.im;
            x = xx - yy + c.re;
            xx = x * x;
            yy = y * y;
            rr = xx + yy;
            if n >= self.max_iterations || rr >= self.escape_rr {
                break;
            }
        }
        IterationResult {
            n,
            rr,
            z: Complex::new(x, y),
            der: Complex::new(dx, dy),
        }
    }

    /// Same orbit, no derivative.  `n`, `rr` and `z` are bit-for-bit
    /// identical to what `iterate` returns; `der` is zero.
    pub fn iterate_fast(&self, start: Complex<f64>, c: Complex<f64>) -> IterationResult {
        let mut x = start.re;
        let mut y = start.im;
        let mut xx = x * x;
        let mut yy = y * y;
        let mut n: u32 = 0;
        let mut rr: f64;
        loop {
            n += 1;
            y = 2.0 * (x * y) + c.im;
            x = xx - yy + c.re;
            xx = x * x;
            yy = y * y;
            rr = xx + yy;
            if n >= self.max_iterations || rr >= self.escape_rr {
                break;
            }
        }
        IterationResult {
            n,
            rr,
            z: Complex::new(x, y),
            der: Complex::new(0.0, 0.0),
        }
    }
}
