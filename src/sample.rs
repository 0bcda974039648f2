//! Sub-pixel sampling with median aggregation.
//!
//! One pixel covers a whole rectangle of the complex plane, and right
//! on the boundary of the set that rectangle can contain wildly
//! different escape counts.  Instead of averaging, which smears the
//! sharp boundary into mush, we take a k x k grid of samples inside
//! the pixel and keep the one with the *median* escape count.  The
//! winning sample is returned whole, continuous-coloring fields and
//! all; nothing is synthesized across samples.

use itertools::iproduct;
use num::Complex;

use calculate::{FractalKind, IterationResult, PointCalculator};
use planes::PlaneRect;

/// Computes the aggregated result for one pixel.  Cheap to copy;
/// every frame-scheduler worker holds the same sampler by reference.
#[derive(Copy, Clone, Debug)]
pub struct Sampler {
    calculator: PointCalculator,
    kind: FractalKind,
    sub_samples: u32,
    track_derivative: bool,
}

impl Sampler {
    /// Takes the point calculator, the fractal family, the number of
    /// sub-samples per axis (k, at least 1), and whether the orbit
    /// derivative is worth carrying.  Derivative tracking changes
    /// nothing about which sample wins the median.
    pub fn new(
        calculator: PointCalculator,
        kind: FractalKind,
        sub_samples: u32,
        track_derivative: bool,
    ) -> Sampler {
        Sampler {
            calculator,
            kind,
            sub_samples,
            track_derivative,
        }
    }

    /// Samples the midpoints of a k x k uniform sub-grid of the given
    /// pixel rectangle (cell centers, not corners, so no sample ever
    /// sits on a shared cell edge) and returns the median-n result.
    pub fn sample_pixel(&self, rect: &PlaneRect) -> IterationResult {
        let k = self.sub_samples as usize;
        let step_x = (rect.x2 - rect.x1) / (k as f64);
        let step_y = (rect.y1 - rect.y2) / (k as f64);

        let mut values = Vec::with_capacity(k * k);
        for (i, j) in iproduct!(0..k, 0..k) {
            let sample = Complex::new(
                rect.x1 + step_x * (i as f64 + 0.5),
                rect.y1 - step_y * (j as f64 + 0.5),
            );
            let (start, c) = self.kind.seed(sample);
            values.push(if self.track_derivative {
                self.calculator.iterate(start, c)
            } else {
                self.calculator.iterate_fast(start, c)
            });
        }
        median(values)
    }
}

/// Sorts ascending by n and picks index k²/2, the upper median when
/// the count is even.  A fixed tie-break, not an average.
fn median(mut values: Vec<IterationResult>) -> IterationResult {
    values.sort_by_key(|r| r.n);
    values[values.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_n(n: u32) -> IterationResult {
        IterationResult {
            n,
            rr: f64::from(n) * 10.0,
            z: Complex::new(0.0, 0.0),
            der: Complex::new(0.0, 0.0),
        }
    }

    #[test]
    fn median_takes_the_middle_of_an_odd_count() {
        let values = vec![result_with_n(7), result_with_n(1), result_with_n(4)];
        assert_eq!(median(values).n, 4);
    }

    #[test]
    fn median_takes_the_upper_of_an_even_count() {
        let values = vec![
            result_with_n(9),
            result_with_n(1),
            result_with_n(4),
            result_with_n(6),
        ];
        assert_eq!(median(values).n, 6);
    }

    #[test]
    fn median_is_independent_of_input_ordering() {
        let ns = [12, 3, 99, 7, 1, 45, 22, 8, 5];
        let forward: Vec<_> = ns.iter().map(|&n| result_with_n(n)).collect();
        let reverse: Vec<_> = ns.iter().rev().map(|&n| result_with_n(n)).collect();
        assert_eq!(median(forward).n, median(reverse).n);
    }

    #[test]
    fn median_keeps_the_winning_samples_own_fields() {
        let values = vec![result_with_n(2), result_with_n(8), result_with_n(5)];
        let winner = median(values);
        assert_eq!(winner.n, 5);
        assert_eq!(winner.rr, 50.0);
    }

    #[test]
    fn single_sample_hits_the_pixel_midpoint() {
        let calc = PointCalculator::new(100, 2.0);
        let sampler = Sampler::new(calc, FractalKind::Mandelbrot, 1, true);
        let rect = PlaneRect {
            x1: -0.03,
            x2: 0.03,
            y1: 0.03,
            y2: -0.03,
        };
        let direct = calc.iterate(Complex::new(0.0, 0.0), rect.midpoint());
        assert_eq!(sampler.sample_pixel(&rect), direct);
    }

    #[test]
    fn sampling_is_deterministic() {
        let calc = PointCalculator::new(200, 2.0);
        let sampler = Sampler::new(calc, FractalKind::Mandelbrot, 3, true);
        // A rectangle straddling the set boundary, where the samples
        // genuinely disagree.
        let rect = PlaneRect {
            x1: -0.8,
            x2: -0.7,
            y1: 0.3,
            y2: 0.2,
        };
        assert_eq!(sampler.sample_pixel(&rect), sampler.sample_pixel(&rect));
    }

    #[test]
    fn derivative_tracking_never_changes_the_median_choice() {
        let calc = PointCalculator::new(200, 2.0);
        let tracked = Sampler::new(calc, FractalKind::Mandelbrot, 3, true);
        let bare = Sampler::new(calc, FractalKind::Mandelbrot, 3, false);
        let rect = PlaneRect {
            x1: -0.8,
            x2: -0.7,
            y1: 0.3,
            y2: 0.2,
        };
        let a = tracked.sample_pixel(&rect);
        let b = bare.sample_pixel(&rect);
        assert_eq!(a.n, b.n);
        assert_eq!(a.rr, b.rr);
        assert_eq!(a.z, b.z);
    }
}
