//! The color coder family: pure functions from one aggregated
//! iteration result to a packed sRGB integer.
//!
//! The packed layout puts red in bits 23..16, green in 15..8 and blue
//! in 7..0.  Points inside the set get one reserved constant with bit
//! 24 set, which no 24-bit color formula can ever produce, so "inside"
//! is unambiguous no matter which coder painted the frame.
//!
//! Every coder is deterministic and total: numeric edge cases in the
//! smooth formulas (a squared modulus at or below 1, a power-of-two
//! overflow, a zero derivative) collapse to the inside color rather
//! than letting a NaN leak into the image.

use num::Complex;
use std::f64::consts::PI;

use calculate::IterationResult;

/// Reserved color for points that never escaped.  Bit 24 is set, so it
/// cannot collide with any encoded 24-bit RGB value.
pub const INSIDE_COLOR: u32 = 0x0100_0000;

// 00000000,11111111,00000000,00000000
const R_MASK: u32 = 0x00ff_0000;

// 00000000,00000000,11111111,00000000
const G_MASK: u32 = 0x0000_ff00;

// 00000000,00000000,00000000,11111111
const B_MASK: u32 = 0x0000_00ff;

/// Encodes red, green and blue components into a packed sRGB integer.
pub fn encode_color(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Decodes a packed sRGB integer back into its components.  Bits
/// above the 24 color bits are ignored, so the inside color decodes to
/// black.
pub fn decode_color(value: u32) -> (u8, u8, u8) {
    let r = ((value & R_MASK) >> 16) as u8;
    let g = ((value & G_MASK) >> 8) as u8;
    let b = (value & B_MASK) as u8;
    (r, g, b)
}

/// One concrete coloring strategy, selected at configuration time.
/// The variants all share the inside-color rule and differ only in
/// what they do with an escaping point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorCoder {
    /// Repeating 255-wide grayscale bands: ascending on even bands,
    /// descending on odd ones.
    BandedGray {
        /// Iteration cap; n at or above it means inside.
        max_n: u32,
    },
    /// The same sawtooth walked across the whole 24-bit color cube.
    BandedRgb {
        /// Iteration cap.
        max_n: u32,
    },
    /// Smooth, zoom-invariant grayscale from the continuous escape
    /// measure ln(ln(rr)/2^n).
    SmoothGray {
        /// Iteration cap.
        max_n: u32,
        /// Divisor applied to the continuous measure; larger values
        /// stretch the bands.
        blending: f64,
    },
    /// Smooth periodic RGB: the same continuous measure pushed through
    /// three incommensurate cosine frequencies, one per channel.
    SmoothRgb {
        /// Iteration cap.
        max_n: u32,
        /// Divisor applied to the continuous measure.
        blending: f64,
    },
    /// Relief shading from the analytic derivative: treats z/dz as a
    /// surface normal and lights it from a fixed direction.
    Relief {
        /// Iteration cap.
        max_n: u32,
        /// X component of the unit light direction.
        light_x: f64,
        /// Y component of the unit light direction.
        light_y: f64,
        /// Height of the simulated light above the surface plane.
        height: f64,
        /// Optional base color to scale instead of plain gray.
        tint: Option<(u8, u8, u8)>,
    },
}

impl ColorCoder {
    /// Banded grayscale coder.
    pub fn banded_gray(max_n: u32) -> ColorCoder {
        ColorCoder::BandedGray { max_n }
    }

    /// Banded 24-bit RGB coder.
    pub fn banded_rgb(max_n: u32) -> ColorCoder {
        ColorCoder::BandedRgb { max_n }
    }

    /// Smooth logarithmic grayscale coder.
    pub fn smooth_gray(max_n: u32, blending: f64) -> ColorCoder {
        ColorCoder::SmoothGray { max_n, blending }
    }

    /// Smooth logarithmic RGB coder.
    pub fn smooth_rgb(max_n: u32, blending: f64) -> ColorCoder {
        ColorCoder::SmoothRgb { max_n, blending }
    }

    /// Relief coder lit from `angle_degrees` with the given height
    /// parameter, in gray or over an optional tint color.
    pub fn relief(
        max_n: u32,
        angle_degrees: f64,
        height: f64,
        tint: Option<(u8, u8, u8)>,
    ) -> ColorCoder {
        let angle = angle_degrees * PI / 180.0;
        ColorCoder::Relief {
            max_n,
            light_x: angle.cos(),
            light_y: angle.sin(),
            height,
            tint,
        }
    }

    /// A short stable name, usable on a command line.
    pub fn name(&self) -> &'static str {
        match *self {
            ColorCoder::BandedGray { .. } => "banded-gray",
            ColorCoder::BandedRgb { .. } => "banded-rgb",
            ColorCoder::SmoothGray { .. } => "smooth-gray",
            ColorCoder::SmoothRgb { .. } => "smooth-rgb",
            ColorCoder::Relief { .. } => "relief",
        }
    }

    /// True when this coder reads the orbit derivative, in which case
    /// the sampler has to track it.
    pub fn uses_derivative(&self) -> bool {
        match *self {
            ColorCoder::Relief { .. } => true,
            _ => false,
        }
    }

    /// Maps one aggregated result to a packed color.
    pub fn to_rgb(&self, result: &IterationResult) -> u32 {
        match *self {
            ColorCoder::BandedGray { max_n } => {
                if result.n >= max_n {
                    return INSIDE_COLOR;
                }
                let m = result.n % 255;
                let gray = if (result.n / 255) % 2 == 0 { m } else { 255 - m };
                encode_color(gray as u8, gray as u8, gray as u8)
            }
            ColorCoder::BandedRgb { max_n } => {
                if result.n >= max_n {
                    return INSIDE_COLOR;
                }
                let m = result.n % 0x00ff_ffff;
                if (result.n / 0x00ff_ffff) % 2 == 0 {
                    m
                } else {
                    0x00ff_ffff - m
                }
            }
            ColorCoder::SmoothGray { max_n, blending } => {
                if result.n >= max_n {
                    return INSIDE_COLOR;
                }
                match smooth_measure(result, blending) {
                    Some(v) => {
                        let gray = (127.5 * (1.0 + (2.0 * PI * v).cos())).round() as u8;
                        encode_color(gray, gray, gray)
                    }
                    None => INSIDE_COLOR,
                }
            }
            ColorCoder::SmoothRgb { max_n, blending } => {
                if result.n >= max_n {
                    return INSIDE_COLOR;
                }
                match smooth_measure(result, blending) {
                    Some(v) => {
                        let r_factor = 1.0 / f64::ln(2.0);
                        let g_factor = 1.0 / (3.0 * f64::sqrt(2.0) * f64::ln(2.0));
                        let b_factor = 1.0 / (7.0 * f64::powf(3.0, 0.125) * f64::ln(2.0));
                        let r = (127.5 * (1.0 - (r_factor * v).cos())).round() as u8;
                        let g = (127.5 * (1.0 - (g_factor * v).cos())).round() as u8;
                        let b = (127.5 * (1.0 - (b_factor * v).cos())).round() as u8;
                        encode_color(r, g, b)
                    }
                    None => INSIDE_COLOR,
                }
            }
            ColorCoder::Relief {
                max_n,
                light_x,
                light_y,
                height,
                tint,
            } => {
                if result.n >= max_n {
                    return INSIDE_COLOR;
                }
                // u = z / dz, normalized to a unit vector, then lit.
                let u = result.z / result.der;
                let modulus = u.norm();
                let wx = u.re / modulus;
                let wy = u.im / modulus;
                let t = (wx * light_x + wy * light_y + height) / (height + 1.0);
                if !t.is_finite() {
                    return INSIDE_COLOR;
                }
                let t = if t < 0.0 { 0.0 } else { t };
                match tint {
                    Some((r, g, b)) => encode_color(
                        (f64::from(r) * t).round() as u8,
                        (f64::from(g) * t).round() as u8,
                        (f64::from(b) * t).round() as u8,
                    ),
                    None => {
                        let gray = (255.0 * t).round() as u8;
                        encode_color(gray, gray, gray)
                    }
                }
            }
        }
    }
}

/// The shared continuous escape measure v = ln(ln(rr)/2^n)/blending.
/// None when the arithmetic falls off the edge of f64 (rr at or below
/// 1 makes the inner log non-positive, and a huge n overflows the
/// power), in which case the caller paints the inside color.
fn smooth_measure(result: &IterationResult, blending: f64) -> Option<f64> {
    let v = (result.rr.ln() / f64::powi(2.0, result.n as i32)).ln() / blending;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}
