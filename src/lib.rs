#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! The Mandelbrot set takes a point on the complex plane and
//! repeatedly squares and re-adds it, measuring how quickly the orbit
//! runs off to infinity.  That "velocity" is the number every image of
//! the set is painted from; the Julia sets ask the same question with
//! the roles of the starting point and the parameter swapped.
//!
//! This crate is the sampling and color-mapping engine for such
//! images.  A `Viewport` lays the pixel grid over a region of the
//! plane; the `PointCalculator` measures one point; the `Sampler`
//! anti-aliases one pixel by taking the median of a small grid of
//! sub-samples; the `FrameScheduler` fans rows out over worker threads
//! and fills a `ResultGrid`; and a family of `ColorCoder` strategies
//! turns each measurement into a packed sRGB integer.  Windowing,
//! input and file handling live outside and talk to the `Engine`
//! controller through a handful of narrow calls.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod calculate;
pub mod color;
pub mod engine;
pub mod frame;
pub mod grid;
pub mod planes;
pub mod sample;

pub use calculate::{FractalKind, IterationResult, PointCalculator};
pub use color::{decode_color, encode_color, ColorCoder, INSIDE_COLOR};
pub use engine::{Engine, EngineConfig, EngineError};
pub use frame::FrameScheduler;
pub use grid::ResultGrid;
pub use planes::{Pixel, PlaneRect, Viewport};
pub use sample::Sampler;
