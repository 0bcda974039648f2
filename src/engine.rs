//! The engine: the one object that owns the mutable state an
//! interactive explorer accumulates: the current viewport, the
//! current coder index, the last computed grid and the last
//! packed-RGB frame.  External collaborators (a window, a file
//! writer, a test) only ever talk to this controller through the
//! narrow calls below; the engine knows nothing about windows, mice or
//! files.

use std::time::Instant;

use calculate::{FractalKind, PointCalculator};
use color::ColorCoder;
use frame::FrameScheduler;
use grid::ResultGrid;
use planes::Viewport;
use sample::Sampler;

/// The fatal error taxonomy.  Everything here aborts the call that
/// raised it; there is no retry, a fresh valid call must be issued.
/// Recoverable numeric edge cases never surface this far; the coders
/// absorb them locally.
#[derive(Debug, Fail)]
pub enum EngineError {
    /// The viewport had a zero dimension.
    #[fail(display = "viewport dimensions must be positive, got {}x{}", width, height)]
    BadDimensions {
        /// Requested pixel width.
        width: usize,
        /// Requested pixel height.
        height: usize,
    },

    /// The viewport pixel size was not a positive number.
    #[fail(display = "pixel size must be positive, got {}", value)]
    BadPixelSize {
        /// Requested plane size of one pixel.
        value: f64,
    },

    /// Fewer than one sub-sample per axis.
    #[fail(display = "sub-samples per axis must be at least 1, got {}", value)]
    BadSubSamples {
        /// Requested sub-samples per axis.
        value: u32,
    },

    /// Fewer than one iteration allowed.
    #[fail(display = "max iterations must be at least 1, got {}", value)]
    BadIterations {
        /// Requested iteration cap.
        value: u32,
    },

    /// The escape radius was not a positive number.
    #[fail(display = "escape radius must be positive, got {}", value)]
    BadEscapeRadius {
        /// Requested escape radius.
        value: f64,
    },

    /// The configuration offered no color coders at all.
    #[fail(display = "at least one color coder must be configured")]
    NoColorCoders,

    /// A caller-provided output buffer is smaller than the frame.
    #[fail(display = "output buffer holds {} pixels but the frame needs {}", len, needed)]
    BufferTooSmall {
        /// Length of the buffer the caller handed in.
        len: usize,
        /// Pixels in the frame.
        needed: usize,
    },
}

/// The immutable run configuration, assembled once at startup and
/// never changed afterwards.  A frame computation snapshots everything
/// it needs out of here before it starts, so nothing can shift under a
/// running frame.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Iteration cap; a point surviving this many iterations counts as
    /// inside the set.
    pub max_iterations: u32,
    /// Escape radius (not squared).
    pub escape_radius: f64,
    /// Sub-samples per pixel axis for anti-aliasing; 1 disables it.
    pub sub_samples: u32,
    /// Row bands per frame; 0 picks a default from the worker count.
    pub bands: usize,
    /// Worker threads per frame; 0 uses every logical CPU.
    pub workers: usize,
    /// Mandelbrot, or Julia with its fixed parameter.
    pub fractal: FractalKind,
    /// The ordered list of available coders; the first is active
    /// until a recolor request cycles onward.
    pub coders: Vec<ColorCoder>,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), EngineError> {
        if self.max_iterations < 1 {
            return Err(EngineError::BadIterations {
                value: self.max_iterations,
            });
        }
        if self.sub_samples < 1 {
            return Err(EngineError::BadSubSamples {
                value: self.sub_samples,
            });
        }
        if !(self.escape_radius > 0.0) {
            return Err(EngineError::BadEscapeRadius {
                value: self.escape_radius,
            });
        }
        if self.coders.is_empty() {
            return Err(EngineError::NoColorCoders);
        }
        Ok(())
    }

    /// True when any configured coder reads the orbit derivative, in
    /// which case every frame tracks it.
    fn needs_derivative(&self) -> bool {
        self.coders.iter().any(|coder| coder.uses_derivative())
    }
}

/// Owns one frame pipeline end to end: viewport in, packed RGB out.
pub struct Engine {
    config: EngineConfig,
    viewport: Viewport,
    grid: ResultGrid,
    rgb: Vec<u32>,
    coder_index: usize,
}

impl Engine {
    /// Validates the configuration and the initial viewport, and
    /// allocates the result grid and RGB buffer.  Nothing is computed
    /// until the first `render_frame` call.
    pub fn new(config: EngineConfig, viewport: Viewport) -> Result<Engine, EngineError> {
        if viewport.width == 0 || viewport.height == 0 {
            return Err(EngineError::BadDimensions {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !(viewport.pixel_size > 0.0) {
            return Err(EngineError::BadPixelSize {
                value: viewport.pixel_size,
            });
        }
        config.validate()?;
        let grid = ResultGrid::new(viewport.width, viewport.height);
        let rgb = vec![0; viewport.width * viewport.height];
        Ok(Engine {
            config,
            viewport,
            grid,
            rgb,
            coder_index: 0,
        })
    }

    /// Computes a complete frame for the current viewport and colors
    /// it with the current coder.  Blocks until both are done; a
    /// partial frame is never observable from outside.
    pub fn render_frame(&mut self) {
        let started = Instant::now();
        let sampler = Sampler::new(
            PointCalculator::new(self.config.max_iterations, self.config.escape_radius),
            self.config.fractal,
            self.config.sub_samples,
            self.config.needs_derivative(),
        );
        let scheduler = FrameScheduler::new(self.config.bands, self.config.workers);
        scheduler.compute(&self.viewport, &sampler, &mut self.grid);
        info!(
            "{}x{} frame computed in {:?}",
            self.viewport.width,
            self.viewport.height,
            started.elapsed()
        );
        self.recolor();
    }

    /// Re-runs only the color coder over the finished grid.  No pixel
    /// is recomputed, which also makes the old "skip pixels already
    /// known to be inside" re-render trick moot.
    fn recolor(&mut self) {
        let started = Instant::now();
        let coder = self.config.coders[self.coder_index];
        let width = self.grid.width();
        let rgb = &mut self.rgb;
        self.grid
            .for_each(|x, y, result| rgb[y * width + x] = coder.to_rgb(result));
        debug!("recolored with {} in {:?}", coder.name(), started.elapsed());
    }

    /// Zoom callback for the external renderer: the click pixel
    /// becomes the center of a new viewport showing the requested
    /// sub-rectangle, and a fresh frame is computed for it.  The old
    /// viewport value is discarded whole.
    pub fn on_zoom_request(&mut self, px: usize, py: usize, req_w: usize, req_h: usize) {
        self.viewport = self.viewport.zoom_to(px, py, req_w, req_h);
        info!(
            "zoomed to center ({}, {}), pixel size {:e}",
            self.viewport.center.re, self.viewport.center.im, self.viewport.pixel_size
        );
        self.render_frame();
    }

    /// Recolor callback for the external renderer: cycles to the next
    /// configured coder and repaints the existing grid.
    pub fn on_recolor_request(&mut self) {
        self.coder_index = (self.coder_index + 1) % self.config.coders.len();
        self.recolor();
    }

    /// The viewport the last frame was (or the next frame will be)
    /// computed for.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The last computed grid, read-only.
    pub fn grid(&self) -> &ResultGrid {
        &self.grid
    }

    /// The coder currently painting frames.
    pub fn current_coder(&self) -> &ColorCoder {
        &self.config.coders[self.coder_index]
    }

    /// The last rendered frame as packed sRGB integers, row-major,
    /// read-only.  This is the buffer a snapshot export dumps.
    pub fn rgb_buffer(&self) -> &[u32] {
        &self.rgb
    }

    /// Copies the rendered frame into a caller-owned buffer, checking
    /// the dimensions first.  A too-small buffer aborts the call; the
    /// caller must come back with a correctly sized one.
    pub fn copy_rgb_into(&self, out: &mut [u32]) -> Result<(), EngineError> {
        if out.len() < self.rgb.len() {
            return Err(EngineError::BufferTooSmall {
                len: out.len(),
                needed: self.rgb.len(),
            });
        }
        out[..self.rgb.len()].copy_from_slice(&self.rgb);
        Ok(())
    }
}
