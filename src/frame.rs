// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame scheduler: computes a complete result grid for one
//! viewport by fanning row bands out over a fixed pool of workers.
//!
//! The image is cut into bands of whole rows.  Each band is a disjoint
//! mutable slice of the grid, so the only shared, locked thing is the
//! queue the workers pull bands from; the pixel writes themselves need
//! no synchronization at all.  `compute` blocks until every band is
//! done (the scope join is the frame barrier), so a caller never sees
//! a partial frame.  Which worker computed which band is invisible in
//! the output: every pixel depends only on the viewport geometry.

use std::sync::{Arc, Mutex};

use grid::ResultGrid;
use planes::Viewport;
use sample::Sampler;

/// Partitioning and worker-pool parameters for one frame computation.
/// Zero means "pick for me": workers defaults to the machine's logical
/// CPU count, bands to eight per worker so that slow bands (the ones
/// full of inside-the-set pixels) don't leave the rest of the pool
/// idle.
#[derive(Copy, Clone, Debug)]
pub struct FrameScheduler {
    bands: usize,
    workers: usize,
}

impl FrameScheduler {
    /// Takes the requested band and worker counts, zero for defaults.
    pub fn new(bands: usize, workers: usize) -> FrameScheduler {
        FrameScheduler { bands, workers }
    }

    /// The worker count `compute` will actually use.
    pub fn workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    /// The band count `compute` will actually use for a grid of the
    /// given height: at least one row per band, at least one band.
    pub fn bands_for(&self, height: usize) -> usize {
        let requested = if self.bands == 0 {
            self.workers() * 8
        } else {
            self.bands
        };
        requested.max(1).min(height.max(1))
    }

    /// Fills the whole grid with sampled results for the viewport.
    /// The viewport and sampler are immutable snapshots for the
    /// duration of the call; the grid is exclusively ours until the
    /// join barrier passes.
    pub fn compute(&self, viewport: &Viewport, sampler: &Sampler, grid: &mut ResultGrid) {
        debug_assert_eq!(grid.width(), viewport.width);
        debug_assert_eq!(grid.height(), viewport.height);

        let width = viewport.width;
        let bands = self.bands_for(viewport.height);
        let workers = self.workers();
        let rows_per_band = (viewport.height + bands - 1) / bands;

        debug!(
            "computing {}x{} frame in {} bands on {} workers",
            viewport.width, viewport.height, bands, workers
        );

        let jobs = grid.bands_mut(rows_per_band);
        let queue = Arc::new(Mutex::new(jobs.into_iter()));

        crossbeam::scope(|spawner| {
            for _ in 0..workers {
                let queue = queue.clone();
                spawner.spawn(move |_| loop {
                    let job = { queue.lock().unwrap().next() };
                    match job {
                        Some((start_row, rows)) => {
                            for (offset, result) in rows.iter_mut().enumerate() {
                                let x = offset % width;
                                let y = start_row + offset / width;
                                *result = sampler.sample_pixel(&viewport.pixel_rect(x, y));
                            }
                        }
                        None => {
                            break;
                        }
                    }
                });
            }
        })
        .unwrap();
    }
}
