//! Per-cell hair coverage and texture density.
//!
//! The preprocessed image is partitioned into a fixed grid (see [`grid::Grid`]).
//! Each cell becomes an owned [`cell::CellTask`] so the work can be scattered
//! to a bounded worker pool and gathered back by `(row, col)`, independent of
//! completion order.
//!
//! A cell's confidence is its mask coverage. Only cells with coverage strictly
//! above `min_coverage` run the Gabor stage; the rest get density 0.
pub mod cell;
pub mod gabor;
pub mod grid;
pub mod pool;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use crate::image::{ColorImage, HairMask};
use cell::{analyze_cell, CellResult, CellTask};
use gabor::{GaborBank, GaborParams};
use grid::{Grid, GridMap};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// What to do when a single cell's analysis fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFailurePolicy {
    /// Fail the whole view.
    #[default]
    Abort,
    /// Record the cell as density 0 / confidence 0 and keep going.
    ZeroConfidence,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DensityParams {
    pub cell_size: usize,
    /// Coverage at or below which the texture stage is skipped.
    pub min_coverage: f32,
    /// Divisor applied to the mean response variance before capping at 1.
    pub variance_scale: f32,
    /// Upper bound on concurrent cell workers.
    pub max_workers: usize,
    pub gabor: GaborParams,
    pub failure_policy: CellFailurePolicy,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            cell_size: 32,
            min_coverage: 0.1,
            variance_scale: 1000.0,
            max_workers: 8,
            gabor: GaborParams::default(),
            failure_policy: CellFailurePolicy::Abort,
        }
    }
}

/// Counters describing one estimation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DensityStats {
    pub cells_total: usize,
    /// Cells that ran the texture stage.
    pub cells_analyzed: usize,
    /// Cells at or below the coverage threshold.
    pub cells_skipped: usize,
    pub cells_failed: usize,
    pub workers: usize,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug)]
pub struct DensityOutput {
    pub density: GridMap,
    pub confidence: GridMap,
    pub stats: DensityStats,
}

#[derive(Clone, Debug)]
pub struct DensityEstimator {
    params: DensityParams,
    bank: GaborBank,
}

impl Default for DensityEstimator {
    fn default() -> Self {
        Self::new(DensityParams::default())
    }
}

impl DensityEstimator {
    pub fn new(params: DensityParams) -> Self {
        let bank = GaborBank::new(&params.gabor);
        Self { params, bank }
    }

    pub fn params(&self) -> &DensityParams {
        &self.params
    }

    pub fn bank(&self) -> &GaborBank {
        &self.bank
    }

    /// Workers used by [`Self::estimate`]: `min(available units, max_workers)`.
    pub fn worker_count(&self) -> usize {
        pool::worker_count(self.params.max_workers)
    }

    pub fn estimate(&self, image: &ColorImage, mask: &HairMask) -> Result<DensityOutput> {
        self.estimate_with_workers(image, mask, self.worker_count())
    }

    /// Same as [`Self::estimate`] with an explicit worker count.
    pub fn estimate_with_workers(
        &self,
        image: &ColorImage,
        mask: &HairMask,
        workers: usize,
    ) -> Result<DensityOutput> {
        let (grid, tasks) = self.build_tasks(image, mask)?;
        self.run_tasks(grid, &tasks, workers)
    }

    /// Cut the image and mask into owned per-cell tasks, row-major.
    pub fn build_tasks(
        &self,
        image: &ColorImage,
        mask: &HairMask,
    ) -> Result<(Grid, Vec<CellTask>)> {
        if image.w != mask.w || image.h != mask.h {
            return Err(Error::MaskMismatch {
                image_w: image.w,
                image_h: image.h,
                mask_w: mask.w,
                mask_h: mask.h,
            });
        }
        let grid = Grid::for_image(image.w, image.h, self.params.cell_size);
        let size = grid.cell_size;
        let tasks = grid
            .cells()
            .map(|(row, col)| {
                let (x, y) = grid.origin(row, col);
                CellTask {
                    row,
                    col,
                    image: image.crop(x, y, size, size),
                    mask: mask.crop(x, y, size, size),
                }
            })
            .collect();
        Ok((grid, tasks))
    }

    /// Scatter `tasks` over `workers` threads and gather the results into
    /// maps shaped like `grid`.
    pub fn run_tasks(
        &self,
        grid: Grid,
        tasks: &[CellTask],
        workers: usize,
    ) -> Result<DensityOutput> {
        let start = Instant::now();
        let workers = workers.max(1);
        let results = pool::scatter(tasks, workers, |task| {
            if task.row >= grid.rows || task.col >= grid.cols {
                return Err(Error::CellOutOfGrid {
                    row: task.row,
                    col: task.col,
                    rows: grid.rows,
                    cols: grid.cols,
                });
            }
            analyze_cell(task, &self.params, &self.bank)
        })?;

        let mut density = GridMap::for_grid(&grid);
        let mut confidence = GridMap::for_grid(&grid);
        let mut stats = DensityStats {
            cells_total: grid.len(),
            workers,
            ..DensityStats::default()
        };
        for (task, result) in tasks.iter().zip(results) {
            let cell = match result {
                Ok(cell) => {
                    if cell.analyzed {
                        stats.cells_analyzed += 1;
                    } else {
                        stats.cells_skipped += 1;
                    }
                    cell
                }
                Err(err) => match self.params.failure_policy {
                    CellFailurePolicy::Abort => return Err(err),
                    CellFailurePolicy::ZeroConfidence => {
                        warn!(
                            "DensityEstimator::run_tasks cell ({}, {}) failed: {err}",
                            task.row, task.col
                        );
                        stats.cells_failed += 1;
                        if task.row >= grid.rows || task.col >= grid.cols {
                            continue;
                        }
                        CellResult::empty(task.row, task.col)
                    }
                },
            };
            density.set(cell.row, cell.col, cell.density);
            confidence.set(cell.row, cell.col, cell.confidence);
        }
        stats.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "DensityEstimator::run_tasks {}x{} cells, analyzed={} skipped={} failed={} workers={} in {:.1} ms",
            grid.rows,
            grid.cols,
            stats.cells_analyzed,
            stats.cells_skipped,
            stats.cells_failed,
            workers,
            stats.elapsed_ms
        );
        Ok(DensityOutput {
            density,
            confidence,
            stats,
        })
    }
}
