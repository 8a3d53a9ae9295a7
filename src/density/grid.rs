//! Fixed cell grid and per-cell value maps.
use serde::ser::{Serialize, Serializer};

/// Partition of an image into non-overlapping `cell_size × cell_size` cells.
///
/// Pixels beyond the last full cell in either direction are not covered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: usize,
}

impl Grid {
    pub fn for_image(width: usize, height: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            rows: height / cell_size,
            cols: width / cell_size,
            cell_size,
        }
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-left pixel of cell `(row, col)`.
    #[inline]
    pub fn origin(&self, row: usize, col: usize) -> (usize, usize) {
        (col * self.cell_size, row * self.cell_size)
    }

    /// Row-major iterator over `(row, col)` pairs.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| (r, c)))
    }
}

/// Row-major grid of `f32` values, one per cell.
///
/// Serializes as nested arrays (`[[row0...], [row1...], ...]`).
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

impl GridMap {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn for_grid(grid: &Grid) -> Self {
        Self::zeros(grid.rows, grid.cols)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, v: f32) {
        self.data[row * self.cols + col] = v;
    }

    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Mean over all cells; 0 for an empty map.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            0.0
        } else {
            self.data.iter().map(|&v| f64::from(v)).sum::<f64>() as f32 / self.data.len() as f32
        }
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}

impl Serialize for GridMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.rows).map(|r| self.row(r)))
    }
}
