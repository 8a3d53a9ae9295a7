//! Self-contained per-cell work items and their analysis.
use super::gabor::GaborBank;
use super::DensityParams;
use crate::color::rgb_to_gray;
use crate::error::{Error, Result};
use crate::image::{ColorImage, HairMask, ImageF32};

/// One grid cell: its identity plus owned copies of the pixels and mask.
#[derive(Clone, Debug)]
pub struct CellTask {
    pub row: usize,
    pub col: usize,
    pub image: ColorImage,
    pub mask: HairMask,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellResult {
    pub row: usize,
    pub col: usize,
    pub density: f32,
    pub confidence: f32,
    /// Whether the texture stage ran (coverage above the threshold).
    pub analyzed: bool,
}

impl CellResult {
    pub fn empty(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            density: 0.0,
            confidence: 0.0,
            analyzed: false,
        }
    }
}

/// Coverage + texture density for a single cell.
pub fn analyze_cell(
    task: &CellTask,
    params: &DensityParams,
    bank: &GaborBank,
) -> Result<CellResult> {
    let size = params.cell_size;
    let shapes_ok = task.image.w == size
        && task.image.h == size
        && task.mask.w == size
        && task.mask.h == size;
    if !shapes_ok {
        return Err(Error::CellShape {
            row: task.row,
            col: task.col,
            expected: size,
            width: task.image.w.min(task.mask.w),
            height: task.image.h.min(task.mask.h),
        });
    }

    let confidence = task.mask.count() as f32 / (size * size) as f32;
    if confidence <= params.min_coverage {
        return Ok(CellResult {
            row: task.row,
            col: task.col,
            density: 0.0,
            confidence,
            analyzed: false,
        });
    }

    let density = texture_density(&task.image, &task.mask, bank, params.variance_scale);
    Ok(CellResult {
        row: task.row,
        col: task.col,
        density,
        confidence,
        analyzed: true,
    })
}

/// Mean Gabor response variance over hair pixels, scaled and capped at 1.
pub fn texture_density(image: &ColorImage, mask: &HairMask, bank: &GaborBank, scale: f32) -> f32 {
    let gray = ImageF32::from_fn(image.w, image.h, |x, y| f32::from(rgb_to_gray(image.get(x, y))));
    let variance = bank.response_variance(&gray);

    let (sum, count) = variance
        .data
        .iter()
        .zip(&mask.data)
        .filter(|&(_, &m)| m)
        .fold((0.0f64, 0usize), |(s, n), (&v, _)| (s + f64::from(v), n + 1));
    if count == 0 {
        return 0.0;
    }
    let mean = (sum / count as f64) as f32;
    (mean / scale).clamp(0.0, 1.0)
}
