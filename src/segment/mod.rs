//! Hair-region segmentation.
//!
//! Pipeline
//! - Classify every pixel by HSV range membership (dark, brown, blonde hair)
//!   and union the classifications.
//! - Close, then open, with a disk structuring element to fill gaps and strip
//!   thin protrusions.
//! - Drop 8-connected regions smaller than `min_region_area`.
//!
//! The output depends only on pixel values, so repeated runs on identical
//! input yield bit-identical masks.

pub mod morphology;
pub mod regions;

#[cfg(test)]
mod tests;

use crate::color::rgb_to_hsv;
use crate::image::{ColorImage, HairMask};
use log::debug;
use serde::{Deserialize, Serialize};

/// Inclusive HSV box (hue in `[0, 180)`, saturation/value in `[0, 255]`).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct HsvRange {
    pub name: String,
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn new(name: &str, lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            lower,
            upper,
        }
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }

    /// True when no HSV triple falls into both boxes.
    pub fn is_disjoint(&self, other: &HsvRange) -> bool {
        (0..3).any(|c| self.upper[c] < other.lower[c] || other.upper[c] < self.lower[c])
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    pub ranges: Vec<HsvRange>,
    /// Radius of the disk used for closing and opening.
    pub kernel_radius: usize,
    /// Minimum pixel area of a retained region.
    pub min_region_area: usize,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            // Near-black pixels (V < 16) are shadow or background, not hair.
            ranges: vec![
                HsvRange::new("dark", [0, 0, 16], [179, 255, 50]),
                HsvRange::new("brown", [10, 50, 51], [20, 255, 200]),
                HsvRange::new("blonde", [21, 50, 150], [30, 255, 255]),
            ],
            kernel_radius: 2,
            min_region_area: 1000,
        }
    }
}

/// Intermediate counts gathered while segmenting one view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SegmentStats {
    pub color_pixels: usize,
    pub cleaned_pixels: usize,
    pub regions_kept: usize,
    pub hair_pixels: usize,
}

#[derive(Clone, Debug)]
pub struct Segmenter {
    params: SegmentParams,
    offsets: Vec<(isize, isize)>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmentParams::default())
    }
}

impl Segmenter {
    pub fn new(params: SegmentParams) -> Self {
        let offsets = morphology::disk_offsets(params.kernel_radius);
        Self { params, offsets }
    }

    pub fn params(&self) -> &SegmentParams {
        &self.params
    }

    pub fn segment(&self, image: &ColorImage) -> HairMask {
        self.segment_with_stats(image).0
    }

    pub fn segment_with_stats(&self, image: &ColorImage) -> (HairMask, SegmentStats) {
        let colored = self.classify(image);
        let cleaned = morphology::open(
            &morphology::close(&colored, &self.offsets),
            &self.offsets,
        );
        let (mask, regions_kept) =
            regions::retain_large_regions(&cleaned, self.params.min_region_area);

        let stats = SegmentStats {
            color_pixels: colored.count(),
            cleaned_pixels: cleaned.count(),
            regions_kept,
            hair_pixels: mask.count(),
        };
        debug!(
            "Segmenter::segment colour={} cleaned={} regions={} hair={}",
            stats.color_pixels, stats.cleaned_pixels, stats.regions_kept, stats.hair_pixels
        );
        (mask, stats)
    }

    /// Union of the HSV range classifications, before any cleanup.
    pub fn classify(&self, image: &ColorImage) -> HairMask {
        let ranges = &self.params.ranges;
        HairMask {
            w: image.w,
            h: image.h,
            data: image
                .data
                .iter()
                .map(|&px| {
                    let hsv = rgb_to_hsv(px);
                    ranges.iter().any(|r| r.contains(hsv))
                })
                .collect(),
        }
    }
}
