//! Connected-region suppression for hair masks.
use crate::image::HairMask;
use image::Luma;
use imageproc::region_labelling::{connected_components, Connectivity};

/// Keep only 8-connected foreground regions with at least `min_area` pixels.
///
/// Returns the filtered mask and the number of regions retained.
pub fn retain_large_regions(mask: &HairMask, min_area: usize) -> (HairMask, usize) {
    if mask.is_empty() {
        return (mask.clone(), 0);
    }
    let labels = connected_components(&mask.to_gray_image(), Connectivity::Eight, Luma([0u8]));

    let mut areas: Vec<usize> = Vec::new();
    for px in labels.pixels() {
        let label = px[0] as usize;
        if label == 0 {
            continue;
        }
        if areas.len() <= label {
            areas.resize(label + 1, 0);
        }
        areas[label] += 1;
    }

    let kept = areas.iter().skip(1).filter(|&&a| a >= min_area).count();
    let filtered = HairMask::from_fn(mask.w, mask.h, |x, y| {
        let label = labels.get_pixel(x as u32, y as u32)[0] as usize;
        label != 0 && areas[label] >= min_area
    });
    (filtered, kept)
}
