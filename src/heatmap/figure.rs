//! Three-panel heatmap figure: original | density grid | overlay.
use super::colormap::plasma;
use super::overlay::render_overlay;
use crate::density::grid::GridMap;
use crate::image::ColorImage;

const GUTTER_COLOR: [u8; 3] = [255, 255, 255];

/// Colour-mapped density grid scaled to `w × h` with nearest-cell lookup,
/// so each cell shows as a flat block.
pub fn density_panel(density: &GridMap, w: usize, h: usize) -> ColorImage {
    if density.rows == 0 || density.cols == 0 {
        return ColorImage::from_fn(w, h, |_, _| plasma(0.0));
    }
    ColorImage::from_fn(w, h, |x, y| {
        let col = (x * density.cols / w).min(density.cols - 1);
        let row = (y * density.rows / h).min(density.rows - 1);
        plasma(density.get(row, col))
    })
}

/// Place `panels` (all the same height) side by side separated by `gutter`
/// columns of white.
pub fn hstack(panels: &[&ColorImage], gutter: usize) -> ColorImage {
    let h = panels.iter().map(|p| p.h).max().unwrap_or(0);
    let w = panels.iter().map(|p| p.w).sum::<usize>() + gutter * panels.len().saturating_sub(1);
    let mut out = ColorImage::from_fn(w, h, |_, _| GUTTER_COLOR);
    let mut x0 = 0;
    for panel in panels {
        for y in 0..panel.h {
            let dst = &mut out.data[y * w + x0..y * w + x0 + panel.w];
            dst.copy_from_slice(&panel.data[y * panel.w..(y + 1) * panel.w]);
        }
        x0 += panel.w + gutter;
    }
    out
}

/// Full figure for one view.
pub fn render_figure(
    image: &ColorImage,
    density: &GridMap,
    alpha: f32,
    gutter: usize,
) -> ColorImage {
    let grid = density_panel(density, image.w, image.h);
    let overlay = render_overlay(image, density, alpha);
    hstack(&[image, &grid, &overlay], gutter)
}
