//! Pure overlay computation: density grid → colour layer → alpha blend.
use super::colormap::plasma;
use crate::density::grid::GridMap;
use crate::image::{ColorImage, ImageF32};

/// Bilinear upsampling of a cell map to `w × h` pixels.
///
/// Uses pixel-centre alignment (`src = (dst + 0.5) · scale − 0.5`) with edge
/// clamping, so each cell value sits at the centre of its footprint. An empty
/// map yields an all-zero field.
pub fn resize_map_bilinear(map: &GridMap, w: usize, h: usize) -> ImageF32 {
    if map.rows == 0 || map.cols == 0 {
        return ImageF32::new(w, h);
    }
    let sx = map.cols as f32 / w.max(1) as f32;
    let sy = map.rows as f32 / h.max(1) as f32;
    let taps = |dst: usize, scale: f32, len: usize| {
        let src = ((dst as f32 + 0.5) * scale - 0.5).max(0.0);
        let i0 = (src.floor() as usize).min(len - 1);
        let i1 = (i0 + 1).min(len - 1);
        (i0, i1, src - i0 as f32)
    };
    let xs: Vec<_> = (0..w).map(|x| taps(x, sx, map.cols)).collect();
    ImageF32::from_fn(w, h, |x, y| {
        let (y0, y1, fy) = taps(y, sy, map.rows);
        let (x0, x1, fx) = xs[x];
        let fx = fx.min(1.0);
        let fy = fy.min(1.0);
        let top = map.get(y0, x0) * (1.0 - fx) + map.get(y0, x1) * fx;
        let bottom = map.get(y1, x0) * (1.0 - fx) + map.get(y1, x1) * fx;
        top * (1.0 - fy) + bottom * fy
    })
}

/// Colour every pixel of a scalar field through the plasma scale.
pub fn colorize(field: &ImageF32) -> ColorImage {
    ColorImage::from_fn(field.w, field.h, |x, y| plasma(field.get(x, y)))
}

/// `(1 − alpha) · base + alpha · layer`, rounded and saturated per channel.
pub fn blend(base: &ColorImage, layer: &ColorImage, alpha: f32) -> ColorImage {
    debug_assert_eq!((base.w, base.h), (layer.w, layer.h));
    let alpha = alpha.clamp(0.0, 1.0);
    let data = base
        .data
        .iter()
        .zip(&layer.data)
        .map(|(b, l)| {
            let mut px = [0u8; 3];
            for c in 0..3 {
                let v = (1.0 - alpha) * f32::from(b[c]) + alpha * f32::from(l[c]);
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            px
        })
        .collect();
    ColorImage {
        w: base.w,
        h: base.h,
        data,
    }
}

/// The overlay for one view: `image` blended toward the colour-mapped,
/// upsampled `density`.
pub fn render_overlay(image: &ColorImage, density: &GridMap, alpha: f32) -> ColorImage {
    let field = resize_map_bilinear(density, image.w, image.h);
    blend(image, &colorize(&field), alpha)
}
