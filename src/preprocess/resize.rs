//! Resampling to the fixed working resolution.
//!
//! - `resize_area`: box-filter resampling where each output pixel is the
//!   coverage-weighted mean of the source pixels it spans. Quality-preserving
//!   for downsampling.
//! - `resize_bilinear`: triangle-filter interpolation via `image::imageops`.
use crate::image::{ColorImage, ImageView, ImageViewMut};
use image::imageops::{self, FilterType};

/// One source contribution along an axis.
#[derive(Clone, Copy, Debug)]
struct Tap {
    src: usize,
    weight: f32,
}

/// Coverage weights mapping `dst_len` output samples onto `src_len` inputs.
fn area_taps(src_len: usize, dst_len: usize) -> Vec<Vec<Tap>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|i| {
            let start = i as f64 * scale;
            let end = ((i + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            let mut taps = Vec::with_capacity(last - first);
            for s in first..last {
                let overlap = end.min((s + 1) as f64) - start.max(s as f64);
                if overlap > 0.0 {
                    taps.push(Tap {
                        src: s,
                        weight: (overlap / (end - start)) as f32,
                    });
                }
            }
            taps
        })
        .collect()
}

/// Area-averaging resize. Separable: rows first, then columns.
pub fn resize_area(src: &ColorImage, dst_w: usize, dst_h: usize) -> ColorImage {
    let x_taps = area_taps(src.w, dst_w);
    let y_taps = area_taps(src.h, dst_h);

    // Horizontal pass into an f32 buffer of size dst_w × src.h.
    let mut horiz = vec![[0.0f32; 3]; dst_w * src.h];
    for y in 0..src.h {
        let row = src.row(y);
        let out = &mut horiz[y * dst_w..(y + 1) * dst_w];
        for (dst_px, taps) in out.iter_mut().zip(&x_taps) {
            let mut acc = [0.0f32; 3];
            for tap in taps {
                let px = row[tap.src];
                for c in 0..3 {
                    acc[c] += f32::from(px[c]) * tap.weight;
                }
            }
            *dst_px = acc;
        }
    }

    let mut out = ColorImage::new(dst_w, dst_h);
    for (y, taps) in y_taps.iter().enumerate() {
        let dst_row = out.row_mut(y);
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            let mut acc = [0.0f32; 3];
            for tap in taps {
                let px = horiz[tap.src * dst_w + x];
                for c in 0..3 {
                    acc[c] += px[c] * tap.weight;
                }
            }
            *dst_px = acc.map(|v| v.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

/// Bilinear resize.
pub fn resize_bilinear(src: &ColorImage, dst_w: usize, dst_h: usize) -> ColorImage {
    if src.w == dst_w && src.h == dst_h {
        return src.clone();
    }
    let resized = imageops::resize(
        &src.to_rgb_image(),
        dst_w as u32,
        dst_h as u32,
        FilterType::Triangle,
    );
    ColorImage::from_rgb_image(&resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_taps_partition_unit_weight() {
        for (src, dst) in [(10, 3), (1500, 1024), (7, 7), (3, 8)] {
            for taps in area_taps(src, dst) {
                let total: f32 = taps.iter().map(|t| t.weight).sum();
                assert!((total - 1.0).abs() < 1e-4, "src={src} dst={dst} total={total}");
            }
        }
    }

    #[test]
    fn area_downsample_averages_blocks() {
        // 4x4 checker of 2x2 blocks -> 2x2 where each output is one block colour.
        let src = ColorImage::from_fn(4, 4, |x, y| {
            if (x / 2 + y / 2) % 2 == 0 {
                [200, 100, 0]
            } else {
                [0, 50, 250]
            }
        });
        let out = resize_area(&src, 2, 2);
        assert_eq!(out.get(0, 0), [200, 100, 0]);
        assert_eq!(out.get(1, 0), [0, 50, 250]);

        let flat = resize_area(&src, 1, 1);
        assert_eq!(flat.get(0, 0), [100, 75, 125]);
    }

    #[test]
    fn bilinear_keeps_constant_images_constant() {
        let src = ColorImage::from_fn(5, 3, |_, _| [42, 17, 99]);
        let out = resize_bilinear(&src, 16, 11);
        assert_eq!((out.w, out.h), (16, 11));
        assert!(out.data.iter().all(|&px| px == [42, 17, 99]));
    }
}
