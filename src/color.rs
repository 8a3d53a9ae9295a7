//! Per-pixel color-space conversions used by the preprocessing and
//! segmentation stages.
//!
//! All conversions operate on 8-bit RGB triples. HSV follows the common
//! 8-bit convention: hue in `[0, 180)` (degrees halved), saturation and value
//! in `[0, 255]`. YCbCr is the full-range (JPEG) variant, so chrominance of a
//! neutral grey is exactly 128.

use crate::image::Rgb8;

#[inline]
fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Full-range RGB → YCbCr.
#[inline]
pub fn rgb_to_ycbcr(px: Rgb8) -> [u8; 3] {
    let [r, g, b] = px.map(f32::from);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    [saturate_u8(y), saturate_u8(cb), saturate_u8(cr)]
}

/// Full-range YCbCr → RGB.
#[inline]
pub fn ycbcr_to_rgb(ycc: [u8; 3]) -> Rgb8 {
    let y = f32::from(ycc[0]);
    let cb = f32::from(ycc[1]) - 128.0;
    let cr = f32::from(ycc[2]) - 128.0;
    [
        saturate_u8(y + 1.402 * cr),
        saturate_u8(y - 0.344_136 * cb - 0.714_136 * cr),
        saturate_u8(y + 1.772 * cb),
    ]
}

/// RGB → HSV with hue in `[0, 180)`.
#[inline]
pub fn rgb_to_hsv(px: Rgb8) -> [u8; 3] {
    let [r, g, b] = px.map(i32::from);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;
    if v == 0 {
        return [0, 0, 0];
    }
    let s = saturate_u8(255.0 * diff as f32 / v as f32);
    if diff == 0 {
        return [0, s, v as u8];
    }
    let diff = diff as f32;
    let mut hue = if v == r {
        60.0 * (g - b) as f32 / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) as f32 / diff
    } else {
        240.0 + 60.0 * (r - g) as f32 / diff
    };
    if hue < 0.0 {
        hue += 360.0;
    }
    let mut h = (hue / 2.0).round() as u32;
    if h >= 180 {
        h -= 180;
    }
    [h as u8, s, v as u8]
}

/// Luma (BT.601 weights), the single-channel intensity used for texture.
#[inline]
pub fn rgb_to_gray(px: Rgb8) -> u8 {
    let [r, g, b] = px.map(f32::from);
    saturate_u8(0.299 * r + 0.587 * g + 0.114 * b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_has_neutral_chroma() {
        assert_eq!(rgb_to_ycbcr([0, 0, 0]), [0, 128, 128]);
        assert_eq!(ycbcr_to_rgb([3, 128, 128]), [3, 3, 3]);
    }

    #[test]
    fn ycbcr_round_trip_is_close() {
        for px in [[12u8, 200, 77], [255, 255, 255], [90, 60, 30], [1, 2, 250]] {
            let back = ycbcr_to_rgb(rgb_to_ycbcr(px));
            for c in 0..3 {
                let d = (i32::from(back[c]) - i32::from(px[c])).abs();
                assert!(d <= 2, "channel {c} drifted by {d}: {px:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
    }

    #[test]
    fn brown_falls_into_orange_hue_band() {
        // A typical mid brown (#8B5A2B).
        let [h, s, v] = rgb_to_hsv([139, 90, 43]);
        assert!((10..=20).contains(&h), "hue {h}");
        assert!(s > 50, "saturation {s}");
        assert_eq!(v, 139);
    }

    #[test]
    fn gray_uses_bt601_weights() {
        assert_eq!(rgb_to_gray([255, 255, 255]), 255);
        assert_eq!(rgb_to_gray([255, 0, 0]), 76);
        assert_eq!(rgb_to_gray([0, 0, 0]), 0);
    }
}
