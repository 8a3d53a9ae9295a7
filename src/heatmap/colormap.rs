//! Piecewise-linear approximation of matplotlib's `plasma` colormap.
use crate::image::Rgb8;

/// Evenly spaced samples at t = 0, 1/8, ..., 1.
const PLASMA_STOPS: [Rgb8; 9] = [
    [0x0d, 0x08, 0x87],
    [0x4c, 0x02, 0xa1],
    [0x7e, 0x03, 0xa8],
    [0xa8, 0x22, 0x96],
    [0xcc, 0x47, 0x78],
    [0xe6, 0x6c, 0x5c],
    [0xf8, 0x95, 0x40],
    [0xfd, 0xc5, 0x27],
    [0xf0, 0xf9, 0x21],
];

/// Map `t` in `[0, 1]` to a plasma colour. Out-of-range and NaN inputs clamp.
pub fn plasma(t: f32) -> Rgb8 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let segments = (PLASMA_STOPS.len() - 1) as f32;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(PLASMA_STOPS.len() - 2);
    let frac = pos - i as f32;
    let (a, b) = (PLASMA_STOPS[i], PLASMA_STOPS[i + 1]);
    let mut out = [0u8; 3];
    for c in 0..3 {
        let v = f32::from(a[c]) + (f32::from(b[c]) - f32::from(a[c])) * frac;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}
