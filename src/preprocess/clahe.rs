//! Contrast-limited adaptive histogram equalization on an 8-bit plane.
//!
//! The plane is split into a `tiles_x × tiles_y` grid. Each tile gets a
//! clipped, redistributed histogram and a cumulative LUT; output pixels
//! bilinearly interpolate the LUTs of the four nearest tile centres. Planes
//! whose size is not a multiple of the grid are virtually extended with
//! reflect-101 borders when building the tile histograms.

use serde::Deserialize;

const BINS: usize = 256;

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    pub clip_limit: f32,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

#[inline]
fn reflect101(i: usize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * len - 2;
    let r = i % period;
    if r >= len {
        period - r
    } else {
        r
    }
}

fn tile_lut(
    plane: &[u8],
    w: usize,
    h: usize,
    x0: usize,
    y0: usize,
    tile_w: usize,
    tile_h: usize,
    clip_limit: f32,
) -> [u8; BINS] {
    let mut hist = [0usize; BINS];
    for y in y0..y0 + tile_h {
        let sy = reflect101(y, h);
        let row = &plane[sy * w..(sy + 1) * w];
        for x in x0..x0 + tile_w {
            hist[row[reflect101(x, w)] as usize] += 1;
        }
    }

    let area = tile_w * tile_h;
    if clip_limit > 0.0 {
        let limit = ((clip_limit * area as f32 / BINS as f32) as usize).max(1);
        let mut clipped = 0usize;
        for bin in hist.iter_mut() {
            if *bin > limit {
                clipped += *bin - limit;
                *bin = limit;
            }
        }
        let batch = clipped / BINS;
        let mut residual = clipped % BINS;
        for bin in hist.iter_mut() {
            *bin += batch;
        }
        if residual > 0 {
            let step = (BINS / residual).max(1);
            let mut i = 0;
            while i < BINS && residual > 0 {
                hist[i] += 1;
                residual -= 1;
                i += step;
            }
        }
    }

    let scale = 255.0 / area as f32;
    let mut lut = [0u8; BINS];
    let mut cdf = 0usize;
    for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
        cdf += count;
        *slot = (cdf as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Neighbouring tile indices and the weight of the second one for a
/// coordinate along one axis.
#[inline]
fn tile_neighbours(pos: usize, tile_len: usize, tiles: usize) -> (usize, usize, f32) {
    let t = pos as f32 / tile_len as f32 - 0.5;
    let t1 = t.floor();
    let frac = t - t1;
    let lo = if t1 < 0.0 { 0 } else { t1 as usize };
    let hi = if t1 + 1.0 < tiles as f32 { (t1 + 1.0) as usize } else { lo };
    (lo.min(tiles - 1), hi.min(tiles - 1), frac)
}

/// Equalize `plane` (row-major, `w × h`) in place.
pub fn apply(plane: &mut [u8], w: usize, h: usize, params: &ClaheParams) {
    if w == 0 || h == 0 {
        return;
    }
    let tiles_x = params.tiles_x.clamp(1, w);
    let tiles_y = params.tiles_y.clamp(1, h);
    let tile_w = w.div_ceil(tiles_x);
    let tile_h = h.div_ceil(tiles_y);

    let mut luts = Vec::with_capacity(tiles_x * tiles_y);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            luts.push(tile_lut(
                plane,
                w,
                h,
                tx * tile_w,
                ty * tile_h,
                tile_w,
                tile_h,
                params.clip_limit,
            ));
        }
    }

    let x_neighbours: Vec<_> = (0..w)
        .map(|x| tile_neighbours(x, tile_w, tiles_x))
        .collect();
    for y in 0..h {
        let (ty1, ty2, ya) = tile_neighbours(y, tile_h, tiles_y);
        let row = &mut plane[y * w..(y + 1) * w];
        for (px, &(tx1, tx2, xa)) in row.iter_mut().zip(&x_neighbours) {
            let v = *px as usize;
            let tl = f32::from(luts[ty1 * tiles_x + tx1][v]);
            let tr = f32::from(luts[ty1 * tiles_x + tx2][v]);
            let bl = f32::from(luts[ty2 * tiles_x + tx1][v]);
            let br = f32::from(luts[ty2 * tiles_x + tx2][v]);
            let top = tl * (1.0 - xa) + tr * xa;
            let bottom = bl * (1.0 - xa) + br * xa;
            *px = (top * (1.0 - ya) + bottom * ya).round().clamp(0.0, 255.0) as u8;
        }
    }
}
