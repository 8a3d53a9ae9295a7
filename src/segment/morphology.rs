//! Binary morphology with an elliptical (disk) structuring element.
//!
//! Pixels outside the image never influence the result: erosion treats them
//! as foreground and dilation as background.
use crate::image::HairMask;

/// Offsets `(dx, dy)` of a disk of the given radius.
///
/// Rows are spanned with the half-width `round(r·sqrt(1 − dy²/r²))`, which
/// yields the classic 5×5 ellipse (cross-capped square) for radius 2.
pub fn disk_offsets(radius: usize) -> Vec<(isize, isize)> {
    let r = radius as isize;
    if r == 0 {
        return vec![(0, 0)];
    }
    let rf = radius as f64;
    let mut offsets = Vec::new();
    for dy in -r..=r {
        let t = (rf * rf - (dy * dy) as f64) / (rf * rf);
        let half = (rf * t.max(0.0).sqrt()).round() as isize;
        for dx in -half..=half {
            offsets.push((dx, dy));
        }
    }
    offsets
}

fn sweep(mask: &HairMask, offsets: &[(isize, isize)], dilate: bool) -> HairMask {
    let (w, h) = (mask.w as isize, mask.h as isize);
    HairMask::from_fn(mask.w, mask.h, |x, y| {
        let (x, y) = (x as isize, y as isize);
        let mut in_bounds = offsets.iter().filter_map(|&(dx, dy)| {
            let (sx, sy) = (x + dx, y + dy);
            (sx >= 0 && sy >= 0 && sx < w && sy < h).then(|| mask.get(sx as usize, sy as usize))
        });
        if dilate {
            in_bounds.any(|v| v)
        } else {
            in_bounds.all(|v| v)
        }
    })
}

pub fn dilate(mask: &HairMask, offsets: &[(isize, isize)]) -> HairMask {
    sweep(mask, offsets, true)
}

pub fn erode(mask: &HairMask, offsets: &[(isize, isize)]) -> HairMask {
    sweep(mask, offsets, false)
}

/// Dilate then erode: fills gaps narrower than the element.
pub fn close(mask: &HairMask, offsets: &[(isize, isize)]) -> HairMask {
    erode(&dilate(mask, offsets), offsets)
}

/// Erode then dilate: removes protrusions narrower than the element.
pub fn open(mask: &HairMask, offsets: &[(isize, isize)]) -> HairMask {
    dilate(&erode(mask, offsets), offsets)
}
