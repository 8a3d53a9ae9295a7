//! Binary hair mask with the same extent as its source image.
use super::traits::crop_rows;
use image::{GrayImage, Luma};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HairMask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<bool>,
}

impl HairMask {
    /// Empty mask (no hair) of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    /// Number of pixels marked as hair.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    pub fn crop(&self, x0: usize, y0: usize, w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: crop_rows(&self.data, self.w, x0, y0, w, h),
        }
    }

    /// 0/255 grayscale rendering, the layout expected by `imageproc`.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.w as u32, self.h as u32, |x, y| {
            Luma([if self.get(x as usize, y as usize) { 255 } else { 0 }])
        })
    }
}
