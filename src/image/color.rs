//! Owned 3-channel 8-bit RGB image (`height × width × 3`).
use super::traits::{crop_rows, ImageView, ImageViewMut};
use image::RgbImage;

pub type Rgb8 = [u8; 3];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<Rgb8>,
}

impl ColorImage {
    /// Construct an all-black image of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![[0; 3]; w * h],
        }
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> Rgb8) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb8 {
        self.data[y * self.w + x]
    }

    /// Owned copy of the `w × h` window at `(x0, y0)`.
    pub fn crop(&self, x0: usize, y0: usize, w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: crop_rows(&self.data, self.w, x0, y0, w, h),
        }
    }

    pub fn from_rgb_image(img: &RgbImage) -> Self {
        Self {
            w: img.width() as usize,
            h: img.height() as usize,
            data: img.pixels().map(|p| p.0).collect(),
        }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.w as u32, self.h as u32, |x, y| {
            image::Rgb(self.get(x as usize, y as usize))
        })
    }
}

impl ImageView for ColorImage {
    type Pixel = Rgb8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[Rgb8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ColorImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Rgb8] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}
