//! Normalisation of raw view photographs to the fixed working resolution.
//!
//! Overview
//! - Resizes to `target_size × target_size`. Inputs larger than the target in
//!   either dimension use area averaging; all others use bilinear
//!   interpolation.
//! - Converts to full-range YCbCr, equalizes the luma plane with CLAHE and
//!   converts back. Chrominance is untouched.

pub mod clahe;
pub mod resize;

use crate::color::{rgb_to_ycbcr, ycbcr_to_rgb};
use crate::error::{Error, Result};
use crate::image::ColorImage;
use clahe::ClaheParams;
use log::debug;
use serde::{Deserialize, Serialize};

/// Interpolation chosen for a given input size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMethod {
    Area,
    Bilinear,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    /// Side length of the square working image.
    pub target_size: usize,
    pub clahe: ClaheParams,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            target_size: 1024,
            clahe: ClaheParams::default(),
        }
    }
}

impl PreprocessParams {
    pub fn resize_method(&self, width: usize, height: usize) -> ResizeMethod {
        if width > self.target_size || height > self.target_size {
            ResizeMethod::Area
        } else {
            ResizeMethod::Bilinear
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Preprocessor {
    params: PreprocessParams,
}

impl Preprocessor {
    pub fn new(params: PreprocessParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PreprocessParams {
        &self.params
    }

    /// Resize and contrast-normalise `image`. `label` names the view in errors.
    pub fn process(&self, image: &ColorImage, label: &str) -> Result<ColorImage> {
        if image.w == 0 || image.h == 0 {
            return Err(Error::EmptyImage {
                view: label.to_string(),
                width: image.w,
                height: image.h,
            });
        }
        let side = self.params.target_size;
        let method = self.params.resize_method(image.w, image.h);
        debug!(
            "Preprocessor::process {} {}x{} -> {side}x{side} via {:?}",
            label, image.w, image.h, method
        );
        let resized = match method {
            ResizeMethod::Area => resize::resize_area(image, side, side),
            ResizeMethod::Bilinear => resize::resize_bilinear(image, side, side),
        };
        Ok(equalize_luma(&resized, &self.params.clahe))
    }
}

/// CLAHE on the luma channel only.
pub fn equalize_luma(image: &ColorImage, params: &ClaheParams) -> ColorImage {
    let ycc: Vec<[u8; 3]> = image.data.iter().map(|&px| rgb_to_ycbcr(px)).collect();
    let mut luma: Vec<u8> = ycc.iter().map(|c| c[0]).collect();
    clahe::apply(&mut luma, image.w, image.h, params);
    let data = ycc
        .iter()
        .zip(&luma)
        .map(|(c, &y)| ycbcr_to_rgb([y, c[1], c[2]]))
        .collect();
    ColorImage {
        w: image.w,
        h: image.h,
        data,
    }
}
