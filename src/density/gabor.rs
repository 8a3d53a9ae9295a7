//! Oriented Gabor filter bank and per-pixel response variance.
//!
//! Kernels follow the usual real Gabor form
//! `exp(-(x'²/σ² + γ²·y'²/σ²)/2) · cos(2π·x'/λ + ψ)` with `x'`, `y'` the
//! coordinates rotated by θ. The bank is the cartesian product of the
//! configured orientations and frequencies; for each frequency `f` the
//! wavelength is `λ = 2π·f`.
//!
//! Filtering is a 2D correlation with reflect-101 borders. Each response is
//! saturated to the 8-bit range before the variance is taken, so the
//! variance is bounded by `127.5²`.
use crate::image::{ImageF32, ImageView, ImageViewMut};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GaborParams {
    /// Odd kernel side length.
    pub kernel_size: usize,
    pub sigma: f32,
    /// Spatial aspect ratio.
    pub gamma: f32,
    /// Phase offset (radians).
    pub psi: f32,
    pub orientations_deg: Vec<f32>,
    pub frequencies: Vec<f32>,
}

impl Default for GaborParams {
    fn default() -> Self {
        Self {
            kernel_size: 21,
            sigma: 3.0,
            gamma: 0.5,
            psi: 0.0,
            orientations_deg: vec![0.0, 45.0, 90.0, 135.0],
            frequencies: vec![0.1, 0.3, 0.5],
        }
    }
}

/// Square correlation kernel, row-major, centred.
#[derive(Clone, Debug)]
pub struct GaborKernel {
    pub size: usize,
    pub theta: f32,
    pub frequency: f32,
    pub weights: Vec<f32>,
}

impl GaborKernel {
    pub fn new(size: usize, sigma: f32, theta: f32, lambda: f32, gamma: f32, psi: f32) -> Self {
        let size = size | 1;
        let half = (size / 2) as i32;
        let sigma_x = f64::from(sigma);
        let sigma_y = f64::from(sigma) / f64::from(gamma);
        let ex = -0.5 / (sigma_x * sigma_x);
        let ey = -0.5 / (sigma_y * sigma_y);
        let cscale = std::f64::consts::TAU / f64::from(lambda);
        let (s, c) = f64::from(theta).sin_cos();

        let mut weights = vec![0.0f32; size * size];
        for ky in 0..size as i32 {
            for kx in 0..size as i32 {
                // Correlation tap at offset (dx, dy) carries the kernel value
                // at (-dx, -dy).
                let x = f64::from(half - kx);
                let y = f64::from(half - ky);
                let xr = x * c + y * s;
                let yr = -x * s + y * c;
                let v = (ex * xr * xr + ey * yr * yr).exp() * (cscale * xr + f64::from(psi)).cos();
                weights[(ky * size as i32 + kx) as usize] = v as f32;
            }
        }
        Self {
            size,
            theta,
            frequency: 0.0,
            weights,
        }
    }

    /// Correlate `src` with the kernel, saturating each output to `[0, 255]`.
    ///
    /// `padded` is `src` extended by `size / 2` pixels of reflect-101 border on
    /// every side, as produced by [`pad_reflect101`].
    pub fn apply_saturated(&self, padded: &ImageF32, out: &mut ImageF32) {
        let half = self.size / 2;
        let (w, h) = (padded.w - 2 * half, padded.h - 2 * half);
        debug_assert_eq!((out.w, out.h), (w, h));
        for y in 0..h {
            let dst = out.row_mut(y);
            for (x, px) in dst.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for ky in 0..self.size {
                    let src_row = &padded.row(y + ky)[x..x + self.size];
                    let k_row = &self.weights[ky * self.size..(ky + 1) * self.size];
                    for (s, k) in src_row.iter().zip(k_row) {
                        acc += s * k;
                    }
                }
                *px = acc.round().clamp(0.0, 255.0);
            }
        }
    }
}

#[inline]
fn reflect101(i: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * len as isize - 2;
    let r = i.rem_euclid(period);
    if r >= len as isize {
        (period - r) as usize
    } else {
        r as usize
    }
}

/// Extend `src` by `pad` pixels on each side using reflect-101 borders.
pub fn pad_reflect101(src: &ImageF32, pad: usize) -> ImageF32 {
    let p = pad as isize;
    ImageF32::from_fn(src.w + 2 * pad, src.h + 2 * pad, |x, y| {
        let sx = reflect101(x as isize - p, src.w);
        let sy = reflect101(y as isize - p, src.h);
        src.get(sx, sy)
    })
}

/// The full bank of kernels built from [`GaborParams`].
#[derive(Clone, Debug)]
pub struct GaborBank {
    kernels: Vec<GaborKernel>,
    pad: usize,
}

impl GaborBank {
    pub fn new(params: &GaborParams) -> Self {
        let mut kernels =
            Vec::with_capacity(params.orientations_deg.len() * params.frequencies.len());
        for &deg in &params.orientations_deg {
            for &freq in &params.frequencies {
                let mut k = GaborKernel::new(
                    params.kernel_size,
                    params.sigma,
                    deg.to_radians(),
                    std::f32::consts::TAU * freq,
                    params.gamma,
                    params.psi,
                );
                k.frequency = freq;
                kernels.push(k);
            }
        }
        let pad = kernels.first().map_or(0, |k| k.size / 2);
        Self { kernels, pad }
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn kernels(&self) -> &[GaborKernel] {
        &self.kernels
    }

    /// Per-pixel population variance of the saturated responses.
    pub fn response_variance(&self, gray: &ImageF32) -> ImageF32 {
        let n = self.kernels.len();
        let mut variance = ImageF32::new(gray.w, gray.h);
        if n == 0 || gray.w == 0 || gray.h == 0 {
            return variance;
        }

        let padded = pad_reflect101(gray, self.pad);
        let mut sum = vec![0.0f64; gray.w * gray.h];
        let mut sum_sq = vec![0.0f64; gray.w * gray.h];
        let mut response = ImageF32::new(gray.w, gray.h);
        for kernel in &self.kernels {
            kernel.apply_saturated(&padded, &mut response);
            for ((s, sq), &r) in sum.iter_mut().zip(sum_sq.iter_mut()).zip(&response.data) {
                let r = f64::from(r);
                *s += r;
                *sq += r * r;
            }
        }

        let inv_n = 1.0 / n as f64;
        for ((v, s), sq) in variance.data.iter_mut().zip(&sum).zip(&sum_sq) {
            let mean = s * inv_n;
            *v = (sq * inv_n - mean * mean).max(0.0) as f32;
        }
        variance
    }
}
