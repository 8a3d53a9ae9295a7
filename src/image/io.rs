//! I/O helpers for color images and JSON.
//!
//! - `decode_color_image`: decode an encoded buffer (PNG/JPEG/...) into RGB.
//! - `load_color_image`: read an image file from disk into RGB.
//! - `encode_png`: encode a `ColorImage` to PNG bytes.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ColorImage;
use crate::error::{Error, Result};
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Decode an encoded image buffer into an owned RGB image.
///
/// `label` names the view in error messages. Zero-area images are rejected.
pub fn decode_color_image(bytes: &[u8], label: &str) -> Result<ColorImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|source| Error::Decode {
            view: label.to_string(),
            source,
        })?
        .into_rgb8();
    let out = ColorImage::from_rgb_image(&img);
    if out.w == 0 || out.h == 0 {
        return Err(Error::EmptyImage {
            view: label.to_string(),
            width: out.w,
            height: out.h,
        });
    }
    Ok(out)
}

/// Load an image file and convert to 8-bit RGB.
pub fn load_color_image(path: &Path) -> Result<ColorImage> {
    let bytes = fs::read(path)?;
    decode_color_image(&bytes, &path.display().to_string())
}

/// Encode an RGB image as PNG.
pub fn encode_png(image: &ColorImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.to_rgb_image()).write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_preserves_pixels() {
        let img = ColorImage::from_fn(7, 5, |x, y| [x as u8 * 30, y as u8 * 40, 200]);
        let png = encode_png(&img).expect("encode");
        let decoded = decode_color_image(&png, "front").expect("decode");
        assert_eq!(decoded, img);
    }

    #[test]
    fn garbage_bytes_are_rejected_with_view_label() {
        let err = decode_color_image(b"definitely not an image", "back").unwrap_err();
        match err {
            Error::Decode { view, .. } => assert_eq!(view, "back"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
