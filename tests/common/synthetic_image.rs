use hair_density::image::ColorImage;

pub const SKIN: [u8; 3] = [245, 245, 240];
pub const BROWN: [u8; 3] = [139, 90, 43];
pub const DARK_BROWN: [u8; 3] = [100, 60, 30];

/// Uniform RGB noise from a fixed-seed LCG, so every call with the same seed
/// returns the same image.
pub fn uniform_noise_rgb(width: usize, height: usize, seed: u32) -> ColorImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut state = seed;
    ColorImage::from_fn(width, height, |_, _| {
        let mut px = [0u8; 3];
        for c in &mut px {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            *c = (state >> 16) as u8;
        }
        px
    })
}

/// Skin-toned background with a striped brown "hair" rectangle covering
/// `[x0, x1) × [y0, y1)`.
pub fn hair_patch_scene(
    width: usize,
    height: usize,
    (x0, y0): (usize, usize),
    (x1, y1): (usize, usize),
) -> ColorImage {
    ColorImage::from_fn(width, height, |x, y| {
        if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            if (x + y) % 4 < 2 {
                DARK_BROWN
            } else {
                BROWN
            }
        } else {
            SKIN
        }
    })
}
