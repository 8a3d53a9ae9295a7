/// Row access shared by the owned buffers of this crate.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

/// Copy the `w × h` window at `(x0, y0)` out of a contiguous row-major buffer.
///
/// The window must lie inside the source; callers clamp beforehand.
pub(crate) fn crop_rows<P: Copy>(
    src: &[P],
    stride: usize,
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
) -> Vec<P> {
    let mut out = Vec::with_capacity(w * h);
    for y in y0..y0 + h {
        let start = y * stride + x0;
        out.extend_from_slice(&src[start..start + w]);
    }
    out
}
