pub mod color;
pub mod f32;
pub mod io;
pub mod mask;
pub mod traits;

pub use self::color::{ColorImage, Rgb8};
pub use self::f32::ImageF32;
pub use self::mask::HairMask;
pub use self::traits::{ImageView, ImageViewMut};
