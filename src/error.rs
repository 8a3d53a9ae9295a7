use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Exactly {expected} images required, got {got}")]
    ImageCount { expected: usize, got: usize },

    #[error("Failed to decode image for view {view}: {source}")]
    Decode {
        view: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid base64 payload for view {view}: {source}")]
    Base64 {
        view: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Image for view {view} is empty ({width}x{height})")]
    EmptyImage {
        view: String,
        width: usize,
        height: usize,
    },

    #[error("Mask size {mask_w}x{mask_h} does not match image size {image_w}x{image_h}")]
    MaskMismatch {
        image_w: usize,
        image_h: usize,
        mask_w: usize,
        mask_h: usize,
    },

    #[error("Cell ({row}, {col}) has malformed dimensions: expected {expected}x{expected}, got {width}x{height}")]
    CellShape {
        row: usize,
        col: usize,
        expected: usize,
        width: usize,
        height: usize,
    },

    #[error("Cell ({row}, {col}) lies outside the {rows}x{cols} grid")]
    CellOutOfGrid {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Density and confidence maps for view {view} differ in shape")]
    MapShape { view: String },

    #[error("Failed to store artifact {name}: {reason}")]
    Artifact { name: String, reason: String },

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;
