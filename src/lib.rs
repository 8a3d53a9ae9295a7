#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod aggregate;
pub mod analyzer;
pub mod bridge;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod heatmap;
pub mod image;
pub mod types;

// Stage internals – public for tools and tests.
pub mod color;
pub mod density;
pub mod preprocess;
pub mod segment;

// --- High-level re-exports -------------------------------------------------

// Main entry points: analyzer + results.
pub use crate::analyzer::{AnalysisResult, AnalyzerConfig, HairAnalyzer, ViewResult};
pub use crate::error::{Error, Result};
pub use crate::types::View;

// Per-stage building blocks.
pub use crate::aggregate::{CalibrationParams, HairCount, ViewAggregator, ViewContribution};
pub use crate::density::{CellFailurePolicy, DensityEstimator, DensityParams};
pub use crate::heatmap::sink::{ArtifactSink, FsSink, MemorySink};
pub use crate::heatmap::{HeatmapParams, HeatmapRenderer};
pub use crate::preprocess::{PreprocessParams, Preprocessor};
pub use crate::segment::{SegmentParams, Segmenter};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hair_density::prelude::*;
///
/// # fn main() -> hair_density::Result<()> {
/// let images = vec![ColorImage::new(512, 512); 4];
/// let analyzer = HairAnalyzer::new(AnalyzerConfig::default());
/// let result = analyzer.analyze(&images, None, &MemorySink::new())?;
/// println!("total_hairs={} time={}", result.total_hairs, result.analysis_time);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ColorImage;
    pub use crate::{AnalysisResult, AnalyzerConfig, HairAnalyzer, MemorySink, View};
}
