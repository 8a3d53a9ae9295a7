//! End-to-end orchestration of the four-view analysis.

pub mod params;
pub mod pipeline;
pub mod result;

pub use params::AnalyzerConfig;
pub use pipeline::HairAnalyzer;
pub use result::{AnalysisResult, ViewResult};
