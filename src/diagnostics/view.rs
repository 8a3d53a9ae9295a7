use crate::density::DensityStats;
use crate::preprocess::ResizeMethod;
use crate::segment::SegmentStats;
use crate::types::View;
use serde::Serialize;

/// What happened to one view on its way through the pipeline.
#[derive(Clone, Debug, Serialize)]
pub struct ViewReport {
    pub view: View,
    pub label: String,
    pub input_width: usize,
    pub input_height: usize,
    pub resize: ResizeMethod,
    pub segment: SegmentStats,
    pub density: DensityStats,
    /// Mean of the view's density map.
    pub mean_density: f32,
    pub max_density: f32,
    /// Mean of the view's confidence map.
    pub mean_confidence: f32,
}
