//! Parameter types configuring the analysis stages.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON config only
//! needs to name the knobs it changes.
use crate::aggregate::CalibrationParams;
use crate::density::DensityParams;
use crate::heatmap::HeatmapParams;
use crate::preprocess::PreprocessParams;
use crate::segment::SegmentParams;
use serde::Deserialize;

/// Analyzer-wide parameters, one block per stage.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub preprocess: PreprocessParams,
    pub segment: SegmentParams,
    pub density: DensityParams,
    pub calibration: CalibrationParams,
    pub heatmap: HeatmapParams,
    /// Process the four views concurrently (each still uses its own cell
    /// pool). Only effective with the `parallel` feature.
    pub parallel_views: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::CellFailurePolicy;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let json = r#"{
            "density": { "max_workers": 2, "failure_policy": "zero_confidence" },
            "calibration": { "calibration_factor": 3.0 },
            "heatmap": { "alpha": 0.5 }
        }"#;
        let cfg: AnalyzerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.density.max_workers, 2);
        assert_eq!(cfg.density.cell_size, 32);
        assert_eq!(cfg.density.failure_policy, CellFailurePolicy::ZeroConfidence);
        assert_eq!(cfg.density.gabor.frequencies, vec![0.1, 0.3, 0.5]);
        assert_eq!(cfg.calibration.calibration_factor, 3.0);
        assert_eq!(cfg.calibration.weights, [0.4, 0.4, 0.1, 0.1]);
        assert_eq!(cfg.heatmap.alpha, 0.5);
        assert_eq!(cfg.preprocess.target_size, 1024);
        assert_eq!(cfg.segment.min_region_area, 1000);
        assert!(!cfg.parallel_views);
    }

    #[test]
    fn empty_object_is_the_default_config() {
        let cfg: AnalyzerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.preprocess.clahe.tiles_x, 8);
        assert_eq!(cfg.segment.ranges.len(), 3);
        assert_eq!(cfg.heatmap.public_prefix, "/static/heatmaps");
    }
}
