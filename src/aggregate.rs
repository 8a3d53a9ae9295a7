//! Combination of the per-view grid maps into a single hair-count estimate.
//!
//! Each view contributes `Σ density · factor · confidence · weight` over its
//! cells whose confidence exceeds `min_confidence`. The summed total is then
//! nudged into a plausible range: totals below `low_total` are scaled up,
//! totals above `high_total` scaled down. These constants are a heuristic, not
//! an anthropometric calibration.
use crate::density::grid::GridMap;
use crate::error::{Error, Result};
use crate::types::View;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    pub calibration_factor: f64,
    /// Per-view weights in [`View::ALL`] order.
    pub weights: [f64; 4],
    /// Cells at or below this confidence do not contribute.
    pub min_confidence: f32,
    pub low_total: f64,
    pub low_factor: f64,
    pub high_total: f64,
    pub high_factor: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            calibration_factor: 2.5,
            weights: [0.4, 0.4, 0.1, 0.1],
            min_confidence: 0.1,
            low_total: 50_000.0,
            low_factor: 1.5,
            high_total: 200_000.0,
            high_factor: 0.8,
        }
    }
}

impl CalibrationParams {
    pub fn weight(&self, view: View) -> f64 {
        self.weights[view.index()]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewContribution {
    pub view: View,
    /// Truncated per-view contribution, before the plausibility clamp.
    pub hairs: u64,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HairCount {
    pub total_hairs: u64,
    pub view_contributions: Vec<ViewContribution>,
    pub confidence: f32,
}

/// Scale `total` into the plausible range; strict comparisons on both ends.
pub fn apply_plausibility_clamp(total: f64, params: &CalibrationParams) -> f64 {
    if total < params.low_total {
        total * params.low_factor
    } else if total > params.high_total {
        total * params.high_factor
    } else {
        total
    }
}

/// Raw (unclamped, untruncated) contribution of a single view.
pub fn view_contribution(
    density: &GridMap,
    confidence: &GridMap,
    weight: f64,
    params: &CalibrationParams,
) -> f64 {
    density
        .data
        .iter()
        .zip(&confidence.data)
        .filter(|&(_, &c)| c > params.min_confidence)
        .map(|(&d, &c)| f64::from(d) * params.calibration_factor * f64::from(c) * weight)
        .sum()
}

#[derive(Clone, Debug, Default)]
pub struct ViewAggregator {
    params: CalibrationParams,
}

impl ViewAggregator {
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CalibrationParams {
        &self.params
    }

    /// Aggregate maps given in [`View::ALL`] order.
    pub fn aggregate(&self, density: &[GridMap], confidence: &[GridMap]) -> Result<HairCount> {
        for maps in [density, confidence] {
            if maps.len() != View::ALL.len() {
                return Err(Error::ImageCount {
                    expected: View::ALL.len(),
                    got: maps.len(),
                });
            }
        }

        let mut total = 0.0f64;
        let mut view_contributions = Vec::with_capacity(View::ALL.len());
        for ((view, d), c) in View::ALL.into_iter().zip(density).zip(confidence) {
            if (d.rows, d.cols) != (c.rows, c.cols) {
                return Err(Error::MapShape {
                    view: view.to_string(),
                });
            }
            let weight = self.params.weight(view);
            let hairs = view_contribution(d, c, weight, &self.params);
            total += hairs;
            view_contributions.push(ViewContribution {
                view,
                hairs: hairs as u64,
                weight,
            });
        }

        let clamped = apply_plausibility_clamp(total, &self.params);
        let mean_confidence =
            confidence.iter().map(|c| f64::from(c.mean())).sum::<f64>() / confidence.len() as f64;
        let confidence = (mean_confidence as f32).min(1.0);
        debug!(
            "ViewAggregator::aggregate raw total {total:.1}, clamped {clamped:.1}, confidence {confidence:.3}"
        );

        Ok(HairCount {
            total_hairs: clamped as u64,
            view_contributions,
            confidence,
        })
    }
}
