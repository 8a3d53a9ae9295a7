use crate::aggregate::{HairCount, ViewContribution};
use crate::density::grid::GridMap;
use crate::diagnostics::{TimingBreakdown, ViewReport};
use crate::types::View;
use serde::Serialize;

/// Per-view output: the two cell maps and where its heatmap was stored.
#[derive(Clone, Debug, Serialize)]
pub struct ViewResult {
    pub view: View,
    pub label: String,
    pub density: GridMap,
    pub confidence: GridMap,
    pub heatmap: String,
}

/// Outcome of one four-view analysis.
///
/// Serializes to the flat record consumed by callers: per-view lists
/// (`density_maps`, `confidence_maps`, `heatmaps`, `view_names`) are in
/// [`View::ALL`] order.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult {
    pub total_hairs: u64,
    pub view_contributions: Vec<ViewContribution>,
    pub confidence: f32,
    pub density_maps: Vec<GridMap>,
    pub confidence_maps: Vec<GridMap>,
    pub heatmaps: Vec<String>,
    pub view_names: Vec<String>,
    /// Wall-clock duration formatted with two decimals, e.g. `"1.23s"`.
    pub analysis_time: String,
    pub timings: TimingBreakdown,
    pub diagnostics: Vec<ViewReport>,
}

impl AnalysisResult {
    pub(crate) fn assemble(
        views: Vec<ViewResult>,
        count: HairCount,
        timings: TimingBreakdown,
        diagnostics: Vec<ViewReport>,
    ) -> Self {
        let analysis_time = format_seconds(timings.total_ms / 1000.0);
        let mut density_maps = Vec::with_capacity(views.len());
        let mut confidence_maps = Vec::with_capacity(views.len());
        let mut heatmaps = Vec::with_capacity(views.len());
        let mut view_names = Vec::with_capacity(views.len());
        for v in views {
            density_maps.push(v.density);
            confidence_maps.push(v.confidence);
            heatmaps.push(v.heatmap);
            view_names.push(v.label);
        }
        Self {
            total_hairs: count.total_hairs,
            view_contributions: count.view_contributions,
            confidence: count.confidence,
            density_maps,
            confidence_maps,
            heatmaps,
            view_names,
            analysis_time,
            timings,
            diagnostics,
        }
    }

    /// Reassemble the per-view record for `view`.
    pub fn view(&self, view: View) -> Option<ViewResult> {
        let i = view.index();
        Some(ViewResult {
            view,
            label: self.view_names.get(i)?.clone(),
            density: self.density_maps.get(i)?.clone(),
            confidence: self.confidence_maps.get(i)?.clone(),
            heatmap: self.heatmaps.get(i)?.clone(),
        })
    }
}

pub fn format_seconds(secs: f64) -> String {
    format!("{secs:.2}s")
}
