//! Density heatmap rendering.
//!
//! Rendering is split into a pure part (overlay and figure composition over
//! in-memory images) and a storage part behind [`sink::ArtifactSink`].
pub mod colormap;
pub mod figure;
pub mod overlay;
pub mod sink;

use crate::density::grid::GridMap;
use crate::error::Result;
use crate::image::io::encode_png;
use crate::image::ColorImage;
use log::debug;
use serde::Deserialize;
use sink::{artifact_name, ArtifactSink, FsSink};
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HeatmapParams {
    /// Weight of the colour layer in the overlay blend.
    pub alpha: f32,
    /// Store the three-panel figure; when false only the overlay is stored.
    pub figure: bool,
    /// Width in pixels of the separator between figure panels.
    pub gutter: usize,
    pub output_dir: PathBuf,
    pub public_prefix: String,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        Self {
            alpha: 0.6,
            figure: true,
            gutter: 16,
            output_dir: PathBuf::from("public/static/heatmaps"),
            public_prefix: "/static/heatmaps".to_string(),
        }
    }
}

impl HeatmapParams {
    /// Filesystem sink rooted at `output_dir`.
    pub fn fs_sink(&self) -> FsSink {
        FsSink::new(&self.output_dir, self.public_prefix.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct HeatmapRenderer {
    params: HeatmapParams,
}

impl HeatmapRenderer {
    pub fn new(params: HeatmapParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HeatmapParams {
        &self.params
    }

    /// Overlay only, same size as `image`.
    pub fn overlay(&self, image: &ColorImage, density: &GridMap) -> ColorImage {
        overlay::render_overlay(image, density, self.params.alpha)
    }

    /// The artifact image: the figure or the bare overlay, per configuration.
    pub fn render(&self, image: &ColorImage, density: &GridMap) -> ColorImage {
        if self.params.figure {
            figure::render_figure(image, density, self.params.alpha, self.params.gutter)
        } else {
            self.overlay(image, density)
        }
    }

    /// Render, encode as PNG and hand to `sink`. Returns the sink's reference.
    pub fn render_to_sink(
        &self,
        image: &ColorImage,
        density: &GridMap,
        label: &str,
        sink: &dyn ArtifactSink,
    ) -> Result<String> {
        let rendered = self.render(image, density);
        let bytes = encode_png(&rendered)?;
        let name = artifact_name(label, &rendered);
        let reference = sink.store(&name, &bytes)?;
        debug!(
            "HeatmapRenderer::render_to_sink {label} {}x{} -> {reference}",
            rendered.w, rendered.h
        );
        Ok(reference)
    }
}
