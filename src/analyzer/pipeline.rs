//! Four-view analysis pipeline.
//!
//! [`HairAnalyzer`] runs preprocess → segment → cell density for each view,
//! renders one heatmap per view through an [`ArtifactSink`], then aggregates
//! the grid maps into a single hair count.
//!
//! Typical usage:
//! ```no_run
//! use hair_density::{AnalyzerConfig, HairAnalyzer};
//! use hair_density::heatmap::sink::MemorySink;
//!
//! # fn example(buffers: [Vec<u8>; 4]) -> hair_density::Result<()> {
//! let analyzer = HairAnalyzer::new(AnalyzerConfig::default());
//! let sink = MemorySink::new();
//! let result = analyzer.analyze_encoded(&buffers, None, &sink)?;
//! println!("{} hairs ({:.2} confidence)", result.total_hairs, result.confidence);
//! # Ok(())
//! # }
//! ```
use super::params::AnalyzerConfig;
use super::result::{AnalysisResult, ViewResult};
use crate::aggregate::ViewAggregator;
use crate::density::{DensityEstimator, DensityOutput};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{TimingBreakdown, ViewReport};
use crate::error::{Error, Result};
use crate::heatmap::sink::ArtifactSink;
use crate::heatmap::HeatmapRenderer;
use crate::image::io::decode_color_image;
use crate::image::ColorImage;
use crate::preprocess::Preprocessor;
use crate::segment::Segmenter;
use crate::types::View;
use log::{debug, info};
use std::time::Instant;

/// Intermediate state of one view between density and rendering.
struct ProcessedView {
    view: View,
    label: String,
    image: ColorImage,
    density: DensityOutput,
    report: ViewReport,
    timings: TimingBreakdown,
}

pub struct HairAnalyzer {
    config: AnalyzerConfig,
    preprocessor: Preprocessor,
    segmenter: Segmenter,
    estimator: DensityEstimator,
    renderer: HeatmapRenderer,
    aggregator: ViewAggregator,
}

impl Default for HairAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl HairAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            preprocessor: Preprocessor::new(config.preprocess.clone()),
            segmenter: Segmenter::new(config.segment.clone()),
            estimator: DensityEstimator::new(config.density.clone()),
            renderer: HeatmapRenderer::new(config.heatmap.clone()),
            aggregator: ViewAggregator::new(config.calibration.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Decode four encoded buffers (front, back, left, right) and analyze
    /// them. `labels` defaults to `Front`, `Back`, `Left`, `Right`.
    pub fn analyze_encoded<B: AsRef<[u8]>>(
        &self,
        buffers: &[B],
        labels: Option<&[String]>,
        sink: &dyn ArtifactSink,
    ) -> Result<AnalysisResult> {
        check_count(buffers.len())?;
        let labels = resolve_labels(labels)?;
        let images = buffers
            .iter()
            .zip(&labels)
            .map(|(buf, label)| decode_color_image(buf.as_ref(), label))
            .collect::<Result<Vec<_>>>()?;
        self.analyze(&images, Some(&labels), sink)
    }

    /// Analyze four decoded images in [`View::ALL`] order.
    pub fn analyze(
        &self,
        images: &[ColorImage],
        labels: Option<&[String]>,
        sink: &dyn ArtifactSink,
    ) -> Result<AnalysisResult> {
        check_count(images.len())?;
        let labels = resolve_labels(labels)?;
        let start = Instant::now();
        info!(
            "HairAnalyzer::analyze start views={} parallel_views={}",
            images.len(),
            self.config.parallel_views
        );

        let processed = self.process_views(images, &labels)?;

        let mut timings = TimingBreakdown::default();
        let mut views = Vec::with_capacity(processed.len());
        let mut reports = Vec::with_capacity(processed.len());
        for pv in processed {
            timings.extend(pv.timings);
            let heatmap = timings.time(format!("{}/render", pv.view), || {
                self.renderer
                    .render_to_sink(&pv.image, &pv.density.density, &pv.label, sink)
            })?;
            reports.push(pv.report);
            views.push(ViewResult {
                view: pv.view,
                label: pv.label,
                density: pv.density.density,
                confidence: pv.density.confidence,
                heatmap,
            });
        }

        let density_maps: Vec<_> = views.iter().map(|v| v.density.clone()).collect();
        let confidence_maps: Vec<_> = views.iter().map(|v| v.confidence.clone()).collect();
        let count = timings.time("aggregate", || {
            self.aggregator.aggregate(&density_maps, &confidence_maps)
        })?;

        timings.total_ms = elapsed_ms(start);
        let result = AnalysisResult::assemble(views, count, timings, reports);
        info!(
            "HairAnalyzer::analyze done total_hairs={} confidence={:.3} in {}",
            result.total_hairs, result.confidence, result.analysis_time
        );
        Ok(result)
    }

    fn process_views(
        &self,
        images: &[ColorImage],
        labels: &[String],
    ) -> Result<Vec<ProcessedView>> {
        let jobs: Vec<(View, &ColorImage, &String)> = View::ALL
            .into_iter()
            .zip(images)
            .zip(labels)
            .map(|((view, image), label)| (view, image, label))
            .collect();

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            if self.config.parallel_views {
                return jobs
                    .par_iter()
                    .map(|&(view, image, label)| self.process_view(view, image, label))
                    .collect();
            }
        }

        jobs.iter()
            .map(|&(view, image, label)| self.process_view(view, image, label))
            .collect()
    }

    /// Preprocess, segment and estimate density for one view.
    fn process_view(&self, view: View, image: &ColorImage, label: &str) -> Result<ProcessedView> {
        let mut timings = TimingBreakdown::default();
        let processed = timings.time(format!("{view}/preprocess"), || {
            self.preprocessor.process(image, label)
        })?;
        let (mask, segment) = timings.time(format!("{view}/segment"), || {
            self.segmenter.segment_with_stats(&processed)
        });
        let density = timings.time(format!("{view}/density"), || {
            self.estimator.estimate(&processed, &mask)
        })?;
        debug!(
            "HairAnalyzer::process_view {view} hair_px={} analyzed_cells={}",
            segment.hair_pixels, density.stats.cells_analyzed
        );

        let report = ViewReport {
            view,
            label: label.to_string(),
            input_width: image.w,
            input_height: image.h,
            resize: self.preprocessor.params().resize_method(image.w, image.h),
            segment,
            density: density.stats,
            mean_density: density.density.mean(),
            max_density: density.density.max(),
            mean_confidence: density.confidence.mean(),
        };
        Ok(ProcessedView {
            view,
            label: label.to_string(),
            image: processed,
            density,
            report,
            timings,
        })
    }
}

fn check_count(got: usize) -> Result<()> {
    if got != View::ALL.len() {
        return Err(Error::ImageCount {
            expected: View::ALL.len(),
            got,
        });
    }
    Ok(())
}

fn resolve_labels(labels: Option<&[String]>) -> Result<Vec<String>> {
    match labels {
        None => Ok(View::ALL.iter().map(|v| v.label().to_string()).collect()),
        Some(l) if l.len() == View::ALL.len() => Ok(l.to_vec()),
        Some(l) => Err(Error::Config(format!(
            "expected {} view labels, got {}",
            View::ALL.len(),
            l.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::sink::{FsSink, MemorySink};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts the first `ok` stores, then fails.
    struct FailingSink {
        ok: usize,
        calls: AtomicUsize,
    }

    impl ArtifactSink for FailingSink {
        fn store(&self, name: &str, _bytes: &[u8]) -> Result<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.ok {
                return Ok(format!("ok://{name}"));
            }
            Err(Error::Artifact {
                name: name.to_string(),
                reason: "disk full".to_string(),
            })
        }
    }

    fn small_config() -> AnalyzerConfig {
        let mut cfg = AnalyzerConfig::default();
        cfg.preprocess.target_size = 128;
        cfg.heatmap.figure = false;
        cfg
    }

    #[test]
    fn wrong_image_count_fails_fast() {
        let analyzer = HairAnalyzer::new(small_config());
        let sink = MemorySink::new();
        let images = vec![ColorImage::new(8, 8); 3];
        let err = analyzer.analyze(&images, None, &sink).unwrap_err();
        assert!(matches!(err, Error::ImageCount { expected: 4, got: 3 }));
        assert!(sink.is_empty());
    }

    #[test]
    fn undecodable_buffer_names_its_view() {
        let analyzer = HairAnalyzer::new(small_config());
        let sink = MemorySink::new();
        let png = crate::image::io::encode_png(&ColorImage::new(8, 8)).unwrap();
        let buffers = vec![png.clone(), png.clone(), b"junk".to_vec(), png];
        let err = analyzer.analyze_encoded(&buffers, None, &sink).unwrap_err();
        assert!(matches!(err, Error::Decode { ref view, .. } if view == "Left"));
    }

    #[test]
    fn empty_image_is_rejected() {
        let analyzer = HairAnalyzer::new(small_config());
        let sink = MemorySink::new();
        let mut images = vec![ColorImage::new(8, 8); 4];
        images[1] = ColorImage::new(0, 5);
        let err = analyzer.analyze(&images, None, &sink).unwrap_err();
        assert!(matches!(err, Error::EmptyImage { ref view, .. } if view == "Back"));
    }

    #[test]
    fn label_count_must_match() {
        let analyzer = HairAnalyzer::new(small_config());
        let sink = MemorySink::new();
        let images = vec![ColorImage::new(8, 8); 4];
        let labels = vec!["a".to_string()];
        let err = analyzer.analyze(&images, Some(&labels), &sink).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn timings_cover_every_stage() {
        let analyzer = HairAnalyzer::new(small_config());
        let sink = MemorySink::new();
        let images = vec![ColorImage::new(16, 16); 4];
        let result = analyzer.analyze(&images, None, &sink).unwrap();
        for view in View::ALL {
            for stage in ["preprocess", "segment", "density", "render"] {
                let label = format!("{view}/{stage}");
                assert!(result.timings.stage(&label).is_some(), "missing {label}");
            }
        }
        assert!(result.timings.stage("aggregate").is_some());
        assert_eq!(sink.len(), 4);
        assert_eq!(result.diagnostics.len(), 4);
        assert_eq!(result.diagnostics[0].density.cells_total, 16);
    }

    #[test]
    fn failing_sink_aborts_the_run() {
        let analyzer = HairAnalyzer::new(small_config());
        let images = vec![ColorImage::new(16, 16); 4];
        let sink = FailingSink {
            ok: 2,
            calls: AtomicUsize::new(0),
        };
        let err = analyzer.analyze(&images, None, &sink).unwrap_err();
        assert!(matches!(err, Error::Artifact { ref reason, .. } if reason == "disk full"));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn path_like_labels_stay_in_the_output_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("heatmaps");
        let sink = FsSink::new(&dir, "/static/heatmaps");
        let analyzer = HairAnalyzer::new(small_config());
        let images = vec![ColorImage::new(16, 16); 4];
        let labels: Vec<String> = ["../../escaped", "Front/Top", "", "Right"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = analyzer.analyze(&images, Some(&labels), &sink).unwrap();
        assert_eq!(result.view_names, labels);
        for reference in &result.heatmaps {
            let name = reference.trim_start_matches("/static/heatmaps/");
            assert!(!name.contains('/'), "{reference}");
            assert!(dir.join(name).is_file(), "{reference}");
        }
        assert!(result.heatmaps[0].contains("______escaped_heatmap_"));
        assert!(result.heatmaps[1].contains("front_top_heatmap_"));
        assert!(result.heatmaps[2].contains("/view_heatmap_"));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn parallel_views_match_sequential() {
        let mut cfg = small_config();
        let image = ColorImage::from_fn(96, 96, |x, y| {
            if (30..90).contains(&x) && (20..80).contains(&y) {
                [139, 90, 43]
            } else {
                [245, 245, 240]
            }
        });
        let images = vec![image; 4];
        let seq = HairAnalyzer::new(cfg.clone())
            .analyze(&images, None, &MemorySink::new())
            .unwrap();
        cfg.parallel_views = true;
        let par = HairAnalyzer::new(cfg)
            .analyze(&images, None, &MemorySink::new())
            .unwrap();
        assert_eq!(seq.density_maps, par.density_maps);
        assert_eq!(seq.confidence_maps, par.confidence_maps);
        assert_eq!(seq.total_hairs, par.total_hairs);
    }
}
