//! JSON runtime configuration for the command-line tools.
//!
//! ```json
//! {
//!   "inputs": { "front": "front.jpg", "back": "back.jpg",
//!               "left": "left.jpg", "right": "right.jpg" },
//!   "output": { "dir": "out", "result_json": "result.json" },
//!   "analyzer": { "density": { "max_workers": 4 } }
//! }
//! ```
//!
//! Relative input paths resolve against the config file's directory; relative
//! output paths resolve against `output.dir`.
use crate::analyzer::AnalyzerConfig;
use crate::error::{Error, Result};
use crate::types::View;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct InputConfig {
    pub front: PathBuf,
    pub back: PathBuf,
    pub left: PathBuf,
    pub right: PathBuf,
    /// Display labels in front, back, left, right order.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl InputConfig {
    pub fn path(&self, view: View) -> &Path {
        match view {
            View::Front => &self.front,
            View::Back => &self.back,
            View::Left => &self.left,
            View::Right => &self.right,
        }
    }

    fn resolve_against(&mut self, base: &Path) {
        for p in [&mut self.front, &mut self.back, &mut self.left, &mut self.right] {
            *p = resolve_path(base, p);
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Optional JSON report of the full result.
    pub result_json: Option<PathBuf>,
    /// Overrides `analyzer.heatmap.output_dir` when set.
    pub heatmap_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            result_json: None,
            heatmap_dir: None,
        }
    }
}

impl OutputConfig {
    pub fn result_path(&self) -> Option<PathBuf> {
        self.result_json.as_ref().map(|p| resolve_path(&self.dir, p))
    }

    pub fn heatmap_path(&self) -> Option<PathBuf> {
        self.heatmap_dir.as_ref().map(|p| resolve_path(&self.dir, p))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub inputs: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

impl RuntimeConfig {
    /// Analyzer parameters with output overrides applied.
    pub fn resolved_analyzer(&self) -> AnalyzerConfig {
        let mut cfg = self.analyzer.clone();
        if let Some(dir) = self.output.heatmap_path() {
            cfg.heatmap.output_dir = dir;
        }
        cfg
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;
    let mut config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))?;
    if let Some(labels) = &config.inputs.labels {
        if labels.len() != View::ALL.len() {
            return Err(Error::Config(format!(
                "{}: expected {} labels, got {}",
                path.display(),
                View::ALL.len(),
                labels.len()
            )));
        }
    }
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.inputs.resolve_against(base);
    Ok(config)
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("run.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn loads_and_resolves_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            r#"{
                "inputs": { "front": "f.png", "back": "b.png", "left": "/abs/l.png", "right": "r.png" },
                "output": { "dir": "out", "result_json": "result.json", "heatmap_dir": "maps" },
                "analyzer": { "density": { "max_workers": 3 } }
            }"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.inputs.path(View::Front), tmp.path().join("f.png"));
        assert_eq!(cfg.inputs.path(View::Left), Path::new("/abs/l.png"));
        assert_eq!(cfg.output.result_path(), Some(PathBuf::from("out/result.json")));
        assert_eq!(cfg.analyzer.density.max_workers, 3);
        assert_eq!(
            cfg.resolved_analyzer().heatmap.output_dir,
            PathBuf::from("out/maps")
        );
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("Failed to read")));
    }

    #[test]
    fn wrong_label_count_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            r#"{ "inputs": { "front": "f", "back": "b", "left": "l", "right": "r", "labels": ["A"] } }"#,
        );
        assert!(matches!(load_config(&path), Err(Error::Config(_))));
    }
}
