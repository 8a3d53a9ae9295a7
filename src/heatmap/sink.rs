//! Where rendered artifacts go.
//!
//! An [`ArtifactSink`] stores an encoded artifact under a name and returns the
//! reference string recorded in the result. Names come from
//! [`artifact_name`]: a deterministic FNV-1a hash of the pixels and view label
//! plus a process-wide counter, so two stores never collide.
use crate::error::{Error, Result};
use crate::image::ColorImage;
use log::debug;
use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub trait ArtifactSink: Send + Sync {
    /// Persist `bytes` as `name`, returning a reference to it.
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String>;
}

/// FNV-1a 64-bit hasher with the standard offset basis.
#[derive(Debug)]
pub struct FnvHasher(u64);

impl FnvHasher {
    pub fn new() -> Self {
        Self(0xcbf29ce484222325)
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }
}

static ARTIFACT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Lower-cased `label` with every character outside `[a-z0-9_-]` replaced by
/// `_`. Empty labels become `view`.
pub fn file_stem(label: &str) -> String {
    let stem: String = label
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    if stem.is_empty() {
        "view".to_string()
    } else {
        stem
    }
}

/// `<stem>_heatmap_<hash>_<seq>.png`, see [`file_stem`].
pub fn artifact_name(label: &str, pixels: &ColorImage) -> String {
    let mut hasher = FnvHasher::new();
    hasher.write(label.as_bytes());
    hasher.write(&(pixels.w as u64).to_le_bytes());
    hasher.write(&(pixels.h as u64).to_le_bytes());
    for px in &pixels.data {
        hasher.write(px);
    }
    let seq = ARTIFACT_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}_heatmap_{:016x}_{seq}.png",
        file_stem(label),
        hasher.finish()
    )
}

/// Writes artifacts into a directory and returns web-style references
/// `<public_prefix>/<name>`.
#[derive(Clone, Debug)]
pub struct FsSink {
    dir: PathBuf,
    public_prefix: String,
}

impl FsSink {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for FsSink {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let artifact_err = |e: std::io::Error| Error::Artifact {
            name: name.to_string(),
            reason: e.to_string(),
        };
        if Path::new(name).file_name().map_or(true, |f| f != name) {
            return Err(Error::Artifact {
                name: name.to_string(),
                reason: "name must be a single path component".to_string(),
            });
        }
        fs::create_dir_all(&self.dir).map_err(artifact_err)?;
        let path = self.dir.join(name);
        fs::write(&path, bytes).map_err(artifact_err)?;
        debug!("FsSink::store wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(format!(
            "{}/{}",
            self.public_prefix.trim_end_matches('/'),
            name
        ))
    }
}

/// Keeps artifacts in memory; references are `memory://<name>`.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        match self.artifacts.lock() {
            Ok(guard) => guard.iter().map(|(n, _)| n.clone()).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        let guard = self.artifacts.lock().ok()?;
        guard.iter().find(|(n, _)| n == name).map(|(_, b)| b.clone())
    }

    pub fn len(&self) -> usize {
        self.artifacts.lock().map_or(0, |g| g.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for MemorySink {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let mut guard = self.artifacts.lock().map_err(|_| Error::Artifact {
            name: name.to_string(),
            reason: "memory sink lock poisoned".to_string(),
        })?;
        guard.push((name.to_string(), bytes.to_vec()));
        Ok(format!("memory://{name}"))
    }
}
