// src/models/manifest.rs

//! Per-athlete capture manifest.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::catalog::CaptureTarget;

/// File name of the manifest inside an athlete folder.
pub const MANIFEST_FILE: &str = "capture_manifest.json";

/// A persisted screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArtifact {
    pub file: String,
    pub target: String,
    pub sha256: String,
}

/// What one capture pass produced for an athlete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureManifest {
    pub athlete: String,
    pub team: String,
    pub captured_at: DateTime<Local>,
    pub artifacts: Vec<ImageArtifact>,

    /// Targets that never became ready
    #[serde(default)]
    pub absent: Vec<String>,

    /// Whether the minimum number of images was reached
    pub complete: bool,
}

impl CaptureManifest {
    pub fn new(athlete: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            athlete: athlete.into(),
            team: team.into(),
            captured_at: Local::now(),
            artifacts: Vec::new(),
            absent: Vec::new(),
            complete: false,
        }
    }

    pub fn record_artifact(&mut self, target: &CaptureTarget, sha256: String) {
        self.artifacts.push(ImageArtifact {
            file: target.file_name(),
            target: target.id(),
            sha256,
        });
    }

    pub fn record_absent(&mut self, target: impl Into<String>) {
        self.absent.push(target.into());
    }

    /// Mark the manifest complete if it holds at least `min_images` artifacts.
    pub fn finalize(&mut self, min_images: usize) -> bool {
        self.complete = self.artifacts.len() >= min_images;
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_applies_minimum() {
        let mut manifest = CaptureManifest::new("A. Smith", "Riverside U14");
        manifest.record_absent("Nordic");
        assert!(!manifest.finalize(1));

        let target = CaptureTarget::WholeModal {
            prefix: "Nordic".into(),
        };
        manifest.record_artifact(&target, "ab".repeat(32));
        assert!(manifest.finalize(1));
        assert_eq!(manifest.artifacts[0].file, "Nordic_001.png");
        assert_eq!(manifest.artifacts[0].target, "Nordic#modal");
    }
}
