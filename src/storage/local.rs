// src/storage/local.rs

//! Local filesystem storage for athlete artifacts.
//!
//! ## Storage Layout
//!
//! ```text
//! {base_dir}/
//! ├── scrape_log.csv, analysis_log.csv, program_log.csv
//! ├── failed_scrape.txt, failed_analysis.txt, failed_program.txt
//! └── {Team}/
//!     └── {Athlete}/
//!         ├── {Prefix}_{NNN}.png
//!         ├── capture_manifest.json
//!         ├── {Athlete} Analysis.md
//!         └── {Athlete} 8 Weeks Training Program.docx
//! ```
//!
//! Every artifact write goes through a `.tmp` file and a rename, so an
//! interrupted run never leaves a truncated artifact behind.

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Athlete, CaptureManifest, MANIFEST_FILE};
use crate::utils::natural_cmp;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Folder holding an athlete's artifacts.
    pub fn athlete_dir(&self, athlete: &Athlete) -> PathBuf {
        athlete.folder(&self.root_dir)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    pub async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        Self::ensure_dir(path).await?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    pub async fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        self.write_bytes(path, text.as_bytes()).await
    }

    /// Write JSON data.
    pub async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(path, &bytes).await
    }

    /// Read JSON data, returning None if the file doesn't exist.
    pub async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Persist one screenshot into the athlete folder.
    pub async fn write_image(&self, athlete: &Athlete, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.athlete_dir(athlete).join(file_name);
        self.write_bytes(&path, bytes).await?;
        Ok(path)
    }

    pub async fn write_manifest(&self, athlete: &Athlete, manifest: &CaptureManifest) -> Result<()> {
        let path = self.athlete_dir(athlete).join(MANIFEST_FILE);
        self.write_json(&path, manifest).await
    }

    /// Load the capture manifest. An unreadable manifest counts as missing.
    pub async fn read_manifest(&self, athlete: &Athlete) -> Result<Option<CaptureManifest>> {
        let path = self.athlete_dir(athlete).join(MANIFEST_FILE);
        match self.read_json(&path).await {
            Err(AppError::Json(e)) => {
                log::warn!("Ignoring corrupt manifest {:?}: {}", path, e);
                Ok(None)
            }
            other => other,
        }
    }

    /// Whether a previous run finished capturing this athlete.
    pub async fn has_complete_capture(&self, athlete: &Athlete) -> Result<bool> {
        Ok(self
            .read_manifest(athlete)
            .await?
            .is_some_and(|m| m.complete))
    }

    /// Team folders, sorted case-insensitively.
    pub async fn team_dirs(&self) -> Result<Vec<PathBuf>> {
        if !tokio::fs::try_exists(&self.root_dir).await? {
            return Ok(Vec::new());
        }
        sorted_subdirs(&self.root_dir).await
    }

    /// Athlete folders of a team, sorted case-insensitively.
    pub async fn athlete_dirs(&self, team_dir: &Path) -> Result<Vec<PathBuf>> {
        sorted_subdirs(team_dir).await
    }
}

/// Name of the last path component.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

async fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort_by(|a, b| natural_cmp(&dir_name(a), &dir_name(b)));
    Ok(dirs)
}

/// PNG files directly inside a folder, in `natural_cmp` order of file name.
pub async fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png && entry.file_type().await?.is_file() {
            images.push(path);
        }
    }
    images.sort_by(|a, b| natural_cmp(&dir_name(a), &dir_name(b)));
    Ok(images)
}

/// Whether a folder has no entries at all.
pub async fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    Ok(entries.next_entry().await?.is_none())
}
