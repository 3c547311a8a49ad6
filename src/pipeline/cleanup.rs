// src/pipeline/cleanup.rs

//! Remove placeholder screenshots and empty folders from the base directory.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::CleanupConfig;
use crate::storage::{LocalStorage, dir_name, is_empty_dir};
use crate::utils::log;

use super::folders::athlete_folders;
use super::run::StageOptions;

/// What a cleanup pass did (or would do, in a dry run).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub folders_scanned: usize,
    pub files_deleted: usize,
    /// Leftovers of interrupted atomic writes
    pub tmp_deleted: usize,
    pub athletes_removed: usize,
    pub teams_removed: usize,
    /// Files that could not be deleted
    pub errors: usize,
}

pub async fn run_cleanup(cleanup: &CleanupConfig, options: &StageOptions) -> Result<CleanupReport> {
    log::header("Cleanup - Placeholder Screenshots");
    let storage = LocalStorage::new(&options.base_dir);
    let verb = if options.dry_run { "would delete" } else { "deleted" };
    let mut report = CleanupReport::default();

    for folder in athlete_folders(&storage, &options.target).await? {
        report.folders_scanned += 1;
        for name in &cleanup.target_files {
            let path = folder.path.join(name);
            if !tokio::fs::try_exists(&path).await? {
                continue;
            }
            if delete(&path, options.dry_run, verb, &mut report).await {
                report.files_deleted += 1;
            }
        }
        for path in tmp_files(&folder.path).await? {
            if delete(&path, options.dry_run, verb, &mut report).await {
                report.tmp_deleted += 1;
            }
        }

        if is_empty_dir(&folder.path).await? {
            if !options.dry_run {
                tokio::fs::remove_dir(&folder.path).await?;
            }
            report.athletes_removed += 1;
            log::sub_item(&format!("removed empty athlete folder {}/{}", folder.team, folder.athlete));
        }
    }

    if cleanup.prune_empty_teams {
        for team_dir in storage.team_dirs().await? {
            let team = dir_name(&team_dir);
            if !options.target.matches_team(&team) || !is_empty_dir(&team_dir).await? {
                continue;
            }
            if !options.dry_run {
                tokio::fs::remove_dir(&team_dir).await?;
            }
            report.teams_removed += 1;
            log::sub_item(&format!("removed empty team folder {team}"));
        }
    }

    log::summary(
        "cleanup",
        &[
            ("folders scanned", report.folders_scanned.to_string()),
            (verb, report.files_deleted.to_string()),
            ("stale .tmp files", report.tmp_deleted.to_string()),
            ("empty athlete folders", report.athletes_removed.to_string()),
            ("empty team folders", report.teams_removed.to_string()),
            ("errors", report.errors.to_string()),
        ],
    );
    Ok(report)
}

/// Remove one file, or only log it in a dry run. Failures are counted, not raised.
async fn delete(path: &Path, dry_run: bool, verb: &str, report: &mut CleanupReport) -> bool {
    if !dry_run {
        if let Err(e) = tokio::fs::remove_file(path).await {
            report.errors += 1;
            ::log::warn!("Could not delete {}: {}", path.display(), e);
            return false;
        }
    }
    log::sub_item(&format!("{verb} {}", path.display()));
    true
}

/// `*.tmp` files directly inside a folder.
async fn tmp_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_tmp = path.extension().is_some_and(|ext| ext == "tmp");
        if is_tmp && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(base: &Path) {
        let smith = base.join("Riverside U14/A. Smith");
        std::fs::create_dir_all(&smith).unwrap();
        std::fs::write(smith.join("Nordic_001.png"), "x").unwrap();
        std::fs::write(smith.join("Nordic_002.png"), "x").unwrap();

        let jones = base.join("Riverside U14/B. Jones");
        std::fs::create_dir_all(&jones).unwrap();
        std::fs::write(jones.join("20yd_Sprint_001.png"), "x").unwrap();

        std::fs::create_dir_all(base.join("KC Fusion U14")).unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_deletes_targets_and_empty_folders() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let cleanup = CleanupConfig {
            prune_empty_teams: true,
            ..CleanupConfig::default()
        };

        let report = run_cleanup(&cleanup, &StageOptions::new(dir.path())).await.unwrap();
        assert_eq!(
            report,
            CleanupReport {
                folders_scanned: 2,
                files_deleted: 2,
                tmp_deleted: 0,
                athletes_removed: 1,
                teams_removed: 1,
                errors: 0,
            }
        );
        assert!(dir.path().join("Riverside U14/A. Smith/Nordic_002.png").exists());
        assert!(!dir.path().join("Riverside U14/A. Smith/Nordic_001.png").exists());
        assert!(!dir.path().join("Riverside U14/B. Jones").exists());
        assert!(!dir.path().join("KC Fusion U14").exists());
    }

    #[tokio::test]
    async fn test_interrupted_writes_are_swept() {
        let dir = tempfile::tempdir().unwrap();
        let white = dir.path().join("Riverside U15/E. White");
        std::fs::create_dir_all(&white).unwrap();
        std::fs::write(white.join("Nordic_002.png.tmp"), "x").unwrap();
        std::fs::write(white.join("manifest.json.tmp"), "x").unwrap();
        let green = dir.path().join("Riverside U15/D. Green");
        std::fs::create_dir_all(&green).unwrap();
        std::fs::write(green.join("Nordic_002.png"), "x").unwrap();
        std::fs::write(green.join("Nordic_003.png.tmp"), "x").unwrap();

        let mut options = StageOptions::new(dir.path());
        options.dry_run = true;
        let report = run_cleanup(&CleanupConfig::default(), &options).await.unwrap();
        assert_eq!(report.tmp_deleted, 3);
        assert!(white.join("manifest.json.tmp").exists());

        options.dry_run = false;
        let report = run_cleanup(&CleanupConfig::default(), &options).await.unwrap();
        assert_eq!(report.tmp_deleted, 3);
        assert_eq!(report.files_deleted, 0);
        assert_eq!(report.athletes_removed, 1);
        assert!(!white.exists());
        assert!(green.join("Nordic_002.png").exists());
        assert!(!green.join("Nordic_003.png.tmp").exists());
    }

    #[tokio::test]
    async fn test_dry_run_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let mut options = StageOptions::new(dir.path());
        options.dry_run = true;

        let cleanup = CleanupConfig {
            prune_empty_teams: true,
            ..CleanupConfig::default()
        };

        let report = run_cleanup(&cleanup, &options).await.unwrap();
        assert_eq!(report.files_deleted, 2);
        assert_eq!(report.teams_removed, 1);
        assert!(dir.path().join("Riverside U14/A. Smith/Nordic_001.png").exists());
        assert!(dir.path().join("KC Fusion U14").exists());
    }
}
