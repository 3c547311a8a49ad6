// src/pipeline/folders.rs

//! The `Base/Team/Athlete` folder walk of the report stages.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::TeamTarget;
use crate::storage::{LocalStorage, dir_name};

/// An athlete folder found under the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthleteFolder {
    pub team: String,
    pub athlete: String,
    pub path: PathBuf,
}

impl AthleteFolder {
    fn new(team: String, path: PathBuf) -> Self {
        Self {
            athlete: dir_name(&path).trim().to_string(),
            team,
            path,
        }
    }

    pub fn analysis_path(&self) -> PathBuf {
        self.path.join(format!("{} Analysis.md", self.athlete))
    }

    pub fn program_path(&self, weeks: u32) -> PathBuf {
        self.path
            .join(format!("{} {} Weeks Training Program.docx", self.athlete, weeks))
    }
}

/// Targeted athlete folders, teams and athletes sorted case-insensitively.
pub async fn athlete_folders(storage: &LocalStorage, target: &TeamTarget) -> Result<Vec<AthleteFolder>> {
    let mut folders = Vec::new();
    for team_dir in storage.team_dirs().await? {
        let team = dir_name(&team_dir);
        if !target.matches_team(&team) {
            continue;
        }
        for path in storage.athlete_dirs(&team_dir).await? {
            let folder = AthleteFolder::new(team.clone(), path);
            if target.matches_athlete(&folder.team, &folder.athlete) {
                folders.push(folder);
            }
        }
    }
    Ok(folders)
}

pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| dir_name(p)).collect()
}

pub async fn exists(path: &Path) -> Result<bool> {
    Ok(tokio::fs::try_exists(path).await?)
}
