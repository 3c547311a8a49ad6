// src/models/record.rs

//! Structured per-athlete outcomes of a pipeline run.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::utils::sanitize_filename;

/// A pipeline stage that records outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Scrape,
    Analysis,
    Program,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Scrape => "scrape",
            Stage::Analysis => "analysis",
            Stage::Program => "program",
        }
    }

    /// Append-only CSV log in the base directory.
    pub fn log_file_name(&self) -> String {
        format!("{}_log.csv", self.as_str())
    }

    /// Append-only `Team/Athlete` failure list in the base directory.
    pub fn failure_file_name(&self) -> String {
        format!("failed_{}.txt", self.as_str())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Skip,
    Fail,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Skip => "skip",
            Outcome::Fail => "fail",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One processed item. `athlete` is empty for team-level records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: DateTime<Local>,
    pub team: String,
    pub athlete: String,
    pub stage: Stage,
    pub outcome: Outcome,
    pub detail: String,
}

impl RunRecord {
    pub const CSV_HEADER: [&'static str; 6] =
        ["timestamp", "team", "athlete", "stage", "outcome", "detail"];

    pub fn new(
        stage: Stage,
        team: impl Into<String>,
        athlete: impl Into<String>,
        outcome: Outcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            team: team.into(),
            athlete: athlete.into(),
            stage,
            outcome,
            detail: detail.into(),
        }
    }

    /// `Team/Athlete` in folder form, or just `Team` for team-level records.
    ///
    /// Folder names never contain `/`, so the line splits back unambiguously.
    pub fn identifier(&self) -> String {
        let team = sanitize_filename(&self.team);
        if self.athlete.is_empty() {
            team
        } else {
            format!("{}/{}", team, sanitize_filename(&self.athlete))
        }
    }

    pub fn csv_fields(&self) -> [String; 6] {
        [
            self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.team.clone(),
            self.athlete.clone(),
            self.stage.to_string(),
            self.outcome.to_string(),
            self.detail.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_uses_folder_names() {
        let record = RunRecord::new(Stage::Scrape, "U14/U15 Girls", "A. Smith", Outcome::Fail, "x");
        assert_eq!(record.identifier(), "U14U15 Girls/A. Smith");
        let team_level = RunRecord::new(Stage::Scrape, "U14/U15 Girls", "", Outcome::Fail, "x");
        assert_eq!(team_level.identifier(), "U14U15 Girls");
    }

    #[test]
    fn stage_file_names() {
        assert_eq!(Stage::Analysis.log_file_name(), "analysis_log.csv");
        assert_eq!(Stage::Program.failure_file_name(), "failed_program.txt");
    }

    #[test]
    fn identifier_omits_missing_athlete() {
        let team_level = RunRecord::new(Stage::Scrape, "Riverside U14", "", Outcome::Fail, "x");
        assert_eq!(team_level.identifier(), "Riverside U14");
        let athlete = RunRecord::new(Stage::Scrape, "Riverside U14", "B. Jones", Outcome::Fail, "");
        assert_eq!(athlete.identifier(), "Riverside U14/B. Jones");
        assert_eq!(athlete.csv_fields()[4], "fail");
    }
}
