// src/pipeline/run.rs

//! Per-invocation outcome bookkeeping shared by every stage.

use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::{ApiSettings, Outcome, RunRecord, Stage, TeamTarget};
use crate::services::OpenAiCompatible;
use crate::storage::RunLog;
use crate::utils::{http, log};

/// Options common to all stages.
#[derive(Debug, Clone)]
pub struct StageOptions {
    pub base_dir: PathBuf,
    pub target: TeamTarget,
    /// Redo work whose output already exists
    pub overwrite: bool,
    /// No external calls, no artifact or log writes
    pub dry_run: bool,
}

impl StageOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            target: TeamTarget::All,
            overwrite: false,
            dry_run: false,
        }
    }
}

/// Ordered records of one stage run.
///
/// Every record is appended to the stage log as it happens, except in
/// dry-run mode where records stay in memory.
#[derive(Debug)]
pub struct PipelineRun {
    stage: Stage,
    dry_run: bool,
    log: RunLog,
    records: Vec<RunRecord>,
}

impl PipelineRun {
    pub fn new(stage: Stage, options: &StageOptions) -> Self {
        Self {
            stage,
            dry_run: options.dry_run,
            log: RunLog::new(&options.base_dir, stage),
            records: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Record one outcome. Only a failing log write is an error.
    pub fn record(
        &mut self,
        team: &str,
        athlete: &str,
        outcome: Outcome,
        detail: impl Into<String>,
    ) -> Result<()> {
        let record = RunRecord::new(self.stage, team, athlete, outcome, detail);
        match outcome {
            Outcome::Success => log::success(&format!("{}: {}", record.identifier(), record.detail)),
            Outcome::Skip => log::sub_item(&format!("skip {}: {}", record.identifier(), record.detail)),
            Outcome::Fail => ::log::error!("[FAIL] {}: {}", record.identifier(), record.detail),
        }
        if !self.dry_run {
            self.log.append(&record)?;
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    /// `Team/Athlete` (or `Team`) of every failed record, for a targeted re-run.
    pub fn failures(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.outcome == Outcome::Fail)
            .map(RunRecord::identifier)
            .collect()
    }

    pub fn log_summary(&self) {
        let mut items = vec![
            ("processed", self.count(Outcome::Success).to_string()),
            ("skipped", self.count(Outcome::Skip).to_string()),
            ("failed", self.count(Outcome::Fail).to_string()),
        ];
        if !self.dry_run && self.count(Outcome::Fail) > 0 {
            items.push(("failure list", self.log.failure_path().display().to_string()));
        }
        log::summary(&format!("{} stage", self.stage), &items);
    }
}

/// API client for a report stage.
///
/// A dry run never calls the API, so a missing key only warns there.
pub fn stage_api(settings: &ApiSettings, dry_run: bool) -> Result<OpenAiCompatible> {
    match OpenAiCompatible::from_settings(settings) {
        Ok(api) => Ok(api),
        Err(AppError::Config(message)) if dry_run => {
            ::log::warn!("{}; continuing without it for the dry run", message);
            let client = http::create_async_client(settings.timeout)?;
            Ok(OpenAiCompatible::new(client, &settings.base_url, ""))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_counts_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut run = PipelineRun::new(Stage::Program, &StageOptions::new(dir.path()));
        run.record("Riverside U14", "A. Smith", Outcome::Success, "ok").unwrap();
        run.record("Riverside U14", "B. Jones", Outcome::Fail, "429").unwrap();
        run.record("KC Fusion U14", "", Outcome::Fail, "filter stuck").unwrap();
        run.record("KC Fusion U14", "C. Brown", Outcome::Skip, "exists").unwrap();

        assert_eq!(run.count(Outcome::Fail), 2);
        assert_eq!(run.failures(), vec!["Riverside U14/B. Jones", "KC Fusion U14"]);
        let list = std::fs::read_to_string(dir.path().join("failed_program.txt")).unwrap();
        assert_eq!(list, "Riverside U14/B. Jones\nKC Fusion U14\n");

        let retry = TeamTarget::from_lines(&list);
        assert!(retry.matches_athlete("Riverside U14", "B. Jones"));
        assert!(!retry.matches_athlete("Riverside U14", "A. Smith"));
        assert!(retry.matches_athlete("KC Fusion U14", "C. Brown"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = StageOptions::new(dir.path());
        options.dry_run = true;
        let mut run = PipelineRun::new(Stage::Analysis, &options);
        run.record("T", "A", Outcome::Fail, "boom").unwrap();
        assert_eq!(run.records().len(), 1);
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
