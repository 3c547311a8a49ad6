// src/pipeline/pipeline.rs

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, Outcome};
use crate::portal::Portal;
use crate::services::{GenerativeApi, RateLimitedClient};
use crate::utils::log;

use super::analysis::run_analysis;
use super::cleanup::{CleanupReport, run_cleanup};
use super::program::run_program;
use super::run::{PipelineRun, StageOptions};
use super::scrape::run_scrape;

/// Outcome of every stage of a full run.
#[derive(Debug)]
pub struct PipelineReport {
    pub scrape: PipelineRun,
    pub cleanup: CleanupReport,
    pub analysis: PipelineRun,
    pub program: PipelineRun,
}

impl PipelineReport {
    pub fn failed(&self) -> usize {
        [&self.scrape, &self.analysis, &self.program]
            .iter()
            .map(|run| run.count(Outcome::Fail))
            .sum()
    }
}

/// Run the full pipeline: scrape, cleanup, analyze, program.
///
/// Every stage walks the same base directory and target, so athletes that
/// failed an early stage simply fail or skip the later ones.
pub async fn run_pipeline<P, A, B>(
    config: Arc<Config>,
    portal: &P,
    options: &StageOptions,
    analysis_client: &mut RateLimitedClient<A>,
    program_client: &mut RateLimitedClient<B>,
) -> Result<PipelineReport>
where
    P: Portal + ?Sized,
    A: GenerativeApi,
    B: GenerativeApi,
{
    log::header("VALD Pipeline");
    let total_steps = 4;

    log::step(1, total_steps, "Scrape - Capturing portal screenshots");
    let scrape = run_scrape(config.clone(), portal, options).await?;

    log::step(2, total_steps, "Cleanup - Removing placeholder screenshots");
    let cleanup = run_cleanup(&config.cleanup, options).await?;

    log::step(3, total_steps, "Analyze - Generating analyses");
    let analysis = run_analysis(&config, options, analysis_client).await?;

    log::step(4, total_steps, "Program - Generating training programs");
    let program = run_program(&config, options, program_client).await?;

    let report = PipelineReport {
        scrape,
        cleanup,
        analysis,
        program,
    };
    if report.failed() == 0 {
        log::success("Pipeline complete");
    } else {
        ::log::warn!(
            "Pipeline complete with {} failures; see the failed_<stage>.txt lists",
            report.failed()
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricTile, ModalTest, TeamTarget, TileLocator};
    use crate::portal::mock::MockPortal;
    use crate::services::scripted::ScriptedApi;

    fn config() -> Config {
        let mut config = Config::default();
        config.capture.modals = vec![ModalTest {
            label: "Nordic".into(),
            prefix: "Nordic".into(),
            tile: TileLocator::TestId {
                test_id: "nordbord-tile".into(),
                title: None,
            },
        }];
        config.capture.tiles = vec![MetricTile {
            label: "Lunge".into(),
            prefix: "Lunge".into(),
            tile: TileLocator::HumanTrak {
                title: "Lunge".into(),
            },
            include_base: true,
            metrics: vec!["Knee".into()],
        }];
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_produces_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = Arc::new(config());
        let portal = MockPortal::new()
            .with_team("Riverside U14", &["A. Smith"])
            .with_team("Riverside U15", &["D. Green"])
            .with_empty_athlete("D. Green");
        let mut options = StageOptions::new(dir.path());
        options.target = TeamTarget::Prefix("Riverside".into());

        let analysis_api = ScriptedApi::replying("## Nordic\n- Balanced");
        let program_api = ScriptedApi::replying("# Program Overview\n## Weeks 1-2\n- Hops");
        let mut analysis = RateLimitedClient::from_settings(analysis_api.clone(), &config.analysis.api());
        let mut program = RateLimitedClient::from_settings(program_api.clone(), &config.program.api());

        let report = run_pipeline(config, &portal, &options, &mut analysis, &mut program)
            .await
            .unwrap();

        assert_eq!(report.scrape.count(Outcome::Success), 1);
        assert_eq!(report.scrape.failures(), vec!["Riverside U15/D. Green"]);
        assert_eq!(report.cleanup.files_deleted, 1);
        assert_eq!(report.analysis.count(Outcome::Success), 1);
        assert_eq!(report.program.count(Outcome::Success), 1);
        assert_eq!(analysis_api.calls(), 1);
        assert_eq!(program_api.calls(), 1);

        let smith = dir.path().join("Riverside U14/A. Smith");
        assert!(!smith.join("Nordic_001.png").exists());
        assert!(smith.join("Nordic_002.png").exists());
        assert!(smith.join("A. Smith Analysis.md").exists());
        assert!(smith.join("A. Smith 8 Weeks Training Program.docx").exists());
        // An athlete without tiles never gets report files.
        assert!(!dir.path().join("Riverside U15/D. Green/D. Green Analysis.md").exists());
    }
}
