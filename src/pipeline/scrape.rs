// src/pipeline/scrape.rs

//! Scrape stage: team by team, athlete by athlete, screenshots to disk.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Athlete, Config, Outcome, Stage};
use crate::portal::Portal;
use crate::services::{ActiveTeam, AthleteEnumerator, CaptureEngine, TeamSelector};
use crate::storage::LocalStorage;
use crate::utils::log;

use super::run::{PipelineRun, StageOptions};

/// Capture every targeted athlete of every targeted team.
///
/// Team and athlete failures are recorded and skipped; only fatal errors
/// (filesystem, configuration) end the run early.
pub async fn run_scrape<P: Portal + ?Sized>(
    config: Arc<Config>,
    portal: &P,
    options: &StageOptions,
) -> Result<PipelineRun> {
    log::header("Scrape - Portal Screenshots");
    let storage = LocalStorage::new(&options.base_dir);
    let selector = TeamSelector::new(config.clone());
    let enumerator = AthleteEnumerator::new(config.clone())?;
    let mut engine = CaptureEngine::new(config.clone(), storage.clone());
    let mut run = PipelineRun::new(Stage::Scrape, options);

    let teams = selector.resolve_teams(portal, &options.target).await?;
    ::log::info!("{} teams to process ({})", teams.len(), options.target.describe());

    for (i, team) in teams.iter().enumerate() {
        log::step(i + 1, teams.len(), &team.name);
        let active = match selector.select_exclusive(portal, team).await {
            Ok(active) => active,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                run.record(&team.name, "", Outcome::Fail, e.to_string())?;
                continue;
            }
        };

        let result = scrape_team(
            &selector,
            &enumerator,
            &mut engine,
            &storage,
            portal,
            &active,
            options,
            &mut run,
        )
        .await;
        if let Err(e) = selector.release(portal, active).await {
            if e.is_fatal() {
                return Err(e);
            }
            ::log::warn!("Could not clear the team filter: {}", e);
        }
        match result {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => run.record(&team.name, "", Outcome::Fail, e.to_string())?,
        }
        log::separator();
    }

    ::log::info!("{} images persisted this run", engine.ledger().len());
    run.log_summary();
    Ok(run)
}

/// Enumerate and capture one team. A returned error fails the whole team.
#[allow(clippy::too_many_arguments)]
async fn scrape_team<P: Portal + ?Sized>(
    selector: &TeamSelector,
    enumerator: &AthleteEnumerator,
    engine: &mut CaptureEngine,
    storage: &LocalStorage,
    portal: &P,
    active: &ActiveTeam,
    options: &StageOptions,
    run: &mut PipelineRun,
) -> Result<()> {
    let athletes: Vec<Athlete> = enumerator
        .enumerate(portal, active)
        .await?
        .into_iter()
        .filter(|a| options.target.matches_athlete(&a.team.name, &a.name))
        .collect();
    if athletes.is_empty() {
        log::sub_item(&format!("no athletes to capture in '{}'", active.name()));
    }

    for athlete in &athletes {
        if !options.overwrite && storage.has_complete_capture(athlete).await? {
            run.record(&athlete.team.name, &athlete.name, Outcome::Skip, "already captured")?;
            continue;
        }
        if options.dry_run {
            run.record(&athlete.team.name, &athlete.name, Outcome::Skip, "dry run")?;
            continue;
        }

        selector.ensure(portal, active).await?;
        match engine.capture(portal, active, athlete).await {
            Ok(report) => {
                run.record(&athlete.team.name, &athlete.name, Outcome::Success, report.summary())?
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => run.record(&athlete.team.name, &athlete.name, Outcome::Fail, e.to_string())?,
        }
    }
    Ok(())
}
