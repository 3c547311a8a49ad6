// src/pipeline/program.rs

//! Training program stage: `<Athlete> Analysis.md` in, program `.docx` out.

use crate::error::Result;
use crate::models::{Config, Outcome, Stage};
use crate::services::prompts::{PROGRAM_SYSTEM, program_prompt, program_title};
use crate::services::{CallOutcome, CompletionRequest, GenerativeApi, ProgramPlan, RateLimitedClient};
use crate::storage::LocalStorage;
use crate::utils::log;

use super::folders::{AthleteFolder, athlete_folders, exists};
use super::run::{PipelineRun, StageOptions};

/// Generate a training program for every targeted athlete with an analysis.
pub async fn run_program<A: GenerativeApi>(
    config: &Config,
    options: &StageOptions,
    client: &mut RateLimitedClient<A>,
) -> Result<PipelineRun> {
    log::header("Program - Analysis to Training Program");
    let storage = LocalStorage::new(&options.base_dir);
    let folders = athlete_folders(&storage, &options.target).await?;

    let mut run = PipelineRun::new(Stage::Program, options);
    for (i, folder) in folders.iter().enumerate() {
        log::step(i + 1, folders.len(), &format!("{}/{}", folder.team, folder.athlete));
        let (outcome, detail) = program_one(config, options, &storage, client, folder).await?;
        run.record(&folder.team, &folder.athlete, outcome, detail)?;
    }

    run.log_summary();
    Ok(run)
}

async fn program_one<A: GenerativeApi>(
    config: &Config,
    options: &StageOptions,
    storage: &LocalStorage,
    client: &mut RateLimitedClient<A>,
    folder: &AthleteFolder,
) -> Result<(Outcome, String)> {
    let weeks = config.program.weeks;
    let output = folder.program_path(weeks);
    if !options.overwrite && exists(&output).await? {
        return Ok((Outcome::Skip, "program exists".into()));
    }

    let analysis_path = folder.analysis_path();
    if !exists(&analysis_path).await? {
        return Ok((Outcome::Fail, "analysis missing".into()));
    }
    let analysis = tokio::fs::read_to_string(&analysis_path).await?;
    if options.dry_run {
        return Ok((Outcome::Skip, "dry run, would request a program".into()));
    }

    let settings = config.program.api();
    let request = CompletionRequest {
        model: settings.model,
        system: Some(PROGRAM_SYSTEM.to_string()),
        prompt: program_prompt(&folder.athlete, &config.analysis.cohort, weeks, &analysis),
        images: Vec::new(),
        temperature: settings.temperature,
    };

    let text = match client.call(&request).await {
        CallOutcome::Completed(text) => text,
        CallOutcome::Failed { attempts, reason } => {
            return Ok((Outcome::Fail, format!("{reason} (after {attempts} attempts)")));
        }
    };

    let plan = ProgramPlan::parse(program_title(&folder.athlete, weeks), &text);
    let bytes = match plan.to_docx() {
        Ok(bytes) => bytes,
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => return Ok((Outcome::Fail, e.to_string())),
    };
    storage.write_bytes(&output, &bytes).await?;
    Ok((Outcome::Success, format!("{} sections", plan.sections.len())))
}
