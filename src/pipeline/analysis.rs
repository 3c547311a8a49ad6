// src/pipeline/analysis.rs

//! Image analysis stage: screenshots in, `<Athlete> Analysis.md` out.

use chrono::Local;

use crate::error::Result;
use crate::models::{Config, Outcome, Stage};
use crate::services::prompts::{
    ANALYSIS_SYSTEM, analysis_markdown, analysis_prompt, catalog_tests,
};
use crate::services::{CallOutcome, CompletionRequest, GenerativeApi, ImageInput, RateLimitedClient};
use crate::storage::{LocalStorage, list_images};
use crate::utils::log;

use super::folders::{AthleteFolder, athlete_folders, exists, file_names};
use super::run::{PipelineRun, StageOptions};

/// Generate an analysis for every targeted athlete folder.
pub async fn run_analysis<A: GenerativeApi>(
    config: &Config,
    options: &StageOptions,
    client: &mut RateLimitedClient<A>,
) -> Result<PipelineRun> {
    log::header("Analysis - Screenshots to Markdown");
    let storage = LocalStorage::new(&options.base_dir);
    let folders = athlete_folders(&storage, &options.target).await?;
    ::log::info!(
        "{} athlete folders under {} ({})",
        folders.len(),
        options.base_dir.display(),
        options.target.describe()
    );

    let mut run = PipelineRun::new(Stage::Analysis, options);
    for (i, folder) in folders.iter().enumerate() {
        log::step(i + 1, folders.len(), &format!("{}/{}", folder.team, folder.athlete));
        let (outcome, detail) = analyze_one(config, options, &storage, client, folder).await?;
        run.record(&folder.team, &folder.athlete, outcome, detail)?;
    }

    run.log_summary();
    Ok(run)
}

async fn analyze_one<A: GenerativeApi>(
    config: &Config,
    options: &StageOptions,
    storage: &LocalStorage,
    client: &mut RateLimitedClient<A>,
    folder: &AthleteFolder,
) -> Result<(Outcome, String)> {
    let output = folder.analysis_path();
    if !options.overwrite && exists(&output).await? {
        return Ok((Outcome::Skip, "analysis exists".into()));
    }

    let images = list_images(&folder.path).await?;
    if images.is_empty() {
        return Ok((Outcome::Fail, "no images".into()));
    }
    let required = config.capture.min_viable_images;
    if images.len() < required {
        return Ok((
            Outcome::Fail,
            format!("only {} images, {} required", images.len(), required),
        ));
    }
    let names = file_names(&images);
    if options.dry_run {
        return Ok((Outcome::Skip, format!("dry run, would send {} images", images.len())));
    }

    let mut inputs = Vec::with_capacity(images.len());
    for path in &images {
        inputs.push(ImageInput::load_png(path).await?);
    }
    let settings = config.analysis.api();
    let request = CompletionRequest {
        model: settings.model,
        system: Some(ANALYSIS_SYSTEM.to_string()),
        prompt: analysis_prompt(
            &folder.athlete,
            &config.analysis.cohort,
            &catalog_tests(&config.capture),
            &names,
        ),
        images: inputs,
        temperature: settings.temperature,
    };

    match client.call(&request).await {
        CallOutcome::Completed(text) => {
            let markdown = analysis_markdown(
                &folder.athlete,
                &folder.team,
                &config.analysis.cohort,
                Local::now(),
                &names,
                &text,
            );
            storage.write_text(&output, &markdown).await?;
            Ok((Outcome::Success, format!("{} images", images.len())))
        }
        CallOutcome::Failed { attempts, reason } => Ok((
            Outcome::Fail,
            format!("{reason} (after {attempts} attempts)"),
        )),
    }
}
