//! VALD pipeline CLI
//!
//! Scrapes athlete screenshots from VALD Hub, then turns them into analyses
//! and training programs.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use vald_pipeline::{
    error::{AppError, Result},
    models::{Config, TeamTarget},
    pipeline::{self, StageOptions, stage_api},
    portal::{ChromePortal, SessionStore},
    services::RateLimitedClient,
};

/// VALD Hub screenshot and report pipeline
#[derive(Parser, Debug)]
#[command(
    name = "vald-pipeline",
    version,
    about = "VALD Hub screenshots, AI analyses and training programs"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where a stage works and on what.
#[derive(Args, Debug)]
struct TargetArgs {
    /// Base output directory (default: paths.base_dir)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Walk everything but call nothing and write nothing
    #[arg(long)]
    dry_run: bool,

    /// Only teams whose name starts with this prefix
    #[arg(long, conflicts_with_all = ["teams", "teams_file"])]
    prefix: Option<String>,

    /// Comma-separated `Team` or `Team/Athlete` entries
    #[arg(long, conflicts_with = "teams_file")]
    teams: Option<String>,

    /// File with one `Team` or `Team/Athlete` per line, e.g. a failure list
    #[arg(long)]
    teams_file: Option<PathBuf>,

    /// Redo work whose output already exists
    #[arg(long)]
    overwrite: bool,
}

impl TargetArgs {
    fn target(&self) -> Result<TeamTarget> {
        let target = if let Some(path) = &self.teams_file {
            TeamTarget::from_file(path)?
        } else if let Some(list) = &self.teams {
            TeamTarget::from_list(list)
        } else if let Some(prefix) = &self.prefix {
            TeamTarget::Prefix(prefix.clone())
        } else {
            TeamTarget::All
        };
        if target.is_empty() {
            return Err(AppError::config("Team target is empty"));
        }
        Ok(target)
    }

    fn options(&self, config: &Config) -> Result<StageOptions> {
        let mut options = StageOptions::new(
            self.base_dir
                .clone()
                .unwrap_or_else(|| config.paths.base_dir.clone()),
        );
        options.target = self.target()?;
        options.overwrite = self.overwrite;
        options.dry_run = self.dry_run;
        Ok(options)
    }
}

/// Overrides for an AI stage.
#[derive(Args, Debug)]
struct ModelArgs {
    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// Requests per minute
    #[arg(long)]
    rpm: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture screenshots for every targeted athlete
    Scrape {
        #[command(flatten)]
        target: TargetArgs,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },

    /// Delete placeholder screenshots and empty folders
    Cleanup {
        #[command(flatten)]
        target: TargetArgs,

        /// Also remove empty team folders
        #[arg(long)]
        prune_empty_teams: bool,
    },

    /// Generate `<Athlete> Analysis.md` from screenshots
    Analyze {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Generate training program documents from analyses
    Program {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Run full pipeline: Scrape → Cleanup → Analyze → Program
    Run {
        #[command(flatten)]
        target: TargetArgs,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Also remove empty team folders during cleanup
        #[arg(long)]
        prune_empty_teams: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging; `--verbose` wins over the configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(cli: &Cli) -> Config {
    let loaded = if cli.config.exists() {
        Config::load(&cli.config).map_err(|e| e.to_string())
    } else {
        Err(format!("{} not found", cli.config.display()))
    };
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);

    loaded.unwrap_or_else(|e| {
        log::warn!("{}. Using defaults.", e);
        Config::default()
    })
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = load_config(&cli);

    match cli.command {
        Command::Validate => {
            pipeline::run_validate(&cli.config)?;
            log::info!("All validations passed!");
            return Ok(());
        }

        Command::Scrape { target, headed } => {
            if headed {
                config.portal.headless = false;
            }
            config.validate()?;
            let options = target.options(&config)?;
            let config = Arc::new(config);

            let session = SessionStore::new(&config.paths.session_file);
            let portal = ChromePortal::launch(&config.portal, &session).await?;
            let result = pipeline::run_scrape(Arc::clone(&config), &portal, &options).await;
            portal.close().await?;
            result?;
        }

        Command::Cleanup {
            target,
            prune_empty_teams,
        } => {
            if prune_empty_teams {
                config.cleanup.prune_empty_teams = true;
            }
            let options = target.options(&config)?;
            pipeline::run_cleanup(&config.cleanup, &options).await?;
        }

        Command::Analyze { target, model } => {
            if let Some(name) = model.model {
                config.analysis.model = name;
            }
            if let Some(rpm) = model.rpm {
                config.analysis.rpm = rpm;
            }
            config.validate()?;
            let options = target.options(&config)?;

            let settings = config.analysis.api();
            let api = stage_api(&settings, options.dry_run)?;
            let mut client = RateLimitedClient::from_settings(api, &settings);
            pipeline::run_analysis(&config, &options, &mut client).await?;
        }

        Command::Program { target, model } => {
            if let Some(name) = model.model {
                config.program.model = name;
            }
            if let Some(rpm) = model.rpm {
                config.program.rpm = rpm;
            }
            config.validate()?;
            let options = target.options(&config)?;

            let settings = config.program.api();
            let api = stage_api(&settings, options.dry_run)?;
            let mut client = RateLimitedClient::from_settings(api, &settings);
            pipeline::run_program(&config, &options, &mut client).await?;
        }

        Command::Run {
            target,
            headed,
            prune_empty_teams,
        } => {
            if headed {
                config.portal.headless = false;
            }
            if prune_empty_teams {
                config.cleanup.prune_empty_teams = true;
            }
            config.validate()?;
            let options = target.options(&config)?;

            // Both API keys must resolve before the browser starts.
            let analysis_settings = config.analysis.api();
            let program_settings = config.program.api();
            let mut analysis = RateLimitedClient::from_settings(
                stage_api(&analysis_settings, options.dry_run)?,
                &analysis_settings,
            );
            let mut program = RateLimitedClient::from_settings(
                stage_api(&program_settings, options.dry_run)?,
                &program_settings,
            );

            let config = Arc::new(config);
            let session = SessionStore::new(&config.paths.session_file);
            let portal = ChromePortal::launch(&config.portal, &session).await?;
            let result = pipeline::run_pipeline(
                Arc::clone(&config),
                &portal,
                &options,
                &mut analysis,
                &mut program,
            )
            .await;
            portal.close().await?;
            result?;
        }
    }

    log::info!("Done!");
    Ok(())
}
