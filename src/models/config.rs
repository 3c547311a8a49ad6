// src/models/config.rs

//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::catalog::{MetricTile, ModalTest, TileLocator};
use crate::services::rate_limit::{CooldownPolicy, PacingPolicy, RetryPolicy};
use crate::services::readiness::ReadinessPolicy;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Portal and browser settings
    #[serde(default)]
    pub portal: PortalConfig,

    /// Team filter behavior
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Athlete row filtering
    #[serde(default)]
    pub athletes: AthleteConfig,

    /// Capture timings and the capture catalog
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Image analysis stage
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Training program stage
    #[serde(default)]
    pub program: ProgramConfig,

    /// Cleanup command
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.portal.base_url)
            .map_err(|e| AppError::validation(format!("portal.base_url is invalid: {e}")))?;
        if self.paths.base_dir.as_os_str().is_empty() {
            return Err(AppError::validation("paths.base_dir is empty"));
        }
        if self.selection.attempts == 0 {
            return Err(AppError::validation("selection.attempts must be > 0"));
        }
        if self.selection.poll_interval_ms == 0 || self.capture.poll_interval_ms == 0 {
            return Err(AppError::validation("poll intervals must be > 0"));
        }
        if self.capture.modal_open_attempts == 0 {
            return Err(AppError::validation(
                "capture.modal_open_attempts must be > 0",
            ));
        }
        if self.capture.min_viable_images == 0 {
            return Err(AppError::validation(
                "capture.min_viable_images must be > 0",
            ));
        }
        if self.capture.modals.is_empty() && self.capture.tiles.is_empty() {
            return Err(AppError::validation("Capture catalog is empty"));
        }

        let mut prefixes = HashSet::new();
        let catalog_prefixes = self
            .capture
            .modals
            .iter()
            .map(|m| &m.prefix)
            .chain(self.capture.tiles.iter().map(|t| &t.prefix));
        for prefix in catalog_prefixes {
            if prefix.trim().is_empty() {
                return Err(AppError::validation("Catalog entry with empty prefix"));
            }
            if !prefixes.insert(prefix.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate catalog prefix '{prefix}'"
                )));
            }
        }
        if let Some(tile) = self.capture.tiles.iter().find(|t| t.metrics.is_empty()) {
            return Err(AppError::validation(format!(
                "Metric tile '{}' has no metrics",
                tile.label
            )));
        }

        for pattern in &self.athletes.exclude_patterns {
            regex::Regex::new(pattern)?;
        }

        self.analysis.api().validate("analysis")?;
        self.program.api().validate("program")?;
        Ok(())
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the `Team/Athlete` folder tree
    #[serde(default = "defaults::base_dir")]
    pub base_dir: PathBuf,

    /// Cookie cache of the authenticated portal session
    #[serde(default = "defaults::session_file")]
    pub session_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: defaults::base_dir(),
            session_file: defaults::session_file(),
        }
    }
}

/// Portal and browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal root URL
    #[serde(default = "defaults::portal_url")]
    pub base_url: String,

    /// Chrome/Chromium executable; auto-detected when unset
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Run the browser without a window
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    #[serde(default = "defaults::window_width")]
    pub window_width: u32,

    #[serde(default = "defaults::window_height")]
    pub window_height: u32,

    /// Environment variable holding the login email
    #[serde(default = "defaults::email_env")]
    pub email_env: String,

    /// Environment variable holding the login password
    #[serde(default = "defaults::password_env")]
    pub password_env: String,

    /// How long login form fields may take to appear
    #[serde(default = "defaults::login_timeout")]
    pub login_timeout_ms: u64,

    /// How long a cached session may take to show the profiles link
    #[serde(default = "defaults::session_check_timeout")]
    pub session_check_timeout_ms: u64,
}

impl PortalConfig {
    pub fn login_wait(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(
            Duration::from_millis(self.login_timeout_ms),
            Duration::from_millis(250),
        )
    }

    pub fn session_check_wait(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(
            Duration::from_millis(self.session_check_timeout_ms),
            Duration::from_millis(250),
        )
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::portal_url(),
            chrome_executable: None,
            headless: defaults::headless(),
            window_width: defaults::window_width(),
            window_height: defaults::window_height(),
            email_env: defaults::email_env(),
            password_env: defaults::password_env(),
            login_timeout_ms: defaults::login_timeout(),
            session_check_timeout_ms: defaults::session_check_timeout(),
        }
    }
}

/// Team filter behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Attempts at an exclusive selection before giving up on a team
    #[serde(default = "defaults::selection_attempts")]
    pub attempts: u32,

    /// How long the team menu may take to open
    #[serde(default = "defaults::menu_timeout")]
    pub menu_timeout_ms: u64,

    /// Upper bound on waiting for the page to go quiet after a selection
    #[serde(default = "defaults::quiescence_timeout")]
    pub quiescence_timeout_ms: u64,

    /// How long network activity must stay unchanged to count as quiet
    #[serde(default = "defaults::quiescence_stable")]
    pub quiescence_stable_ms: u64,

    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,
}

impl SelectionConfig {
    pub fn menu_wait(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(
            Duration::from_millis(self.menu_timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
    }

    pub fn quiescence_wait(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(
            Duration::from_millis(self.quiescence_timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
        .stable_for(Duration::from_millis(self.quiescence_stable_ms))
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            attempts: defaults::selection_attempts(),
            menu_timeout_ms: defaults::menu_timeout(),
            quiescence_timeout_ms: defaults::quiescence_timeout(),
            quiescence_stable_ms: defaults::quiescence_stable(),
            poll_interval_ms: defaults::poll_interval(),
        }
    }
}

/// Athlete row filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteConfig {
    /// Rows whose name matches any of these patterns are not real athletes
    #[serde(default = "defaults::exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

impl Default for AthleteConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: defaults::exclude_patterns(),
        }
    }
}

/// Capture timings and the capture catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// How long a tile may take to appear on the overview
    #[serde(default = "defaults::discovery_timeout")]
    pub discovery_timeout_ms: u64,

    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,

    /// How long a count must stay unchanged to count as stable
    #[serde(default = "defaults::stable_for")]
    pub stable_for_ms: u64,

    /// Upper bound on waiting for a section or metric to render
    #[serde(default = "defaults::render_timeout")]
    pub render_timeout_ms: u64,

    /// Delay before capturing an accordion section
    #[serde(default = "defaults::section_settle")]
    pub section_settle_ms: u64,

    /// Delay before capturing a metric state
    #[serde(default = "defaults::metric_settle")]
    pub metric_settle_ms: u64,

    /// Click attempts before a modal is declared absent
    #[serde(default = "defaults::modal_open_attempts")]
    pub modal_open_attempts: u32,

    /// How long one click may take to show the modal
    #[serde(default = "defaults::modal_timeout")]
    pub modal_timeout_ms: u64,

    /// Delay after the modal appears, before its content is read
    #[serde(default = "defaults::modal_mount")]
    pub modal_mount_ms: u64,

    /// Stale-render retries per metric state
    #[serde(default = "defaults::dupe_retries")]
    pub dupe_retries: u32,

    /// Images an athlete needs for the capture to count as complete
    #[serde(default = "defaults::min_viable_images")]
    pub min_viable_images: usize,

    /// Modal tests, captured section by section
    #[serde(default = "defaults::modals")]
    pub modals: Vec<ModalTest>,

    /// Metric tiles, captured once per metric
    #[serde(default = "defaults::tiles")]
    pub tiles: Vec<MetricTile>,
}

impl CaptureConfig {
    /// Wait used for tiles on the overview page.
    pub fn tile_wait(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(
            Duration::from_millis(self.discovery_timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
    }

    /// Wait used for sections, menus and metric labels.
    pub fn render_wait(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(
            Duration::from_millis(self.render_timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
    }

    /// Wait used for the accordion count of an open modal.
    pub fn accordion_wait(&self) -> ReadinessPolicy {
        self.tile_wait()
            .stable_for(Duration::from_millis(self.stable_for_ms))
    }

    /// Wait applied after each modal click.
    pub fn modal_wait(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(
            Duration::from_millis(self.modal_timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
        .settle(Duration::from_millis(self.modal_mount_ms))
    }

    pub fn section_settle(&self) -> Duration {
        Duration::from_millis(self.section_settle_ms)
    }

    pub fn metric_settle(&self) -> Duration {
        Duration::from_millis(self.metric_settle_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            discovery_timeout_ms: defaults::discovery_timeout(),
            poll_interval_ms: defaults::poll_interval(),
            stable_for_ms: defaults::stable_for(),
            render_timeout_ms: defaults::render_timeout(),
            section_settle_ms: defaults::section_settle(),
            metric_settle_ms: defaults::metric_settle(),
            modal_open_attempts: defaults::modal_open_attempts(),
            modal_timeout_ms: defaults::modal_timeout(),
            modal_mount_ms: defaults::modal_mount(),
            dupe_retries: defaults::dupe_retries(),
            min_viable_images: defaults::min_viable_images(),
            modals: defaults::modals(),
            tiles: defaults::tiles(),
        }
    }
}

/// Connection and throttling settings of one generative-API stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub pacing: PacingPolicy,
    pub retry: RetryPolicy,
    pub cooldown: CooldownPolicy,
}

impl ApiSettings {
    fn validate(&self, section: &str) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AppError::validation(format!("{section}.model is empty")));
        }
        Url::parse(&self.base_url)
            .map_err(|e| AppError::validation(format!("{section}.base_url is invalid: {e}")))?;
        self.pacing
            .validate()
            .and_then(|_| self.retry.validate())
            .map_err(|e| AppError::validation(format!("{section}: {e}")))
    }
}

/// Image analysis stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Vision-capable chat model
    #[serde(default = "defaults::analysis_model")]
    pub model: String,

    #[serde(default = "defaults::analysis_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "defaults::analysis_key_env")]
    pub api_key_env: String,

    /// Requests per minute
    #[serde(default = "defaults::analysis_rpm")]
    pub rpm: u32,

    #[serde(default = "defaults::analysis_temperature")]
    pub temperature: f32,

    #[serde(default = "defaults::analysis_attempts")]
    pub max_attempts: u32,

    #[serde(default = "defaults::analysis_backoff_base")]
    pub backoff_base_ms: u64,

    #[serde(default = "defaults::backoff_multiplier")]
    pub backoff_multiplier: f64,

    #[serde(default = "defaults::backoff_max")]
    pub backoff_max_ms: u64,

    #[serde(default = "defaults::jitter")]
    pub jitter_ms: u64,

    /// Athletes per batch before a cooldown (0 disables)
    #[serde(default = "defaults::analysis_batch_size")]
    pub batch_size: usize,

    #[serde(default = "defaults::analysis_cooldown")]
    pub cooldown_secs: u64,

    #[serde(default = "defaults::request_timeout")]
    pub timeout_secs: u64,

    /// Cohort description given to the model
    #[serde(default = "defaults::cohort")]
    pub cohort: String,
}

impl AnalysisConfig {
    pub fn api(&self) -> ApiSettings {
        ApiSettings {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_secs),
            pacing: PacingPolicy::per_minute(self.rpm),
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                base_delay: Duration::from_millis(self.backoff_base_ms),
                multiplier: self.backoff_multiplier,
                max_delay: Duration::from_millis(self.backoff_max_ms),
                jitter: Duration::from_millis(self.jitter_ms),
            },
            cooldown: CooldownPolicy::new(self.batch_size, Duration::from_secs(self.cooldown_secs)),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: defaults::analysis_model(),
            base_url: defaults::analysis_base_url(),
            api_key_env: defaults::analysis_key_env(),
            rpm: defaults::analysis_rpm(),
            temperature: defaults::analysis_temperature(),
            max_attempts: defaults::analysis_attempts(),
            backoff_base_ms: defaults::analysis_backoff_base(),
            backoff_multiplier: defaults::backoff_multiplier(),
            backoff_max_ms: defaults::backoff_max(),
            jitter_ms: defaults::jitter(),
            batch_size: defaults::analysis_batch_size(),
            cooldown_secs: defaults::analysis_cooldown(),
            timeout_secs: defaults::request_timeout(),
            cohort: defaults::cohort(),
        }
    }
}

/// Training program stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Text chat model
    #[serde(default = "defaults::program_model")]
    pub model: String,

    #[serde(default = "defaults::program_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "defaults::program_key_env")]
    pub api_key_env: String,

    /// Requests per minute
    #[serde(default = "defaults::program_rpm")]
    pub rpm: u32,

    #[serde(default = "defaults::program_temperature")]
    pub temperature: f32,

    #[serde(default = "defaults::program_attempts")]
    pub max_attempts: u32,

    #[serde(default = "defaults::program_backoff_base")]
    pub backoff_base_ms: u64,

    #[serde(default = "defaults::backoff_multiplier")]
    pub backoff_multiplier: f64,

    #[serde(default = "defaults::backoff_max")]
    pub backoff_max_ms: u64,

    #[serde(default = "defaults::jitter")]
    pub jitter_ms: u64,

    /// Athletes per batch before a cooldown (0 disables)
    #[serde(default)]
    pub batch_size: usize,

    #[serde(default)]
    pub cooldown_secs: u64,

    #[serde(default = "defaults::request_timeout")]
    pub timeout_secs: u64,

    /// Program length in weeks
    #[serde(default = "defaults::program_weeks")]
    pub weeks: u32,
}

impl ProgramConfig {
    pub fn api(&self) -> ApiSettings {
        ApiSettings {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_secs),
            pacing: PacingPolicy::per_minute(self.rpm),
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                base_delay: Duration::from_millis(self.backoff_base_ms),
                multiplier: self.backoff_multiplier,
                max_delay: Duration::from_millis(self.backoff_max_ms),
                jitter: Duration::from_millis(self.jitter_ms),
            },
            cooldown: CooldownPolicy::new(self.batch_size, Duration::from_secs(self.cooldown_secs)),
        }
    }
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            model: defaults::program_model(),
            base_url: defaults::program_base_url(),
            api_key_env: defaults::program_key_env(),
            rpm: defaults::program_rpm(),
            temperature: defaults::program_temperature(),
            max_attempts: defaults::program_attempts(),
            backoff_base_ms: defaults::program_backoff_base(),
            backoff_multiplier: defaults::backoff_multiplier(),
            backoff_max_ms: defaults::backoff_max(),
            jitter_ms: defaults::jitter(),
            batch_size: 0,
            cooldown_secs: 0,
            timeout_secs: defaults::request_timeout(),
            weeks: defaults::program_weeks(),
        }
    }
}

/// Cleanup command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Screenshot files removed from every athlete folder
    #[serde(default = "defaults::cleanup_targets")]
    pub target_files: Vec<String>,

    /// Also remove team folders left empty
    #[serde(default)]
    pub prune_empty_teams: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            target_files: defaults::cleanup_targets(),
            prune_empty_teams: false,
        }
    }
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::{MetricTile, ModalTest, TileLocator};

    // Path defaults
    pub fn base_dir() -> PathBuf {
        PathBuf::from("data")
    }
    pub fn session_file() -> PathBuf {
        PathBuf::from("auth_state.json")
    }

    // Portal defaults
    pub fn portal_url() -> String {
        "https://hub.valdperformance.com/".into()
    }
    pub fn headless() -> bool {
        true
    }
    pub fn window_width() -> u32 {
        1920
    }
    pub fn window_height() -> u32 {
        1080
    }
    pub fn email_env() -> String {
        "EMAIL".into()
    }
    pub fn password_env() -> String {
        "PASSWORD".into()
    }
    pub fn login_timeout() -> u64 {
        30_000
    }
    pub fn session_check_timeout() -> u64 {
        15_000
    }

    // Selection defaults
    pub fn selection_attempts() -> u32 {
        3
    }
    pub fn menu_timeout() -> u64 {
        3_000
    }
    pub fn quiescence_timeout() -> u64 {
        30_000
    }
    pub fn quiescence_stable() -> u64 {
        1_000
    }
    pub fn poll_interval() -> u64 {
        250
    }

    // Athlete defaults
    pub fn exclude_patterns() -> Vec<String> {
        vec![r"\d".into()]
    }

    // Capture defaults
    pub fn discovery_timeout() -> u64 {
        30_000
    }
    pub fn stable_for() -> u64 {
        1_500
    }
    pub fn render_timeout() -> u64 {
        12_000
    }
    pub fn section_settle() -> u64 {
        600
    }
    pub fn metric_settle() -> u64 {
        900
    }
    pub fn modal_open_attempts() -> u32 {
        6
    }
    pub fn modal_timeout() -> u64 {
        3_000
    }
    pub fn modal_mount() -> u64 {
        800
    }
    pub fn dupe_retries() -> u32 {
        2
    }
    pub fn min_viable_images() -> usize {
        1
    }

    pub fn modals() -> Vec<ModalTest> {
        vec![
            ModalTest {
                label: "Countermovement Jump".into(),
                prefix: "Countermovement_Jump".into(),
                tile: TileLocator::ForceDecks {
                    name: "Countermovement Jump".into(),
                },
            },
            ModalTest {
                label: "Nordic".into(),
                prefix: "Nordic".into(),
                tile: TileLocator::TestId {
                    test_id: "nordbord-tile".into(),
                    title: None,
                },
            },
            ModalTest {
                label: "20yd Sprint".into(),
                prefix: "20yd_Sprint".into(),
                tile: TileLocator::TestId {
                    test_id: "smartspeed-tile".into(),
                    title: Some("20yd Sprint".into()),
                },
            },
            ModalTest {
                label: "5-0-5 Drill".into(),
                prefix: "5-0-5_Drill".into(),
                tile: TileLocator::TestId {
                    test_id: "smartspeed-tile".into(),
                    title: Some("5-0-5 Drill".into()),
                },
            },
        ]
    }

    pub fn tiles() -> Vec<MetricTile> {
        let metrics = || -> Vec<String> {
            vec![
                "Avg Peak Knee Flexion - Left & Right".into(),
                "Avg Hip Adduction at Peak Knee Flexion - Left & Right".into(),
                "Avg Ankle Dorsiflexion at Peak Knee Flexion - Left & Right".into(),
            ]
        };
        vec![
            MetricTile {
                label: "Overhead Squat".into(),
                prefix: "Overhead_Squat".into(),
                tile: TileLocator::HumanTrak {
                    title: "Overhead Squat".into(),
                },
                include_base: true,
                metrics: metrics(),
            },
            MetricTile {
                label: "Lunge".into(),
                prefix: "Lunge".into(),
                tile: TileLocator::HumanTrak {
                    title: "Lunge".into(),
                },
                include_base: true,
                metrics: metrics(),
            },
        ]
    }

    // API defaults
    pub fn backoff_multiplier() -> f64 {
        2.0
    }
    pub fn backoff_max() -> u64 {
        120_000
    }
    pub fn jitter() -> u64 {
        1_000
    }
    pub fn request_timeout() -> u64 {
        120
    }

    pub fn analysis_model() -> String {
        "gpt-4o-mini".into()
    }
    pub fn analysis_base_url() -> String {
        "https://api.openai.com/v1".into()
    }
    pub fn analysis_key_env() -> String {
        "OPENAI_API_KEY".into()
    }
    pub fn analysis_rpm() -> u32 {
        1
    }
    pub fn analysis_temperature() -> f32 {
        0.3
    }
    pub fn analysis_attempts() -> u32 {
        5
    }
    pub fn analysis_backoff_base() -> u64 {
        8_000
    }
    pub fn analysis_batch_size() -> usize {
        5
    }
    pub fn analysis_cooldown() -> u64 {
        180
    }
    pub fn cohort() -> String {
        "11–16 years old female".into()
    }

    pub fn program_model() -> String {
        "grok-3-mini".into()
    }
    pub fn program_base_url() -> String {
        "https://api.x.ai/v1".into()
    }
    pub fn program_key_env() -> String {
        "XAI_API_KEY".into()
    }
    pub fn program_rpm() -> u32 {
        2
    }
    pub fn program_temperature() -> f32 {
        0.7
    }
    pub fn program_attempts() -> u32 {
        3
    }
    pub fn program_backoff_base() -> u64 {
        3_000
    }
    pub fn program_weeks() -> u32 {
        8
    }

    // Cleanup defaults
    pub fn cleanup_targets() -> Vec<String> {
        vec![
            "Countermovement_Jump_001.png".into(),
            "20yd_Sprint_001.png".into(),
            "5-0-5_Drill_001.png".into(),
            "Nordic_001.png".into(),
        ]
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
