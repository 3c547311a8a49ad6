// src/models/mod.rs

//! Domain models for the pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod catalog;
mod config;
mod manifest;
mod record;
mod team;

// Re-export all public types
pub use catalog::{CaptureTarget, MetricTile, ModalTest, TileLocator};
pub use config::{
    AnalysisConfig, ApiSettings, AthleteConfig, CaptureConfig, CleanupConfig, Config,
    LoggingConfig, PathsConfig, PortalConfig, ProgramConfig, SelectionConfig,
};
pub use manifest::{CaptureManifest, ImageArtifact, MANIFEST_FILE};
pub use record::{Outcome, RunRecord, Stage};
pub use team::{Athlete, TargetEntry, Team, TeamTarget};
