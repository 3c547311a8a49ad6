// src/error.rs

//! Unified error handling for the pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Regex compilation failed
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Browser (DevTools protocol) command failed
    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// Browser could not be launched
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// Login against the portal failed
    #[error("Login failed: {0}")]
    Login(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The team filter could not be put into an exclusive state
    #[error("Team isolation failed for '{team}': {message}")]
    TeamIsolation { team: String, message: String },

    /// Structural UI failure while capturing one athlete
    #[error("Capture failed for '{athlete}': {message}")]
    AthleteCapture { athlete: String, message: String },

    /// Rendering an output document failed
    #[error("Document error: {0}")]
    Document(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a browser launch error.
    pub fn launch(message: impl fmt::Display) -> Self {
        Self::Launch(message.to_string())
    }

    /// Create a login error.
    pub fn login(message: impl Into<String>) -> Self {
        Self::Login(message.into())
    }

    /// Create a document rendering error.
    pub fn document(message: impl fmt::Display) -> Self {
        Self::Document(message.to_string())
    }

    /// Create a team isolation error.
    pub fn team_isolation(team: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::TeamIsolation {
            team: team.into(),
            message: message.to_string(),
        }
    }

    /// Create an athlete capture error.
    pub fn athlete_capture(athlete: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::AthleteCapture {
            athlete: athlete.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error must abort the whole run.
    ///
    /// Filesystem and configuration failures are fatal; everything else is
    /// isolated to the team or athlete being processed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::Json(_)
                | Self::Toml(_)
                | Self::Pattern(_)
                | Self::Config(_)
                | Self::Validation(_)
                | Self::Launch(_)
                | Self::Login(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_and_config_errors_are_fatal() {
        let io = AppError::Io(std::io::Error::other("disk full"));
        assert!(io.is_fatal());
        assert!(AppError::config("bad").is_fatal());
    }

    #[test]
    fn team_and_athlete_errors_are_isolated() {
        assert!(!AppError::team_isolation("Riverside U14", "chip left over").is_fatal());
        assert!(!AppError::athlete_capture("A. Smith", "row missing").is_fatal());
        assert!(!AppError::document("zip").is_fatal());
    }

    #[test]
    fn display_includes_context() {
        let err = AppError::team_isolation("Riverside U14", "menu never opened");
        assert_eq!(
            err.to_string(),
            "Team isolation failed for 'Riverside U14': menu never opened"
        );
    }
}
