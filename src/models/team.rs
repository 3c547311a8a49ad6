// src/models/team.rs

//! Teams, athletes and team targeting.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::sanitize_filename;

/// An organizational unit on the portal, identified by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Team {
    pub name: String,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Folder name under the base directory.
    pub fn folder_name(&self) -> String {
        sanitize_filename(&self.name)
    }
}

/// An individual athlete, owned by the team it was enumerated under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Athlete {
    pub name: String,
    pub team: Team,
}

impl Athlete {
    pub fn new(name: impl Into<String>, team: Team) -> Self {
        Self {
            name: name.into(),
            team,
        }
    }

    /// Folder name under the team folder.
    pub fn folder_name(&self) -> String {
        sanitize_filename(&self.name)
    }

    /// `Team/Athlete` identifier, as written to failure lists.
    pub fn key(&self) -> String {
        format!("{}/{}", self.team.folder_name(), self.folder_name())
    }

    /// Folder holding this athlete's artifacts.
    pub fn folder(&self, base_dir: &Path) -> PathBuf {
        base_dir
            .join(self.team.folder_name())
            .join(self.folder_name())
    }
}

/// One entry of an explicit target list.
///
/// `Team` targets a whole team; `Team/Athlete` targets a single athlete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    pub team: String,
    pub athlete: Option<String>,
}

impl TargetEntry {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            return None;
        }
        let entry = match raw.split_once('/') {
            Some((team, athlete)) if !athlete.trim().is_empty() => TargetEntry {
                team: team.trim().to_string(),
                athlete: Some(athlete.trim().to_string()),
            },
            Some((team, _)) => TargetEntry {
                team: team.trim().to_string(),
                athlete: None,
            },
            None => TargetEntry {
                team: raw.to_string(),
                athlete: None,
            },
        };
        Some(entry)
    }

    fn matches_team(&self, team: &str) -> bool {
        sanitize_filename(&self.team) == sanitize_filename(team)
    }
}

/// Which teams (and optionally athletes) a run processes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TeamTarget {
    /// Every team
    #[default]
    All,

    /// Every team whose name starts with the prefix
    Prefix(String),

    /// Only the listed teams or `Team/Athlete` pairs
    Explicit(Vec<TargetEntry>),
}

impl TeamTarget {
    /// Parse a comma-separated list of names.
    pub fn from_list(raw: &str) -> Self {
        TeamTarget::Explicit(raw.split(',').filter_map(TargetEntry::parse).collect())
    }

    /// Parse newline-delimited names (blank lines and `#` comments ignored).
    pub fn from_lines(text: &str) -> Self {
        TeamTarget::Explicit(text.lines().filter_map(TargetEntry::parse).collect())
    }

    /// Load a newline-delimited list file, such as a failure list.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_lines(&text))
    }

    /// Resolve portal team options into the ordered list of teams to process.
    ///
    /// Prefix and "all" targets keep the portal's option order; explicit targets
    /// keep the list order, de-duplicated. An explicit entry written in folder
    /// form takes the display name of the option it matches.
    pub fn resolve(&self, options: &[String]) -> Vec<Team> {
        match self {
            TeamTarget::All => options.iter().map(Team::new).collect(),
            TeamTarget::Prefix(prefix) => options
                .iter()
                .filter(|name| name.starts_with(prefix.as_str()))
                .map(Team::new)
                .collect(),
            TeamTarget::Explicit(entries) => {
                let mut teams: Vec<Team> = Vec::new();
                for entry in entries {
                    if teams.iter().any(|t| entry.matches_team(&t.name)) {
                        continue;
                    }
                    let name = options
                        .iter()
                        .find(|option| entry.matches_team(option))
                        .cloned()
                        .unwrap_or_else(|| entry.team.clone());
                    teams.push(Team::new(name));
                }
                teams
            }
        }
    }

    /// Whether a team (display or folder name) is targeted.
    pub fn matches_team(&self, team: &str) -> bool {
        match self {
            TeamTarget::All => true,
            TeamTarget::Prefix(prefix) => team.starts_with(prefix.as_str()),
            TeamTarget::Explicit(entries) => entries.iter().any(|e| e.matches_team(team)),
        }
    }

    /// Whether an athlete of a team is targeted.
    pub fn matches_athlete(&self, team: &str, athlete: &str) -> bool {
        match self {
            TeamTarget::All | TeamTarget::Prefix(_) => self.matches_team(team),
            TeamTarget::Explicit(entries) => entries.iter().any(|e| {
                e.matches_team(team)
                    && e.athlete
                        .as_deref()
                        .is_none_or(|a| sanitize_filename(a) == sanitize_filename(athlete))
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TeamTarget::Explicit(entries) if entries.is_empty())
            || matches!(self, TeamTarget::Prefix(p) if p.trim().is_empty())
    }

    pub fn describe(&self) -> String {
        match self {
            TeamTarget::All => "all teams".to_string(),
            TeamTarget::Prefix(prefix) => format!("prefix '{prefix}'"),
            TeamTarget::Explicit(entries) => format!("explicit list ({} entries)", entries.len()),
        }
    }
}
