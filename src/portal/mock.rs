// src/portal/mock.rs

//! In-memory [`Portal`] for tests.
//!
//! Models the parts of the portal the pipeline depends on: a multi-select
//! team filter whose table shows the union of the selected teams, a paged
//! athlete table, modal tiles with accordion sections and metric tiles with a
//! dropdown. Captured "images" are deterministic byte strings naming what
//! was on screen. Every interaction is appended to an event log.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chromiumoxide::error::CdpError;

use crate::error::{AppError, Result};
use crate::models::TileLocator;
use crate::portal::Portal;

const DEFAULT_SECTIONS: usize = 2;

#[derive(Debug, Default)]
struct MockState {
    teams: Vec<(String, Vec<String>)>,
    hidden_options: HashSet<String>,
    chips: Vec<String>,
    sticky_removals: u32,
    menu_open: bool,
    page_size: usize,
    page: usize,
    navigation_lag: u32,
    pending_navigation: u32,

    athlete: Option<String>,
    broken_athletes: HashSet<String>,
    empty_athletes: HashSet<String>,
    missing_tiles: HashSet<String>,

    modal: Option<String>,
    sections: HashMap<String, usize>,
    modal_failures: HashMap<String, u32>,

    metric_menu: Option<String>,
    shown: HashMap<String, String>,
    previous: HashMap<String, String>,
    stale_renders: HashMap<String, u32>,

    events: Vec<String>,
}

impl MockState {
    /// False while a return to the list is still in flight.
    fn listed(&self) -> bool {
        self.pending_navigation == 0
    }

    fn rows(&self) -> Vec<String> {
        let mut rows: Vec<String> = Vec::new();
        for (team, athletes) in &self.teams {
            if !self.chips.contains(team) {
                continue;
            }
            for athlete in athletes {
                if !rows.contains(athlete) {
                    rows.push(athlete.clone());
                }
            }
        }
        rows
    }

    fn page_rows(&self) -> Vec<String> {
        if !self.listed() {
            return Vec::new();
        }
        let size = self.page_size.max(1);
        self.rows()
            .into_iter()
            .skip(self.page * size)
            .take(size)
            .collect()
    }

    fn tile_present(&self, key: &str) -> bool {
        match &self.athlete {
            Some(athlete) => {
                !self.missing_tiles.contains(key) && !self.empty_athletes.contains(athlete)
            }
            None => false,
        }
    }

    fn image(&self, what: &str) -> Vec<u8> {
        format!("{}|{}", self.athlete.as_deref().unwrap_or("-"), what).into_bytes()
    }
}

/// Scripted portal double.
#[derive(Debug)]
pub struct MockPortal {
    state: Mutex<MockState>,
}

impl Default for MockPortal {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPortal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                page_size: 25,
                ..Default::default()
            }),
        }
    }

    fn with(self, f: impl FnOnce(&mut MockState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn with_team(self, team: &str, athletes: &[&str]) -> Self {
        self.with(|s| {
            s.teams.push((
                team.to_string(),
                athletes.iter().map(|a| a.to_string()).collect(),
            ))
        })
    }

    /// Chips already present when the run starts.
    pub fn with_selected(self, teams: &[&str]) -> Self {
        self.with(|s| s.chips = teams.iter().map(|t| t.to_string()).collect())
    }

    /// The next `n` chip removals report success but leave the chip in place.
    pub fn with_sticky_chips(self, n: u32) -> Self {
        self.with(|s| s.sticky_removals = n)
    }

    /// Team that never shows up as a menu option.
    pub fn with_hidden_option(self, team: &str) -> Self {
        self.with(|s| {
            s.hidden_options.insert(team.to_string());
        })
    }

    /// Returning to the list takes `probes` list checks to complete; until
    /// then the old overview stays on screen.
    pub fn with_navigation_lag(self, probes: u32) -> Self {
        self.with(|s| s.navigation_lag = probes)
    }

    pub fn with_page_size(self, size: usize) -> Self {
        self.with(|s| s.page_size = size)
    }

    pub fn with_sections(self, tile: &TileLocator, count: usize) -> Self {
        self.with(|s| {
            s.sections.insert(tile.describe(), count);
        })
    }

    pub fn with_missing_tile(self, tile: &TileLocator) -> Self {
        self.with(|s| {
            s.missing_tiles.insert(tile.describe());
        })
    }

    /// The first `n` open attempts on this tile do not bring up the modal.
    pub fn with_modal_failures(self, tile: &TileLocator, n: u32) -> Self {
        self.with(|s| {
            s.modal_failures.insert(tile.describe(), n);
        })
    }

    /// The next `n` captures showing `label` still contain the previous state.
    pub fn with_stale_renders(self, label: &str, n: u32) -> Self {
        self.with(|s| {
            s.stale_renders.insert(label.to_string(), n);
        })
    }

    /// Athlete whose overview has no tiles at all.
    pub fn with_empty_athlete(self, name: &str) -> Self {
        self.with(|s| {
            s.empty_athletes.insert(name.to_string());
        })
    }

    /// Athlete whose row click fails at the browser level.
    pub fn with_broken_athlete(self, name: &str) -> Self {
        self.with(|s| {
            s.broken_athletes.insert(name.to_string());
        })
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    /// Number of events starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    pub fn chips(&self) -> Vec<String> {
        self.state.lock().unwrap().chips.clone()
    }

    fn act<T>(&self, event: impl Into<String>, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        state.events.push(event.into());
        f(&mut state)
    }

    fn read<T>(&self, f: impl FnOnce(&MockState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }
}

#[async_trait]
impl Portal for MockPortal {
    async fn open_profiles(&self) -> Result<()> {
        self.act("open_profiles", |s| {
            s.athlete = None;
            s.modal = None;
            s.pending_navigation = 0;
        });
        Ok(())
    }

    async fn return_to_list(&self) -> Result<()> {
        self.act("return_to_list", |s| {
            s.modal = None;
            s.pending_navigation = s.navigation_lag;
            if s.listed() {
                s.athlete = None;
            }
        });
        Ok(())
    }

    async fn on_profiles(&self) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.pending_navigation > 0 {
            state.pending_navigation -= 1;
            if state.listed() {
                state.athlete = None;
            }
            return Ok(false);
        }
        Ok(state.athlete.is_none())
    }

    async fn page_loaded(&self) -> Result<bool> {
        Ok(true)
    }

    async fn resource_count(&self) -> Result<u64> {
        Ok(self.read(|s| s.events.len() as u64))
    }

    async fn selected_teams(&self) -> Result<Vec<String>> {
        Ok(self.read(|s| if s.listed() { s.chips.clone() } else { Vec::new() }))
    }

    async fn remove_chip(&self) -> Result<bool> {
        Ok(self.act("remove_chip", |s| {
            if s.chips.is_empty() {
                return false;
            }
            if s.sticky_removals > 0 {
                s.sticky_removals -= 1;
            } else {
                s.chips.remove(0);
                s.page = 0;
            }
            true
        }))
    }

    async fn clear_indicator(&self) -> Result<bool> {
        Ok(self.act("clear_indicator", |s| {
            if s.chips.is_empty() {
                return false;
            }
            if s.sticky_removals > 0 {
                s.sticky_removals -= 1;
            } else {
                s.chips.clear();
                s.page = 0;
            }
            true
        }))
    }

    async fn open_team_menu(&self) -> Result<bool> {
        Ok(self.act("open_team_menu", |s| {
            s.menu_open = true;
            true
        }))
    }

    async fn team_options(&self) -> Result<Vec<String>> {
        Ok(self.read(|s| {
            if !s.menu_open {
                return Vec::new();
            }
            s.teams
                .iter()
                .map(|(team, _)| team.clone())
                .filter(|t| !s.hidden_options.contains(t) && !s.chips.contains(t))
                .collect()
        }))
    }

    async fn pick_team_option(&self, label: &str) -> Result<bool> {
        Ok(self.act(format!("pick_team:{label}"), |s| {
            let offered = s.menu_open
                && !s.hidden_options.contains(label)
                && !s.chips.iter().any(|c| c == label)
                && s.teams.iter().any(|(t, _)| t == label);
            if offered {
                s.chips.push(label.to_string());
                s.page = 0;
            }
            offered
        }))
    }

    async fn dismiss_menu(&self) -> Result<()> {
        self.act("dismiss_menu", |s| s.menu_open = false);
        Ok(())
    }

    async fn first_page(&self) -> Result<()> {
        self.act("first_page", |s| s.page = 0);
        Ok(())
    }

    async fn athlete_rows(&self) -> Result<Vec<String>> {
        Ok(self.read(|s| s.page_rows()))
    }

    async fn next_page(&self) -> Result<bool> {
        Ok(self.act("next_page", |s| {
            let size = s.page_size.max(1);
            if (s.page + 1) * size < s.rows().len() {
                s.page += 1;
                true
            } else {
                false
            }
        }))
    }

    async fn open_athlete(&self, name: &str) -> Result<bool> {
        let outcome = self.act(format!("open_athlete:{name}"), |s| {
            if s.broken_athletes.contains(name) {
                return Err(());
            }
            if s.page_rows().iter().any(|r| r == name) {
                s.athlete = Some(name.to_string());
                s.shown.clear();
                s.previous.clear();
                Ok(true)
            } else {
                Ok(false)
            }
        });
        outcome.map_err(|_| AppError::Browser(CdpError::msg("target crashed")))
    }

    async fn on_overview(&self) -> Result<bool> {
        Ok(self.read(|s| s.athlete.is_some()))
    }

    async fn tile_present(&self, tile: &TileLocator) -> Result<bool> {
        Ok(self.read(|s| s.tile_present(&tile.describe())))
    }

    async fn open_modal(&self, tile: &TileLocator, attempt: u32) -> Result<bool> {
        let key = tile.describe();
        Ok(self.act(format!("open_modal:{key}:{attempt}"), |s| {
            if !s.tile_present(&key) {
                return false;
            }
            match s.modal_failures.get_mut(&key) {
                Some(remaining) if *remaining > 0 => *remaining -= 1,
                _ => s.modal = Some(key),
            }
            true
        }))
    }

    async fn modal_visible(&self) -> Result<bool> {
        Ok(self.read(|s| s.modal.is_some()))
    }

    async fn preload_modal(&self) -> Result<()> {
        self.act("preload_modal", |_| ());
        Ok(())
    }

    async fn accordion_count(&self) -> Result<usize> {
        Ok(self.read(|s| match &s.modal {
            Some(key) => s.sections.get(key).copied().unwrap_or(DEFAULT_SECTIONS),
            None => 0,
        }))
    }

    async fn section_ready(&self, index: usize) -> Result<bool> {
        let count = self.accordion_count().await?;
        Ok(index < count)
    }

    async fn capture_section(&self, index: usize) -> Result<Option<Vec<u8>>> {
        let count = self.accordion_count().await?;
        Ok(self.act(format!("capture_section:{index}"), |s| {
            let key = s.modal.clone()?;
            (index < count).then(|| s.image(&format!("{key}:section-{index}")))
        }))
    }

    async fn capture_modal(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.act("capture_modal", |s| {
            let key = s.modal.clone()?;
            Some(s.image(&format!("{key}:modal")))
        }))
    }

    async fn close_modal(&self) -> Result<()> {
        self.act("close_modal", |s| s.modal = None);
        Ok(())
    }

    async fn open_metric_menu(&self, tile: &TileLocator) -> Result<bool> {
        let key = tile.describe();
        Ok(self.act(format!("open_metric_menu:{key}"), |s| {
            if !s.tile_present(&key) {
                return false;
            }
            s.metric_menu = Some(key);
            true
        }))
    }

    async fn pick_metric(&self, label: &str) -> Result<bool> {
        Ok(self.act(format!("pick_metric:{label}"), |s| {
            let Some(key) = s.metric_menu.take() else {
                return false;
            };
            let before = s.shown.get(&key).cloned().unwrap_or_else(|| "base".into());
            s.previous.insert(key.clone(), before);
            s.shown.insert(key, label.to_string());
            true
        }))
    }

    async fn metric_shown(&self, tile: &TileLocator) -> Result<Option<String>> {
        Ok(self.read(|s| s.shown.get(&tile.describe()).cloned()))
    }

    async fn capture_tile(&self, tile: &TileLocator) -> Result<Option<Vec<u8>>> {
        let key = tile.describe();
        Ok(self.act(format!("capture_tile:{key}"), |s| {
            if !s.tile_present(&key) {
                return None;
            }
            let shown = s.shown.get(&key).cloned().unwrap_or_else(|| "base".into());
            let state = match s.stale_renders.get_mut(&shown) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    s.previous.get(&key).cloned().unwrap_or_else(|| "base".into())
                }
                _ => shown,
            };
            Some(s.image(&format!("{key}:{state}")))
        }))
    }

    async fn move_pointer_away(&self) -> Result<()> {
        self.act("move_pointer_away", |_| ());
        Ok(())
    }
}
