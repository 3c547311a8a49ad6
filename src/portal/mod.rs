// src/portal/mod.rs

//! The minimal UI contract the pipeline needs from the portal.
//!
//! [`Portal`] is implemented by [`ChromePortal`] over the Chrome DevTools
//! Protocol. Every method is a single, short interaction; waiting and retrying
//! belong to the callers (see `services::readiness`).

pub mod chrome;
#[cfg(test)]
pub mod mock;
pub mod session;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::TileLocator;

pub use chrome::ChromePortal;
pub use session::{SessionStore, StoredCookie};

/// UI operations on an authenticated portal session.
#[async_trait]
pub trait Portal: Send + Sync {
    /// Navigate to the athlete profiles list.
    async fn open_profiles(&self) -> Result<()>;

    /// Return from an athlete overview to the profiles list. Navigation may
    /// still be in flight when this returns.
    async fn return_to_list(&self) -> Result<()>;

    /// Whether the profiles list has finished loading.
    async fn on_profiles(&self) -> Result<bool>;

    /// Whether the document has finished loading.
    async fn page_loaded(&self) -> Result<bool>;

    /// Number of network resources the page has fetched so far.
    async fn resource_count(&self) -> Result<u64>;

    // --- Team filter ---

    /// Labels of the chips currently shown in the team filter.
    async fn selected_teams(&self) -> Result<Vec<String>>;

    /// Remove one chip. Returns false when there was none.
    async fn remove_chip(&self) -> Result<bool>;

    /// Press the filter's clear indicator. Returns false when it is not shown.
    async fn clear_indicator(&self) -> Result<bool>;

    /// Open the team menu if needed. Returns whether options are visible.
    async fn open_team_menu(&self) -> Result<bool>;

    /// Labels of the visible team options.
    async fn team_options(&self) -> Result<Vec<String>>;

    /// Click the option whose label equals `label` exactly.
    async fn pick_team_option(&self, label: &str) -> Result<bool>;

    /// Close the team menu.
    async fn dismiss_menu(&self) -> Result<()>;

    // --- Athlete table ---

    /// Rewind the athlete table to its first page.
    async fn first_page(&self) -> Result<()>;

    /// Athlete names on the current table page.
    async fn athlete_rows(&self) -> Result<Vec<String>>;

    /// Advance the table. Returns false on the last page.
    async fn next_page(&self) -> Result<bool>;

    /// Click the row of the athlete with this exact name. Returns false when
    /// no such row is on the current page.
    async fn open_athlete(&self, name: &str) -> Result<bool>;

    /// Whether an athlete overview is showing.
    async fn on_overview(&self) -> Result<bool>;

    // --- Overview tiles and modals ---

    async fn tile_present(&self, tile: &TileLocator) -> Result<bool>;

    /// Click the tile to open its detail modal; `attempt` (1-based) selects
    /// the click strategy. Returns false when the tile cannot be clicked.
    async fn open_modal(&self, tile: &TileLocator, attempt: u32) -> Result<bool>;

    async fn modal_visible(&self) -> Result<bool>;

    /// Scroll the open modal top to bottom so lazy sections mount.
    async fn preload_modal(&self) -> Result<()>;

    async fn accordion_count(&self) -> Result<usize>;

    /// Whether accordion section `index` has rendered content.
    async fn section_ready(&self, index: usize) -> Result<bool>;

    async fn capture_section(&self, index: usize) -> Result<Option<Vec<u8>>>;

    /// Capture the whole modal dialog.
    async fn capture_modal(&self) -> Result<Option<Vec<u8>>>;

    async fn close_modal(&self) -> Result<()>;

    // --- Metric tiles ---

    /// Open the tile's metric dropdown. Returns whether options are visible.
    async fn open_metric_menu(&self, tile: &TileLocator) -> Result<bool>;

    /// Click the metric option labelled `label` in the open dropdown.
    async fn pick_metric(&self, label: &str) -> Result<bool>;

    /// Label currently shown on the tile's metric button.
    async fn metric_shown(&self, tile: &TileLocator) -> Result<Option<String>>;

    async fn capture_tile(&self, tile: &TileLocator) -> Result<Option<Vec<u8>>>;

    /// Park the pointer away from tiles so no hover tooltip is captured.
    async fn move_pointer_away(&self) -> Result<()>;
}
