// src/services/teams.rs

//! Exclusive team selection on the portal's team filter.
//!
//! The filter is a multi-select, so a chip left over from a previous team
//! would silently merge that team's athletes into the next enumeration.
//! [`TeamSelector::select_exclusive`] therefore clears every chip, picks one
//! option, waits for the page to settle and verifies the filter before it
//! hands out an [`ActiveTeam`].

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, SelectionConfig, Team, TeamTarget};
use crate::portal::Portal;
use crate::services::readiness::{await_ready, await_stable};

/// Upper bound on chip removals in one clear pass.
const MAX_CHIP_REMOVALS: usize = 50;

/// Proof that the portal filter shows exactly one team.
///
/// Only [`TeamSelector`] creates these; the enumerator and capture engine
/// take one as an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTeam {
    team: Team,
}

impl ActiveTeam {
    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn name(&self) -> &str {
        &self.team.name
    }

    #[cfg(test)]
    pub fn assume(team: Team) -> Self {
        Self { team }
    }
}

/// Wait until the document has loaded and network activity has stopped
/// changing. Returns false when the page never settles.
pub async fn await_quiescent<P: Portal + ?Sized>(
    portal: &P,
    config: &SelectionConfig,
) -> Result<bool> {
    let wait = config.quiescence_wait();
    let loaded = await_ready(
        move || async move { Ok(portal.page_loaded().await?.then_some(())) },
        &wait,
    )
    .await?;
    if !loaded.is_ready() {
        return Ok(false);
    }
    Ok(await_stable(move || portal.resource_count(), &wait)
        .await?
        .is_ready())
}

/// Drives the team filter.
pub struct TeamSelector {
    config: Arc<Config>,
}

impl TeamSelector {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    fn selection(&self) -> &SelectionConfig {
        &self.config.selection
    }

    /// Resolve a target into the teams to process, in processing order.
    ///
    /// Explicit lists keep their order and are mapped onto the portal's
    /// display names; other targets are matched against the team options.
    /// A target matching nothing is a configuration error.
    pub async fn resolve_teams<P: Portal + ?Sized>(
        &self,
        portal: &P,
        target: &TeamTarget,
    ) -> Result<Vec<Team>> {
        let teams = match target {
            TeamTarget::Explicit(_) => match self.available_teams(portal).await {
                Ok(options) => target.resolve(&options),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::warn!("Could not list team options, using names as given: {}", e);
                    target.resolve(&[])
                }
            },
            _ => target.resolve(&self.available_teams(portal).await?),
        };
        if teams.is_empty() {
            return Err(AppError::config(format!(
                "{} matches no team on the portal",
                target.describe()
            )));
        }
        Ok(teams)
    }

    /// Every team option the filter offers.
    pub async fn available_teams<P: Portal + ?Sized>(&self, portal: &P) -> Result<Vec<String>> {
        portal.open_profiles().await?;
        let leftover = self.clear(portal).await?;
        if !leftover.is_empty() {
            log::warn!("Filter still shows {:?}; those teams are not listed", leftover);
        }
        if !self.open_menu(portal).await? {
            return Err(AppError::team_isolation("team list", "team menu did not open"));
        }
        let options = portal.team_options().await?;
        portal.dismiss_menu().await?;
        log::debug!("Team filter offers {} options", options.len());
        Ok(options)
    }

    /// Leave the filter showing exactly `team`, retrying up to
    /// `selection.attempts` times.
    pub async fn select_exclusive<P: Portal + ?Sized>(
        &self,
        portal: &P,
        team: &Team,
    ) -> Result<ActiveTeam> {
        let attempts = self.selection().attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.try_select(portal, team).await {
                Ok(()) => {
                    log::info!("Filter set to '{}'", team.name);
                    return Ok(ActiveTeam { team: team.clone() });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::warn!(
                        "Selecting '{}' failed (attempt {}/{}): {}",
                        team.name,
                        attempt,
                        attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(match last_error {
            Some(AppError::TeamIsolation { team, message }) => {
                AppError::TeamIsolation { team, message }
            }
            Some(other) => AppError::team_isolation(&team.name, other),
            None => AppError::team_isolation(&team.name, "no attempt made"),
        })
    }

    async fn try_select<P: Portal + ?Sized>(&self, portal: &P, team: &Team) -> Result<()> {
        let fail = |message: String| AppError::team_isolation(&team.name, message);

        let leftover = self.clear(portal).await?;
        if !leftover.is_empty() {
            return Err(fail(format!("filter chips could not be cleared: {leftover:?}")));
        }

        if !self.open_menu(portal).await? {
            return Err(fail("team menu did not open".into()));
        }
        let offered = await_ready(
            move || async move {
                let options = portal.team_options().await?;
                Ok(options.iter().any(|o| *o == team.name).then_some(()))
            },
            &self.selection().menu_wait(),
        )
        .await?;
        if !offered.is_ready() {
            portal.dismiss_menu().await?;
            return Err(fail("team is not offered in the filter".into()));
        }
        if !portal.pick_team_option(&team.name).await? {
            portal.dismiss_menu().await?;
            return Err(fail("team option could not be picked".into()));
        }
        portal.dismiss_menu().await?;

        if !await_quiescent(portal, self.selection()).await? {
            return Err(fail("page did not settle after selection".into()));
        }

        let chips = portal.selected_teams().await?;
        if chips != [team.name.as_str()] {
            return Err(fail(format!("filter shows {chips:?}")));
        }
        Ok(())
    }

    /// Whether the filter still shows exactly the active team.
    pub async fn verify<P: Portal + ?Sized>(&self, portal: &P, active: &ActiveTeam) -> Result<bool> {
        let chips = portal.selected_teams().await?;
        Ok(chips == [active.name()])
    }

    /// Re-select the active team if the filter drifted.
    pub async fn ensure<P: Portal + ?Sized>(&self, portal: &P, active: &ActiveTeam) -> Result<()> {
        if self.verify(portal, active).await? {
            return Ok(());
        }
        log::warn!(
            "Filter no longer shows only '{}', selecting it again",
            active.name()
        );
        self.select_exclusive(portal, active.team()).await.map(|_| ())
    }

    /// Clear the filter after a team, whatever comes next.
    pub async fn release<P: Portal + ?Sized>(&self, portal: &P, active: ActiveTeam) -> Result<()> {
        portal.clear_indicator().await?;
        let leftover = self.clear(portal).await?;
        if leftover.is_empty() {
            log::debug!("Released filter for '{}'", active.name());
        } else {
            log::warn!(
                "Filter still shows {:?} after releasing '{}'",
                leftover,
                active.name()
            );
        }
        Ok(())
    }

    /// Remove chips until none remain. Returns whatever is still shown.
    async fn clear<P: Portal + ?Sized>(&self, portal: &P) -> Result<Vec<String>> {
        for _ in 0..MAX_CHIP_REMOVALS {
            if portal.selected_teams().await?.is_empty() {
                break;
            }
            if !portal.remove_chip().await? {
                break;
            }
        }
        portal.selected_teams().await
    }

    async fn open_menu<P: Portal + ?Sized>(&self, portal: &P) -> Result<bool> {
        let opened = await_ready(
            move || async move { Ok(portal.open_team_menu().await?.then_some(())) },
            &self.selection().menu_wait(),
        )
        .await?;
        Ok(opened.is_ready())
    }
}
