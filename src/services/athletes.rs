// src/services/athletes.rs

//! Athlete enumeration under an exclusively selected team.

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{AthleteConfig, Athlete, Config};
use crate::portal::Portal;
use crate::services::teams::{ActiveTeam, await_quiescent};
use crate::utils::{natural_cmp, sanitize_filename};

/// Safety stop for a table whose "next page" button never disables.
const MAX_PAGES: usize = 200;

/// Predicate for table rows that are not real athletes (test accounts).
#[derive(Debug, Clone)]
pub struct AthleteFilter {
    patterns: Vec<Regex>,
}

impl AthleteFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn from_config(config: &AthleteConfig) -> Result<Self> {
        Self::new(&config.exclude_patterns)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }
}

/// Lists the athletes of the active team.
pub struct AthleteEnumerator {
    config: Arc<Config>,
    filter: AthleteFilter,
}

impl AthleteEnumerator {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let filter = AthleteFilter::from_config(&config.athletes)?;
        Ok(Self { config, filter })
    }

    /// Athletes of `active`, sorted case-insensitively.
    ///
    /// Fails with `TeamIsolation` if the filter no longer shows exactly the
    /// active team.
    pub async fn enumerate<P: Portal + ?Sized>(
        &self,
        portal: &P,
        active: &ActiveTeam,
    ) -> Result<Vec<Athlete>> {
        let chips = portal.selected_teams().await?;
        if chips != [active.name()] {
            return Err(AppError::team_isolation(
                active.name(),
                format!("filter shows {chips:?} before enumeration"),
            ));
        }

        portal.first_page().await?;
        self.settle(portal).await?;

        let mut names = Vec::new();
        let mut pages = 0;
        loop {
            let rows = portal.athlete_rows().await?;
            pages += 1;
            log::debug!("{} rows on page {} for '{}'", rows.len(), pages, active.name());
            names.extend(rows);
            if pages >= MAX_PAGES || !portal.next_page().await? {
                break;
            }
            self.settle(portal).await?;
        }

        let athletes = self.collect(active, names);
        log::info!("{} athletes in '{}'", athletes.len(), active.name());
        Ok(athletes)
    }

    async fn settle<P: Portal + ?Sized>(&self, portal: &P) -> Result<()> {
        if !await_quiescent(portal, &self.config.selection).await? {
            log::warn!("Athlete table did not settle; reading it anyway");
        }
        Ok(())
    }

    fn collect(&self, active: &ActiveTeam, names: Vec<String>) -> Vec<Athlete> {
        let mut seen = HashSet::new();
        let mut athletes: Vec<Athlete> = Vec::new();
        for name in names {
            let name = name.trim().to_string();
            if name.is_empty() {
                continue;
            }
            if self.filter.is_excluded(&name) {
                log::debug!("Skip test profile: {}", name);
                continue;
            }
            if !seen.insert(sanitize_filename(&name)) {
                continue;
            }
            athletes.push(Athlete::new(name, active.team().clone()));
        }
        athletes.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        athletes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use crate::portal::mock::MockPortal;
    use crate::services::teams::TeamSelector;

    fn config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    fn names(athletes: &[Athlete]) -> Vec<&str> {
        athletes.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_filter_excludes_digit_rows_by_default() {
        let filter = AthleteFilter::from_config(&AthleteConfig::default()).unwrap();
        assert!(filter.is_excluded("Test Athlete 2"));
        assert!(!filter.is_excluded("A. Smith"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enumeration_never_leaks_previous_team() {
        let portal = MockPortal::new()
            .with_team("KC Fusion U14", &["C. Brown"])
            .with_team("Riverside U14", &["B. Jones", "A. Smith"]);
        let config = config();
        let selector = TeamSelector::new(config.clone());
        let enumerator = AthleteEnumerator::new(config).unwrap();

        let first = selector
            .select_exclusive(&portal, &Team::new("KC Fusion U14"))
            .await
            .unwrap();
        assert_eq!(names(&enumerator.enumerate(&portal, &first).await.unwrap()), vec!["C. Brown"]);

        let second = selector
            .select_exclusive(&portal, &Team::new("Riverside U14"))
            .await
            .unwrap();
        let athletes = enumerator.enumerate(&portal, &second).await.unwrap();
        assert_eq!(names(&athletes), vec!["A. Smith", "B. Jones"]);
        assert!(athletes.iter().all(|a| a.team.name == "Riverside U14"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pages_are_merged_filtered_and_sorted() {
        let portal = MockPortal::new()
            .with_team(
                "Riverside U14",
                &["zoe Park", "Test 01", "B. Jones", "A. Smith", "B.  Jones"],
            )
            .with_page_size(2)
            .with_selected(&["Riverside U14"]);
        let enumerator = AthleteEnumerator::new(config()).unwrap();
        let active = ActiveTeam::assume(Team::new("Riverside U14"));

        let first = enumerator.enumerate(&portal, &active).await.unwrap();
        assert_eq!(names(&first), vec!["A. Smith", "B. Jones", "zoe Park"]);
        assert_eq!(portal.count("next_page"), 3);

        let again = enumerator.enumerate(&portal, &active).await.unwrap();
        assert_eq!(first, again);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enumeration_refuses_mixed_filter() {
        let portal = MockPortal::new()
            .with_team("KC Fusion U14", &["C. Brown"])
            .with_team("Riverside U14", &["A. Smith"])
            .with_selected(&["KC Fusion U14", "Riverside U14"]);
        let enumerator = AthleteEnumerator::new(config()).unwrap();
        let active = ActiveTeam::assume(Team::new("Riverside U14"));
        let err = enumerator.enumerate(&portal, &active).await.unwrap_err();
        assert!(matches!(err, AppError::TeamIsolation { .. }));
        assert_eq!(portal.count("first_page"), 0);
    }
}
