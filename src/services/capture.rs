// src/services/capture.rs

//! Screenshot capture for one athlete at a time.
//!
//! The engine walks the capture catalog on an athlete overview: test modals
//! are opened and captured section by section, metric tiles are captured
//! once per dropdown state. Every persisted image goes through the
//! [`DedupLedger`], and every pass ends with a [`CaptureManifest`] in the
//! athlete folder.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::time::sleep;

use crate::error::{AppError, Result};
use crate::models::{
    Athlete, CaptureConfig, CaptureManifest, CaptureTarget, Config, MetricTile, ModalTest,
    TileLocator,
};
use crate::portal::Portal;
use crate::services::readiness::{Readiness, await_ready, await_stable};
use crate::services::teams::{ActiveTeam, await_quiescent};
use crate::storage::LocalStorage;
use crate::utils::sha256_hex;

/// Safety stop when paging through the table looking for an athlete row.
const MAX_SEARCH_PAGES: usize = 200;

/// Whether a dropdown button label shows the metric `wanted`.
///
/// Long labels are cut with an ellipsis on the button, so a truncated label
/// matches when it is a prefix of the wanted one.
pub fn label_matches(shown: &str, wanted: &str) -> bool {
    let norm = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let shown = norm(shown);
    let wanted = norm(wanted);
    if shown == wanted {
        return true;
    }
    let stem = shown
        .trim_end_matches('…')
        .trim_end_matches("...")
        .trim_end();
    stem.len() < shown.len() && stem.len() >= 3 && wanted.starts_with(stem)
}

/// Result of offering a capture to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// First capture of this target in the run; persist it
    First,
    /// Already persisted earlier in the run with this hash
    Repeat { first_hash: String },
}

/// Remembers which (athlete, target) pairs were persisted during this run.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: HashMap<(String, String), String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, athlete: &Athlete, target: &CaptureTarget, hash: &str) -> Admission {
        let key = (athlete.key(), target.id());
        match self.seen.get(&key) {
            Some(first) => Admission::Repeat {
                first_hash: first.clone(),
            },
            None => {
                self.seen.insert(key, hash.to_string());
                Admission::First
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Outcome of one athlete capture.
#[derive(Debug, Clone)]
pub struct CaptureReport {
    pub athlete: Athlete,
    pub manifest: CaptureManifest,
    /// Images written during this pass
    pub written: usize,
    /// Captures dropped because the target was already persisted
    pub repeated: usize,
}

impl CaptureReport {
    pub fn summary(&self) -> String {
        let mut text = format!("{} images", self.manifest.artifacts.len());
        if !self.manifest.absent.is_empty() {
            text.push_str(&format!(", absent: {}", self.manifest.absent.join(", ")));
        }
        text
    }
}

/// Per-athlete state of a capture pass.
struct Pass {
    manifest: CaptureManifest,
    written: usize,
    repeated: usize,
}

impl Pass {
    fn absent(&mut self, what: impl Into<String>) {
        let what = what.into();
        log::info!("  absent: {}", what);
        self.manifest.record_absent(what);
    }
}

/// Captures athletes of the active team.
pub struct CaptureEngine {
    config: Arc<Config>,
    storage: LocalStorage,
    ledger: DedupLedger,
}

impl CaptureEngine {
    pub fn new(config: Arc<Config>, storage: LocalStorage) -> Self {
        Self {
            config,
            storage,
            ledger: DedupLedger::new(),
        }
    }

    pub fn ledger(&self) -> &DedupLedger {
        &self.ledger
    }

    fn settings(&self) -> &CaptureConfig {
        &self.config.capture
    }

    /// Capture every catalog entry for `athlete` and write its manifest.
    ///
    /// The portal is returned to the athlete list afterwards, also on
    /// failure. A pass that persists fewer than `min_viable_images` images
    /// still writes its manifest (marked incomplete) and then fails.
    pub async fn capture<P: Portal + ?Sized>(
        &mut self,
        portal: &P,
        active: &ActiveTeam,
        athlete: &Athlete,
    ) -> Result<CaptureReport> {
        if athlete.team != *active.team() {
            return Err(AppError::team_isolation(
                active.name(),
                format!("'{}' was enumerated under '{}'", athlete.name, athlete.team.name),
            ));
        }

        let result = self.capture_overview(portal, athlete).await;
        if let Err(e) = self.return_to_list(portal).await {
            log::warn!("Could not return to the athlete list: {}", e);
        }

        match result {
            Ok(report) => Ok(report),
            Err(e) if e.is_fatal() => Err(e),
            Err(e @ AppError::AthleteCapture { .. }) => Err(e),
            Err(e) => Err(AppError::athlete_capture(&athlete.name, e)),
        }
    }

    async fn capture_overview<P: Portal + ?Sized>(
        &mut self,
        portal: &P,
        athlete: &Athlete,
    ) -> Result<CaptureReport> {
        if !self.open_athlete(portal, athlete).await? {
            return Err(AppError::athlete_capture(
                &athlete.name,
                "row not found in the athlete table",
            ));
        }
        let overview = await_ready(
            move || async move { Ok(portal.on_overview().await?.then_some(())) },
            &self.settings().tile_wait(),
        )
        .await?;
        if !overview.is_ready() {
            return Err(AppError::athlete_capture(&athlete.name, "overview did not open"));
        }

        let mut pass = Pass {
            manifest: CaptureManifest::new(&athlete.name, &athlete.team.name),
            written: 0,
            repeated: 0,
        };

        let config = self.config.clone();
        for modal in &config.capture.modals {
            self.capture_modal(portal, athlete, modal, &mut pass).await?;
        }
        for tile in &config.capture.tiles {
            self.capture_metric_tile(portal, athlete, tile, &mut pass).await?;
        }

        let complete = pass.manifest.finalize(self.settings().min_viable_images);
        self.storage.write_manifest(athlete, &pass.manifest).await?;
        if !complete {
            return Err(AppError::athlete_capture(
                &athlete.name,
                format!(
                    "only {} images captured, {} required",
                    pass.manifest.artifacts.len(),
                    self.settings().min_viable_images
                ),
            ));
        }

        Ok(CaptureReport {
            athlete: athlete.clone(),
            manifest: pass.manifest,
            written: pass.written,
            repeated: pass.repeated,
        })
    }

    /// Navigate back and wait until the list is loaded and settled, so the
    /// next filter check and row lookup read the list, not the old overview.
    async fn return_to_list<P: Portal + ?Sized>(&self, portal: &P) -> Result<()> {
        portal.return_to_list().await?;
        let listed = await_ready(
            move || async move { Ok(portal.on_profiles().await?.then_some(())) },
            &self.config.selection.quiescence_wait(),
        )
        .await?;
        if !listed.is_ready() {
            log::warn!("Athlete list did not come back, reopening it");
            portal.open_profiles().await?;
        }
        self.settle(portal, "athlete list").await
    }

    async fn settle<P: Portal + ?Sized>(&self, portal: &P, what: &str) -> Result<()> {
        if !await_quiescent(portal, &self.config.selection).await? {
            log::warn!("{} did not settle", what);
        }
        Ok(())
    }

    /// Page through the table from the start until the athlete's row is
    /// clicked.
    async fn open_athlete<P: Portal + ?Sized>(&self, portal: &P, athlete: &Athlete) -> Result<bool> {
        portal.first_page().await?;
        self.settle(portal, "first table page").await?;
        for _ in 0..MAX_SEARCH_PAGES {
            if portal.open_athlete(&athlete.name).await? {
                return Ok(true);
            }
            if !portal.next_page().await? {
                break;
            }
            self.settle(portal, "next table page").await?;
        }
        Ok(false)
    }

    async fn await_tile<P: Portal + ?Sized>(&self, portal: &P, tile: &TileLocator) -> Result<bool> {
        let present = await_ready(
            move || async move { Ok(portal.tile_present(tile).await?.then_some(())) },
            &self.settings().tile_wait(),
        )
        .await?;
        Ok(present.is_ready())
    }

    async fn capture_modal<P: Portal + ?Sized>(
        &mut self,
        portal: &P,
        athlete: &Athlete,
        test: &ModalTest,
        pass: &mut Pass,
    ) -> Result<()> {
        log::info!("  {}", test.label);
        if !self.await_tile(portal, &test.tile).await? {
            pass.absent(&test.prefix);
            return Ok(());
        }

        if !self.open_modal(portal, &test.tile).await? {
            log::warn!(
                "  {} did not open after {} attempts",
                test.label,
                self.settings().modal_open_attempts
            );
            pass.absent(&test.prefix);
            return Ok(());
        }
        portal.preload_modal().await?;

        let count = match await_stable(move || portal.accordion_count(), &self.settings().accordion_wait())
            .await?
        {
            Readiness::Ready(count) => count,
            Readiness::Absent => {
                let count = portal.accordion_count().await?;
                log::warn!("  section count never settled, using {}", count);
                count
            }
        };

        if count == 0 {
            let target = CaptureTarget::WholeModal {
                prefix: test.prefix.clone(),
            };
            match portal.capture_modal().await? {
                Some(bytes) => self.persist(athlete, &target, &bytes, pass).await?,
                None => pass.absent(target.id()),
            }
        } else {
            portal.move_pointer_away().await?;
            let wait = self
                .settings()
                .render_wait()
                .settle(self.settings().section_settle());
            for index in 0..count {
                let target = CaptureTarget::Section {
                    prefix: test.prefix.clone(),
                    index,
                };
                let ready = await_ready(
                    move || async move { Ok(portal.section_ready(index).await?.then_some(())) },
                    &wait,
                )
                .await?;
                if !ready.is_ready() {
                    pass.absent(target.id());
                    continue;
                }
                match portal.capture_section(index).await? {
                    Some(bytes) => self.persist(athlete, &target, &bytes, pass).await?,
                    None => pass.absent(target.id()),
                }
            }
        }

        portal.close_modal().await?;
        let closed = await_ready(
            move || async move { Ok((!portal.modal_visible().await?).then_some(())) },
            &self.settings().render_wait(),
        )
        .await?;
        if !closed.is_ready() {
            log::warn!("  {} modal is still open", test.label);
        }
        Ok(())
    }

    /// Click the tile with each strategy in turn until the modal shows.
    async fn open_modal<P: Portal + ?Sized>(&self, portal: &P, tile: &TileLocator) -> Result<bool> {
        let wait = self.settings().modal_wait();
        for attempt in 1..=self.settings().modal_open_attempts {
            if !portal.open_modal(tile, attempt).await? {
                continue;
            }
            let shown = await_ready(
                move || async move { Ok(portal.modal_visible().await?.then_some(())) },
                &wait,
            )
            .await?;
            if shown.is_ready() {
                return Ok(true);
            }
            log::debug!("  modal attempt {} on {} showed nothing", attempt, tile.describe());
        }
        Ok(false)
    }

    async fn capture_metric_tile<P: Portal + ?Sized>(
        &mut self,
        portal: &P,
        athlete: &Athlete,
        tile: &MetricTile,
        pass: &mut Pass,
    ) -> Result<()> {
        log::info!("  {}", tile.label);
        if !self.await_tile(portal, &tile.tile).await? {
            pass.absent(&tile.prefix);
            return Ok(());
        }

        // Hashes of metric states already captured for this tile.
        let mut siblings: Vec<(String, String)> = Vec::new();
        for target in tile.targets() {
            match &target {
                CaptureTarget::TileMetric { label, .. } => {
                    self.capture_metric_state(portal, athlete, tile, &target, label, &mut siblings, pass)
                        .await?;
                }
                _ => {
                    portal.move_pointer_away().await?;
                    sleep(self.settings().metric_settle()).await;
                    match portal.capture_tile(&tile.tile).await? {
                        Some(bytes) => self.persist(athlete, &target, &bytes, pass).await?,
                        None => pass.absent(target.id()),
                    }
                }
            }
        }
        Ok(())
    }

    /// Select one metric and capture it, bouncing through another metric
    /// when the capture still shows a sibling state.
    #[allow(clippy::too_many_arguments)]
    async fn capture_metric_state<P: Portal + ?Sized>(
        &mut self,
        portal: &P,
        athlete: &Athlete,
        tile: &MetricTile,
        target: &CaptureTarget,
        label: &str,
        siblings: &mut Vec<(String, String)>,
        pass: &mut Pass,
    ) -> Result<()> {
        let retries = self.settings().dupe_retries;
        let mut bounces = 0;
        loop {
            if !self.select_metric(portal, &tile.tile, label).await? {
                pass.absent(target.id());
                return Ok(());
            }
            sleep(self.settings().metric_settle()).await;
            portal.move_pointer_away().await?;

            let Some(bytes) = portal.capture_tile(&tile.tile).await? else {
                pass.absent(target.id());
                return Ok(());
            };
            let hash = sha256_hex(&bytes);
            let stale = siblings.iter().find(|(id, h)| *h == hash && *id != target.id());
            if let Some((id, _)) = stale {
                if bounces >= retries {
                    log::warn!("  {} still renders {}, giving up", label, id);
                    pass.absent(target.id());
                    return Ok(());
                }
                bounces += 1;
                log::debug!("  {} rendered as {}, reselecting", label, id);
                if let Some(other) = tile.metrics.iter().find(|m| m.as_str() != label) {
                    self.select_metric(portal, &tile.tile, other).await?;
                }
                continue;
            }

            siblings.push((target.id(), hash));
            return self.persist(athlete, target, &bytes, pass).await;
        }
    }

    /// Open the dropdown, pick `label` and wait until the button shows it.
    async fn select_metric<P: Portal + ?Sized>(
        &self,
        portal: &P,
        tile: &TileLocator,
        label: &str,
    ) -> Result<bool> {
        let wait = self.settings().render_wait();
        let opened = await_ready(
            move || async move { Ok(portal.open_metric_menu(tile).await?.then_some(())) },
            &wait,
        )
        .await?;
        if !opened.is_ready() {
            log::debug!("  metric menu of {} did not open", tile.describe());
            return Ok(false);
        }
        if !portal.pick_metric(label).await? {
            log::debug!("  metric '{}' not offered", label);
            portal.move_pointer_away().await?;
            return Ok(false);
        }
        let shown = await_ready(
            move || async move {
                let shown = portal.metric_shown(tile).await?;
                Ok(shown.filter(|s| label_matches(s, label)).map(|_| ()))
            },
            &wait,
        )
        .await?;
        Ok(shown.is_ready())
    }

    async fn persist(
        &mut self,
        athlete: &Athlete,
        target: &CaptureTarget,
        bytes: &[u8],
        pass: &mut Pass,
    ) -> Result<()> {
        let hash = sha256_hex(bytes);
        match self.ledger.admit(athlete, target, &hash) {
            Admission::First => {
                self.storage
                    .write_image(athlete, &target.file_name(), bytes)
                    .await?;
                log::debug!("  saved {}", target.file_name());
                pass.manifest.record_artifact(target, hash);
                pass.written += 1;
            }
            Admission::Repeat { first_hash } => {
                log::debug!("  {} already captured this run", target.id());
                pass.manifest.record_artifact(target, first_hash);
                pass.repeated += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use crate::portal::mock::MockPortal;
    use tempfile::TempDir;

    const TEAM: &str = "Riverside U14";

    fn cmj() -> ModalTest {
        ModalTest {
            label: "Countermovement Jump".into(),
            prefix: "CMJ".into(),
            tile: TileLocator::ForceDecks {
                name: "Countermovement Jump".into(),
            },
        }
    }

    fn squat() -> MetricTile {
        MetricTile {
            label: "Overhead Squat".into(),
            prefix: "Squat".into(),
            tile: TileLocator::HumanTrak {
                title: "Overhead Squat".into(),
            },
            include_base: true,
            metrics: vec!["Knee".into(), "Hip".into()],
        }
    }

    fn engine(dir: &TempDir) -> CaptureEngine {
        let mut config = Config::default();
        config.capture.modals = vec![cmj()];
        config.capture.tiles = vec![squat()];
        CaptureEngine::new(Arc::new(config), LocalStorage::new(dir.path()))
    }

    fn portal() -> MockPortal {
        MockPortal::new()
            .with_team(TEAM, &["A. Smith", "B. Jones"])
            .with_selected(&[TEAM])
    }

    fn active() -> ActiveTeam {
        ActiveTeam::assume(Team::new(TEAM))
    }

    fn athlete(name: &str) -> Athlete {
        Athlete::new(name, Team::new(TEAM))
    }

    fn files(dir: &TempDir, name: &str) -> Vec<String> {
        let folder = athlete(name).folder(dir.path());
        let mut names: Vec<String> = std::fs::read_dir(folder)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".png"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_label_matches_truncated_button() {
        assert!(label_matches("Avg Peak Knee Flexion - Left & Right", "avg peak knee flexion -  left & right"));
        assert!(label_matches("Avg Hip Adduction at…", "Avg Hip Adduction at Peak Knee Flexion"));
        assert!(label_matches("Avg Hip...", "Avg Hip Adduction"));
        assert!(!label_matches("Avg Hip", "Avg Hip Adduction"));
        assert!(!label_matches("Av…", "Avg Hip Adduction"));
    }

    #[test]
    fn test_ledger_keeps_first_hash() {
        let mut ledger = DedupLedger::new();
        let target = CaptureTarget::TileBase { prefix: "Squat".into() };
        assert_eq!(ledger.admit(&athlete("A. Smith"), &target, "aa"), Admission::First);
        assert_eq!(
            ledger.admit(&athlete("A. Smith"), &target, "bb"),
            Admission::Repeat { first_hash: "aa".into() }
        );
        assert_eq!(ledger.admit(&athlete("B. Jones"), &target, "aa"), Admission::First);
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_writes_images_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal();

        let report = engine
            .capture(&portal, &active(), &athlete("B. Jones"))
            .await
            .unwrap();
        assert!(report.manifest.complete);
        assert_eq!(report.written, 5);
        assert_eq!(
            files(&dir, "B. Jones"),
            vec!["CMJ_001.png", "CMJ_002.png", "Squat_001.png", "Squat_002.png", "Squat_003.png"]
        );

        let stored = LocalStorage::new(dir.path())
            .read_manifest(&athlete("B. Jones"))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.complete);
        assert_eq!(stored.artifacts.len(), 5);
        assert_eq!(portal.count("return_to_list"), 1);
        assert_eq!(portal.count("capture_modal"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_capture_persists_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal();

        engine.capture(&portal, &active(), &athlete("A. Smith")).await.unwrap();
        let image = athlete("A. Smith").folder(dir.path()).join("CMJ_001.png");
        std::fs::write(&image, b"marker").unwrap();

        let again = engine
            .capture(&portal, &active(), &athlete("A. Smith"))
            .await
            .unwrap();
        assert_eq!(again.written, 0);
        assert_eq!(again.repeated, 5);
        assert_eq!(again.manifest.artifacts.len(), 5);
        assert_eq!(std::fs::read(&image).unwrap(), b"marker");
        assert_eq!(engine.ledger().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_metric_render_is_reselected() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal().with_stale_renders("Hip", 1);

        let report = engine
            .capture(&portal, &active(), &athlete("A. Smith"))
            .await
            .unwrap();
        assert!(report.manifest.absent.is_empty());
        assert_eq!(portal.count("pick_metric:"), 4);

        let folder = athlete("A. Smith").folder(dir.path());
        let hip = std::fs::read(folder.join("Squat_003.png")).unwrap();
        assert_eq!(hip, b"A. Smith|humantrak 'Overhead Squat':Hip");
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_stale_render_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal().with_stale_renders("Hip", 10);

        let report = engine
            .capture(&portal, &active(), &athlete("A. Smith"))
            .await
            .unwrap();
        assert_eq!(report.manifest.absent, vec!["Squat#Hip"]);
        assert_eq!(files(&dir, "A. Smith").len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_modal_opens_on_later_strategy() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal().with_modal_failures(&cmj().tile, 2).with_sections(&cmj().tile, 3);

        let report = engine
            .capture(&portal, &active(), &athlete("A. Smith"))
            .await
            .unwrap();
        assert_eq!(portal.count("open_modal:"), 3);
        assert_eq!(portal.count("capture_section:"), 3);
        assert!(report.manifest.absent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_modal_that_never_opens_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal().with_modal_failures(&cmj().tile, 100);

        let report = engine
            .capture(&portal, &active(), &athlete("A. Smith"))
            .await
            .unwrap();
        assert_eq!(portal.count("open_modal:"), 6);
        assert_eq!(report.manifest.absent, vec!["CMJ"]);
        assert_eq!(report.written, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_modal_without_sections_is_captured_whole() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal().with_sections(&cmj().tile, 0);

        engine.capture(&portal, &active(), &athlete("A. Smith")).await.unwrap();
        assert_eq!(portal.count("capture_modal"), 1);
        assert!(files(&dir, "A. Smith").contains(&"CMJ_001.png".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_tile_is_recorded_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal().with_missing_tile(&squat().tile);

        let report = engine
            .capture(&portal, &active(), &athlete("A. Smith"))
            .await
            .unwrap();
        assert_eq!(report.manifest.absent, vec!["Squat"]);
        assert_eq!(files(&dir, "A. Smith"), vec!["CMJ_001.png", "CMJ_002.png"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_overview_fails_with_incomplete_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal().with_empty_athlete("A. Smith");

        let err = engine
            .capture(&portal, &active(), &athlete("A. Smith"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AthleteCapture { .. }));
        let manifest = LocalStorage::new(dir.path())
            .read_manifest(&athlete("A. Smith"))
            .await
            .unwrap()
            .unwrap();
        assert!(!manifest.complete);
        assert_eq!(manifest.absent, vec!["CMJ", "Squat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_browser_failure_is_isolated_to_athlete() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal().with_broken_athlete("A. Smith");

        let err = engine
            .capture(&portal, &active(), &athlete("A. Smith"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AthleteCapture { ref athlete, .. } if athlete == "A. Smith"));
        assert!(!err.is_fatal());
        assert_eq!(portal.count("return_to_list"), 1);

        engine.capture(&portal, &active(), &athlete("B. Jones")).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_athlete_of_another_team_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(&dir);
        let portal = portal();
        let stranger = Athlete::new("C. Brown", Team::new("KC Fusion U14"));

        let err = engine.capture(&portal, &active(), &stranger).await.unwrap_err();
        assert!(matches!(err, AppError::TeamIsolation { .. }));
        assert!(portal.events().is_empty());
    }
}
