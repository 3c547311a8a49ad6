// src/portal/chrome.rs

//! [`Portal`] over a Chrome DevTools Protocol session.
//!
//! DOM lookups run as small scripts in the page; anything that needs a real
//! input event (clicks, typing, screenshots) goes through `chromiumoxide`
//! elements. Scripts tag the element they resolved with a marker attribute
//! so the Rust side can address it with a plain CSS selector.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, TimeSinceEpoch};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::layout::Point;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{PortalConfig, TileLocator};
use crate::portal::Portal;
use crate::portal::session::{Credentials, SessionStore, StoredCookie};
use crate::services::readiness::{ReadinessPolicy, await_ready};

const DEVICE_SCALE: f64 = 2.0;

const COOKIE_BANNER: &str = "#rcc-confirm-button";
const USERNAME_INPUT: &str = r#"input[name="username"]"#;
const PASSWORD_INPUT: &str = r#"input[name="password"]"#;
const PROFILES_LINK: &str = r#"a[href="/app/profiles"]"#;
const PROFILES_PATH: &str = "app/profiles";

const CHIP_REMOVE: &str = ".react-select__control .react-select__multi-value__remove";
const CLEAR_INDICATOR: &str = ".react-select__control .react-select__clear-indicator";
const TEAM_CONTROL: &str = ".react-select__control";

const NEXT_PAGE: &str = r#"button[aria-label="next page"]"#;
const FIRST_PAGE: &str = r#"button[aria-label="first page"]"#;
const PREVIOUS_PAGE: &str = r#"button[aria-label="previous page"]"#;

const CLOSE_BUTTON: &str = r#"[data-testid="close-button"], button[aria-label="Close"]"#;
const METRIC_BUTTON: &str = r#"[data-testid="metric-dropdown-button"]"#;
const TILE_HEADING: &str = ".truncate.font-medium";

/// Element a script resolved for the next action (set by `vpMark`).
const TARGET: &str = "[data-vp-target]";
/// Attribute numbering the candidate tiles of the last lookup.
const CANDIDATE_ATTR: &str = "data-vp-candidate";

/// Shared helpers prepended to every page script.
const PRELUDE: &str = r#"
const vpNorm = s => (s || '').replace(/\s+/g, ' ').trim();
const vpVisible = el => {
  if (!el) return false;
  const r = el.getBoundingClientRect();
  const st = window.getComputedStyle(el);
  return r.width > 0 && r.height > 0 && st.visibility !== 'hidden' && st.display !== 'none';
};
const vpModal = () => {
  const close = Array.from(document.querySelectorAll('[data-testid="close-button"]')).find(vpVisible);
  const owner = close && close.closest('[role="dialog"], #fd-chart-modal, .fd-chart-modal, .react-responsive-modal-modal');
  if (owner) return owner;
  return Array.from(document.querySelectorAll('#fd-chart-modal, .fd-chart-modal, .react-responsive-modal-modal')).find(vpVisible) || null;
};
const vpSections = () => {
  const m = vpModal();
  return m ? Array.from(m.querySelectorAll('div.accordion')) : [];
};
const vpMark = el => {
  document.querySelectorAll('[data-vp-target]').forEach(e => e.removeAttribute('data-vp-target'));
  if (!el) return false;
  el.scrollIntoView({ block: 'center' });
  el.setAttribute('data-vp-target', '1');
  return true;
};
"#;

fn script(body: &str) -> String {
    format!("(() => {{ {PRELUDE}\n{body}\n}})()")
}

/// Encode a value as a JavaScript literal.
fn js<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Escape a value for use inside a double-quoted CSS attribute selector.
fn css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Candidate queries for a tile, tried in order, each with the heading the
/// match must carry (`None`: first visible candidate).
pub fn tile_queries(tile: &TileLocator) -> Vec<(String, Option<&str>)> {
    match tile {
        TileLocator::ForceDecks { name } => vec![(
            format!(
                r#"article:has([data-testid="forcedecks-tile"][data-test-name="{}"])"#,
                css_string(name)
            ),
            None,
        )],
        TileLocator::TestId { test_id, title } => vec![(
            format!(r#"article:has([data-testid="{}"])"#, css_string(test_id)),
            title.as_deref(),
        )],
        TileLocator::HumanTrak { title } => vec![
            (
                r#"article:has([data-testid="humantrak-tile"])"#.to_string(),
                Some(title.as_str()),
            ),
            ("article".to_string(), Some(title.as_str())),
        ],
    }
}

/// Whether `url` is the athlete list itself, not a profile below it.
pub fn is_profiles_list(url: &str) -> bool {
    Url::parse(url).is_ok_and(|url| url.path().trim_end_matches('/').ends_with("/app/profiles"))
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Index of the heading matching `wanted`: an exact (whitespace and case
/// insensitive) match first, then the first heading containing it.
pub fn pick_heading(headings: &[String], wanted: &str) -> Option<usize> {
    let wanted = normalize(wanted);
    let normalized: Vec<String> = headings.iter().map(|h| normalize(h)).collect();
    normalized
        .iter()
        .position(|h| *h == wanted)
        .or_else(|| normalized.iter().position(|h| h.contains(&wanted)))
}

/// A launched browser with an authenticated portal page.
pub struct ChromePortal {
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    base_url: Url,
}

impl ChromePortal {
    /// Launch Chrome and authenticate, reusing the cached session when it is
    /// still valid.
    pub async fn launch(config: &PortalConfig, session: &SessionStore) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::config(format!("portal.base_url: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .viewport(Viewport {
                width: config.window_width,
                height: config.window_height,
                device_scale_factor: Some(DEVICE_SCALE),
                ..Default::default()
            })
            .arg("--overscroll-history-navigation=0");
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(AppError::launch)?;

        log::info!(
            "Launching Chrome ({})",
            if config.headless { "headless" } else { "headed" }
        );
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(AppError::launch)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(AppError::launch)?;

        let portal = Self {
            browser: Mutex::new(browser),
            page,
            handler,
            base_url,
        };
        portal.authenticate(config, session).await?;
        Ok(portal)
    }

    /// Close the browser and stop the protocol handler.
    pub async fn close(self) -> Result<()> {
        let mut browser = self.browser.into_inner();
        if let Err(e) = browser.close().await {
            log::warn!("Browser did not close cleanly: {}", e);
        }
        if let Err(e) = browser.wait().await {
            log::warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }

    // --- Session ---

    async fn authenticate(&self, config: &PortalConfig, session: &SessionStore) -> Result<()> {
        if let Some(cookies) = session.load().await? {
            log::info!("Loading saved session from {:?}", session.path());
            self.page.goto(self.base_url.as_str()).await?;
            self.restore_cookies(&cookies).await?;
            self.page.goto(self.base_url.as_str()).await?;
            if self.await_profiles_link(&config.session_check_wait()).await? {
                log::info!("Session OK");
                return Ok(());
            }
            log::warn!("Saved session is no longer valid, re-authenticating");
            session.discard().await?;
        }

        let credentials = Credentials::from_env(config)?;
        self.login(&credentials, &config.login_wait()).await?;
        session.save(&self.stored_cookies().await?).await?;
        log::info!("Session saved to {:?}", session.path());
        Ok(())
    }

    async fn login(&self, credentials: &Credentials, wait: &ReadinessPolicy) -> Result<()> {
        log::info!("Logging in as {}", credentials.email);
        self.page.goto(self.base_url.as_str()).await?;

        let banner_wait = ReadinessPolicy::new(Duration::from_secs(3), wait.poll_interval);
        if let Some(banner) = await_ready(move || self.first(COOKIE_BANNER), &banner_wait)
            .await?
            .ready()
        {
            banner.click().await?;
            log::debug!("Cookie banner accepted");
        }

        self.fill(USERNAME_INPUT, &credentials.email, wait).await?;
        self.press_continue().await?;
        self.fill(PASSWORD_INPUT, &credentials.password, wait).await?;
        self.press_continue().await?;

        if !self.await_profiles_link(wait).await? {
            return Err(AppError::login("profiles link not visible after login"));
        }
        log::info!("Login succeeded");
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str, wait: &ReadinessPolicy) -> Result<()> {
        let input = await_ready(move || self.first(selector), wait)
            .await?
            .ready()
            .ok_or_else(|| AppError::login(format!("{selector} never appeared")))?;
        input.click().await?.type_str(text).await?;
        Ok(())
    }

    async fn press_continue(&self) -> Result<()> {
        let marked: bool = self
            .eval(
                "return vpMark(Array.from(document.querySelectorAll('button'))
                   .find(b => vpVisible(b) && vpNorm(b.innerText) === 'Continue'));",
            )
            .await?;
        if !marked || !self.click_target().await? {
            return Err(AppError::login("Continue button not found"));
        }
        Ok(())
    }

    async fn await_profiles_link(&self, wait: &ReadinessPolicy) -> Result<bool> {
        let found = await_ready(
            move || async move { Ok(self.first(PROFILES_LINK).await?.map(|_| ())) },
            wait,
        )
        .await?;
        Ok(found.is_ready())
    }

    async fn stored_cookies(&self) -> Result<Vec<StoredCookie>> {
        let cookies = self.page.get_cookies().await?;
        Ok(cookies
            .into_iter()
            .map(|c| StoredCookie {
                expires: (!c.session && c.expires > 0.0).then_some(c.expires),
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
                secure: c.secure,
                http_only: c.http_only,
            })
            .collect())
    }

    async fn restore_cookies(&self, cookies: &[StoredCookie]) -> Result<()> {
        let mut params = Vec::with_capacity(cookies.len());
        for cookie in cookies {
            let mut builder = CookieParam::builder()
                .name(cookie.name.clone())
                .value(cookie.value.clone())
                .domain(cookie.domain.clone())
                .path(cookie.path.clone())
                .secure(cookie.secure)
                .http_only(cookie.http_only);
            if let Some(expires) = cookie.expires {
                builder = builder.expires(TimeSinceEpoch::new(expires));
            }
            params.push(builder.build().map_err(AppError::login)?);
        }
        self.page.set_cookies(params).await?;
        Ok(())
    }

    // --- DOM helpers ---

    async fn eval<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        let result = self.page.evaluate_expression(script(body)).await?;
        let value = result.value().cloned().unwrap_or(serde_json::Value::Null);
        serde_json::from_value(value).map_err(|e| AppError::Browser(CdpError::from(e)))
    }

    async fn first(&self, selector: &str) -> Result<Option<Element>> {
        Ok(self.page.find_elements(selector).await?.into_iter().next())
    }

    async fn click_first(&self, selector: &str) -> Result<bool> {
        match self.first(selector).await? {
            Some(element) => {
                element.click().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn click_target(&self) -> Result<bool> {
        self.click_first(TARGET).await
    }

    async fn screenshot_target(&self) -> Result<Option<Vec<u8>>> {
        match self.first(TARGET).await? {
            Some(element) => {
                element.scroll_into_view().await?;
                Ok(Some(element.screenshot(CaptureScreenshotFormat::Png).await?))
            }
            None => Ok(None),
        }
    }

    /// Resolve a tile to a selector addressing exactly that tile.
    async fn locate_tile(&self, tile: &TileLocator) -> Result<Option<String>> {
        for (query, title) in tile_queries(tile) {
            let headings: Vec<String> = self
                .eval(&format!(
                    "document.querySelectorAll('[{CANDIDATE_ATTR}]').forEach(e => e.removeAttribute('{CANDIDATE_ATTR}'));
                     const found = Array.from(document.querySelectorAll({query})).filter(vpVisible);
                     return found.map((el, i) => {{
                       el.setAttribute('{CANDIDATE_ATTR}', String(i));
                       const h = el.querySelector('{TILE_HEADING}');
                       return vpNorm(h ? h.innerText : '');
                     }});",
                    query = js(&query),
                ))
                .await?;
            let index = match title {
                Some(title) => pick_heading(&headings, title),
                None => (!headings.is_empty()).then_some(0),
            };
            if let Some(index) = index {
                return Ok(Some(format!(r#"[{CANDIDATE_ATTR}="{index}"]"#)));
            }
        }
        Ok(None)
    }

    fn profiles_url(&self) -> Result<Url> {
        self.base_url
            .join(PROFILES_PATH)
            .map_err(|e| AppError::config(format!("profiles url: {e}")))
    }
}

#[async_trait]
impl Portal for ChromePortal {
    async fn open_profiles(&self) -> Result<()> {
        if self.on_profiles().await? {
            return Ok(());
        }
        if !self.click_first(PROFILES_LINK).await? {
            self.page.goto(self.profiles_url()?.as_str()).await?;
        }
        Ok(())
    }

    async fn return_to_list(&self) -> Result<()> {
        let _: bool = self.eval("history.back(); return true;").await?;
        Ok(())
    }

    async fn on_profiles(&self) -> Result<bool> {
        let listed = self
            .page
            .url()
            .await?
            .is_some_and(|url| is_profiles_list(&url));
        Ok(listed && self.page_loaded().await?)
    }

    async fn page_loaded(&self) -> Result<bool> {
        self.eval("return document.readyState === 'complete';").await
    }

    async fn resource_count(&self) -> Result<u64> {
        self.eval("return performance.getEntriesByType('resource').length;")
            .await
    }

    async fn selected_teams(&self) -> Result<Vec<String>> {
        self.eval(
            "return Array.from(document.querySelectorAll('.react-select__control .react-select__multi-value'))
               .map(chip => {
                 const label = chip.querySelector('.react-select__multi-value__label');
                 return vpNorm(label ? label.innerText : chip.innerText);
               })
               .filter(t => t.length > 0);",
        )
        .await
    }

    async fn remove_chip(&self) -> Result<bool> {
        self.click_first(CHIP_REMOVE).await
    }

    async fn clear_indicator(&self) -> Result<bool> {
        self.click_first(CLEAR_INDICATOR).await
    }

    async fn open_team_menu(&self) -> Result<bool> {
        let menu_shown = "return vpVisible(document.querySelector('.react-select__menu'));";
        if self.eval::<bool>(menu_shown).await? {
            return Ok(true);
        }
        let _: bool = self.eval("window.scrollTo(0, 0); return true;").await?;
        if !self.click_first(TEAM_CONTROL).await? {
            return Ok(false);
        }
        self.eval(menu_shown).await
    }

    async fn team_options(&self) -> Result<Vec<String>> {
        self.eval(
            "return Array.from(document.querySelectorAll('.react-select__menu .react-select__option'))
               .map(o => vpNorm(o.innerText))
               .filter(t => t.length > 0);",
        )
        .await
    }

    async fn pick_team_option(&self, label: &str) -> Result<bool> {
        let marked: bool = self
            .eval(&format!(
                "const wanted = {};
                 return vpMark(Array.from(document.querySelectorAll('.react-select__menu .react-select__option'))
                   .find(o => vpNorm(o.innerText) === wanted));",
                js(label)
            ))
            .await?;
        Ok(marked && self.click_target().await?)
    }

    async fn dismiss_menu(&self) -> Result<()> {
        self.page.click(Point { x: 5.0, y: 5.0 }).await?;
        Ok(())
    }

    async fn first_page(&self) -> Result<()> {
        let enabled = |selector: &'static str| async move {
            Ok::<_, AppError>(match self.first(selector).await? {
                Some(button) => button.attribute("disabled").await?.is_none(),
                None => false,
            })
        };
        if enabled(FIRST_PAGE).await? {
            self.click_first(FIRST_PAGE).await?;
            return Ok(());
        }
        for _ in 0..100 {
            if !enabled(PREVIOUS_PAGE).await? {
                break;
            }
            self.click_first(PREVIOUS_PAGE).await?;
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        Ok(())
    }

    async fn athlete_rows(&self) -> Result<Vec<String>> {
        self.eval(
            "return Array.from(document.querySelectorAll('tbody tr'))
               .map(row => row.querySelectorAll('td')[1])
               .filter(cell => cell)
               .map(cell => vpNorm(cell.innerText))
               .filter(t => t.length > 0);",
        )
        .await
    }

    async fn next_page(&self) -> Result<bool> {
        match self.first(NEXT_PAGE).await? {
            Some(button) if button.attribute("disabled").await?.is_none() => {
                button.click().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn open_athlete(&self, name: &str) -> Result<bool> {
        let marked: bool = self
            .eval(&format!(
                "const wanted = {};
                 const row = Array.from(document.querySelectorAll('tbody tr')).find(r => {{
                   const cell = r.querySelectorAll('td')[1];
                   return cell && vpNorm(cell.innerText) === wanted;
                 }});
                 if (!row) return false;
                 return vpMark(row.querySelector('[aria-label=\"table-cell-initials\"]') || row.querySelectorAll('td')[1]);",
                js(name)
            ))
            .await?;
        Ok(marked && self.click_target().await?)
    }

    async fn on_overview(&self) -> Result<bool> {
        Ok(self
            .page
            .url()
            .await?
            .is_some_and(|url| url.contains("/overview")))
    }

    async fn tile_present(&self, tile: &TileLocator) -> Result<bool> {
        Ok(self.locate_tile(tile).await?.is_some())
    }

    async fn open_modal(&self, tile: &TileLocator, attempt: u32) -> Result<bool> {
        let Some(selector) = self.locate_tile(tile).await? else {
            return Ok(false);
        };
        let Some(article) = self.first(&selector).await? else {
            return Ok(false);
        };
        article.scroll_into_view().await?;

        let inner = match tile {
            TileLocator::ForceDecks { .. } => r#"[data-testid="forcedecks-tile"]"#.to_string(),
            TileLocator::TestId { test_id, .. } => {
                format!(r#"[data-testid="{}"]"#, css_string(test_id))
            }
            TileLocator::HumanTrak { .. } => r#"[data-testid="humantrak-tile"]"#.to_string(),
        };
        let top_left = |b: chromiumoxide::layout::BoundingBox| Point {
            x: b.x + 18.0,
            y: b.y + 18.0,
        };

        match (attempt.max(1) - 1) % 6 {
            0 => {
                article.click().await?;
            }
            1 => {
                self.page.click(top_left(article.bounding_box().await?)).await?;
            }
            2 => match self.first(&format!("{selector} {inner}")).await? {
                Some(element) => {
                    element.click().await?;
                }
                None => return Ok(false),
            },
            3 => match self.first(&format!("{selector} {inner}")).await? {
                Some(element) => {
                    self.page.click(top_left(element.bounding_box().await?)).await?;
                }
                None => return Ok(false),
            },
            4 => {
                if !self.click_first(&format!("{selector} {TILE_HEADING}")).await? {
                    return Ok(false);
                }
            }
            _ => {
                article.focus().await?.press_key("Enter").await?;
            }
        }
        Ok(true)
    }

    async fn modal_visible(&self) -> Result<bool> {
        self.eval("return vpModal() !== null;").await
    }

    async fn preload_modal(&self) -> Result<()> {
        let scroll = |fraction: f64| {
            format!(
                "const m = vpModal();
                 if (!m) return false;
                 const box = [m, ...m.querySelectorAll('*')]
                   .find(e => e.scrollHeight > e.clientHeight + 4 && /(auto|scroll)/.test(getComputedStyle(e).overflowY)) || m;
                 box.scrollTo(0, box.scrollHeight * {fraction});
                 return true;"
            )
        };
        for fraction in [0.0, 0.2, 0.4, 0.6, 0.8, 1.0, 0.0] {
            let scrolled: bool = self.eval(&scroll(fraction)).await?;
            if !scrolled {
                break;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        Ok(())
    }

    async fn accordion_count(&self) -> Result<usize> {
        self.eval("return vpSections().length;").await
    }

    async fn section_ready(&self, index: usize) -> Result<bool> {
        self.eval(&format!(
            "const s = vpSections()[{index}];
             if (!s) return false;
             s.scrollIntoView({{ block: 'center' }});
             const body = s.querySelector(\".accordion-body, [data-testid='multiseries-chart'], svg, canvas, .recharts-wrapper\");
             return vpVisible(body);"
        ))
        .await
    }

    async fn capture_section(&self, index: usize) -> Result<Option<Vec<u8>>> {
        let marked: bool = self
            .eval(&format!("return vpMark(vpSections()[{index}]);"))
            .await?;
        if !marked {
            return Ok(None);
        }
        self.screenshot_target().await
    }

    async fn capture_modal(&self) -> Result<Option<Vec<u8>>> {
        let marked: bool = self.eval("return vpMark(vpModal());").await?;
        if !marked {
            return Ok(None);
        }
        self.screenshot_target().await
    }

    async fn close_modal(&self) -> Result<()> {
        let marked: bool = self
            .eval(&format!(
                "const m = vpModal();
                 return vpMark(m && Array.from(m.querySelectorAll({})).find(vpVisible));",
                js(CLOSE_BUTTON)
            ))
            .await?;
        if !(marked && self.click_target().await?) {
            self.page.click(Point { x: 10.0, y: 10.0 }).await?;
        }
        Ok(())
    }

    async fn open_metric_menu(&self, tile: &TileLocator) -> Result<bool> {
        let Some(selector) = self.locate_tile(tile).await? else {
            return Ok(false);
        };
        let menu_shown = format!(
            "return vpVisible(document.querySelector({}));",
            js(&format!(r#"{selector} [data-testid="metric-dropdown-items"]"#))
        );
        if self.eval::<bool>(&menu_shown).await? {
            return Ok(true);
        }
        if !self
            .click_first(&format!("{selector} {METRIC_BUTTON}"))
            .await?
        {
            return Ok(false);
        }
        self.eval(&menu_shown).await
    }

    async fn pick_metric(&self, label: &str) -> Result<bool> {
        let marked: bool = self
            .eval(&format!(
                "const wanted = {};
                 return vpMark(Array.from(document.querySelectorAll('[data-testid=\"metric-dropdown-items\"] [role=\"menuitem\"]'))
                   .find(o => vpVisible(o) && vpNorm(o.innerText) === wanted));",
                js(label)
            ))
            .await?;
        Ok(marked && self.click_target().await?)
    }

    async fn metric_shown(&self, tile: &TileLocator) -> Result<Option<String>> {
        let Some(selector) = self.locate_tile(tile).await? else {
            return Ok(None);
        };
        self.eval(&format!(
            "const span = document.querySelector({});
             return span ? vpNorm(span.innerText) : null;",
            js(&format!("{selector} {METRIC_BUTTON} span.truncate"))
        ))
        .await
    }

    async fn capture_tile(&self, tile: &TileLocator) -> Result<Option<Vec<u8>>> {
        let Some(selector) = self.locate_tile(tile).await? else {
            return Ok(None);
        };
        let marked: bool = self
            .eval(&format!(
                "return vpMark(document.querySelector({}));",
                js(&selector)
            ))
            .await?;
        if !marked {
            return Ok(None);
        }
        self.screenshot_target().await
    }

    async fn move_pointer_away(&self) -> Result<()> {
        self.page.move_mouse(Point { x: 5.0, y: 5.0 }).await?;
        Ok(())
    }
}
