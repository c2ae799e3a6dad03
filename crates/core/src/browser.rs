//! Browser session management and the live DOM probe.
//!
//! Each extraction request owns one [`BrowserSession`]: a freshly spawned
//! chromedriver child plus a fantoccini WebDriver client connected to it.
//! Spawning a new browser per request gives cookie/local-storage isolation
//! by construction. Release terminates both the WebDriver session and the
//! driver process; `kill_on_drop` on the child backstops paths that never
//! reach an explicit release.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::actions::{ActionSequence, InputSource, KeyAction, KeyActions};
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Value as Json, json};
use tokio::process::{Child, Command};
use tokio::time::{Instant, sleep};
use webdriver::capabilities::Capabilities;

use crate::dom::{DomAccess, NodeFacts, NodeId};
use crate::{LlmstxtError, Result};

/// Browser/driver configuration for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Chromedriver executable; resolved through `PATH` by default.
    pub chromedriver: String,
    /// Fixed driver port; a free local port is picked when absent.
    pub port: Option<u16>,
    pub headless: bool,
    /// Budget for reaching the entry URL. Exhaustion is fatal to the request.
    pub page_load_timeout: Duration,
    /// Fixed pause after navigation so client-side rendering can finish.
    pub settle_delay: Duration,
    /// Budget for the driver process to start accepting connections.
    pub connect_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chromedriver: "chromedriver".to_string(),
            port: None,
            headless: true,
            page_load_timeout: Duration::from_secs(90),
            settle_delay: Duration::from_secs(3),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Script hiding the automation flag the rendering engine exposes, so
/// bot-detection heuristics on the target site do not alter rendering.
const WEBDRIVER_EVASION: &str = r#"
    Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
    if (!window.chrome) window.chrome = { runtime: {} };
    return true;
"#;

fn chrome_args(headless: bool) -> Vec<String> {
    let mut args: Vec<String> = [
        "--disable-blink-features=AutomationControlled",
        "--no-sandbox",
        "--disable-setuid-sandbox",
        "--disable-dev-shm-usage",
        "--disable-accelerated-2d-canvas",
        "--no-first-run",
        "--disable-infobars",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }

    args
}

fn build_capabilities(config: &SessionConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    let mut chrome_opts = HashMap::new();
    chrome_opts.insert("args".to_string(), json!(chrome_args(config.headless)));
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps
}

fn free_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

/// One isolated browser session: a chromedriver child and the WebDriver
/// client talking to it.
pub struct BrowserSession {
    client: Client,
    driver: Child,
    config: SessionConfig,
}

impl BrowserSession {
    /// Spawn chromedriver and connect. Launch failure is fatal and not
    /// retried.
    pub async fn acquire(config: &SessionConfig) -> Result<Self> {
        let port = match config.port {
            Some(port) => port,
            None => free_port()?,
        };

        let driver = Command::new(&config.chromedriver)
            .arg(format!("--port={}", port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LlmstxtError::BrowserLaunch(format!("failed to spawn {}: {}", config.chromedriver, e)))?;

        let caps = build_capabilities(config);
        let endpoint = format!("http://127.0.0.1:{}", port);
        let deadline = Instant::now() + config.connect_timeout;

        let client = loop {
            match ClientBuilder::native().capabilities(caps.clone()).connect(&endpoint).await {
                Ok(client) => break client,
                Err(e) => {
                    if Instant::now() >= deadline {
                        return Err(LlmstxtError::BrowserLaunch(format!(
                            "could not establish a WebDriver session on port {}: {}",
                            port, e
                        )));
                    }
                    sleep(Duration::from_millis(100)).await;
                }
            }
        };

        tracing::debug!(port, "browser session established");
        Ok(Self { client, driver, config: config.clone() })
    }

    /// Navigate to `url`, apply the automation evasion, and wait out the
    /// settle delay.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        match tokio::time::timeout(self.config.page_load_timeout, self.client.goto(url)).await {
            Err(_) => Err(LlmstxtError::Navigation {
                url: url.to_string(),
                reason: format!("page load exceeded {}s", self.config.page_load_timeout.as_secs()),
            }),
            Ok(Err(e)) => Err(LlmstxtError::Navigation { url: url.to_string(), reason: e.to_string() }),
            Ok(Ok(())) => {
                self.client.execute(WEBDRIVER_EVASION, vec![]).await?;
                sleep(self.config.settle_delay).await;
                Ok(())
            }
        }
    }

    /// Evaluate a script in the page and return its JSON result.
    pub async fn execute(&self, script: &str, args: Vec<Json>) -> Result<Json> {
        self.client.execute(script, args).await.map_err(LlmstxtError::from)
    }

    /// Keyboard focus-and-activate sequence (Tab, then Enter) used to
    /// trigger menus that only render on interaction.
    pub async fn keyboard_nudge(&self) -> Result<()> {
        let keys = KeyActions::new("keyboard".to_string())
            .then(KeyAction::Down { value: Key::Tab.into() })
            .then(KeyAction::Up { value: Key::Tab.into() })
            .then(KeyAction::Down { value: Key::Enter.into() })
            .then(KeyAction::Up { value: Key::Enter.into() });
        let sequence: ActionSequence = keys.into();

        self.client.perform_actions(vec![sequence]).await?;
        Ok(())
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Close the WebDriver session and terminate the driver process.
    pub async fn release(self) -> Result<()> {
        let Self { client, mut driver, .. } = self;

        let closed = client.close().await;
        let _ = driver.start_kill();
        let _ = driver.wait().await;

        tracing::debug!("browser session released");
        closed.map_err(LlmstxtError::from)
    }
}

/// [`DomAccess`] over the live page, backed by an in-page element registry.
///
/// Every method is one `execute` round trip; handles are indices into
/// `window.__navProbe.nodes`. Selector errors are swallowed in-page so a
/// malformed caller selector matches nothing instead of failing the run.
pub struct LiveDom<'a> {
    session: &'a BrowserSession,
}

const PROBE_RESET: &str = "window.__navProbe = { nodes: [] }; return true;";

const HOSTNAME: &str = "return window.location.hostname;";

const MATCHES: &str = r#"
    const [selector] = arguments;
    try { return !!document.querySelector(selector); } catch (_) { return false; }
"#;

const QUERY_ROOTS: &str = r#"
    const [selectors] = arguments;
    const probe = window.__navProbe;
    const valid = [];
    for (const sel of selectors) {
        try { document.querySelector(sel); valid.push(sel); } catch (_) {}
    }
    if (!valid.length) return [];
    const found = Array.from(document.querySelectorAll(valid.join(',')));
    return found.map(el => probe.nodes.push(el) - 1);
"#;

const QUERY_CLICKABLES: &str = r#"
    const [id, selector] = arguments;
    const probe = window.__navProbe;
    const root = probe.nodes[id];
    if (!root) return [];
    const rootNode = root.getRootNode();
    const scope = rootNode !== document ? rootNode : root;
    let found;
    try { found = Array.from(scope.querySelectorAll(selector)); } catch (_) { return []; }
    return found.filter(el => el !== root).map(el => probe.nodes.push(el) - 1);
"#;

const DESCRIBE: &str = r#"
    const [id] = arguments;
    const el = window.__navProbe.nodes[id];
    if (!el) return null;
    return {
        tag: el.tagName.toLowerCase(),
        href: el.tagName === 'A' ? el.href : null,
        aria_label: el.getAttribute('aria-label'),
        text: (el.textContent || '').trim(),
        data_testid: el.getAttribute('data-testid'),
        data_test: el.getAttribute('data-test'),
        title_attr: el.getAttribute('title'),
    };
"#;

const NESTED_CONTAINER: &str = r#"
    const [id, fallbacks] = arguments;
    const probe = window.__navProbe;
    const el = probe.nodes[id];
    if (!el) return null;
    const item = el.closest('li');
    if (!item) return null;
    let menu = item.querySelector(':scope > ul');
    if (!menu) {
        for (const sel of fallbacks) {
            try { menu = item.querySelector(sel); } catch (_) { menu = null; }
            if (menu) break;
        }
    }
    return menu ? probe.nodes.push(menu) - 1 : null;
"#;

impl<'a> LiveDom<'a> {
    /// Install a fresh element registry in the page. Called once per
    /// extraction attempt; stale handles from earlier attempts are gone
    /// afterwards.
    pub async fn prepare(session: &'a BrowserSession) -> Result<LiveDom<'a>> {
        session.execute(PROBE_RESET, vec![]).await?;
        Ok(Self { session })
    }
}

#[async_trait(?Send)]
impl DomAccess for LiveDom<'_> {
    async fn hostname(&self) -> Result<String> {
        let value = self.session.execute(HOSTNAME, vec![]).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn matches(&self, selector: &str) -> Result<bool> {
        let value = self.session.execute(MATCHES, vec![json!(selector)]).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn query_roots(&self, selectors: &[String]) -> Result<Vec<NodeId>> {
        let value = self.session.execute(QUERY_ROOTS, vec![json!(selectors)]).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn query_clickables(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let value = self
            .session
            .execute(QUERY_CLICKABLES, vec![json!(root), json!(selector)])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn describe(&self, node: NodeId) -> Result<NodeFacts> {
        let value = self.session.execute(DESCRIBE, vec![json!(node)]).await?;
        let facts: Option<NodeFacts> = serde_json::from_value(value)?;
        Ok(facts.unwrap_or_default())
    }

    async fn nested_container(&self, node: NodeId, fallbacks: &[String]) -> Result<Option<NodeId>> {
        let value = self
            .session
            .execute(NESTED_CONTAINER, vec![json!(node), json!(fallbacks)])
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_args_headless() {
        let args = chrome_args(true);
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert!(args.iter().any(|a| a == "--disable-blink-features=AutomationControlled"));
    }

    #[test]
    fn test_chrome_args_headed() {
        let args = chrome_args(false);
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
    }

    #[test]
    fn test_capabilities_carry_chrome_options() {
        let caps = build_capabilities(&SessionConfig::default());
        let opts = caps.get("goog:chromeOptions").unwrap();
        assert!(opts.get("args").unwrap().as_array().unwrap().len() > 3);
    }

    #[test]
    fn test_free_port_is_nonzero() {
        assert!(free_port().unwrap() > 0);
    }

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::default();
        assert!(config.headless);
        assert_eq!(config.page_load_timeout, Duration::from_secs(90));
        assert_eq!(config.settle_delay, Duration::from_secs(3));
    }
}
