//! Headless Chromium engine over CDP
//!
//! `headless_chrome` is synchronous, so every tab call runs on the blocking
//! thread pool.

use crate::browser::{with_timeout, Browser, BrowserError, LaunchOptions, Page};
use async_trait::async_trait;
use headless_chrome::{Browser as ChromeBrowser, LaunchOptions as ChromeLaunchOptions, Tab};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Reads the current document's body inside the page context
///
/// Re-requesting `location.href` from the page reuses its cookies and
/// browser fingerprint, which image CDNs with bot mitigation require. The
/// bytes come back as a JSON array string since only primitives are
/// returned by value.
const READ_BODY_SCRIPT: &str = r#"
(async () => {
    const response = await fetch(location.href);
    if (!response.ok) {
        throw new Error("HTTP " + response.status);
    }
    const buffer = await response.arrayBuffer();
    return JSON.stringify(Array.from(new Uint8Array(buffer)));
})()
"#;

/// Tab timeout used when navigation timeouts are disabled
const UNBOUNDED: Duration = Duration::from_secs(24 * 60 * 60);

/// How long the CDP connection may sit idle between navigations
const IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

fn cdp(e: impl std::fmt::Display) -> BrowserError {
    BrowserError::Cdp(e.to_string())
}

/// Runs a blocking tab call off the async runtime
async fn blocking<T, F>(f: F) -> Result<T, BrowserError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, BrowserError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(cdp)?
}

pub struct ChromiumBrowser {
    browser: Mutex<Option<ChromeBrowser>>,
    user_agent: String,
    timeout: Option<Duration>,
}

impl ChromiumBrowser {
    /// Launches Chromium
    pub async fn launch(options: &LaunchOptions) -> Result<Self, BrowserError> {
        let launch = ChromeLaunchOptions::default_builder()
            .headless(options.headless)
            .sandbox(false)
            .path(options.executable.clone())
            .idle_browser_timeout(IDLE_TIMEOUT.max(options.timeout.unwrap_or(UNBOUNDED)))
            .build()
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let browser = blocking(move || ChromeBrowser::new(launch).map_err(|e| BrowserError::Launch(e.to_string())))
            .await?;

        tracing::info!("Chromium started (headless: {})", options.headless);

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            user_agent: options.user_agent.clone(),
            timeout: options.timeout,
        })
    }

    fn handle(&self) -> Result<ChromeBrowser, BrowserError> {
        self.browser
            .lock()
            .map_err(|_| BrowserError::Launch("browser lock poisoned".to_string()))?
            .clone()
            .ok_or_else(|| BrowserError::Launch("browser already closed".to_string()))
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError> {
        let browser = self.handle()?;
        let user_agent = self.user_agent.clone();
        let tab_timeout = self.timeout.unwrap_or(UNBOUNDED);

        let tab = blocking(move || {
            let tab = browser.new_tab().map_err(cdp)?;
            tab.set_default_timeout(tab_timeout);
            tab.set_user_agent(&user_agent, None, None).map_err(cdp)?;
            Ok(tab)
        })
        .await?;

        Ok(Box::new(ChromiumPage {
            tab,
            timeout: self.timeout,
        }))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let browser = self
            .browser
            .lock()
            .map_err(|_| BrowserError::Launch("browser lock poisoned".to_string()))?
            .take();

        // Dropping the last handle shuts the Chromium process down
        if let Some(browser) = browser {
            blocking(move || {
                drop(browser);
                Ok(())
            })
            .await?;
            tracing::debug!("Chromium closed");
        }
        Ok(())
    }
}

pub struct ChromiumPage {
    tab: Arc<Tab>,
    timeout: Option<Duration>,
}

impl ChromiumPage {
    async fn navigate(&self, url: &Url) -> Result<(), BrowserError> {
        let tab = self.tab.clone();
        let target = url.to_string();

        let navigation = blocking(move || {
            tab.navigate_to(&target)
                .map_err(|e| BrowserError::Navigation {
                    url: target.clone(),
                    message: e.to_string(),
                })?
                .wait_until_navigated()
                .map_err(|e| BrowserError::Navigation {
                    url: target.clone(),
                    message: e.to_string(),
                })?;
            Ok(())
        });
        with_timeout(self.timeout, url, navigation).await
    }
}

#[async_trait]
impl Page for ChromiumPage {
    async fn goto(&self, url: &Url) -> Result<(), BrowserError> {
        self.navigate(url).await
    }

    async fn content(&self) -> Result<String, BrowserError> {
        let tab = self.tab.clone();
        blocking(move || tab.get_content().map_err(cdp)).await
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, BrowserError> {
        self.navigate(url).await?;

        let tab = self.tab.clone();
        let result = blocking(move || {
            tab.evaluate(READ_BODY_SCRIPT, true)
                .map_err(|e| BrowserError::Evaluation(e.to_string()))
        })
        .await?;

        let json = result
            .value
            .and_then(|value| value.as_str().map(str::to_string))
            .ok_or_else(|| BrowserError::Evaluation("script returned no body".to_string()))?;

        serde_json::from_str(&json).map_err(|e| BrowserError::Evaluation(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        let tab = self.tab;
        blocking(move || tab.close(false).map(|_| ()).map_err(cdp)).await
    }
}
