use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{DownchartsError, Result};
use crate::config::BrowserSettings;
use crate::page::{class_selector, id_selector, normalize_text, Page};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A chart page loaded in Chrome via chromiumoxide.
pub struct ChromeSession {
    browser: Browser,
    page: chromiumoxide::Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launch a browser and load `url` in a fresh page.
    pub async fn launch(settings: &BrowserSettings, url: &str) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if !settings.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| DownchartsError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (mut browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            DownchartsError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        match Self::open(&browser, settings, url).await {
            Ok(page) => {
                info!("Loaded {}", url);
                Ok(Self {
                    browser,
                    page,
                    handler,
                })
            }
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!("Failed to close browser after load error: {}", close_err);
                }
                handler.abort();
                Err(e)
            }
        }
    }

    async fn open(
        browser: &Browser,
        settings: &BrowserSettings,
        url: &str,
    ) -> Result<chromiumoxide::Page> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DownchartsError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = settings.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| DownchartsError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        page.goto(url)
            .await
            .map_err(|e| DownchartsError::Browser(format!("Navigation failed: {}", e)))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| DownchartsError::Browser(format!("Navigation failed: {}", e)))?;

        Ok(page)
    }

    async fn first(scope: &Element, selector: &str) -> Result<Option<Element>> {
        Ok(Self::all(scope, selector).await?.into_iter().next())
    }

    async fn all(scope: &Element, selector: &str) -> Result<Vec<Element>> {
        scope
            .find_elements(selector)
            .await
            .map_err(|e| DownchartsError::Browser(format!("Query '{}' failed: {}", selector, e)))
    }
}

#[async_trait(?Send)]
impl Page for ChromeSession {
    type Element = Element;

    const DRIVER: &'static str = "Chrome";

    async fn wait_for_class(&self, class: &str, timeout: Duration) -> Result<()> {
        let selector = class_selector(class);

        let poll = async {
            loop {
                let found = self.page.find_elements(selector.as_str()).await.map_err(|e| {
                    DownchartsError::Browser(format!("Query '{}' failed: {}", selector, e))
                })?;
                if !found.is_empty() {
                    return Ok::<(), DownchartsError>(());
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| DownchartsError::Timeout {
                selector: class.to_string(),
                secs: timeout.as_secs(),
            })?
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Element>> {
        let selector = id_selector(id);
        let found = self.page.find_elements(selector.as_str()).await.map_err(|e| {
            DownchartsError::Browser(format!("Query '{}' failed: {}", selector, e))
        })?;
        Ok(found.into_iter().next())
    }

    async fn find_by_id_within(&self, scope: &Element, id: &str) -> Result<Option<Element>> {
        Self::first(scope, &id_selector(id)).await
    }

    async fn query_all(&self, scope: &Element, query: &str) -> Result<Vec<Element>> {
        Self::all(scope, query).await
    }

    async fn find_by_class(&self, scope: &Element, class: &str) -> Result<Option<Element>> {
        Self::first(scope, &class_selector(class)).await
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        element
            .attribute(name)
            .await
            .map_err(|e| DownchartsError::Browser(format!("Reading attribute '{}' failed: {}", name, e)))
    }

    async fn select_text(&self, scope: &Element, selector: &str) -> Result<Option<String>> {
        let Some(element) = Self::first(scope, selector).await? else {
            return Ok(None);
        };

        let text = element
            .inner_text()
            .await
            .map_err(|e| DownchartsError::Browser(format!("Reading text failed: {}", e)))?;

        Ok(text.map(|t| normalize_text(&t)))
    }

    async fn teardown(mut self) -> Result<()> {
        debug!("Closing browser session");

        if let Err(e) = self.page.close().await {
            warn!("Failed to close page: {}", e);
        }

        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| DownchartsError::Browser(format!("Failed to close browser: {}", e)));

        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();

        closed.map(|_| ())
    }
}
