//! WebDriver-backed implementation of the rendering capability.

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;

use super::{BrowserLauncher, BrowserSession, RenderError};

const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const MARKER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Opens one headless Chrome session per request against a WebDriver
/// endpoint (chromedriver or a Selenium grid).
pub struct WebDriverLauncher {
    endpoint: String,
}

impl WebDriverLauncher {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserSession>, RenderError> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--headless")?;
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_arg("--window-size=1280,1800")?;
        caps.add_arg(&format!("--user-agent={user_agent}"))?;

        let driver = WebDriver::new(&self.endpoint, caps).await?;
        driver.set_page_load_timeout(PAGE_LOAD_TIMEOUT).await?;

        Ok(Box::new(WebDriverSession {
            driver: Some(driver),
        }))
    }
}

struct WebDriverSession {
    // Taken on dispose; `WebDriver::quit` consumes the handle.
    driver: Option<WebDriver>,
}

impl WebDriverSession {
    fn driver(&self) -> Result<&WebDriver, RenderError> {
        self.driver
            .as_ref()
            .ok_or_else(|| RenderError::Session("session already disposed".to_string()))
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.driver()?.goto(url).await?;
        Ok(())
    }

    async fn scroll_by(&mut self, pixels: i64) -> Result<(), RenderError> {
        self.driver()?
            .execute(&format!("window.scrollBy(0, {pixels});"), Vec::new())
            .await?;
        Ok(())
    }

    async fn await_marker(&mut self, css: &str, timeout: Duration) -> Result<bool, RenderError> {
        let found = self
            .driver()?
            .query(By::Css(css))
            .wait(timeout, MARKER_POLL_INTERVAL)
            .exists()
            .await?;
        Ok(found)
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        Ok(self.driver()?.source().await?)
    }

    async fn dispose(&mut self) -> Result<(), RenderError> {
        if let Some(driver) = self.driver.take() {
            driver.quit().await?;
        }
        Ok(())
    }
}
