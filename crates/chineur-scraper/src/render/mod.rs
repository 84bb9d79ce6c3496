//! Rendered retrieval through a disposable browser session.
//!
//! The pipeline consumes browser automation as the narrow capability set
//! below (navigate, scroll, wait for a marker, extract content, dispose),
//! not as a concrete engine. [`render_page`] drives one session per
//! request and tears it down on success and failure alike; sessions are
//! never reused across requests.

mod webdriver;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use webdriver::WebDriverLauncher;

/// CSS marker for a loaded listing card. Its absence after the bounded
/// wait is tolerated; the page may still carry embedded data.
pub const CARD_MARKER: &str = "a[data-qa-id='aditem_container']";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("webdriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("rendering session error: {0}")]
    Session(String),
}

/// One isolated browsing session. Implementations must make [`dispose`]
/// release everything the session holds and tolerate being called once
/// after any earlier call failed.
///
/// [`dispose`]: BrowserSession::dispose
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError>;

    /// Scroll the viewport down by `pixels`.
    async fn scroll_by(&mut self, pixels: i64) -> Result<(), RenderError>;

    /// Wait up to `timeout` for an element matching `css` to appear.
    /// Returns `Ok(false)` when the wait expires without a match.
    async fn await_marker(&mut self, css: &str, timeout: Duration) -> Result<bool, RenderError>;

    /// Current page markup.
    async fn content(&mut self) -> Result<String, RenderError>;

    /// Tear the session down.
    async fn dispose(&mut self) -> Result<(), RenderError>;
}

/// Opens fresh sessions. One launcher serves the whole run; each request
/// gets its own session.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserSession>, RenderError>;
}

/// Scroll and wait policy for one rendered retrieval. Every wait in the
/// session is bounded by these values.
#[derive(Debug, Clone)]
pub struct RenderPacing {
    pub scroll_steps: u32,
    pub scroll_step_px: i64,
    pub scroll_pause: Duration,
    pub marker_timeout: Duration,
}

impl Default for RenderPacing {
    fn default() -> Self {
        Self {
            scroll_steps: 8,
            scroll_step_px: 1500,
            scroll_pause: Duration::from_millis(450),
            marker_timeout: Duration::from_secs(5),
        }
    }
}

/// Render `url` in a fresh session and return the resulting markup.
///
/// Navigates, performs the incremental scroll sequence to trigger lazy
/// loading, waits briefly for [`CARD_MARKER`] (its absence is not an
/// error), and extracts the page content. The session is disposed before
/// returning, whatever happened.
///
/// # Errors
///
/// Returns [`RenderError`] if the session cannot be opened or fails while
/// navigating, scrolling, or extracting content.
pub async fn render_page(
    launcher: &dyn BrowserLauncher,
    url: &str,
    user_agent: &str,
    pacing: &RenderPacing,
) -> Result<String, RenderError> {
    let mut session = launcher.launch(user_agent).await?;
    let outcome = drive_session(session.as_mut(), url, pacing).await;

    if let Err(e) = session.dispose().await {
        tracing::debug!(error = %e, "rendering session teardown failed");
    }

    outcome
}

async fn drive_session(
    session: &mut dyn BrowserSession,
    url: &str,
    pacing: &RenderPacing,
) -> Result<String, RenderError> {
    session.navigate(url).await?;

    for _ in 0..pacing.scroll_steps {
        session.scroll_by(pacing.scroll_step_px).await?;
        tokio::time::sleep(pacing.scroll_pause).await;
    }

    match session.await_marker(CARD_MARKER, pacing.marker_timeout).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(marker = CARD_MARKER, "listing-card marker never appeared");
        }
        Err(e) => {
            tracing::debug!(error = %e, "marker wait failed; keeping whatever rendered");
        }
    }

    session.content().await
}
