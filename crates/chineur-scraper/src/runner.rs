//! Sequential collection runs across queries and pages.
//!
//! One runner owns the pacing and cancellation state for a run. Pages are
//! fetched strictly one at a time; a page that cannot be fetched or parsed
//! costs only itself, never the run.

use chineur_core::{detect, valuate, Listing, PatternSet, ValuationParams};

use crate::client::{pick_user_agent, SearchClient};
use crate::error::ScrapeError;
use crate::parse::parse_listings;
use crate::render::{render_page, BrowserLauncher, RenderError, RenderPacing};
use crate::request::SearchRequest;
use crate::throttle::{CancelToken, RequestPacer};
use crate::types::{FetchStrategy, RetrievedContent};

/// What to collect: one run covers every query in `queries` over pages
/// `1..=pages`, all through the same retrieval strategy.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    pub queries: Vec<String>,
    pub location: Option<String>,
    pub pages: u32,
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    pub strategy: FetchStrategy,
}

/// Outcome of a run. Batches hold per-page listings in request order;
/// counters describe what happened to the pages themselves.
#[derive(Debug, Default)]
pub struct RunReport {
    pub batches: Vec<Vec<Listing>>,
    pub pages_attempted: u32,
    pub pages_failed: u32,
    pub invalid_requests: u32,
    pub cancelled: bool,
}

/// Compiled attribute rules plus the pricing knobs, bundled so the runner
/// can valuate listings as they come in.
pub struct ValuationContext {
    patterns: PatternSet,
    values: std::collections::BTreeMap<String, f64>,
    params: ValuationParams,
}

impl ValuationContext {
    #[must_use]
    pub fn new(patterns: PatternSet, params: ValuationParams) -> Self {
        let values = patterns.value_table();
        Self {
            patterns,
            values,
            params,
        }
    }
}

/// Drives one collection run. Borrow a client (and optionally a browser
/// launcher), then call [`run`](Self::run).
pub struct SearchRunner<'a> {
    client: &'a SearchClient,
    browser: Option<&'a dyn BrowserLauncher>,
    pacer: RequestPacer,
    cancel: CancelToken,
    render_pacing: RenderPacing,
}

impl<'a> SearchRunner<'a> {
    #[must_use]
    pub fn new(client: &'a SearchClient, pacer: RequestPacer) -> Self {
        Self {
            client,
            browser: None,
            pacer,
            cancel: CancelToken::new(),
            render_pacing: RenderPacing::default(),
        }
    }

    /// Required for [`FetchStrategy::Rendered`] plans.
    #[must_use]
    pub fn with_browser(mut self, launcher: &'a dyn BrowserLauncher) -> Self {
        self.browser = Some(launcher);
        self
    }

    /// Installs a caller-held token; cancelling it stops the run before
    /// the next request.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn with_render_pacing(mut self, pacing: RenderPacing) -> Self {
        self.render_pacing = pacing;
        self
    }

    /// Runs the plan to completion (or cancellation) and reports what was
    /// collected. Per-page failures are logged and counted, not returned.
    pub async fn run(
        &mut self,
        plan: &SearchPlan,
        valuation: Option<&ValuationContext>,
    ) -> RunReport {
        let mut report = RunReport::default();

        'queries: for query in &plan.queries {
            for page in 1..=plan.pages.max(1) {
                if self.cancel.is_cancelled() {
                    tracing::info!("cancellation requested, stopping before next request");
                    report.cancelled = true;
                    break 'queries;
                }

                let request = match SearchRequest::build(
                    query,
                    plan.location.as_deref(),
                    plan.price_min,
                    plan.price_max,
                    page,
                ) {
                    Ok(request) => request,
                    Err(error) => {
                        // Every page of this query shares the defect.
                        tracing::warn!(query = %query, error = %error, "skipping unbuildable search");
                        report.invalid_requests += 1;
                        break;
                    }
                };

                self.pacer.pace().await;
                report.pages_attempted += 1;

                let content = match self.retrieve(&request, plan.strategy).await {
                    Ok(content) => content,
                    Err(error) => {
                        tracing::warn!(query = %query, page, error = %error, "page fetch failed");
                        report.pages_failed += 1;
                        continue;
                    }
                };

                let mut listings = parse_listings(&content);
                if let Some(context) = valuation {
                    for listing in &mut listings {
                        listing.detected_attributes =
                            detect(&listing.detection_text(), &context.patterns);
                        *listing = valuate(listing, &context.values, context.params);
                    }
                }

                tracing::info!(query = %query, page, count = listings.len(), "collected page");
                report.batches.push(listings);
            }
        }

        report
    }

    async fn retrieve(
        &self,
        request: &SearchRequest,
        strategy: FetchStrategy,
    ) -> Result<RetrievedContent, ScrapeError> {
        match strategy {
            FetchStrategy::Lightweight => self.client.fetch_page(request).await,
            FetchStrategy::Rendered => {
                let Some(launcher) = self.browser else {
                    return Err(ScrapeError::Render(RenderError::Session(
                        "no browser launcher configured".to_string(),
                    )));
                };
                let url = request.search_url(self.client.origin());
                let body = render_page(launcher, &url, pick_user_agent(), &self.render_pacing)
                    .await?;
                Ok(RetrievedContent { body, url })
            }
        }
    }
}
