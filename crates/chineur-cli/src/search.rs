//! The `search` command: a full collection run from queries to printed
//! results.
//!
//! Page-level failures are counted and logged by the runner, never
//! propagated; the command itself fails only when its inputs cannot be
//! prepared (bad configuration, unreadable attribute rules).

use std::time::Duration;

use chineur_core::{load_app_config, load_patterns, PatternSet, ValuationParams};
use chineur_scraper::{
    aggregate, geocode_city, AggregateFilters, CancelToken, FetchStrategy, RequestPacer,
    SearchClient, SearchPlan, SearchRunner, SortOrder, ValuationContext, WebDriverLauncher,
    NOMINATIM_ENDPOINT,
};

use crate::{export, output, Mode, SearchArgs};

pub(crate) async fn run_search(args: SearchArgs) -> anyhow::Result<()> {
    let config = load_app_config()?;

    let valuation = if args.valuate {
        Some(build_valuation(&args, &config)?)
    } else {
        None
    };

    // Resolve the reference point up front; a miss disables the radius
    // filter but never the run.
    let mut reference = None;
    if args.radius_km.is_some() {
        if let Some(city) = &args.location {
            match geocode_city(NOMINATIM_ENDPOINT, city).await {
                Ok(point) => reference = Some(point),
                Err(error) => {
                    println!("warning: could not locate '{city}' ({error}); radius filter disabled");
                }
            }
        } else {
            println!("warning: --radius-km needs --location; radius filter disabled");
        }
    }

    let throttle = Duration::from_millis(args.throttle_ms.unwrap_or(config.throttle_ms));
    let client = SearchClient::new(config.request_timeout_secs)?;

    let token = CancelToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current request");
            interrupt.cancel();
        }
    });

    let launcher;
    let mut runner =
        SearchRunner::new(&client, RequestPacer::new(throttle)).with_cancel_token(token);
    if matches!(args.mode, Mode::Browser) {
        launcher = WebDriverLauncher::new(config.webdriver_url.clone());
        runner = runner.with_browser(&launcher);
    }

    let plan = SearchPlan {
        queries: args.queries.clone(),
        location: args.location.clone(),
        pages: args.pages,
        price_min: args.min_price,
        price_max: args.max_price,
        strategy: match args.mode {
            Mode::Simple => FetchStrategy::Lightweight,
            Mode::Browser => FetchStrategy::Rendered,
        },
    };

    let report = runner.run(&plan, valuation.as_ref()).await;
    let pages_attempted = report.pages_attempted;
    let pages_failed = report.pages_failed;
    let cancelled = report.cancelled;

    let filters = AggregateFilters {
        price_min: args.min_price.map(f64::from),
        price_max: args.max_price.map(f64::from),
        reference,
        radius_km: args.radius_km,
        order: if args.valuate {
            SortOrder::MarginDescending
        } else {
            SortOrder::PriceAscending
        },
    };
    let listings = aggregate(report.batches, &filters);

    output::print_table(&listings, args.valuate);
    println!(
        "{} listings kept from {} pages ({} failed){}",
        listings.len(),
        pages_attempted,
        pages_failed,
        if cancelled { ", run interrupted" } else { "" }
    );

    if let Some(path) = &args.csv {
        export::write_csv(path, &listings)?;
        println!("wrote {} listings to {}", listings.len(), path.display());
    }

    Ok(())
}

/// Compile the attribute rules before any traffic so a broken file fails
/// the command immediately.
fn build_valuation(
    args: &SearchArgs,
    config: &chineur_core::AppConfig,
) -> anyhow::Result<ValuationContext> {
    let path = args
        .patterns
        .clone()
        .unwrap_or_else(|| config.patterns_path.clone());
    let file = load_patterns(&path)?;
    let (patterns, failures) = PatternSet::compile(&file.patterns);
    for failure in &failures {
        println!("warning: attribute rule skipped: {failure}");
    }
    if patterns.is_empty() {
        anyhow::bail!("no usable attribute rules in {}", path.display());
    }
    Ok(ValuationContext::new(
        patterns,
        ValuationParams {
            negotiation_pct: args.negotiation_pct,
            dismantle_bonus_pct: args.dismantle_bonus_pct,
        },
    ))
}
