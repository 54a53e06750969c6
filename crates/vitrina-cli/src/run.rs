//! The scrape command: enumerate, fetch, normalize, persist, report.
//!
//! The browser session is opened once and closed before any phase error is
//! returned. Per-item faults are counted in the [`RunSummary`] and never
//! abort the run.

use std::path::{Path, PathBuf};

use anyhow::Context;
use vitrina_core::{AppConfig, PageFamily, RawRecord};
use vitrina_report::{render_campaign_report, render_car_report};
use vitrina_scraper::enumerate::listings;
use vitrina_scraper::{
    enumerate_paged, enumerate_scroll, fetch_details, normalize_records, BrowserPages,
    BrowserSession, HttpFetcher, NormalizedTable, WebDriverSession,
};
use vitrina_store::{write_table, DataPaths};

use crate::summary::RunSummary;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RunOptions {
    pub cars: bool,
    pub campaigns: bool,
}

/// Raw records per family; `None` when that phase was skipped.
#[derive(Debug, Default)]
struct Collected {
    new: Option<Vec<RawRecord>>,
    used: Option<Vec<RawRecord>>,
    campaigns: Option<Vec<RawRecord>>,
}

pub(crate) async fn run_scrape(
    config: &AppConfig,
    options: RunOptions,
    paths: &DataPaths,
    charts_dir: &Path,
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();
    if !options.cars && !options.campaigns {
        tracing::warn!("both car and campaign phases skipped, nothing to do");
        return Ok(summary);
    }

    let session = WebDriverSession::connect(&config.webdriver_url, config.headless)
        .await
        .context("failed to start browser session")?;
    let collected = scrape_and_release(session, config, options, &mut summary).await?;

    persist(&collected, paths, charts_dir, &mut summary)?;
    summary.log();
    Ok(summary)
}

/// Run the enabled phases on `session`, then quit it before returning
/// either outcome.
async fn scrape_and_release<B: BrowserSession>(
    mut session: B,
    config: &AppConfig,
    options: RunOptions,
    summary: &mut RunSummary,
) -> anyhow::Result<Collected> {
    let outcome = scrape(&mut session, config, options, summary).await;
    if let Err(e) = session.quit().await {
        tracing::error!(error = %e, "failed to close browser session");
    }
    outcome
}

async fn scrape<B: BrowserSession>(
    session: &mut B,
    config: &AppConfig,
    options: RunOptions,
    summary: &mut RunSummary,
) -> anyhow::Result<Collected> {
    let mut collected = Collected::default();

    if options.cars {
        let mut fetcher = HttpFetcher::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
        .context("failed to build HTTP client")?;

        let cars = [
            (listings::new_cars(), &mut collected.new),
            (listings::used_cars(config.min_year), &mut collected.used),
        ];
        for (listing, slot) in cars {
            let enumeration = enumerate_paged(session, &listing, &config.pacing)
                .await
                .with_context(|| format!("enumerating {}", listing.name))?;
            summary.record_enumeration(listing.family, &enumeration);

            let batch = fetch_details(
                &mut fetcher,
                listing.family,
                listing.family.detail_url_template(),
                &enumeration.identifiers,
            )
            .await;
            summary.record_fetch(listing.family, &batch);
            *slot = Some(batch.records);
        }
    }

    if options.campaigns {
        let listing = listings::campaigns();
        let enumeration = enumerate_scroll(session, &listing, &config.pacing)
            .await
            .with_context(|| format!("enumerating {}", listing.name))?;
        summary.record_enumeration(listing.family, &enumeration);

        let mut pages = BrowserPages::new(session, config.pacing.page_settle);
        let batch = fetch_details(
            &mut pages,
            listing.family,
            listing.family.detail_url_template(),
            &enumeration.identifiers,
        )
        .await;
        summary.record_fetch(listing.family, &batch);
        collected.campaigns = Some(batch.records);
    }

    Ok(collected)
}

fn normalize(family: &str, lists: &[&[RawRecord]]) -> anyhow::Result<NormalizedTable> {
    normalize_records(lists).with_context(|| format!("normalizing {family} records"))
}

fn write(table: &NormalizedTable, path: PathBuf, summary: &mut RunSummary) -> anyhow::Result<()> {
    write_table(&table.records, &path)
        .with_context(|| format!("writing {}", path.display()))?;
    summary.tables.push(path);
    Ok(())
}

fn persist(
    collected: &Collected,
    paths: &DataPaths,
    charts_dir: &Path,
    summary: &mut RunSummary,
) -> anyhow::Result<()> {
    if let (Some(new), Some(used)) = (&collected.new, &collected.used) {
        let new_table = normalize("new-car", &[&new[..]])?;
        let used_table = normalize("used-car", &[&used[..]])?;
        let combined = normalize("combined car", &[&new[..], &used[..]])?;
        summary.dropped_rows += new_table.dropped_rows + used_table.dropped_rows;

        write(&new_table, paths.family(PageFamily::NewItem), summary)?;
        write(&used_table, paths.family(PageFamily::UsedItem), summary)?;
        write(&combined, paths.combined_cars(), summary)?;

        let charts = render_car_report(&combined.records, charts_dir)
            .context("rendering car charts")?;
        summary.charts.extend(charts);
    }

    if let Some(campaigns) = &collected.campaigns {
        let table = normalize("campaign", &[&campaigns[..]])?;
        summary.dropped_rows += table.dropped_rows;
        write(&table, paths.family(PageFamily::Campaign), summary)?;

        let charts = render_campaign_report(&table.records, charts_dir)
            .context("rendering campaign charts")?;
        summary.charts.extend(charts);
    }

    Ok(())
}
