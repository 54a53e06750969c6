//! The report command: re-render charts from tables already on disk.

use std::path::{Path, PathBuf};

use anyhow::Context;
use vitrina_core::PageFamily;
use vitrina_report::{render_campaign_report, render_car_report};
use vitrina_store::{read_table, DataPaths};

pub(crate) fn run_report(paths: &DataPaths, charts_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let cars = paths.combined_cars();
    let campaigns = paths.family(PageFamily::Campaign);
    if !cars.exists() && !campaigns.exists() {
        anyhow::bail!(
            "no tables found under {}; run `vitrina run` first",
            paths.root().display()
        );
    }

    let mut charts = Vec::new();
    if cars.exists() {
        let records =
            read_table(&cars).with_context(|| format!("reading {}", cars.display()))?;
        charts.extend(render_car_report(&records, charts_dir).context("rendering car charts")?);
    } else {
        tracing::warn!(path = %cars.display(), "car table missing, skipping car charts");
    }

    if campaigns.exists() {
        let records = read_table(&campaigns)
            .with_context(|| format!("reading {}", campaigns.display()))?;
        charts.extend(
            render_campaign_report(&records, charts_dir).context("rendering campaign charts")?,
        );
    } else {
        tracing::warn!(path = %campaigns.display(), "campaign table missing, skipping campaign charts");
    }

    tracing::info!(charts = charts.len(), "report finished");
    Ok(charts)
}
