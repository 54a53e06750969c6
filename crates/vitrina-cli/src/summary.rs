//! End-of-run summary of per-item faults and outputs.

use std::fmt;
use std::path::PathBuf;

use vitrina_core::PageFamily;
use vitrina_scraper::{Enumeration, FetchBatch};

/// Counters for one page family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FamilySummary {
    pub family: PageFamily,
    pub identifiers: usize,
    pub duplicates: usize,
    pub records: usize,
    pub failures: usize,
    pub gaps: usize,
}

#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub families: Vec<FamilySummary>,
    pub dropped_rows: usize,
    pub tables: Vec<PathBuf>,
    pub charts: Vec<PathBuf>,
}

impl RunSummary {
    fn entry(&mut self, family: PageFamily) -> &mut FamilySummary {
        if let Some(index) = self.families.iter().position(|f| f.family == family) {
            &mut self.families[index]
        } else {
            self.families.push(FamilySummary {
                family,
                identifiers: 0,
                duplicates: 0,
                records: 0,
                failures: 0,
                gaps: 0,
            });
            let last = self.families.len() - 1;
            &mut self.families[last]
        }
    }

    pub fn record_enumeration(&mut self, family: PageFamily, enumeration: &Enumeration) {
        let entry = self.entry(family);
        entry.identifiers += enumeration.identifiers.len();
        entry.duplicates += enumeration.duplicates;
    }

    pub fn record_fetch(&mut self, family: PageFamily, batch: &FetchBatch) {
        let entry = self.entry(family);
        entry.records += batch.records.len();
        entry.failures += batch.failures.len();
        entry.gaps += batch.gaps.len();
    }

    pub fn failures(&self) -> usize {
        self.families.iter().map(|f| f.failures).sum()
    }

    /// Emit the summary as structured events.
    pub fn log(&self) {
        for f in &self.families {
            tracing::info!(
                family = %f.family,
                identifiers = f.identifiers,
                duplicates = f.duplicates,
                records = f.records,
                failures = f.failures,
                gaps = f.gaps,
                "family summary"
            );
        }
        tracing::info!(
            dropped_rows = self.dropped_rows,
            failures = self.failures(),
            tables = self.tables.len(),
            charts = self.charts.len(),
            "run finished"
        );
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>11} {:>10} {:>8} {:>8} {:>5}",
            "family", "identifiers", "duplicates", "records", "failures", "gaps"
        )?;
        for s in &self.families {
            writeln!(
                f,
                "{:<10} {:>11} {:>10} {:>8} {:>8} {:>5}",
                s.family.label(),
                s.identifiers,
                s.duplicates,
                s.records,
                s.failures,
                s.gaps
            )?;
        }
        writeln!(f, "dropped price rows: {}", self.dropped_rows)?;
        for table in &self.tables {
            writeln!(f, "table: {}", table.display())?;
        }
        for chart in &self.charts {
            writeln!(f, "chart: {}", chart.display())?;
        }
        Ok(())
    }
}
