//! Descriptive charts over the normalized car and campaign tables.
//!
//! Each report renders a fixed set of SVG files into one output directory.
//! A chart whose series is empty is skipped and left out of the returned
//! paths.

pub mod aggregate;
pub mod charts;

use std::path::{Path, PathBuf};

use plotters::style::RGBColor;
use thiserror::Error;
use vitrina_core::NormalizedRecord;

pub use aggregate::Ranking;
use charts::ChartText;

const TOP_N: usize = 10;

const STEEL: RGBColor = RGBColor(70, 130, 180);
const SKY: RGBColor = RGBColor(135, 206, 235);
const SALMON: RGBColor = RGBColor(250, 128, 114);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const GREEN: RGBColor = RGBColor(144, 238, 144);

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create chart directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {path}: {reason}")]
    Render { path: PathBuf, reason: String },
}

fn prepare(out_dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })
}

/// Collects the paths of charts that actually had data.
struct Rendered {
    out_dir: PathBuf,
    paths: Vec<PathBuf>,
}

impl Rendered {
    fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            paths: Vec::new(),
        }
    }

    fn chart(
        &mut self,
        file: &str,
        has_data: bool,
        draw: impl FnOnce(&Path) -> Result<(), ReportError>,
    ) -> Result<(), ReportError> {
        let path = self.out_dir.join(file);
        if !has_data {
            tracing::warn!(chart = file, "no data for chart, skipping");
            return Ok(());
        }
        draw(&path)?;
        tracing::info!(path = %path.display(), "chart rendered");
        self.paths.push(path);
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_f64_counts(counts: Vec<(String, usize)>) -> Vec<(String, f64)> {
    counts
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .collect()
}

fn dollars(value: f64) -> String {
    format!("${value:.0}")
}

fn colones(value: f64) -> String {
    format!("₡{value:.0}")
}

/// Render the car charts (new, used or merged records) into `out_dir`.
///
/// # Errors
///
/// Returns [`ReportError`] if the directory can't be created or a chart
/// fails to render.
pub fn render_car_report(
    records: &[NormalizedRecord],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    prepare(out_dir)?;
    let mut rendered = Rendered::new(out_dir);

    let by_year = aggregate::average_price_by_year(records);
    rendered.chart("precio_promedio_por_anio.svg", !by_year.is_empty(), |path| {
        charts::line_chart(
            path,
            ChartText {
                title: "Precio Promedio de carros por Año",
                x_desc: "Año",
                y_desc: "Precio Promedio",
            },
            &by_year,
        )
    })?;

    let common = as_f64_counts(aggregate::most_common_versions(records, TOP_N));
    rendered.chart("modelos_mas_comunes.svg", !common.is_empty(), |path| {
        charts::bar_chart(
            path,
            ChartText {
                title: "Top 10 Modelos de carros Más Comunes",
                x_desc: "Modelo de Carro",
                y_desc: "Cantidad",
            },
            &common,
            STEEL,
            |v| format!("{v:.0}"),
        )
    })?;

    let expensive = aggregate::versions_by_price(records, Ranking::Highest, TOP_N);
    rendered.chart("modelos_mas_caros.svg", !expensive.is_empty(), |path| {
        charts::bar_chart(
            path,
            ChartText {
                title: "Top 10 Modelos de carros Más Caros",
                x_desc: "Modelo de Carro",
                y_desc: "Precio",
            },
            &expensive,
            STEEL,
            dollars,
        )
    })?;

    let cheapest = aggregate::versions_by_price(records, Ranking::Lowest, TOP_N);
    rendered.chart("modelos_mas_baratos.svg", !cheapest.is_empty(), |path| {
        charts::bar_chart(
            path,
            ChartText {
                title: "Top 10 Modelos de carros Más Baratos",
                x_desc: "Modelo de Carro",
                y_desc: "Precio",
            },
            &cheapest,
            STEEL,
            dollars,
        )
    })?;

    Ok(rendered.paths)
}

/// Render the campaign charts into `out_dir`.
///
/// # Errors
///
/// Returns [`ReportError`] if the directory can't be created or a chart
/// fails to render.
pub fn render_campaign_report(
    records: &[NormalizedRecord],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    prepare(out_dir)?;
    let mut rendered = Rendered::new(out_dir);

    let rankings = [
        (
            "top_10_ofertas_mayor_descuento.svg",
            "Top 10 Ofertas con Mayor Descuento",
            Ranking::Highest,
            SKY,
        ),
        (
            "top_10_ofertas_menor_descuento.svg",
            "Top 10 Ofertas con Menor Descuento",
            Ranking::Lowest,
            SALMON,
        ),
    ];
    for (file, title, ranking, color) in rankings {
        let bars = aggregate::offers_by_discount(records, ranking, TOP_N);
        rendered.chart(file, !bars.is_empty(), |path| {
            charts::bar_chart(
                path,
                ChartText {
                    title,
                    x_desc: "Oferta",
                    y_desc: "Porcentaje de Descuento",
                },
                &bars,
                color,
                |v| format!("{v:.0}%"),
            )
        })?;
    }

    let totals = [
        (
            "top_10_ofertas_mas_caras.svg",
            "Top 10 Ofertas Más Caras",
            Ranking::Highest,
            ORANGE,
        ),
        (
            "top_10_ofertas_mas_baratas.svg",
            "Top 10 Ofertas Más Baratas",
            Ranking::Lowest,
            GREEN,
        ),
    ];
    for (file, title, ranking, color) in totals {
        let bars = aggregate::offers_by_total_price(records, ranking, TOP_N);
        rendered.chart(file, !bars.is_empty(), |path| {
            charts::bar_chart(
                path,
                ChartText {
                    title,
                    x_desc: "Oferta",
                    y_desc: "Precio",
                },
                &bars,
                color,
                colones,
            )
        })?;
    }

    let points = aggregate::price_vs_sold(records);
    rendered.chart("relacion_vendidas_precio.svg", !points.is_empty(), |path| {
        charts::scatter_chart(
            path,
            ChartText {
                title: "Relación entre Vendidas y Precio",
                x_desc: "Precio",
                y_desc: "Vendidas",
            },
            &points,
        )
    })?;

    Ok(rendered.paths)
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use vitrina_core::fields::{DISCOUNT, MAIN_OFFER, OFFER_PRICE, PRICE, SOLD, VERSION, YEAR};
    use vitrina_core::{FieldValue, ItemIdentifier, PageFamily};

    use super::*;

    fn record(family: PageFamily, fields: &[(&str, FieldValue)]) -> NormalizedRecord {
        NormalizedRecord {
            identifier: ItemIdentifier::new("1"),
            family,
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn car_report_writes_four_charts() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record(
                PageFamily::UsedItem,
                &[
                    (VERSION, FieldValue::Text("Toyota Corolla".into())),
                    (YEAR, FieldValue::Integer(2021)),
                    (PRICE, FieldValue::Number(12_500.0)),
                ],
            ),
            record(
                PageFamily::UsedItem,
                &[
                    (VERSION, FieldValue::Text("Suzuki Swift".into())),
                    (YEAR, FieldValue::Integer(2019)),
                    (PRICE, FieldValue::Number(8_000.0)),
                ],
            ),
        ];

        let paths = render_car_report(&records, dir.path()).unwrap();

        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|p| p.exists()));
        assert!(dir.path().join("modelos_mas_caros.svg").exists());
    }

    #[test]
    fn campaign_report_skips_scatter_without_sold_counts() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(
            PageFamily::Campaign,
            &[
                (MAIN_OFFER, FieldValue::Text("Spa Day".into())),
                (OFFER_PRICE, FieldValue::Number(15_000.0)),
                (DISCOUNT, FieldValue::Number(50.0)),
                (SOLD, FieldValue::Missing),
            ],
        )];

        let paths = render_campaign_report(&records, &dir.path().join("charts")).unwrap();

        assert_eq!(paths.len(), 4);
        assert!(!dir.path().join("charts/relacion_vendidas_precio.svg").exists());
    }

    #[test]
    fn empty_records_render_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render_car_report(&[], dir.path()).unwrap().is_empty());
        assert!(render_campaign_report(&[], dir.path()).unwrap().is_empty());
    }
}
