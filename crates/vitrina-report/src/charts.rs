//! SVG rendering of aggregated series.

use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;

use crate::ReportError;

const SIZE: (u32, u32) = (1200, 750);
const LABEL_WIDTH: usize = 28;

fn render_error<E: Display>(path: &Path) -> impl Fn(E) -> ReportError + '_ {
    move |e| ReportError::Render {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Upper axis bound with some headroom above the tallest value.
fn headroom(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.15
    } else {
        1.0
    }
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(LABEL_WIDTH - 1).collect();
        short.push('…');
        short
    }
}

/// Axis titles and caption of one chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartText<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

pub fn line_chart(path: &Path, text: ChartText<'_>, points: &[(i64, f64)]) -> Result<(), ReportError> {
    let err = render_error(path);
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(());
    };
    let max = points.iter().map(|(_, y)| *y).fold(0.0, f64::max);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(&err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(text.title, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(first.0..last.0 + 1, 0f64..headroom(max))
        .map_err(&err)?;

    chart
        .configure_mesh()
        .x_desc(text.x_desc)
        .y_desc(text.y_desc)
        .x_label_formatter(&|year| year.to_string())
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()
        .map_err(&err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(&err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )
        .map_err(&err)?;

    root.present().map_err(&err)?;
    Ok(())
}

/// Vertical bars with the value printed above each bar.
#[allow(clippy::cast_precision_loss)]
pub fn bar_chart(
    path: &Path,
    text: ChartText<'_>,
    bars: &[(String, f64)],
    color: RGBColor,
    value_label: impl Fn(f64) -> String,
) -> Result<(), ReportError> {
    let err = render_error(path);
    if bars.is_empty() {
        return Ok(());
    }
    let labels: Vec<String> = bars.iter().map(|(label, _)| short_label(label)).collect();
    let max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(&err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(text.title, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(120)
        .y_label_area_size(90)
        .build_cartesian_2d((0..bars.len()).into_segmented(), 0f64..headroom(max))
        .map_err(&err)?;

    let x_formatter = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&x_formatter)
        .x_label_style(
            ("sans-serif", 13)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_formatter(&|y| format!("{y:.0}"))
        .x_desc(text.x_desc)
        .y_desc(text.y_desc)
        .draw()
        .map_err(&err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(8)
                .data(bars.iter().enumerate().map(|(i, (_, v))| (i, *v))),
        )
        .map_err(&err)?;
    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
            Text::new(
                value_label(*v),
                (SegmentValue::CenterOf(i), *v + max * 0.02),
                ("sans-serif", 13).into_font(),
            )
        }))
        .map_err(&err)?;

    root.present().map_err(&err)?;
    Ok(())
}

pub fn scatter_chart(
    path: &Path,
    text: ChartText<'_>,
    points: &[(f64, f64)],
) -> Result<(), ReportError> {
    let err = render_error(path);
    if points.is_empty() {
        return Ok(());
    }
    let max_x = points.iter().map(|(x, _)| *x).fold(0.0, f64::max);
    let max_y = points.iter().map(|(_, y)| *y).fold(0.0, f64::max);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(&err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(text.title, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..headroom(max_x), 0f64..headroom(max_y))
        .map_err(&err)?;

    chart
        .configure_mesh()
        .x_desc(text.x_desc)
        .y_desc(text.y_desc)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()
        .map_err(&err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, BLUE.mix(0.6).filled())),
        )
        .map_err(&err)?;

    root.present().map_err(&err)?;
    Ok(())
}
