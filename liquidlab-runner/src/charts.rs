//! PNG charts for the derived metrics.
//!
//! Charts are a side effect of the pipelines: callers log a failed render and
//! carry on.

use liquidlab_core::domain::MetricSeries;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const SIZE: (u32, u32) = (1000, 600);
const LINE_COLORS: [RGBColor; 3] = [RGBColor(31, 119, 180), RGBColor(255, 127, 14), GREEN];
const BAR_COLORS: [RGBColor; 4] = [BLUE, GREEN, RGBColor(255, 165, 0), RGBColor(128, 0, 128)];

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to render chart: {0}")]
    Render(String),

    #[error("nothing to plot")]
    NoData,
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Render(e.to_string())
    }
}

/// Axis and title text for a chart.
#[derive(Debug, Clone, Copy)]
pub struct Labels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

/// Finite value range, padded when flat, with the origin always included.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}

fn root_area(path: &Path) -> Result<DrawingArea<BitMapBackend<'_>, Shift>, ChartError> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

/// Line chart of one or more series sharing the first series' keys on the x axis.
/// Non-finite points are left out.
pub fn line_chart(
    path: &Path,
    labels: Labels<'_>,
    series: &[(&str, &MetricSeries)],
    markers: bool,
) -> Result<(), ChartError> {
    let n = series.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    if n == 0 {
        return Err(ChartError::NoData);
    }
    let keys = series[0].1.keys();
    let (y_lo, y_hi) = value_range(series.iter().flat_map(|(_, s)| s.values()));

    let root = root_area(path)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..(n.max(2) - 1) as f64, y_lo..y_hi)?;

    let key_at = |x: &f64| {
        let i = x.round();
        if i >= 0.0 && (i as usize) < keys.len() {
            keys[i as usize].clone()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .x_desc(labels.x)
        .y_desc(labels.y)
        .x_labels(8)
        .x_label_formatter(&key_at)
        .draw()?;

    for (i, (name, s)) in series.iter().enumerate() {
        let color = LINE_COLORS[i % LINE_COLORS.len()];
        let points: Vec<(f64, f64)> = s
            .values()
            .into_iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(x, v)| (x as f64, v))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        if markers {
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 4, color.filled())),
            )?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Bar chart with one labelled bar per value.
pub fn bar_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    bars: &[(&str, f64)],
) -> Result<(), ChartError> {
    if bars.is_empty() {
        return Err(ChartError::NoData);
    }
    let (y_lo, y_hi) = value_range(bars.iter().map(|(_, v)| *v));
    let names: Vec<&str> = bars.iter().map(|(name, _)| *name).collect();

    let root = root_area(path)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0..bars.len()).into_segmented(), y_lo..y_hi)?;

    let name_at = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            names.get(*i).map(|s| s.to_string()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(y_label)
        .x_labels(bars.len())
        .x_label_formatter(&name_at)
        .draw()?;

    chart.draw_series(
        bars.iter()
            .enumerate()
            .filter(|(_, (_, v))| v.is_finite())
            .map(|(i, (_, v))| {
                let color = BAR_COLORS[i % BAR_COLORS.len()];
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                    color.filled(),
                );
                bar.set_margin(0, 0, 20, 20);
                bar
            }),
    )?;

    root.present()?;
    Ok(())
}

/// Render into `path`, creating its directory first.
pub fn prepare(path: &Path) -> Result<(), ChartError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ChartError::Render(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_includes_origin_and_pads() {
        let (lo, hi) = value_range([2.0, 4.0].into_iter());
        assert!(lo < 0.0 && hi > 4.0);
    }

    #[test]
    fn flat_range_is_widened() {
        assert_eq!(value_range([0.0, 0.0].into_iter()), (-1.0, 1.0));
        assert_eq!(value_range([f64::NAN, f64::INFINITY].into_iter()), (-1.0, 1.0));
    }

    #[test]
    fn empty_input_is_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.png");
        let empty = MetricSeries::new("x");
        let labels = Labels {
            title: "t",
            x: "x",
            y: "y",
        };
        assert!(matches!(
            line_chart(&path, labels, &[("x", &empty)], false),
            Err(ChartError::NoData)
        ));
        assert!(matches!(bar_chart(&path, "t", "y", &[]), Err(ChartError::NoData)));
        assert!(!path.exists());
    }
}
