//! SVG chart rendering for a single station's forecast.

use std::ops::Range;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use plotters::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::normalizer::StationSeries;

const CHART_SIZE: (u32, u32) = (1000, 500);
const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";
const LEVEL_COLOR: RGBColor = RGBColor(31, 119, 180);
const DANGER_LINE_COLOR: RGBColor = RGBColor(255, 165, 0);
const DANGER_ZONE_COLOR: RGBColor = RGBColor(255, 0, 0);

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Failed to draw chart for {station}: {message}")]
    Draw { station: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedStationPlot {
    pub station_name: String,
    pub danger_level: Option<f64>,
    /// `data:` URI of the chart, absent when the station has no observations
    pub image: Option<String>,
}

#[instrument(skip(series), fields(station = %series.station_name, points = series.observations.len()))]
pub fn render_station(series: &StationSeries) -> Result<RenderedStationPlot, ChartError> {
    let points: Vec<(NaiveDate, f64)> = series
        .observations
        .iter()
        .map(|obs| (obs.date, obs.water_level))
        .collect();

    let image = if points.is_empty() {
        debug!("No observations, skipping chart");
        None
    } else if let Some(y_range) = level_range(&points, series.danger_level) {
        let svg = render_svg(series, &points, y_range).map_err(|e| ChartError::Draw {
            station: series.station_name.clone(),
            message: e.to_string(),
        })?;
        debug!("Rendered chart, size: {} bytes", svg.len());
        Some(svg_data_uri(&svg))
    } else {
        warn!("Water levels too far apart to chart, skipping chart");
        None
    };

    Ok(RenderedStationPlot {
        station_name: series.station_name.clone(),
        danger_level: series.danger_level,
        image,
    })
}

pub fn svg_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}

/// Draw the chart into a fresh SVG document. The backend borrows the buffer
/// only inside this call, so no drawing state outlives one station.
fn render_svg(
    series: &StationSeries,
    points: &[(NaiveDate, f64)],
    y_range: Range<f64>,
) -> Result<String, DrawingAreaErrorKind<std::io::Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw_series(&root, series, points, y_range)?;
        root.present()?;
    }
    Ok(svg)
}

fn draw_series<'a>(
    root: &DrawingArea<SVGBackend<'a>, plotters::coord::Shift>,
    series: &StationSeries,
    points: &[(NaiveDate, f64)],
    y_range: Range<f64>,
) -> DrawResult<(), SVGBackend<'a>> {
    root.fill(&WHITE)?;

    let ranged_date: RangedDate<NaiveDate> = date_range(points).into();

    let mut chart = ChartBuilder::on(root)
        .caption(
            format!("Water Level Over Time - {}", series.station_name),
            ("sans-serif", 24),
        )
        .margin(20i32)
        .x_label_area_size(50u32)
        .y_label_area_size(60u32)
        .build_cartesian_2d(ranged_date, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Water Level (m)")
        .x_label_formatter(&|d: &NaiveDate| d.format(DATE_LABEL_FORMAT).to_string())
        .light_line_style(BLACK.mix(0.1))
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), LEVEL_COLOR.stroke_width(2)).point_size(4))?
        .label("Water Level")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LEVEL_COLOR));

    if let Some(danger_level) = series.danger_level {
        let x_range = chart.x_range();

        chart
            .draw_series(DashedLineSeries::new(
                [(x_range.start, danger_level), (x_range.end, danger_level)],
                8,
                6,
                DANGER_LINE_COLOR.stroke_width(2),
            ))?
            .label("Danger Level")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], DANGER_LINE_COLOR));

        // Shade up to whatever ceiling the axis actually ended up with
        if let Some((floor, ceiling)) = danger_band(danger_level, chart.y_range()) {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x_range.start, floor), (x_range.end, ceiling)],
                DANGER_ZONE_COLOR.mix(0.1).filled(),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// X-axis span; a single date is widened by a day on each side.
fn date_range(points: &[(NaiveDate, f64)]) -> Range<NaiveDate> {
    let first = points.iter().map(|(d, _)| *d).min().unwrap_or_default();
    let last = points.iter().map(|(d, _)| *d).max().unwrap_or(first);

    if first == last {
        first.pred_opt().unwrap_or(first)..last.succ_opt().unwrap_or(last)
    } else {
        first..last
    }
}

/// Y-axis span covering every level and the danger level, with a 5% margin.
/// `None` when the span does not fit in an `f64`.
fn level_range(points: &[(NaiveDate, f64)], danger_level: Option<f64>) -> Option<Range<f64>> {
    let (min, max) = points
        .iter()
        .map(|(_, level)| *level)
        .chain(danger_level)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });

    let span = max - min;
    if !span.is_finite() {
        return None;
    }

    let margin = if span.abs() > 1e-9 { span * 0.05 } else { 1.0 };
    let (low, high) = (min - margin, max + margin);
    (low.is_finite() && high.is_finite() && (high - low).is_finite()).then_some(low..high)
}

/// Band shaded above the danger level, topped by the axis ceiling.
fn danger_band(danger_level: f64, y_range: Range<f64>) -> Option<(f64, f64)> {
    (y_range.end > danger_level).then_some((danger_level, y_range.end))
}
