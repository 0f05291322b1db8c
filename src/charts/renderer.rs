//! Static Chart Renderer
//! Writes the price distribution histogram and the top-cities bar chart as
//! PNG images.
//!
//! Layout:
//! 1. Histogram: 50 equal-width price bins shown on a log price axis, KDE
//!    line on top
//! 2. Bar chart: horizontal bars, most expensive city at the top, bars
//!    shaded from warm (highest) to cool (lowest)

use crate::stats::{CityMean, PriceHistogram, KDE_POINTS};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

// Colors
const BAR_FILL: RGBColor = RGBColor(76, 114, 176); // Histogram bars
const KDE_LINE: RGBColor = RGBColor(31, 58, 104); // Density overlay
const COOL: RGBColor = RGBColor(59, 76, 192); // Coolwarm low end
const NEUTRAL: RGBColor = RGBColor(221, 221, 221); // Coolwarm midpoint
const WARM: RGBColor = RGBColor(180, 4, 38); // Coolwarm high end

const HISTOGRAM_SIZE: (u32, u32) = (960, 600);
const BAR_CHART_SIZE: (u32, u32) = (1200, 900);
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to plot for {0}")]
    EmptyData(&'static str),
    #[error("Failed to draw chart: {0}")]
    Plot(String),
}

fn plot_err<E: std::error::Error>(e: E) -> RenderError {
    RenderError::Plot(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Histogram of prices with a density overlay on a log price axis.
    ///
    /// Returns the histogram that was drawn.
    pub fn render_price_distribution(
        prices: &[f64],
        bins: usize,
        path: &Path,
    ) -> Result<PriceHistogram, RenderError> {
        let hist =
            PriceHistogram::new(prices, bins).ok_or(RenderError::EmptyData("price distribution"))?;
        if hist.skipped > 0 {
            warn!(
                skipped = hist.skipped,
                "non-positive prices left off the log axis"
            );
        }

        let curve = hist.kde_curve(prices, KDE_POINTS);
        let (x_lo, x_hi) = hist.range();
        let y_max = curve
            .iter()
            .map(|(_, y)| *y)
            .fold(hist.max_count() as f64, f64::max)
            * 1.1;

        let root = BitMapBackend::new(path, HISTOGRAM_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Distribution of House Prices", (FONT, 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .build_cartesian_2d((x_lo..x_hi).log_scale(), 0f64..y_max)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc("House Price")
            .y_desc("Frequency")
            .x_label_formatter(&|v| format_price(*v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(hist.bins().map(|(lo, hi, count)| {
                Rectangle::new([(lo, 0.0), (hi, count as f64)], BAR_FILL.mix(0.6).filled())
            }))
            .map_err(plot_err)?;

        if curve.is_empty() {
            warn!("price density undefined, drawing histogram only");
        } else {
            chart
                .draw_series(LineSeries::new(curve, KDE_LINE.stroke_width(2)))
                .map_err(plot_err)?;
        }

        root.present().map_err(plot_err)?;
        info!(
            path = %path.display(),
            bins,
            observations = hist.total(),
            "wrote price distribution chart"
        );

        Ok(hist)
    }

    /// Horizontal bar chart of city mean prices, in the order given.
    pub fn render_top_cities(
        cities: &[CityMean],
        title: &str,
        path: &Path,
    ) -> Result<(), RenderError> {
        if cities.is_empty() {
            return Err(RenderError::EmptyData("top cities"));
        }

        let n = cities.len();
        let labels: Vec<&str> = cities.iter().map(|c| c.city.as_str()).collect();
        let x_max = cities
            .iter()
            .map(|c| c.mean_price)
            .fold(0.0, f64::max)
            .max(1.0)
            * 1.05;

        let root = BitMapBackend::new(path, BAR_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let axis = slot_axis(n);
        let label_count = axis.end as usize + 1;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(200)
            .build_cartesian_2d(0f64..x_max, axis.into_segmented())
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(label_count)
            .x_desc("House Price")
            .y_desc("City")
            .x_label_formatter(&|v| format_price(*v))
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(slot) => slot_label(&labels, *slot),
                _ => String::new(),
            })
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(cities.iter().enumerate().map(|(rank, city)| {
                let (bottom, top) = bar_span(rank, n);
                let color = coolwarm(rank, n);
                let mut bar =
                    Rectangle::new([(0.0, bottom), (city.mean_price, top)], color.filled());
                bar.set_margin(2, 2, 0, 0);
                bar
            }))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        info!(path = %path.display(), cities = cities.len(), "wrote top cities chart");

        Ok(())
    }
}

/// Segmented y axis with one slot per bar. A segmented `0..k` axis holds
/// `k + 1` slots and `0..0` cannot be mapped, so a single bar gets a
/// three-slot axis and spans all of it.
fn slot_axis(bars: usize) -> Range<i32> {
    if bars > 1 {
        0..bars as i32 - 1
    } else {
        0..2
    }
}

/// Bottom and top of the bar for `rank`; rank 0 is drawn at the top.
fn bar_span(rank: usize, bars: usize) -> (SegmentValue<i32>, SegmentValue<i32>) {
    if bars <= 1 {
        return (SegmentValue::Exact(0), SegmentValue::Last);
    }
    let slot = (bars - 1 - rank) as i32;
    (SegmentValue::Exact(slot), SegmentValue::Exact(slot + 1))
}

/// Rank of the bar labelled at `slot`; slot 0 is the bottom of the axis.
fn slot_rank(slot: i32, bars: usize) -> Option<usize> {
    if bars == 1 {
        return (slot == 1).then_some(0);
    }
    usize::try_from(bars as i32 - 1 - slot)
        .ok()
        .filter(|rank| *rank < bars)
}

fn slot_label(labels: &[&str], slot: i32) -> String {
    slot_rank(slot, labels.len())
        .and_then(|rank| labels.get(rank))
        .map(|l| l.to_string())
        .unwrap_or_default()
}

/// Diverging palette: rank 0 is warmest, the last rank coolest.
pub fn coolwarm(rank: usize, len: usize) -> RGBColor {
    let t = if len > 1 {
        1.0 - rank as f64 / (len - 1) as f64
    } else {
        1.0
    };
    if t < 0.5 {
        lerp(COOL, NEUTRAL, t * 2.0)
    } else {
        lerp(NEUTRAL, WARM, (t - 0.5) * 2.0)
    }
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Short axis label for a price.
pub fn format_price(v: f64) -> String {
    if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        format!("{:.0}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_runs_warm_to_cool() {
        assert_eq!(coolwarm(0, 30), WARM);
        assert_eq!(coolwarm(29, 30), COOL);
        assert_eq!(coolwarm(0, 1), WARM);
        assert_eq!(coolwarm(1, 3), NEUTRAL);
    }

    #[test]
    fn slot_labels_put_first_rank_on_top() {
        let labels = ["Boston, MA", "Austin, TX", "Denver, CO"];
        assert_eq!(slot_label(&labels, 2), "Boston, MA");
        assert_eq!(slot_label(&labels, 0), "Denver, CO");
        assert_eq!(slot_label(&labels, 3), "");
    }

    #[test]
    fn single_city_fills_the_axis() {
        assert_eq!(slot_axis(1), 0..2);
        assert!(matches!(
            bar_span(0, 1),
            (SegmentValue::Exact(0), SegmentValue::Last)
        ));
        // The label sits in the middle of the three slots.
        assert_eq!(slot_label(&["Boston, MA"], 1), "Boston, MA");
        assert_eq!(slot_label(&["Boston, MA"], 0), "");
        assert_eq!(slot_label(&["Boston, MA"], 2), "");
    }

    #[test]
    fn one_slot_per_city() {
        // 0..k holds k + 1 slots.
        assert_eq!(slot_axis(30), 0..29);
        assert_eq!(slot_axis(2), 0..1);
        assert!(matches!(
            bar_span(0, 3),
            (SegmentValue::Exact(2), SegmentValue::Exact(3))
        ));
        assert!(matches!(
            bar_span(2, 3),
            (SegmentValue::Exact(0), SegmentValue::Exact(1))
        ));
    }

    #[test]
    fn prices_format_compactly() {
        assert_eq!(format_price(1_500_000.0), "1.5M");
        assert_eq!(format_price(350_000.0), "350k");
        assert_eq!(format_price(950.0), "950");
    }

    fn city(name: &str, mean_price: f64) -> CityMean {
        CityMean {
            city: name.into(),
            mean_price,
            observations: 3,
        }
    }

    #[test]
    fn histogram_png_counts_every_positive_price() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_distribution.png");
        let prices: Vec<f64> = (0..120).map(|i| 150_000.0 + i as f64 * 7_500.0).collect();

        let hist = StaticChartRenderer::render_price_distribution(&prices, 50, &path).unwrap();

        assert_eq!(hist.total(), prices.len());
        assert_eq!(hist.bins().count(), 50);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn bar_chart_png_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let many = [
            city("San Jose, CA", 1_450_000.0),
            city("Boston, MA", 620_000.0),
            city("Denver, CO", 560_000.0),
        ];
        let path = dir.path().join("top_cities.png");
        StaticChartRenderer::render_top_cities(&many, "Top 3", &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        let path = dir.path().join("one_city.png");
        StaticChartRenderer::render_top_cities(&many[..1], "Top 1", &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn empty_inputs_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = StaticChartRenderer::render_price_distribution(&[], 50, &dir.path().join("h.png"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyData(_)));

        let err = StaticChartRenderer::render_top_cities(&[], "Top", &dir.path().join("b.png"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyData(_)));
    }
}
