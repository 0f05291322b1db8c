//! Price Distribution Module
//! Histogram bins and a Gaussian kernel density estimate for the price
//! distribution chart. Both are computed on raw prices; the chart only
//! displays them on a log axis.

use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Evaluation points along the density curve.
pub const KDE_POINTS: usize = 200;

/// Histogram with bins of equal width in price.
#[derive(Debug, Clone)]
pub struct PriceHistogram {
    /// Bin edges, `counts.len() + 1` of them.
    edges: Vec<f64>,
    counts: Vec<usize>,
    /// Values left out because they cannot sit on a log axis.
    pub skipped: usize,
}

/// Positive, finite values; the rest cannot be placed on a log axis.
fn plottable(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect()
}

impl PriceHistogram {
    /// Bin the positive, finite values over their `[min, max]` range.
    /// Returns `None` when there are none.
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let kept = plottable(values);
        if kept.is_empty() {
            return None;
        }

        let mut lo = kept.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = kept.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi - lo <= f64::EPSILON * hi {
            // A single value still gets a visible bin.
            lo = (lo - 0.5).max(lo / 2.0);
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();

        let mut counts = vec![0usize; bins];
        for x in &kept {
            let idx = (((x - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self {
            edges,
            counts,
            skipped: values.len() - kept.len(),
        })
    }

    /// `(lower, upper, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    /// Price range covered by the bins.
    pub fn range(&self) -> (f64, f64) {
        let lo = self.edges.first().copied().unwrap_or(0.0);
        let hi = self.edges.last().copied().unwrap_or(0.0);
        (lo, hi)
    }

    pub fn bin_width(&self) -> f64 {
        let (lo, hi) = self.range();
        (hi - lo) / self.counts.len() as f64
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Gaussian KDE of prices with Scott's bandwidth (`std * n^(-1/5)`),
    /// scaled by `n * bin_width` so it overlays the bar heights. Evaluated
    /// across the binned range; points are `(price, count)`.
    ///
    /// Empty when the bandwidth is undefined (fewer than two distinct
    /// values).
    pub fn kde_curve(&self, values: &[f64], points: usize) -> Vec<(f64, f64)> {
        let kept = plottable(values);
        let n = kept.len() as f64;
        let bandwidth = kept.iter().std_dev() * n.powf(-0.2);
        if !bandwidth.is_finite() || bandwidth <= 0.0 || points < 2 {
            return Vec::new();
        }
        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };

        let (lo, hi) = self.range();
        let step = (hi - lo) / (points - 1) as f64;
        // n * bin_width * (1 / (n * h)) * sum(phi)
        let scale = self.bin_width() / bandwidth;

        (0..points)
            .map(|i| {
                let x = lo + i as f64 * step;
                let density: f64 = kept.iter().map(|xi| kernel.pdf((x - xi) / bandwidth)).sum();
                (x, density * scale)
            })
            .collect()
    }
}
