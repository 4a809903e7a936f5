use ndarray::{s, ArrayView1};
use serde::Serialize;
use crate::view::envelope::column_span;
/// How a detail waveform should be drawn for a given density of samples per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RenderStrategy {
    /// More samples than pixels: reduce to per-column min/max bars.
    Binned,
    /// Fewer than one sample per four pixels: mark samples and interpolate between them.
    Points,
    /// Samples and pixels are comparable: draw the raw polyline.
    Polyline,
}
impl RenderStrategy {
    /// Visible samples above this multiple of the resolution are binned.
    pub const BINNED_RATIO: usize = 1;
    /// Visible samples times this factor below the resolution are drawn as points.
    pub const SPARSE_RATIO: usize = 4;
    pub fn select(visible_samples: usize, resolution: usize) -> Self {
        if visible_samples > resolution.saturating_mul(Self::BINNED_RATIO) {
            RenderStrategy::Binned
        } else if visible_samples.saturating_mul(Self::SPARSE_RATIO) < resolution {
            RenderStrategy::Points
        } else {
            RenderStrategy::Polyline
        }
    }
}
/// Min/max of the samples falling under one output column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MinMaxColumn {
    /// Offset of the column's first sample within the visible slice.
    pub x: usize,
    pub min: f32,
    pub max: f32,
}
/// Ready-to-draw detail waveform. X coordinates are sample offsets within the visible slice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DetailPlot {
    Bins(Vec<MinMaxColumn>),
    Points {
        markers: Vec<(f32, f32)>,
        curve: Vec<(f32, f32)>,
    },
    Polyline(Vec<(f32, f32)>),
}
impl DetailPlot {
    /// Build the plot for `samples` drawn across `resolution` pixels.
    ///
    /// The work done is bounded by `resolution` in the binned case; the other
    /// two cases only occur when there are at most `resolution` samples.
    pub fn build(samples: ArrayView1<'_, f32>, resolution: usize) -> Self {
        match RenderStrategy::select(samples.len(), resolution) {
            RenderStrategy::Binned => DetailPlot::Bins(min_max_columns(samples, resolution)),
            RenderStrategy::Points => {
                let markers = indexed(samples);
                let curve = interpolate_curve(&markers, resolution);
                DetailPlot::Points { markers, curve }
            }
            RenderStrategy::Polyline => DetailPlot::Polyline(indexed(samples)),
        }
    }
    pub fn strategy(&self) -> RenderStrategy {
        match self {
            DetailPlot::Bins(_) => RenderStrategy::Binned,
            DetailPlot::Points { .. } => RenderStrategy::Points,
            DetailPlot::Polyline(_) => RenderStrategy::Polyline,
        }
    }
}
/// Columns use the same floor split as the overview envelope, so the longer
/// columns are spread across the window rather than packed at its start.
fn min_max_columns(samples: ArrayView1<'_, f32>, resolution: usize) -> Vec<MinMaxColumn> {
    let range = 0..samples.len();
    (0..resolution)
        .map(|column| {
            let span = column_span(&range, resolution, column);
            let slice = samples.slice(s![span.start..span.end]);
            let (min, max) = slice
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            if slice.is_empty() {
                MinMaxColumn { x: span.start, min: 0.0, max: 0.0 }
            } else {
                MinMaxColumn { x: span.start, min, max }
            }
        })
        .collect()
}
fn indexed(samples: ArrayView1<'_, f32>) -> Vec<(f32, f32)> {
    samples.iter().enumerate().map(|(i, &v)| (i as f32, v)).collect()
}
/// Stineman interpolation through `points` evaluated at `resolution` evenly
/// spaced positions between the first and last point.
fn interpolate_curve(points: &[(f32, f32)], resolution: usize) -> Vec<(f32, f32)> {
    if points.len() < 2 || resolution == 0 {
        return points.to_vec();
    }
    let x: Vec<f64> = points.iter().map(|p| f64::from(p.0)).collect();
    let y: Vec<f64> = points.iter().map(|p| f64::from(p.1)).collect();
    let yp = slopes(&x, &y);
    let first = x[0];
    let last = x[x.len() - 1];
    let step = if resolution > 1 {
        (last - first) / (resolution - 1) as f64
    } else {
        0.0
    };
    (0..resolution)
        .map(|i| {
            let xi = if i + 1 == resolution && resolution > 1 { last } else { first + step * i as f64 };
            (xi as f32, stineman_at(xi, &x, &y, &yp) as f32)
        })
        .collect()
}
/// Slope estimate at each point: weighted mean of neighbouring secants, with
/// the end slopes reflected from their inner neighbour.
fn slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut yp = vec![0.0; n];
    let dx: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let dy: Vec<f64> = y.windows(2).map(|w| w[1] - w[0]).collect();
    let dydx: Vec<f64> = dy.iter().zip(&dx).map(|(dy, dx)| dy / dx).collect();
    for i in 1..n - 1 {
        yp[i] = (dydx[i - 1] * dx[i] + dydx[i] * dx[i - 1]) / (dx[i] + dx[i - 1]);
    }
    yp[0] = 2.0 * dy[0] / dx[0] - yp[1];
    yp[n - 1] = 2.0 * dy[n - 2] / dx[n - 2] - yp[n - 2];
    yp
}
fn stineman_at(xi: f64, x: &[f64], y: &[f64], yp: &[f64]) -> f64 {
    let n = x.len();
    let idx = x[1..n - 1].partition_point(|&v| v < xi);
    let (x0, x1) = (x[idx], x[idx + 1]);
    let (y0, y1) = (y[idx], y[idx + 1]);
    let secant = (y1 - y0) / (x1 - x0);
    let linear = y0 + secant * (xi - x0);
    let dy1 = (yp[idx] - secant) * (xi - x0);
    let dy2 = (yp[idx + 1] - secant) * (xi - x1);
    let product = dy1 * dy2;
    let correction = if product > 0.0 {
        1.0 / (dy1 + dy2)
    } else if product < 0.0 {
        (2.0 * xi - x0 - x1) / ((dy1 - dy2) * (x1 - x0))
    } else {
        0.0
    };
    linear + product * correction
}
