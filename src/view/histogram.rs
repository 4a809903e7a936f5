use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use ndarray::s;
use once_cell::sync::OnceCell;
use crate::audio::Signal;
use crate::error::ViewError;
use crate::view::envelope::clamp_range;
/// Amplitude histograms of equal-length frames, one frame per output column.
///
/// Frames are `hop = floor(len / frame_count)` samples long and start at
/// `range.start + i * hop`; samples past the last full frame are not counted.
/// Samples outside [-1, 1] are clamped into the edge bins and NaN samples
/// are skipped, so a frame of finite samples always sums to 1.
/// Each column is binned on first access and cached for the lifetime of the
/// instance, so a new view or resolution means a new `FramedHistogram`.
#[derive(Debug)]
pub struct FramedHistogram {
    signal: Arc<Signal>,
    range: Range<usize>,
    hop: usize,
    edges: Vec<f32>,
    columns: Vec<OnceCell<Vec<f32>>>,
    evaluations: AtomicUsize,
}
impl FramedHistogram {
    /// `bin_count` is the number of edges spread evenly over [-1, 1], which
    /// yields `bin_count - 1` bins per column. Only channel 0 is read.
    pub fn new(signal: Arc<Signal>, range: Range<usize>, frame_count: usize, bin_count: usize) -> Self {
        let range = clamp_range(range, signal.len());
        let hop = range.len().checked_div(frame_count).unwrap_or(0);
        Self {
            signal,
            range,
            hop,
            edges: linspace(-1.0, 1.0, bin_count),
            columns: (0..frame_count).map(|_| OnceCell::new()).collect(),
            evaluations: AtomicUsize::new(0),
        }
    }
    pub fn len(&self) -> usize {
        self.columns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
    /// Samples per frame.
    pub fn hop(&self) -> usize {
        self.hop
    }
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
    pub fn bin_edges(&self) -> &[f32] {
        &self.edges
    }
    pub fn bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
    /// Sample indices feeding column `index`.
    pub fn frame_span(&self, index: usize) -> Result<Range<usize>, ViewError> {
        self.check_index(index)?;
        let start = self.range.start + index * self.hop;
        Ok(start..start + self.hop)
    }
    /// Occupancy of each bin in column `index`, normalized by the frame length.
    pub fn get(&self, index: usize) -> Result<&[f32], ViewError> {
        self.check_index(index)?;
        let levels = self.columns[index].get_or_init(|| self.compute_column(index));
        Ok(levels.as_slice())
    }
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index).ok())
    }
    /// Number of columns that have actually been binned so far.
    pub fn computed_columns(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
    fn check_index(&self, index: usize) -> Result<(), ViewError> {
        if index < self.columns.len() {
            Ok(())
        } else {
            Err(ViewError::IndexOutOfRange {
                index,
                len: self.columns.len(),
            })
        }
    }
    fn compute_column(&self, index: usize) -> Vec<f32> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let bins = self.bins();
        let mut counts = vec![0u32; bins];
        let Some(channel) = self.signal.channel(0) else {
            return vec![0.0; bins];
        };
        if bins == 0 || self.hop == 0 {
            return vec![0.0; bins];
        }
        let start = self.range.start + index * self.hop;
        for &sample in channel.slice(s![start..start + self.hop]) {
            if sample.is_nan() {
                continue;
            }
            counts[bin_index(sample, bins)] += 1;
        }
        let normalize = 1.0 / self.hop as f32;
        counts.into_iter().map(|c| c as f32 * normalize).collect()
    }
}
/// Bins are half-open `[e_i, e_i+1)` except the last, which also takes +1.0.
fn bin_index(sample: f32, bins: usize) -> usize {
    let position = (f64::from(sample.clamp(-1.0, 1.0)) + 1.0) / 2.0 * bins as f64;
    (position.floor() as usize).min(bins - 1)
}
fn linspace(start: f32, stop: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f32;
            (0..count)
                .map(|i| if i == count - 1 { stop } else { start + step * i as f32 })
                .collect()
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn ramp(len: usize) -> Arc<Signal> {
        let samples = (0..len)
            .map(|i| -1.0 + 2.0 * i as f32 / len.max(1) as f32)
            .collect();
        Arc::new(Signal::new(samples, 1000.0).expect("valid frequency"))
    }
    #[test]
    fn frames_use_floor_hop_and_drop_the_tail() -> anyhow::Result<()> {
        let mut samples = vec![0.0f32; 1003];
        samples[1000..].fill(1.0);
        let signal = Arc::new(Signal::new(samples, 1000.0)?);
        let histogram = FramedHistogram::new(signal, 0..1003, 10, 5);
        assert_eq!(histogram.len(), 10);
        assert_eq!(histogram.hop(), 100);
        assert_eq!(histogram.frame_span(9)?, 900..1000);
        for levels in histogram.iter() {
            assert_eq!(levels, &[0.0, 0.0, 1.0, 0.0]);
        }
        Ok(())
    }
    #[test]
    fn levels_are_occupancy_fractions() -> anyhow::Result<()> {
        let histogram = FramedHistogram::new(ramp(4096), 0..4096, 16, 33);
        assert_eq!(histogram.bins(), 32);
        for index in 0..histogram.len() {
            let levels = histogram.get(index)?;
            assert_eq!(levels.len(), 32);
            assert!(levels.iter().all(|v| (0.0..=1.0).contains(v)));
            let raw: f32 = levels.iter().map(|v| v * histogram.hop() as f32).sum();
            assert!((raw - histogram.hop() as f32).abs() < 1e-3);
        }
        Ok(())
    }
    #[test]
    fn columns_are_computed_once() -> anyhow::Result<()> {
        let histogram = FramedHistogram::new(ramp(1000), 0..1000, 10, 9);
        assert_eq!(histogram.computed_columns(), 0);
        let first = histogram.get(3)?.to_vec();
        let second = histogram.get(3)?.to_vec();
        assert_eq!(first, second);
        assert_eq!(histogram.computed_columns(), 1);
        histogram.get(4)?;
        assert_eq!(histogram.computed_columns(), 2);
        Ok(())
    }
    #[test]
    fn out_of_range_column_is_an_error() {
        let histogram = FramedHistogram::new(ramp(100), 0..100, 4, 3);
        assert!(matches!(
            histogram.get(4),
            Err(ViewError::IndexOutOfRange { index: 4, len: 4 })
        ));
    }
    #[test]
    fn edges_and_extreme_samples() -> anyhow::Result<()> {
        let signal = Arc::new(Signal::new(vec![-1.0, 1.0, 1.5, -0.25], 4.0)?);
        let histogram = FramedHistogram::new(signal, 0..4, 1, 5);
        assert_eq!(histogram.bin_edges(), &[-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(histogram.get(0)?, &[0.25, 0.25, 0.0, 0.5]);
        Ok(())
    }
    #[test]
    fn more_frames_than_samples_gives_empty_columns() -> anyhow::Result<()> {
        let histogram = FramedHistogram::new(ramp(5), 0..5, 8, 4);
        assert_eq!(histogram.hop(), 0);
        assert_eq!(histogram.get(7)?, &[0.0, 0.0, 0.0]);
        Ok(())
    }
    #[test]
    fn frames_start_at_the_range_offset() -> anyhow::Result<()> {
        let mut samples = vec![-1.0f32; 200];
        samples[100..].fill(1.0);
        let signal = Arc::new(Signal::new(samples, 200.0)?);
        let histogram = FramedHistogram::new(signal, 100..200, 2, 3);
        assert_eq!(histogram.frame_span(1)?, 150..200);
        assert_eq!(histogram.get(0)?, &[0.0, 1.0]);
        Ok(())
    }
}
