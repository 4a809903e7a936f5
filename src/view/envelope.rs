use std::ops::Range;
use ndarray::{s, ArrayView1};
use serde::Serialize;
use crate::audio::signal::root_mean_square;
use crate::audio::Signal;
use crate::error::ViewError;
/// Peak magnitude and RMS of one channel over one column's slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ChannelLevel {
    pub peak: f32,
    pub rms: f32,
}
/// One output column of the overview. `right` mirrors `left` for mono input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EnvelopeColumn {
    pub left: ChannelLevel,
    pub right: ChannelLevel,
}
/// Per-column reduction of a sample range, one column per output pixel.
#[derive(Clone, Debug, Serialize)]
pub struct BinnedEnvelope {
    range: Range<usize>,
    columns: Vec<EnvelopeColumn>,
}
impl BinnedEnvelope {
    /// Reduce `range` of `signal` to exactly `width` columns.
    ///
    /// The range is clamped to the signal. Channels past the second are ignored.
    pub fn compute(signal: &Signal, range: Range<usize>, width: usize) -> Self {
        let range = clamp_range(range, signal.len());
        let Some(left) = signal.channel(0) else {
            return Self {
                range,
                columns: vec![EnvelopeColumn::default(); width],
            };
        };
        let right = signal.channel(1).unwrap_or(left);
        let columns = (0..width)
            .map(|column| {
                let span = column_span(&range, width, column);
                EnvelopeColumn {
                    left: channel_level(left.slice(s![span.start..span.end])),
                    right: channel_level(right.slice(s![span.start..span.end])),
                }
            })
            .collect();
        Self { range, columns }
    }
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
    pub fn len(&self) -> usize {
        self.columns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
    pub fn columns(&self) -> &[EnvelopeColumn] {
        &self.columns
    }
    pub fn column(&self, index: usize) -> Result<&EnvelopeColumn, ViewError> {
        self.columns.get(index).ok_or(ViewError::IndexOutOfRange {
            index,
            len: self.columns.len(),
        })
    }
    /// Sample indices reduced into column `index`.
    pub fn span(&self, index: usize) -> Result<Range<usize>, ViewError> {
        if index >= self.columns.len() {
            return Err(ViewError::IndexOutOfRange {
                index,
                len: self.columns.len(),
            });
        }
        Ok(column_span(&self.range, self.columns.len(), index))
    }
}
/// `[start + i*len/width, start + (i+1)*len/width)` with floor division.
///
/// Adjacent spans differ in length by at most one sample and together tile
/// the range exactly. `width` must be non-zero.
pub fn column_span(range: &Range<usize>, width: usize, column: usize) -> Range<usize> {
    let len = range.len() as u128;
    let width = width as u128;
    let column = column as u128;
    let start = range.start + (column * len / width) as usize;
    let end = range.start + ((column + 1) * len / width) as usize;
    start..end
}
pub(crate) fn clamp_range(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    start..end
}
fn channel_level(slice: ArrayView1<'_, f32>) -> ChannelLevel {
    ChannelLevel {
        peak: slice.iter().fold(0.0f32, |acc, v| acc.max(v.abs())),
        rms: root_mean_square(slice.iter().copied(), slice.len()),
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    #[test]
    fn one_second_at_441_columns_is_100_samples_each() -> anyhow::Result<()> {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (2.0 * std::f32::consts::PI * 441.0 * i as f32 / 44100.0).sin())
            .collect();
        let signal = Signal::new(samples, 44100.0)?;
        let envelope = BinnedEnvelope::compute(&signal, 0..signal.len(), 441);
        assert_eq!(envelope.len(), 441);
        for index in 0..441 {
            assert_eq!(envelope.span(index)?.len(), 100);
            let column = envelope.column(index)?;
            assert!(column.left.peak > 0.99 && column.left.peak <= 1.0);
            assert!((column.left.rms - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3);
            assert_eq!(column.left, column.right);
        }
        Ok(())
    }
    #[test]
    fn column_count_is_always_the_width() -> anyhow::Result<()> {
        let signal = Signal::new(vec![0.5; 5000], 1000.0)?;
        for len in [0usize, 1, 7, 99, 100, 101, 4999, 5000] {
            for width in [0usize, 1, 3, 100, 640] {
                let envelope = BinnedEnvelope::compute(&signal, 0..len, width);
                assert_eq!(envelope.len(), width);
            }
        }
        Ok(())
    }
    #[test]
    fn spans_tile_the_range_exactly() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let start = rng.gen_range(0..10_000usize);
            let len = rng.gen_range(0..50_000usize);
            let width = rng.gen_range(1..2_000usize);
            let range = start..start + len;
            let mut cursor = range.start;
            let mut lengths = Vec::with_capacity(width);
            for column in 0..width {
                let span = column_span(&range, width, column);
                assert_eq!(span.start, cursor);
                cursor = span.end;
                lengths.push(span.len());
            }
            assert_eq!(cursor, range.end);
            assert_eq!(lengths.iter().sum::<usize>(), len);
            let min = lengths.iter().min().copied().unwrap_or(0);
            let max = lengths.iter().max().copied().unwrap_or(0);
            assert!(max - min <= 1);
        }
    }
    #[test]
    fn empty_slices_report_zero() -> anyhow::Result<()> {
        let signal = Signal::new(vec![1.0, -1.0, 1.0], 3.0)?;
        let envelope = BinnedEnvelope::compute(&signal, 0..3, 8);
        let empty = envelope
            .columns()
            .iter()
            .zip(0..)
            .filter(|(_, index)| envelope.span(*index).map(|s| s.is_empty()).unwrap_or(false))
            .count();
        assert_eq!(empty, 5);
        assert_eq!(*envelope.column(0)?, EnvelopeColumn::default());
        assert_eq!(envelope.column(2)?.left.peak, 1.0);
        Ok(())
    }
    #[test]
    fn stereo_columns_report_each_channel() -> anyhow::Result<()> {
        let signal = Signal::from_channels(
            vec![vec![0.5, -0.5, 0.0, 0.0], vec![0.0, 0.0, -0.25, 0.25]],
            4.0,
        )?;
        let envelope = BinnedEnvelope::compute(&signal, 0..4, 2);
        let first = envelope.column(0)?;
        assert_eq!(first.left, ChannelLevel { peak: 0.5, rms: 0.5 });
        assert_eq!(first.right, ChannelLevel::default());
        let second = envelope.column(1)?;
        assert_eq!(second.left, ChannelLevel::default());
        assert_eq!(second.right, ChannelLevel { peak: 0.25, rms: 0.25 });
        Ok(())
    }
    #[test]
    fn range_is_clamped_and_offset() -> anyhow::Result<()> {
        let signal = Signal::new((0..10).map(|i| i as f32 / 10.0).collect(), 10.0)?;
        let envelope = BinnedEnvelope::compute(&signal, 6..40, 2);
        assert_eq!(envelope.range(), 6..10);
        assert_eq!(envelope.span(0)?, 6..8);
        assert_eq!(envelope.column(1)?.left.peak, 0.9);
        assert!(matches!(
            envelope.column(2),
            Err(ViewError::IndexOutOfRange { index: 2, len: 2 })
        ));
        Ok(())
    }
}
