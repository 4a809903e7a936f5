use std::sync::atomic::{AtomicUsize, Ordering};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use once_cell::sync::OnceCell;
use crate::error::ViewError;
/// Immutable block of samples tagged with the frequency they were taken at.
///
/// Samples are stored channel-major (channels x samples). Summary statistics
/// are computed on first use and published once; later calls read the cache.
#[derive(Debug)]
pub struct Signal {
    samples: Array2<f32>,
    frequency_hz: f32,
    peak: OnceCell<f32>,
    rms: OnceCell<f32>,
    duration: OnceCell<f64>,
    evaluations: AtomicUsize,
}
impl Signal {
    /// Single-channel signal.
    pub fn new(samples: Vec<f32>, frequency_hz: f32) -> Result<Self, ViewError> {
        Self::from_array(Array1::from(samples).insert_axis(Axis(0)), frequency_hz)
    }
    /// Multi-channel signal; every channel must hold the same number of samples.
    pub fn from_channels(channels: Vec<Vec<f32>>, frequency_hz: f32) -> Result<Self, ViewError> {
        validate_frequency(frequency_hz)?;
        let expected = channels.first().ok_or(ViewError::NoChannels)?.len();
        for (channel, samples) in channels.iter().enumerate() {
            if samples.len() != expected {
                return Err(ViewError::ChannelMismatch {
                    channel,
                    expected,
                    actual: samples.len(),
                });
            }
        }
        let mut array = Array2::zeros((channels.len(), expected));
        for (mut row, samples) in array.rows_mut().into_iter().zip(&channels) {
            row.assign(&ArrayView1::from(samples.as_slice()));
        }
        Self::from_array(array, frequency_hz)
    }
    pub fn from_array(samples: Array2<f32>, frequency_hz: f32) -> Result<Self, ViewError> {
        validate_frequency(frequency_hz)?;
        if samples.nrows() == 0 {
            return Err(ViewError::NoChannels);
        }
        Ok(Self {
            samples,
            frequency_hz,
            peak: OnceCell::new(),
            rms: OnceCell::new(),
            duration: OnceCell::new(),
            evaluations: AtomicUsize::new(0),
        })
    }
    pub fn frequency_hz(&self) -> f32 {
        self.frequency_hz
    }
    pub fn channel_count(&self) -> usize {
        self.samples.nrows()
    }
    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.samples.ncols()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.channel_count()).then(|| self.samples.row(index))
    }
    pub fn samples(&self) -> ArrayView2<'_, f32> {
        self.samples.view()
    }
    /// Per-sample mean across channels, at the same frequency.
    pub fn to_mono(&self) -> Result<Signal, ViewError> {
        let mono = self
            .samples
            .mean_axis(Axis(0))
            .ok_or(ViewError::NoChannels)?;
        Self::from_array(mono.insert_axis(Axis(0)), self.frequency_hz)
    }
    /// Largest absolute sample value.
    pub fn peak_magnitude(&self) -> f32 {
        *self.peak.get_or_init(|| {
            self.evaluations.fetch_add(1, Ordering::Relaxed);
            self.samples.iter().fold(0.0f32, |acc, v| acc.max(v.abs()))
        })
    }
    /// Root mean square over every sample; zero for an empty signal.
    pub fn rms(&self) -> f32 {
        *self.rms.get_or_init(|| {
            self.evaluations.fetch_add(1, Ordering::Relaxed);
            root_mean_square(self.samples.iter().copied(), self.samples.len())
        })
    }
    pub fn duration_seconds(&self) -> f64 {
        *self.duration.get_or_init(|| {
            self.evaluations.fetch_add(1, Ordering::Relaxed);
            self.len() as f64 / f64::from(self.frequency_hz)
        })
    }
    /// Number of times a cached statistic has actually been computed.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
    /// Drops the cached statistics so the next read recomputes them.
    pub fn invalidate_stats(&mut self) {
        self.peak.take();
        self.rms.take();
        self.duration.take();
    }
}
fn validate_frequency(frequency_hz: f32) -> Result<(), ViewError> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Ok(())
    } else {
        Err(ViewError::InvalidSignal {
            frequency: frequency_hz,
        })
    }
}
/// Accumulates in f64 so long slices keep their precision.
pub(crate) fn root_mean_square(samples: impl Iterator<Item = f32>, len: usize) -> f32 {
    if len == 0 {
        return 0.0;
    }
    let sum_sq: f64 = samples.map(|v| f64::from(v) * f64::from(v)).sum();
    (sum_sq / len as f64).sqrt() as f32
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn rejects_non_positive_frequency() {
        for frequency in [0.0, -44100.0, f32::NAN] {
            let err = Signal::new(vec![0.0; 4], frequency).unwrap_err();
            assert!(matches!(err, ViewError::InvalidSignal { .. }));
        }
    }
    #[test]
    fn stats_match_hand_computed_values() -> anyhow::Result<()> {
        let signal = Signal::new(vec![0.5, -1.0, 0.5, 0.0], 4.0)?;
        assert_eq!(signal.peak_magnitude(), 1.0);
        assert!((signal.rms() - (1.5f32 / 4.0).sqrt()).abs() < 1e-6);
        assert_eq!(signal.duration_seconds(), 1.0);
        Ok(())
    }
    #[test]
    fn stats_are_computed_once() -> anyhow::Result<()> {
        let signal = Signal::new(vec![0.25; 1024], 48000.0)?;
        assert_eq!(signal.evaluations(), 0);
        let first = (signal.peak_magnitude(), signal.rms(), signal.duration_seconds());
        assert_eq!(signal.evaluations(), 3);
        let second = (signal.peak_magnitude(), signal.rms(), signal.duration_seconds());
        assert_eq!(first, second);
        assert_eq!(signal.evaluations(), 3);
        Ok(())
    }
    #[test]
    fn invalidation_forces_recompute() -> anyhow::Result<()> {
        let mut signal = Signal::new(vec![0.5, -0.5], 2.0)?;
        signal.peak_magnitude();
        signal.invalidate_stats();
        assert_eq!(signal.peak_magnitude(), 0.5);
        assert_eq!(signal.evaluations(), 2);
        Ok(())
    }
    #[test]
    fn empty_signal_has_zero_stats() -> anyhow::Result<()> {
        let signal = Signal::new(Vec::new(), 8000.0)?;
        assert!(signal.is_empty());
        assert_eq!(signal.peak_magnitude(), 0.0);
        assert_eq!(signal.rms(), 0.0);
        assert_eq!(signal.duration_seconds(), 0.0);
        Ok(())
    }
    #[test]
    fn channels_must_share_a_length() {
        let err = Signal::from_channels(vec![vec![0.0; 8], vec![0.0; 7]], 100.0).unwrap_err();
        match err {
            ViewError::ChannelMismatch {
                channel,
                expected,
                actual,
            } => assert_eq!((channel, expected, actual), (1, 8, 7)),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            Signal::from_channels(Vec::new(), 100.0),
            Err(ViewError::NoChannels)
        ));
    }
    #[test]
    fn mono_is_the_channel_mean() -> anyhow::Result<()> {
        let stereo = Signal::from_channels(vec![vec![1.0, 0.0, -0.5], vec![0.0, 0.0, 0.5]], 3.0)?;
        assert_eq!(stereo.channel_count(), 2);
        let mono = stereo.to_mono()?;
        assert_eq!(mono.channel_count(), 1);
        assert_eq!(mono.channel(0).unwrap().to_vec(), vec![0.5, 0.0, 0.0]);
        assert_eq!(mono.frequency_hz(), 3.0);
        Ok(())
    }
}
