use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::error::ViewError;
/// Decoded audio handed over by a decoder: floating-point samples in [-1, 1].
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    pub sample_rate_hz: f32,
    pub channels: Vec<Vec<f32>>, // channels x samples
}
impl DecodedAudio {
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
    pub fn samples_per_channel(&self) -> Option<usize> {
        self.channels.first().map(|c| c.len())
    }
    /// `None` for a missing channel, a rate that is not a positive finite
    /// number, or a length too long to express as a `Duration`.
    pub fn duration(&self) -> Option<Duration> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return None;
        }
        let len = self.samples_per_channel()?;
        Duration::try_from_secs_f64(len as f64 / f64::from(self.sample_rate_hz)).ok()
    }
}
/// Anything that can turn a path into sample buffers.
pub trait AudioDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, ViewError>;
}
/// In-memory decoder useful for tests and synthetic sessions.
#[derive(Default)]
pub struct ManualDecoder {
    entries: HashMap<PathBuf, DecodedAudio>,
}
impl ManualDecoder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_entry(mut self, path: impl Into<PathBuf>, audio: DecodedAudio) -> Self {
        self.insert(path, audio);
        self
    }
    pub fn insert(&mut self, path: impl Into<PathBuf>, audio: DecodedAudio) {
        self.entries.insert(path.into(), audio);
    }
}
impl AudioDecoder for ManualDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, ViewError> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| ViewError::Decode(format!("no audio registered for {}", path.display())))
    }
}
