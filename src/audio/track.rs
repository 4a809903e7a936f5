use std::path::Path;
use std::sync::Arc;
use log::info;
use crate::audio::source::{AudioDecoder, DecodedAudio};
use crate::audio::Signal;
use crate::error::ViewError;
/// A loaded audio source together with the signals the viewers read from.
///
/// `mono` feeds every single-channel algorithm. `original` is only present
/// for multi-channel sources and backs per-channel envelope rendering.
#[derive(Debug)]
pub struct Track {
    label: String,
    mono: Arc<Signal>,
    original: Option<Arc<Signal>>,
}
impl Track {
    pub fn load<D: AudioDecoder + ?Sized>(decoder: &D, path: &Path) -> Result<Self, ViewError> {
        let audio = decoder.decode(path)?;
        Self::from_decoded(path.display().to_string(), audio)
    }
    pub fn from_decoded(label: impl Into<String>, audio: DecodedAudio) -> Result<Self, ViewError> {
        let signal = Signal::from_channels(audio.channels, audio.sample_rate_hz)?;
        Self::from_signal(label, signal)
    }
    pub fn from_signal(label: impl Into<String>, signal: Signal) -> Result<Self, ViewError> {
        let label = label.into();
        let track = if signal.channel_count() > 1 {
            let mono = signal.to_mono()?;
            Self {
                label,
                mono: Arc::new(mono),
                original: Some(Arc::new(signal)),
            }
        } else {
            Self {
                label,
                mono: Arc::new(signal),
                original: None,
            }
        };
        info!(
            "loaded track {}: {} channel(s), {} samples @ {} Hz",
            track.label,
            track.channel_count(),
            track.mono.len(),
            track.mono.frequency_hz()
        );
        Ok(track)
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn mono(&self) -> &Arc<Signal> {
        &self.mono
    }
    pub fn original(&self) -> Option<&Arc<Signal>> {
        self.original.as_ref()
    }
    /// Signal used for left/right envelopes: the original when it exists.
    pub fn envelope_signal(&self) -> &Arc<Signal> {
        self.original.as_ref().unwrap_or(&self.mono)
    }
    pub fn channel_count(&self) -> usize {
        self.envelope_signal().channel_count()
    }
    pub fn len(&self) -> usize {
        self.mono.len()
    }
    pub fn is_empty(&self) -> bool {
        self.mono.is_empty()
    }
}
