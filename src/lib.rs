//! View-dependent downsampling for long audio recordings.
//!
//! A [`Track`] holds the decoded signal, each viewer owns a [`ViewInterval`],
//! and the visible sample range is reduced to at most one column per pixel by
//! [`BinnedEnvelope`], [`FramedHistogram`] or a [`DetailPlot`] chosen by
//! [`RenderStrategy`].
pub mod audio;
pub mod config;
pub mod error;
pub mod view;
pub use audio::{AudioDecoder, DecodedAudio, ManualDecoder, Signal, Track};
pub use config::{RasterStyle, ViewerConfig, ZoomSteps};
pub use error::ViewError;
pub use view::{
    BinnedEnvelope, DetailFrame, DetailPlot, FramedHistogram, Interval, IntervalChange,
    RedrawScheduler, RenderStrategy, Resolution, ViewInterval, WaveformViewer,
};
