use thiserror::Error;
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("signal frequency must be greater than zero, got {frequency}")]
    InvalidSignal { frequency: f32 },
    #[error("channel length mismatch: channel {channel} has {actual} samples, expected {expected}")]
    ChannelMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },
    #[error("audio source has no channels")]
    NoChannels,
    #[error("zoom factor must be a positive finite number, got {factor}")]
    InvalidZoomFactor { factor: f64 },
    #[error("column index {index} out of range for {len} columns")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("failed to decode audio source: {0}")]
    Decode(String),
    #[error("invalid viewer config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ViewError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ViewError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ViewError {
    fn from(value: image::ImageError) -> Self {
        ViewError::Plot(value.to_string())
    }
}
