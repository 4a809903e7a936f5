// src/view/mod.rs
// Everything that maps a window over a track onto output columns.
pub mod envelope;
pub mod histogram;
pub mod interval;
pub mod pipeline;
pub mod plot;
pub mod schedule;
pub mod strategy;
pub use envelope::{column_span, BinnedEnvelope, ChannelLevel, EnvelopeColumn};
pub use histogram::FramedHistogram;
pub use interval::{DragAnchor, Interval, IntervalChange, ViewInterval};
pub use pipeline::{DetailFrame, Resolution, WaveformViewer};
pub use plot::{highlight_box, raster_image, render_detail_png, render_overview_png, render_raster_png, PlotStyle};
pub use schedule::RedrawScheduler;
pub use strategy::{DetailPlot, MinMaxColumn, RenderStrategy};
