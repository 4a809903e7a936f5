use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use log::debug;
use ndarray::s;
use serde::Serialize;
use crate::audio::Track;
use crate::config::ViewerConfig;
use crate::error::ViewError;
use crate::view::envelope::BinnedEnvelope;
use crate::view::histogram::FramedHistogram;
use crate::view::interval::{Interval, IntervalChange, ViewInterval};
use crate::view::schedule::RedrawScheduler;
use crate::view::strategy::{DetailPlot, RenderStrategy};
/// Output size of a viewer in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}
/// Detail waveform for the current window, ready for the presentation layer.
#[derive(Clone, Debug, Serialize)]
pub struct DetailFrame {
    pub interval: Interval,
    pub range: Range<usize>,
    pub strategy: RenderStrategy,
    pub plot: DetailPlot,
}
struct RasterCache {
    interval: Interval,
    resolution: Resolution,
    histogram: FramedHistogram,
}
/// One viewer over a track: owns its window, output size and pending redraw.
pub struct WaveformViewer {
    track: Arc<Track>,
    interval: ViewInterval,
    resolution: Resolution,
    scheduler: RedrawScheduler,
    raster: Option<RasterCache>,
}
impl WaveformViewer {
    pub fn new(track: Arc<Track>, resolution: Resolution, config: &ViewerConfig) -> Self {
        let interval = ViewInterval::with_config(track.len(), config);
        Self {
            track,
            interval,
            resolution,
            scheduler: RedrawScheduler::new(config.redraw_delay()),
            raster: None,
        }
    }
    pub fn track(&self) -> &Arc<Track> {
        &self.track
    }
    pub fn interval(&self) -> Interval {
        self.interval.interval()
    }
    pub fn view(&self) -> &ViewInterval {
        &self.interval
    }
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
    pub fn visible_range(&self) -> Range<usize> {
        self.interval.sample_range()
    }
    pub fn resize(&mut self, resolution: Resolution, now: Instant) -> bool {
        if resolution == self.resolution {
            return false;
        }
        debug!(
            "viewer {} resized to {}x{}",
            self.track.label(),
            resolution.width,
            resolution.height
        );
        self.resolution = resolution;
        self.scheduler.request(now);
        true
    }
    pub fn request(&mut self, begin: f64, end: f64, now: Instant) -> IntervalChange {
        let change = self.interval.request(begin, end);
        self.note(change, now)
    }
    pub fn zoom(
        &mut self,
        factor: f64,
        pivot: Option<f64>,
        now: Instant,
    ) -> Result<IntervalChange, ViewError> {
        let change = self.interval.zoom(factor, pivot)?;
        Ok(self.note(change, now))
    }
    pub fn pan(&mut self, delta: f64, now: Instant) -> IntervalChange {
        let change = self.interval.pan(delta);
        self.note(change, now)
    }
    pub fn follow(&mut self, other: Interval, now: Instant) -> IntervalChange {
        let change = self.interval.follow(other);
        self.note(change, now)
    }
    fn note(&mut self, change: IntervalChange, now: Instant) -> IntervalChange {
        if change.changed {
            self.scheduler.request(now);
        }
        change
    }
    pub fn redraw_pending(&self) -> bool {
        self.scheduler.is_pending()
    }
    /// Envelope of the whole track at the viewer's width.
    pub fn overview(&self) -> BinnedEnvelope {
        let signal = self.track.envelope_signal();
        BinnedEnvelope::compute(signal, 0..signal.len(), self.resolution.width)
    }
    /// Envelope of the visible window only.
    pub fn envelope(&self) -> BinnedEnvelope {
        BinnedEnvelope::compute(
            self.track.envelope_signal(),
            self.visible_range(),
            self.resolution.width,
        )
    }
    /// Histogram raster of the visible window, one frame per column and
    /// `height` bins per frame. Rebuilt only when the window or size changed.
    pub fn raster(&mut self) -> &FramedHistogram {
        let interval = self.interval.interval();
        let resolution = self.resolution;
        let cache = match self.raster.take() {
            Some(cache) if cache.interval == interval && cache.resolution == resolution => cache,
            _ => {
                debug!(
                    "rebuilding raster for {:.6}..{:.6} at {}x{}",
                    interval.begin, interval.end, resolution.width, resolution.height
                );
                RasterCache {
                    interval,
                    resolution,
                    histogram: FramedHistogram::new(
                        Arc::clone(self.track.mono()),
                        self.interval.sample_range(),
                        resolution.width,
                        resolution.height + 1,
                    ),
                }
            }
        };
        &self.raster.insert(cache).histogram
    }
    pub fn detail(&self) -> DetailFrame {
        let range = self.visible_range();
        let mono = self.track.mono();
        let plot = match mono.channel(0) {
            Some(channel) => DetailPlot::build(
                channel.slice(s![range.start..range.end]),
                self.resolution.width,
            ),
            None => DetailPlot::Polyline(Vec::new()),
        };
        DetailFrame {
            interval: self.interval.interval(),
            strategy: plot.strategy(),
            range,
            plot,
        }
    }
    /// Run the pending redraw if its debounce delay has elapsed.
    pub fn take_redraw(&mut self, now: Instant) -> Option<DetailFrame> {
        if !self.scheduler.is_due(now) || !self.scheduler.start() {
            return None;
        }
        let frame = self.detail();
        self.scheduler.finish(now);
        Some(frame)
    }
}
