use std::ops::Range;
use log::trace;
use serde::Serialize;
use crate::config::{ViewerConfig, ZoomSteps};
use crate::error::ViewError;
/// Fractional window over a signal's duration, 0 <= begin <= end <= 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Interval {
    pub begin: f64,
    pub end: f64,
}
impl Interval {
    pub const FULL: Interval = Interval {
        begin: 0.0,
        end: 1.0,
    };
    pub fn width(&self) -> f64 {
        self.end - self.begin
    }
    pub fn midpoint(&self) -> f64 {
        (self.begin + self.end) / 2.0
    }
    pub fn contains(&self, pos: f64) -> bool {
        pos >= self.begin && pos <= self.end
    }
    pub fn is_full(&self) -> bool {
        self.begin <= 0.0 && self.end >= 1.0
    }
}
/// Result of a view request: where the window ended up and whether it moved.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IntervalChange {
    pub interval: Interval,
    pub changed: bool,
}
/// Offset between the grab position and the window's left edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragAnchor {
    offset: f64,
}
/// The visible slice of one viewer. Every mutation goes through [`ViewInterval::request`].
#[derive(Clone, Debug)]
pub struct ViewInterval {
    current: Interval,
    total_samples: usize,
    min_samples: usize,
    zoom_steps: ZoomSteps,
}
impl ViewInterval {
    pub const DEFAULT_MIN_SAMPLES: usize = 32;
    pub fn new(total_samples: usize) -> Self {
        Self {
            current: Interval::FULL,
            total_samples,
            min_samples: Self::DEFAULT_MIN_SAMPLES,
            zoom_steps: ZoomSteps::default(),
        }
    }
    pub fn with_config(total_samples: usize, config: &ViewerConfig) -> Self {
        Self {
            current: Interval::FULL,
            total_samples,
            min_samples: config.min_visible_samples,
            zoom_steps: config.zoom,
        }
    }
    pub fn interval(&self) -> Interval {
        self.current
    }
    pub fn begin(&self) -> f64 {
        self.current.begin
    }
    pub fn end(&self) -> f64 {
        self.current.end
    }
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }
    /// Narrowest allowed width as a fraction of the whole signal.
    pub fn min_width(&self) -> f64 {
        if self.total_samples == 0 {
            return 1.0;
        }
        (self.min_samples as f64 / self.total_samples as f64).min(1.0)
    }
    /// Clamp, widen and slide the requested window, then make it current.
    ///
    /// A window narrower than [`ViewInterval::min_width`] grows symmetrically
    /// about its midpoint; if that pushes it past either edge it is slid
    /// back inside [0, 1]. Non-finite requests leave the view untouched.
    pub fn request(&mut self, begin: f64, end: f64) -> IntervalChange {
        if !begin.is_finite() || !end.is_finite() {
            return IntervalChange {
                interval: self.current,
                changed: false,
            };
        }
        let resolved = resolve(begin, end, self.min_width());
        let changed = resolved != self.current;
        if changed {
            trace!(
                "view interval {:.6}..{:.6} -> {:.6}..{:.6}",
                self.current.begin,
                self.current.end,
                resolved.begin,
                resolved.end
            );
            self.current = resolved;
        }
        IntervalChange {
            interval: resolved,
            changed,
        }
    }
    /// Scale the width by `factor`, keeping `pivot` (or the midpoint) in place.
    pub fn zoom(&mut self, factor: f64, pivot: Option<f64>) -> Result<IntervalChange, ViewError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewError::InvalidZoomFactor { factor });
        }
        let Interval { begin, end } = self.current;
        let pivot = pivot
            .filter(|p| p.is_finite())
            .unwrap_or_else(|| self.current.midpoint());
        let new_begin = pivot - (pivot - begin) * factor;
        let new_end = pivot + (end - pivot) * factor;
        Ok(self.request(new_begin, new_end))
    }
    /// One wheel notch towards the signal.
    pub fn zoom_in(&mut self, pivot: Option<f64>) -> Result<IntervalChange, ViewError> {
        self.zoom(self.zoom_steps.zoom_in, pivot)
    }
    pub fn zoom_out(&mut self, pivot: Option<f64>) -> Result<IntervalChange, ViewError> {
        self.zoom(self.zoom_steps.zoom_out, pivot)
    }
    pub fn pan(&mut self, delta: f64) -> IntervalChange {
        self.request(self.current.begin + delta, self.current.end + delta)
    }
    /// Start a drag if `pos` falls inside the current window.
    pub fn grab(&self, pos: f64) -> Option<DragAnchor> {
        self.current.contains(pos).then(|| DragAnchor {
            offset: pos - self.current.begin,
        })
    }
    /// Move the window so the grabbed point sits under `pos`.
    pub fn drag_to(&mut self, anchor: DragAnchor, pos: f64) -> IntervalChange {
        let width = self.current.width();
        let begin = pos - anchor.offset;
        self.request(begin, begin + width)
    }
    /// Adopt the window of a linked viewer.
    pub fn follow(&mut self, other: Interval) -> IntervalChange {
        self.request(other.begin, other.end)
    }
    /// Concrete sample indices covered by the window, `floor(begin * n)..floor(end * n)`.
    ///
    /// Flooring can lose a sample off a window that is exactly the minimum
    /// width, so the range is widened to `min(min_samples, n)` samples, to the
    /// right first and leftward once it meets the end of the signal.
    pub fn sample_range(&self) -> Range<usize> {
        let total = self.total_samples as f64;
        let mut start = ((self.current.begin * total).floor() as usize).min(self.total_samples);
        let mut end = ((self.current.end * total).floor() as usize)
            .min(self.total_samples)
            .max(start);
        let needed = self.min_samples.min(self.total_samples);
        if end - start < needed {
            end = (start + needed).min(self.total_samples);
            start = end - needed;
        }
        start..end
    }
}
fn resolve(begin: f64, end: f64, min_width: f64) -> Interval {
    let mut begin = begin.clamp(0.0, 1.0);
    let mut end = end.clamp(0.0, 1.0);
    if begin > end {
        std::mem::swap(&mut begin, &mut end);
    }
    if end - begin < min_width {
        let mid = (begin + end) / 2.0;
        begin = mid - min_width / 2.0;
        end = mid + min_width / 2.0;
        if begin < 0.0 {
            end -= begin;
            begin = 0.0;
        }
        if end > 1.0 {
            begin -= end - 1.0;
            end = 1.0;
        }
        begin = begin.max(0.0);
        end = end.min(1.0);
        // Rounding can leave the window an ulp or two short.
        while end - begin < min_width {
            if begin > 0.0 {
                begin = (begin - f64::EPSILON).max(0.0);
            } else if end < 1.0 {
                end = (end + f64::EPSILON).min(1.0);
            } else {
                break;
            }
        }
    }
    Interval { begin, end }
}
