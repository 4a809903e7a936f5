use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::ViewError;
/// Tunables shared by every viewer built on top of a track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Fewest samples a zoomed view may show.
    pub min_visible_samples: usize,
    /// Debounce delay between an interval change and the redraw it triggers.
    pub redraw_delay_ms: u64,
    pub zoom: ZoomSteps,
    pub raster: RasterStyle,
}
impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_visible_samples: 32,
            redraw_delay_ms: 100,
            zoom: ZoomSteps::default(),
            raster: RasterStyle::default(),
        }
    }
}
impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ViewError> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn redraw_delay(&self) -> Duration {
        Duration::from_millis(self.redraw_delay_ms)
    }
}
/// Width multipliers applied by one mouse-wheel notch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSteps {
    pub zoom_in: f64,
    pub zoom_out: f64,
}
impl Default for ZoomSteps {
    fn default() -> Self {
        ZoomSteps {
            zoom_in: 7.0 / 8.0,
            zoom_out: 9.0 / 8.0,
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterStyle {
    /// Exponent applied to histogram occupancy before mapping to grey levels.
    pub gamma: f32,
}
impl Default for RasterStyle {
    fn default() -> Self {
        RasterStyle { gamma: 0.25 }
    }
}
