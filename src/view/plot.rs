use std::io::Cursor;
use image::{DynamicImage, GrayImage, ImageBuffer, ImageFormat, Luma, Rgb};
use plotters::prelude::*;
use crate::config::RasterStyle;
use crate::error::ViewError;
use crate::view::envelope::BinnedEnvelope;
use crate::view::histogram::FramedHistogram;
use crate::view::interval::Interval;
use crate::view::strategy::DetailPlot;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub peak: RGBColor,
    pub rms: RGBColor,
    pub highlight: RGBColor,
    pub trace: RGBColor,
    pub axis: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 200,
            background: RGBColor(0x22, 0x22, 0x22),
            peak: RGBColor(0xAA, 0xAA, 0xAA),
            rms: RGBColor(0xCC, 0xCC, 0xCC),
            highlight: RED,
            trace: RGBColor(0x1F, 0x77, 0xB4),
            axis: RGBColor(0xD3, 0xD3, 0xD3),
        }
    }
}
const HIGHLIGHT_STROKE: i32 = 3;
/// Pixel corners of the box marking `interval` on an overview, or `None`
/// when the whole track is visible.
pub fn highlight_box(interval: Interval, width: u32, height: u32) -> Option<[(i32, i32); 2]> {
    if interval.is_full() {
        return None;
    }
    let (width, height) = (width as i32, height as i32);
    let top = HIGHLIGHT_STROKE + 1;
    let bottom = height - HIGHLIGHT_STROKE - 2;
    let begin = (interval.begin * f64::from(width)) as i32;
    let end = (interval.end * f64::from(width)) as i32;
    Some([
        (begin + HIGHLIGHT_STROKE + 1, top),
        (end - HIGHLIGHT_STROKE - 1, bottom),
    ])
}
/// Left channel drawn upward, right channel downward, peak behind RMS.
pub fn render_overview_png(
    envelope: &BinnedEnvelope,
    interval: Interval,
    style: &PlotStyle,
) -> Result<Vec<u8>, ViewError> {
    if envelope.is_empty() {
        return Err(ViewError::Plot("envelope has no columns".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let vloc = style.height as f32 / 2.0;
        let vscale = style.height as f32 * 3.0 / 8.0;
        for (x, column) in envelope.columns().iter().enumerate().take(style.width as usize) {
            let x = x as i32;
            let peak_top = (vloc - column.left.peak * vscale) as i32;
            let peak_bottom = (vloc + column.right.peak * vscale) as i32;
            root.draw(&PathElement::new(vec![(x, peak_top), (x, peak_bottom)], &style.peak))?;
            let rms_top = (vloc - column.left.rms * vscale) as i32;
            let rms_bottom = (vloc + column.right.rms * vscale) as i32;
            root.draw(&PathElement::new(vec![(x, rms_top), (x, rms_bottom)], &style.rms))?;
        }
        if let Some(corners) = highlight_box(interval, style.width, style.height) {
            root.draw(&Rectangle::new(
                corners,
                style.highlight.stroke_width(HIGHLIGHT_STROKE as u32),
            ))?;
        }
        root.present()?;
    }
    encode_rgb_png(&buffer, style.width, style.height)
}
/// Greyscale intensity raster: one column per frame, one row per bin.
pub fn raster_image(histogram: &FramedHistogram, style: &RasterStyle) -> Result<GrayImage, ViewError> {
    let width = histogram.len();
    let height = histogram.bins();
    if width == 0 || height == 0 {
        return Err(ViewError::Plot("histogram raster is empty".into()));
    }
    let mut image: GrayImage = ImageBuffer::new(width as u32, height as u32);
    for (x, levels) in histogram.iter().enumerate() {
        for (y, level) in levels.iter().enumerate() {
            let shade = (level.powf(style.gamma) * 255.0).clamp(0.0, 255.0) as u8;
            image.put_pixel(x as u32, y as u32, Luma([shade]));
        }
    }
    Ok(image)
}
pub fn render_raster_png(histogram: &FramedHistogram, style: &RasterStyle) -> Result<Vec<u8>, ViewError> {
    let image = raster_image(histogram, style)?;
    let mut output = Vec::new();
    DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
/// Detail waveform on a fixed [-1, 1] vertical scale with a faint origin line.
pub fn render_detail_png(plot: &DetailPlot, style: &PlotStyle) -> Result<Vec<u8>, ViewError> {
    let x_max = match plot {
        DetailPlot::Bins(columns) => columns.last().map(|c| c.x as f32),
        DetailPlot::Points { markers, .. } => markers.last().map(|p| p.0),
        DetailPlot::Polyline(points) => points.last().map(|p| p.0),
    }
    .unwrap_or(0.0)
    .max(1.0);
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root).build_cartesian_2d(0f32..x_max, -1f32..1f32)?;
        chart.draw_series(LineSeries::new(vec![(0.0, 0.0), (x_max, 0.0)], &style.axis))?;
        match plot {
            DetailPlot::Bins(columns) => {
                chart.draw_series(columns.iter().map(|c| {
                    PathElement::new(vec![(c.x as f32, c.min), (c.x as f32, c.max)], &style.trace)
                }))?;
            }
            DetailPlot::Points { markers, curve } => {
                chart.draw_series(LineSeries::new(curve.iter().copied(), &style.trace))?;
                chart.draw_series(
                    markers
                        .iter()
                        .map(|&point| Circle::new(point, 2, style.trace.filled())),
                )?;
            }
            DetailPlot::Polyline(points) => {
                chart.draw_series(LineSeries::new(points.iter().copied(), &style.trace))?;
            }
        }
        root.present()?;
    }
    encode_rgb_png(&buffer, style.width, style.height)
}
fn encode_rgb_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ViewError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ViewError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use ndarray::Array1;
    use crate::audio::Signal;
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    fn small_style() -> PlotStyle {
        PlotStyle {
            width: 64,
            height: 32,
            ..PlotStyle::default()
        }
    }
    #[test]
    fn highlight_box_only_for_partial_views() {
        assert!(highlight_box(Interval::FULL, 100, 50).is_none());
        let corners = highlight_box(Interval { begin: 0.25, end: 0.75 }, 100, 50);
        assert_eq!(corners, Some([(29, 4), (71, 45)]));
    }
    #[test]
    fn overview_renders_png() -> anyhow::Result<()> {
        let signal = Signal::from_channels(vec![vec![0.5; 640], vec![-0.8; 640]], 640.0)?;
        let envelope = BinnedEnvelope::compute(&signal, 0..640, 64);
        let png = render_overview_png(&envelope, Interval { begin: 0.1, end: 0.6 }, &small_style())?;
        assert_eq!(png[..8], PNG_MAGIC);
        Ok(())
    }
    #[test]
    fn raster_applies_gamma() -> anyhow::Result<()> {
        let mut samples = vec![0.9f32; 16];
        samples[8..].fill(-0.9);
        let signal = Arc::new(Signal::new(samples, 16.0)?);
        let histogram = FramedHistogram::new(signal, 0..16, 1, 3);
        let image = raster_image(&histogram, &RasterStyle { gamma: 1.0 })?;
        assert_eq!(image.dimensions(), (1, 2));
        assert_eq!(image.get_pixel(0, 0).0, [127]);
        assert_eq!(image.get_pixel(0, 1).0, [127]);
        let brighter = raster_image(&histogram, &RasterStyle::default())?;
        assert!(brighter.get_pixel(0, 0).0[0] > 200);
        let png = render_raster_png(&histogram, &RasterStyle::default())?;
        assert_eq!(png[..8], PNG_MAGIC);
        Ok(())
    }
    #[test]
    fn empty_raster_is_rejected() -> anyhow::Result<()> {
        let signal = Arc::new(Signal::new(vec![0.0; 4], 4.0)?);
        let histogram = FramedHistogram::new(signal, 0..4, 0, 8);
        assert!(matches!(
            raster_image(&histogram, &RasterStyle::default()),
            Err(ViewError::Plot(_))
        ));
        Ok(())
    }
    #[test]
    fn every_detail_plot_renders() -> anyhow::Result<()> {
        let style = small_style();
        for len in [4usize, 40, 400] {
            let samples = Array1::from((0..len).map(|i| (i as f32 * 0.3).sin()).collect::<Vec<_>>());
            let plot = DetailPlot::build(samples.view(), style.width as usize);
            let png = render_detail_png(&plot, &style)?;
            assert_eq!(png[..8], PNG_MAGIC);
        }
        Ok(())
    }
}
