use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;
use crate::signal::pipeline::ProcessedChannel;
use crate::signal::span::Span;
use crate::signal::SignalError;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    /// Trace colour per channel panel.
    pub palette: Vec<RGBColor>,
    pub peak_color: RGBColor,
    pub trough_color: RGBColor,
    pub span_color: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            background: RGBColor(10, 10, 10),
            palette: vec![YELLOW, GREEN],
            peak_color: RED,
            trough_color: RGBColor(60, 120, 255),
            span_color: RGBColor(100, 100, 255),
        }
    }
}
/// Stacked panels (one per channel) with the smoothed trace, peaks, troughs and
/// the optional span band, encoded as PNG.
pub fn render_channels_png(
    channels: &[ProcessedChannel],
    span: Option<Span>,
    style: &PlotStyle,
) -> Result<Vec<u8>, SignalError> {
    if channels.is_empty() || channels.iter().all(|c| c.is_empty()) {
        return Err(SignalError::Plot("no processed samples to draw".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let panels = root.split_evenly((channels.len(), 1));
        let x_max = channels
            .iter()
            .map(|c| c.duration_seconds())
            .fold(0.0f64, f64::max)
            .max(1e-3);
        for (idx, (channel, panel)) in channels.iter().zip(panels.iter()).enumerate() {
            let (y_min, y_max) = value_bounds(&channel.samples);
            let mut chart = ChartBuilder::on(panel)
                .margin(10)
                .build_cartesian_2d(0f64..x_max, y_min..y_max)?;
            if let Some(span) = span {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(span.start(), y_min), (span.end(), y_max)],
                    style.span_color.mix(0.25).filled(),
                )))?;
            }
            let color = match style.palette.len() {
                0 => YELLOW,
                len => style.palette[idx % len],
            };
            chart.draw_series(LineSeries::new(
                channel.points().into_iter().map(|[t, v]| (t, v)),
                &color,
            ))?;
            chart.draw_series(
                channel
                    .peak_points()
                    .into_iter()
                    .map(|[t, v]| Circle::new((t, v), 3, style.peak_color.filled())),
            )?;
            chart.draw_series(
                channel
                    .trough_points()
                    .into_iter()
                    .map(|[t, v]| Circle::new((t, v), 3, style.trough_color.filled())),
            )?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn value_bounds(samples: &[f64]) -> (f64, f64) {
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() || (max - min).abs() < f64::EPSILON {
        let mid = if min.is_finite() { min } else { 0.0 };
        return (mid - 1.0, mid + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SignalError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| SignalError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::peaks::Extrema;
    fn channel(values: Vec<f64>) -> ProcessedChannel {
        let extrema = Extrema::detect(&values, 150);
        ProcessedChannel {
            label: "test".into(),
            sample_rate_hz: 300.0,
            samples: values,
            extrema,
        }
    }
    #[test]
    fn renders_png_bytes() {
        let wave: Vec<f64> = (0..1500).map(|i| (i as f64 / 50.0).sin()).collect();
        let channels = [channel(wave.clone()), channel(wave)];
        let png = render_channels_png(&channels, Some(Span::new(1.0, 2.0)), &PlotStyle::default())
            .unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
    #[test]
    fn flat_channel_still_renders() {
        let png = render_channels_png(&[channel(vec![3.0; 10])], None, &PlotStyle::default());
        assert!(png.is_ok());
    }
    #[test]
    fn empty_palette_falls_back_to_default_colour() {
        let wave: Vec<f64> = (0..600).map(|i| (i as f64 / 30.0).cos()).collect();
        let style = PlotStyle {
            palette: Vec::new(),
            ..PlotStyle::default()
        };
        let png = render_channels_png(&[channel(wave)], None, &style).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            render_channels_png(&[], None, &PlotStyle::default()),
            Err(SignalError::Plot(_))
        ));
    }
}
