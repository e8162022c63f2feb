use crate::signal::error::ExtremumKind;
use crate::signal::peaks::{median, Extrema};
use crate::signal::SignalError;
/// Time interval in seconds, always ordered so that `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    start: f64,
    end: f64,
}
impl Span {
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }
    /// Span of `width` seconds centred on `center`.
    pub fn centered(center: f64, width: f64) -> Self {
        Self::new(center - width / 2.0, center + width / 2.0)
    }
    pub fn start(&self) -> f64 {
        self.start
    }
    pub fn end(&self) -> f64 {
        self.end
    }
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
    pub fn contains(&self, t: f64) -> bool {
        (self.start..=self.end).contains(&t)
    }
    pub fn shifted(&self, dt: f64) -> Self {
        Self::new(self.start + dt, self.end + dt)
    }
    /// Half-open sample range `[start, end)` for a signal of `len` samples at `rate_hz`.
    pub fn sample_range(&self, rate_hz: f64, len: usize) -> std::ops::Range<usize> {
        let to_index = |t: f64| {
            let idx = (t * rate_hz).round();
            if idx <= 0.0 {
                0
            } else {
                (idx as usize).min(len)
            }
        };
        let start = to_index(self.start);
        let end = to_index(self.end).max(start);
        start..end
    }
}
/// `|median(peak values) - median(trough values)|` of one slice.
///
/// Extrema are detected afresh on the slice, so results near the span edges
/// can differ from the whole-signal detections.
pub fn median_peak_trough_diff(
    data: &[f64],
    distance: usize,
    channel: usize,
) -> Result<f64, SignalError> {
    let extrema = Extrema::detect(data, distance);
    let median_peak = median(&Extrema::values(data, &extrema.peaks)).ok_or(
        SignalError::NoExtrema {
            channel,
            kind: ExtremumKind::Peak,
        },
    )?;
    let median_trough = median(&Extrema::values(data, &extrema.troughs)).ok_or(
        SignalError::NoExtrema {
            channel,
            kind: ExtremumKind::Trough,
        },
    )?;
    Ok((median_peak - median_trough).abs())
}
/// Median peak-trough difference of both smoothed channels inside `span`.
pub fn span_median_diffs(
    span: Span,
    rate_hz: f64,
    channel1: &[f64],
    channel2: &[f64],
    distance: usize,
) -> Result<[f64; 2], SignalError> {
    let range1 = span.sample_range(rate_hz, channel1.len());
    let range2 = span.sample_range(rate_hz, channel2.len());
    log::debug!(
        "span {:.3}..{:.3} s -> samples {:?} / {:?}",
        span.start(),
        span.end(),
        range1,
        range2
    );
    Ok([
        median_peak_trough_diff(&channel1[range1], distance, 1)?,
        median_peak_trough_diff(&channel2[range2], distance, 2)?,
    ])
}
/// Clipboard text for the span boundaries.
pub fn format_span_times(span: Span) -> String {
    format!("{:.2},{:.2}", span.start(), span.end())
}
/// Clipboard text for the per-channel median differences.
pub fn format_median_diffs(diffs: [f64; 2]) -> String {
    format!("{:.2},{:.2}", diffs[0], diffs[1])
}
