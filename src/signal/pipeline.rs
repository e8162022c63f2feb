use crate::config::PipelineConfig;
use crate::signal::filter::SosFilter;
use crate::signal::loader::Recording;
use crate::signal::peaks::Extrema;
use crate::signal::resample::resample;
use crate::signal::smooth::SavitzkyGolay;
use crate::signal::span::{span_median_diffs, Span};
use crate::signal::SignalError;
/// One channel after resampling, band-pass filtering and smoothing.
#[derive(Clone, Debug)]
pub struct ProcessedChannel {
    pub label: String,
    pub sample_rate_hz: f64,
    pub samples: Vec<f64>,
    /// Peaks/troughs over the whole channel, for display.
    pub extrema: Extrema,
}
impl ProcessedChannel {
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 / self.sample_rate_hz
    }
    pub fn duration_seconds(&self) -> f64 {
        self.time_at(self.samples.len())
    }
    /// `[time, value]` pairs of the smoothed trace.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, v)| [self.time_at(i), *v])
            .collect()
    }
    pub fn peak_points(&self) -> Vec<[f64; 2]> {
        self.points_at(&self.extrema.peaks)
    }
    pub fn trough_points(&self) -> Vec<[f64; 2]> {
        self.points_at(&self.extrema.troughs)
    }
    fn points_at(&self, indices: &[usize]) -> Vec<[f64; 2]> {
        indices
            .iter()
            .map(|&i| [self.time_at(i), self.samples[i]])
            .collect()
    }
}
/// Downsample → band-pass → smooth → detect, with every stage configured once.
#[derive(Clone, Debug)]
pub struct SignalPipeline {
    target_rate_hz: f64,
    filter: SosFilter,
    smoother: SavitzkyGolay,
    peak_distance: usize,
}
impl SignalPipeline {
    pub fn from_config(config: &PipelineConfig) -> Result<Self, SignalError> {
        config.validate()?;
        Ok(Self {
            target_rate_hz: config.target_rate_hz,
            filter: SosFilter::butterworth_bandpass(
                config.band_low_hz,
                config.band_high_hz,
                config.target_rate_hz,
                config.filter_order,
            )?,
            smoother: SavitzkyGolay::new(config.smooth_window, config.smooth_polyorder)?,
            peak_distance: config.peak_distance_samples(),
        })
    }
    pub fn process_channel(
        &self,
        raw: &[f64],
        native_rate_hz: f64,
        label: impl Into<String>,
    ) -> Result<ProcessedChannel, SignalError> {
        let label = label.into();
        let downsampled = resample(raw, native_rate_hz, self.target_rate_hz)?;
        let filtered = self.filter.filtfilt(&downsampled);
        let samples = self.smoother.smooth(&filtered);
        let extrema = Extrema::detect(&samples, self.peak_distance);
        log::debug!(
            "{label}: {} -> {} samples, {} peaks, {} troughs",
            raw.len(),
            samples.len(),
            extrema.peaks.len(),
            extrema.troughs.len()
        );
        Ok(ProcessedChannel {
            label,
            sample_rate_hz: self.target_rate_hz,
            samples,
            extrema,
        })
    }
    /// Runs both channels of a recording through the chain.
    pub fn process(&self, recording: &Recording) -> Result<[ProcessedChannel; 2], SignalError> {
        let fs = recording.sampling_frequency_hz;
        Ok([
            self.process_channel(&recording.channel1, fs, "Electrode 1")?,
            self.process_channel(&recording.channel2, fs, "Electrode 2")?,
        ])
    }
    /// Median peak-trough difference of both channels restricted to `span`.
    pub fn span_median_diffs(
        &self,
        span: Span,
        channels: &[ProcessedChannel; 2],
    ) -> Result<[f64; 2], SignalError> {
        span_median_diffs(
            span,
            self.target_rate_hz,
            &channels[0].samples,
            &channels[1].samples,
            self.peak_distance,
        )
    }
}
