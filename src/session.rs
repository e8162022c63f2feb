// src/session.rs
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::config::PipelineConfig;
use crate::signal::{
    load_archive, min_max_envelope, ProcessedChannel, Recording, SignalError, SignalPipeline,
    Span,
};
/// Everything derived from one archive. Built in one go and never mutated;
/// selecting another file replaces the whole value.
#[derive(Debug)]
pub struct Session {
    pub path: PathBuf,
    pub recording: Recording,
    pub channels: [ProcessedChannel; 2],
    /// Decimated `[time, value]` raw traces for drawing.
    pub raw_traces: [Vec<[f64; 2]>; 2],
}
impl Session {
    pub fn load(path: &Path, config: &PipelineConfig, pipeline: &SignalPipeline) -> Result<Self> {
        let recording = load_archive(path, config.time_array_rate_hz)
            .with_context(|| format!("loading {}", path.display()))?;
        Self::from_recording(path.to_path_buf(), recording, config, pipeline)
    }
    pub fn from_recording(
        path: PathBuf,
        recording: Recording,
        config: &PipelineConfig,
        pipeline: &SignalPipeline,
    ) -> Result<Self> {
        let channels = pipeline
            .process(&recording)
            .with_context(|| format!("processing {}", path.display()))?;
        let buckets = config.raw_display_buckets;
        let raw_traces = [
            min_max_envelope(&recording.time, &recording.channel1, buckets),
            min_max_envelope(&recording.time, &recording.channel2, buckets),
        ];
        log::info!(
            "session ready for {}: {} processed samples/channel",
            path.display(),
            channels[0].len()
        );
        Ok(Self {
            path,
            recording,
            channels,
            raw_traces,
        })
    }
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
    pub fn median_diffs(
        &self,
        span: Span,
        pipeline: &SignalPipeline,
    ) -> Result<[f64; 2], SignalError> {
        pipeline.span_median_diffs(span, &self.channels)
    }
}
