// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::signal::SignalError;
/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "NVC_VIEWER_CONFIG";
/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "nvc_viewer.json";
/// Every constant of the processing chain. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rate every channel is resampled to before filtering.
    pub target_rate_hz: f64,
    /// Native rate assumed for archives that carry an explicit `time` array.
    pub time_array_rate_hz: f64,
    pub band_low_hz: f64,
    pub band_high_hz: f64,
    pub filter_order: usize,
    pub smooth_window: usize,
    pub smooth_polyorder: usize,
    /// Minimum distance between two peaks (or two troughs), in seconds.
    pub min_peak_separation_s: f64,
    /// Width of the span created when the selector is toggled on.
    pub initial_span_width_s: f64,
    /// Min/max buckets used to draw the raw trace.
    pub raw_display_buckets: usize,
}
impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_rate_hz: 300.0,
            time_array_rate_hz: 30_000.0,
            band_low_hz: 0.3,
            band_high_hz: 149.0,
            filter_order: 2,
            smooth_window: 31,
            smooth_polyorder: 3,
            min_peak_separation_s: 0.5,
            initial_span_width_s: 1.0,
            raw_display_buckets: 4000,
        }
    }
}
impl PipelineConfig {
    /// Peak distance in samples at the target rate, truncated like an integer cast.
    pub fn peak_distance_samples(&self) -> usize {
        ((self.min_peak_separation_s * self.target_rate_hz) as usize).max(1)
    }
    pub fn validate(&self) -> Result<(), SignalError> {
        for (name, rate) in [
            ("target_rate_hz", self.target_rate_hz),
            ("time_array_rate_hz", self.time_array_rate_hz),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(SignalError::Config(format!(
                    "{name} must be positive, got {rate}"
                )));
            }
        }
        let nyquist = self.target_rate_hz / 2.0;
        let (low, high) = (self.band_low_hz, self.band_high_hz);
        if !(low > 0.0 && low < high && high < nyquist) {
            return Err(SignalError::InvalidBand {
                low_hz: self.band_low_hz,
                high_hz: self.band_high_hz,
                sample_rate_hz: self.target_rate_hz,
            });
        }
        if self.filter_order == 0 {
            return Err(SignalError::InvalidFilterOrder);
        }
        if self.smooth_window % 2 == 0 || self.smooth_polyorder >= self.smooth_window {
            return Err(SignalError::InvalidSmoothing {
                window: self.smooth_window,
                polyorder: self.smooth_polyorder,
            });
        }
        if !(self.min_peak_separation_s >= 0.0) || !(self.initial_span_width_s > 0.0) {
            return Err(SignalError::Config(
                "peak separation and span width must be positive".into(),
            ));
        }
        Ok(())
    }
    pub fn from_json(text: &str) -> Result<Self, SignalError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| SignalError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
    pub fn to_json(&self) -> Result<String, SignalError> {
        serde_json::to_string_pretty(self).map_err(|e| SignalError::Config(e.to_string()))
    }
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SignalError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
    /// Resolves the config file from the environment, then the working directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
