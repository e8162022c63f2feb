use thiserror::Error;
/// Which kind of extremum a detection was looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtremumKind {
    Peak,
    Trough,
}
impl std::fmt::Display for ExtremumKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtremumKind::Peak => f.write_str("peaks"),
            ExtremumKind::Trough => f.write_str("troughs"),
        }
    }
}
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to read archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode npz archive: {0}")]
    Npz(#[from] ndarray_npy::ReadNpzError),
    #[error("array `{0}` not found in archive")]
    MissingArray(String),
    #[error("array `{name}` has an unsupported element type or shape")]
    UnsupportedArray { name: String },
    #[error("No time or sampling frequency information available in the file")]
    MissingTimeInfo,
    #[error("sample rate must be finite and greater than zero, got {0}")]
    InvalidSampleRate(f64),
    #[error("length mismatch: `{name}` has {actual} samples, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("time vector is not monotonically non-decreasing at index {0}")]
    NonMonotonicTime(usize),
    #[error("invalid band {low_hz}..{high_hz} Hz for sample rate {sample_rate_hz} Hz")]
    InvalidBand {
        low_hz: f64,
        high_hz: f64,
        sample_rate_hz: f64,
    },
    #[error("filter order must be at least 1")]
    InvalidFilterOrder,
    #[error("filter design did not produce second-order sections")]
    FilterDesign,
    #[error("smoothing window {window} must be odd and larger than polyorder {polyorder}")]
    InvalidSmoothing { window: usize, polyorder: usize },
    #[error("no {kind} found in span for channel {channel}")]
    NoExtrema { channel: usize, kind: ExtremumKind },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SignalError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SignalError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for SignalError {
    fn from(value: image::ImageError) -> Self {
        SignalError::Plot(value.to_string())
    }
}
