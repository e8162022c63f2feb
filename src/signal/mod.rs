// Processing chain for two-electrode recordings:
// archive → 300 Hz → band-pass → smooth → extrema.
pub mod envelope;
pub mod error;
pub mod filter;
pub mod loader;
pub mod peaks;
pub mod pipeline;
pub mod plot;
pub mod resample;
pub mod smooth;
pub mod span;
// 公开导出这些模块里的结构体，方便外部调用
pub use envelope::min_max_envelope;
pub use error::SignalError;
pub use loader::{list_archives, load_archive, ArchiveEntry, Recording};
pub use pipeline::{ProcessedChannel, SignalPipeline};
pub use plot::{render_channels_png, PlotStyle};
pub use span::{format_median_diffs, format_span_times, Span};
