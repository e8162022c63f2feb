use sci_rs::signal::filter::design::{
    butter_dyn, DigitalFilter, FilterBandType, FilterOutputType, Sos, SosFormatFilter,
};
use sci_rs::signal::filter::sosfiltfilt_dyn;
use crate::signal::SignalError;
/// Butterworth band-pass realised as a cascade of second-order sections.
#[derive(Clone, Debug)]
pub struct SosFilter {
    sections: Vec<Sos<f64>>,
}
impl SosFilter {
    /// Butterworth band-pass of the given prototype order (the cascade has order `2 * order`).
    ///
    /// The -3 dB points land on `low_hz` and `high_hz`.
    pub fn butterworth_bandpass(
        low_hz: f64,
        high_hz: f64,
        sample_rate_hz: f64,
        order: usize,
    ) -> Result<Self, SignalError> {
        if order == 0 {
            return Err(SignalError::InvalidFilterOrder);
        }
        let nyquist = sample_rate_hz / 2.0;
        if !(sample_rate_hz > 0.0 && low_hz > 0.0 && low_hz < high_hz && high_hz < nyquist) {
            return Err(SignalError::InvalidBand {
                low_hz,
                high_hz,
                sample_rate_hz,
            });
        }
        let design = butter_dyn(
            order,
            vec![low_hz, high_hz],
            Some(FilterBandType::Bandpass),
            Some(false),
            Some(FilterOutputType::Sos),
            Some(sample_rate_hz),
        );
        let DigitalFilter::Sos(SosFormatFilter { sos }) = design else {
            return Err(SignalError::FilterDesign);
        };
        log::debug!(
            "butterworth band-pass {low_hz}..{high_hz} Hz at {sample_rate_hz} Hz: {} sections",
            sos.len()
        );
        Ok(Self { sections: sos })
    }
    /// Samples of odd extension added to each end before the two passes.
    fn pad_len(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }
    /// Zero-phase filtering: forward and backward passes over an odd-extended copy,
    /// each started from the steady state of the first sample.
    pub fn filtfilt(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        let pad = self.pad_len();
        if n <= pad {
            if n > 0 {
                log::warn!("signal of {n} samples is too short to filter (needs > {pad})");
            }
            return signal.to_vec();
        }
        sosfiltfilt_dyn(signal.iter(), &self.sections)
    }
}
