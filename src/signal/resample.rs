use rustfft::{num_complex::Complex64, FftPlanner};
use crate::signal::SignalError;
/// Number of samples produced when resampling `len` samples from `native_hz` to `target_hz`.
pub fn resampled_len(len: usize, native_hz: f64, target_hz: f64) -> usize {
    (len as f64 * target_hz / native_hz).round() as usize
}
/// Fourier-domain resampling of one channel.
///
/// The spectrum is truncated (or zero-padded) to the new length, which band-limits
/// the signal to the lower of the two Nyquist frequencies before decimation.
pub fn resample(samples: &[f64], native_hz: f64, target_hz: f64) -> Result<Vec<f64>, SignalError> {
    for rate in [native_hz, target_hz] {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(SignalError::InvalidSampleRate(rate));
        }
    }
    if native_hz == target_hz {
        return Ok(samples.to_vec());
    }
    let n = samples.len();
    let m = resampled_len(n, native_hz, target_hz);
    if n == 0 || m == 0 {
        return Ok(Vec::new());
    }
    let mut planner = FftPlanner::<f64>::new();
    let mut spectrum: Vec<Complex64> = samples.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    planner.plan_fft_forward(n).process(&mut spectrum);
    let mut resized = vec![Complex64::new(0.0, 0.0); m];
    let n_min = n.min(m);
    let nyq = n_min / 2 + 1;
    resized[..nyq].copy_from_slice(&spectrum[..nyq]);
    let tail = n_min - nyq;
    if tail > 0 {
        resized[m - tail..].copy_from_slice(&spectrum[n - tail..]);
    }
    if n_min % 2 == 0 {
        let half = n_min / 2;
        if m < n {
            // Fold the negative Nyquist bin into the kept one.
            resized[half] += spectrum[n - half];
        } else if m > n {
            // Split the Nyquist bin between the positive and negative halves.
            resized[half] *= 0.5;
            resized[m - half] = resized[half];
        }
    }
    planner.plan_fft_inverse(m).process(&mut resized);
    // rustfft does not normalise; 1/n for the forward/inverse pair.
    let scale = 1.0 / n as f64;
    let out: Vec<f64> = resized.iter().map(|c| c.re * scale).collect();
    log::debug!("resampled {n} samples at {native_hz} Hz to {m} samples at {target_hz} Hz");
    Ok(out)
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    #[test]
    fn output_length_follows_rate_ratio() {
        for (n, native) in [(30_000usize, 30_000.0), (12_345, 30_000.0), (1_001, 2048.0)] {
            let out = resample(&vec![0.5; n], native, 300.0).unwrap();
            let expected = (n as f64 * 300.0 / native).round() as i64;
            assert!((out.len() as i64 - expected).abs() <= 1);
        }
    }
    #[test]
    fn slow_sine_survives_downsampling() {
        let native = 3000.0;
        let n = 6000;
        let input: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 2.0 * i as f64 / native).sin())
            .collect();
        let out = resample(&input, native, 300.0).unwrap();
        assert_eq!(out.len(), 600);
        for (i, v) in out.iter().enumerate() {
            let expected = (2.0 * PI * 2.0 * i as f64 / 300.0).sin();
            assert!((v - expected).abs() < 1e-6, "sample {i}: {v} vs {expected}");
        }
    }
    #[test]
    fn tone_above_target_nyquist_is_removed() {
        let native = 3000.0;
        let n = 3000;
        // 400 Hz is above the 150 Hz Nyquist of the target rate.
        let input: Vec<f64> = (0..n)
            .map(|i| 3.0 + (2.0 * PI * 400.0 * i as f64 / native).sin())
            .collect();
        let out = resample(&input, native, 300.0).unwrap();
        assert!(out.iter().all(|v| (v - 3.0).abs() < 1e-6));
    }
    #[test]
    fn same_rate_is_identity() {
        let input = vec![1.0, -2.0, 3.0];
        assert_eq!(resample(&input, 300.0, 300.0).unwrap(), input);
    }
    #[test]
    fn empty_and_invalid_inputs() {
        assert!(resample(&[], 30_000.0, 300.0).unwrap().is_empty());
        assert!(matches!(
            resample(&[1.0], 0.0, 300.0),
            Err(SignalError::InvalidSampleRate(_))
        ));
    }
}
