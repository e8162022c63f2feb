use nalgebra::DMatrix;
use crate::signal::SignalError;
/// Savitzky-Golay smoother: least-squares polynomial fit over a sliding window.
///
/// Interior samples take the value of the fit at the window centre. The first and
/// last `window / 2` samples are evaluated on the fit of the first/last full window,
/// so the boundaries are never padded with invented data.
#[derive(Clone, Debug)]
pub struct SavitzkyGolay {
    window: usize,
    polyorder: usize,
}
impl SavitzkyGolay {
    pub fn new(window: usize, polyorder: usize) -> Result<Self, SignalError> {
        if window % 2 == 0 || polyorder >= window {
            return Err(SignalError::InvalidSmoothing { window, polyorder });
        }
        Ok(Self { window, polyorder })
    }
    pub fn smooth(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        let mut window = self.window;
        if n < window {
            // Largest odd window that still fits the signal.
            window = if n % 2 == 1 { n } else { n.saturating_sub(1) };
            if window <= self.polyorder {
                log::warn!(
                    "signal of {n} samples is too short to smooth with polyorder {}",
                    self.polyorder
                );
                return signal.to_vec();
            }
            log::warn!("smoothing window shrunk from {} to {window}", self.window);
        }
        let half = window / 2;
        let positions: Vec<f64> = (0..window).map(|i| i as f64 - half as f64).collect();
        // Row r holds the weights that evaluate the window fit at offset positions[r].
        let Some(weights) = fit_weights(window, self.polyorder, &positions) else {
            log::warn!("smoothing fit of order {} is singular; left as is", self.polyorder);
            return signal.to_vec();
        };
        let center = weights.row(half);
        let mut out = vec![0.0; n];
        for k in half..n - half {
            let frame = &signal[k - half..=k + half];
            out[k] = center.iter().zip(frame).map(|(w, x)| w * x).sum();
        }
        let head = &signal[..window];
        let tail = &signal[n - window..];
        for k in 0..half {
            out[k] = weights.row(k).iter().zip(head).map(|(w, x)| w * x).sum();
            let r = window - half + k;
            out[n - half + k] = weights.row(r).iter().zip(tail).map(|(w, x)| w * x).sum();
        }
        out
    }
}
/// Least-squares evaluation weights: `W[r, i]` is the contribution of window sample `i`
/// to the fitted polynomial evaluated at `positions[r]` (offsets from the window centre).
///
/// `None` when the normal equations are not positive definite.
fn fit_weights(window: usize, polyorder: usize, positions: &[f64]) -> Option<DMatrix<f64>> {
    let half = (window / 2) as f64;
    let terms = polyorder + 1;
    // Vandermonde matrix over centred sample offsets.
    let design = DMatrix::from_fn(window, terms, |i, j| (i as f64 - half).powi(j as i32));
    let normal = design.transpose() * &design;
    let cholesky = normal.cholesky()?;
    // Columns are the powers of each evaluation position.
    let powers = DMatrix::from_fn(terms, positions.len(), |j, r| positions[r].powi(j as i32));
    let coeffs = cholesky.solve(&powers);
    Some((design * coeffs).transpose())
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    fn cubic(i: usize) -> f64 {
        let t = i as f64 * 0.05;
        0.3 * t * t * t - 2.0 * t * t + t - 4.0
    }
    #[test]
    fn rejects_bad_parameters() {
        assert!(SavitzkyGolay::new(30, 3).is_err());
        assert!(SavitzkyGolay::new(3, 3).is_err());
        assert!(SavitzkyGolay::new(31, 3).is_ok());
    }
    #[test]
    fn center_weights_match_known_five_point_quadratic() {
        // Classic 5-point quadratic smoother: (-3, 12, 17, 12, -3) / 35.
        let w = fit_weights(5, 2, &[0.0]).unwrap();
        let expected = [-3.0, 12.0, 17.0, 12.0, -3.0].map(|v| v / 35.0);
        for (a, b) in w.row(0).iter().zip(expected) {
            assert!((a - b).abs() < 1e-12);
        }
    }
    #[test]
    fn cubic_is_reproduced_including_edges() {
        let signal: Vec<f64> = (0..200).map(cubic).collect();
        let out = SavitzkyGolay::new(31, 3).unwrap().smooth(&signal);
        assert_eq!(out.len(), signal.len());
        for (a, b) in out.iter().zip(&signal) {
            assert!((a - b).abs() < 1e-8, "{a} vs {b}");
        }
    }
    #[test]
    fn noise_is_reduced() {
        let mut rng = StdRng::seed_from_u64(7);
        let noisy: Vec<f64> = (0..1000).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let out = SavitzkyGolay::new(31, 3).unwrap().smooth(&noisy);
        let energy = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>();
        assert!(energy(&out) < 0.25 * energy(&noisy));
    }
    #[test]
    fn short_inputs_do_not_panic() {
        let sg = SavitzkyGolay::new(31, 3).unwrap();
        assert!(sg.smooth(&[]).is_empty());
        assert_eq!(sg.smooth(&[1.0, 2.0, 3.0]), vec![1.0, 2.0, 3.0]);
        let ten: Vec<f64> = (0..10).map(cubic).collect();
        let out = sg.smooth(&ten);
        assert_eq!(out.len(), 10);
        for (a, b) in out.iter().zip(&ten) {
            assert!((a - b).abs() < 1e-8);
        }
    }
}
