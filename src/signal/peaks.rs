/// Peak and trough indices of one signal, both ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extrema {
    pub peaks: Vec<usize>,
    pub troughs: Vec<usize>,
}
impl Extrema {
    /// Peaks of `signal` and peaks of `-signal`, each thinned to `distance` samples.
    pub fn detect(signal: &[f64], distance: usize) -> Self {
        let negated: Vec<f64> = signal.iter().map(|v| -v).collect();
        Self {
            peaks: find_peaks(signal, distance),
            troughs: find_peaks(&negated, distance),
        }
    }
    /// Amplitudes at the given indices.
    pub fn values(signal: &[f64], indices: &[usize]) -> Vec<f64> {
        indices.iter().map(|&i| signal[i]).collect()
    }
}
/// Local maxima at least `distance` samples apart.
///
/// A sample is a candidate when it rises above its left neighbour and the first
/// differing sample to its right is lower; flat tops report their middle index.
/// Candidates are then visited from the highest down, and every kept peak removes
/// the remaining candidates closer than `distance`.
pub fn find_peaks(signal: &[f64], distance: usize) -> Vec<usize> {
    let candidates = local_maxima(signal);
    if distance <= 1 || candidates.len() < 2 {
        return candidates;
    }
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| signal[candidates[a]].total_cmp(&signal[candidates[b]]));
    let mut keep = vec![true; candidates.len()];
    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let pos = candidates[j];
        for k in (0..j).rev() {
            if pos - candidates[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..candidates.len() {
            if candidates[k] - pos >= distance {
                break;
            }
            keep[k] = false;
        }
    }
    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(idx, kept)| kept.then_some(idx))
        .collect()
}
fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let n = signal.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    let mut i = 1;
    while i < n - 1 {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < n - 1 && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                let right = ahead - 1;
                peaks.push((i + right) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}
/// Median with the two middle values averaged for even counts; `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}
