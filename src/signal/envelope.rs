/// Min/max bucket decimation for drawing long raw traces.
///
/// Each bucket contributes its minimum and maximum sample in order of appearance,
/// so spikes stay visible however far the trace is zoomed out.
pub fn min_max_envelope(time: &[f64], values: &[f64], buckets: usize) -> Vec<[f64; 2]> {
    let len = time.len().min(values.len());
    if len == 0 || buckets == 0 {
        return Vec::new();
    }
    if len <= buckets * 2 {
        return time.iter().zip(values).map(|(&t, &v)| [t, v]).collect();
    }
    let bucket_size = len.div_ceil(buckets);
    let mut points = Vec::with_capacity(buckets * 2);
    for start in (0..len).step_by(bucket_size) {
        let end = (start + bucket_size).min(len);
        let mut min_idx = start;
        let mut max_idx = start;
        for i in start..end {
            if values[i] < values[min_idx] {
                min_idx = i;
            }
            if values[i] > values[max_idx] {
                max_idx = i;
            }
        }
        let (first, second) = if min_idx <= max_idx {
            (min_idx, max_idx)
        } else {
            (max_idx, min_idx)
        };
        points.push([time[first], values[first]]);
        if second != first {
            points.push([time[second], values[second]]);
        }
    }
    points
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn short_traces_pass_through() {
        let t = [0.0, 1.0, 2.0];
        let v = [5.0, -1.0, 2.0];
        assert_eq!(
            min_max_envelope(&t, &v, 10),
            vec![[0.0, 5.0], [1.0, -1.0], [2.0, 2.0]]
        );
        assert!(min_max_envelope(&[], &[], 10).is_empty());
    }
    #[test]
    fn spikes_survive_decimation() {
        let n = 100_000;
        let time: Vec<f64> = (0..n).map(|i| i as f64 / 30_000.0).collect();
        let mut values = vec![0.0; n];
        values[54_321] = 9.0;
        values[77_777] = -4.0;
        let points = min_max_envelope(&time, &values, 100);
        assert!(points.len() <= 200);
        assert!(points.iter().any(|p| p[1] == 9.0 && p[0] == time[54_321]));
        assert!(points.iter().any(|p| p[1] == -4.0));
        assert!(points.windows(2).all(|w| w[0][0] <= w[1][0]));
    }
}
