//! Rectification and moving-average smoothing

/// Full-wave rectification
pub fn rectify(signal: &[f32]) -> Vec<f32> {
    signal.iter().map(|x| x.abs()).collect()
}

/// Centered moving average with output the same length as the input
///
/// Equivalent to convolving with a length-`window` box kernel and keeping
/// the centered part: samples past either edge count as zero, and the sum
/// is always divided by the full window length.
pub fn moving_average_same(signal: &[f32], window: usize) -> Vec<f32> {
    if signal.is_empty() || window == 0 {
        return signal.to_vec();
    }

    let mut prefix = Vec::with_capacity(signal.len() + 1);
    prefix.push(0.0f64);
    for &x in signal {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + x as f64);
    }

    let lead = (window - 1) / 2;
    let trail = window - 1 - lead;
    let last_index = signal.len() - 1;

    (0..signal.len())
        .map(|i| {
            let lo = i.saturating_sub(trail);
            let hi = (i + lead).min(last_index);
            ((prefix[hi + 1] - prefix[lo]) / window as f64) as f32
        })
        .collect()
}
