//! Shared statistical helpers: winsorizing and z-score compression.

/// Clamp the extremes of a sample to the 2nd-smallest/2nd-largest observed
/// value. Applies only when at least four values exist; smaller samples are
/// simply clamped to [0, 100].
pub(crate) fn winsorize(values: &mut [f64]) {
    if values.len() >= 4 {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let low = sorted[1];
        let high = sorted[sorted.len() - 2];
        for value in values.iter_mut() {
            *value = value.clamp(low, high);
        }
    } else {
        for value in values.iter_mut() {
            *value = value.clamp(0.0, 100.0);
        }
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Compress an outlying raw score toward the sample center while preserving
/// rank order: map the z-score to `50 + z×15`, then blend 70/30 with the raw
/// value. A zero deviation leaves the raw score untouched.
pub(crate) fn z_blend(raw: f64, sample_mean: f64, sample_std: f64) -> f64 {
    if sample_std == 0.0 {
        return raw.clamp(0.0, 100.0);
    }
    let z = (raw - sample_mean) / sample_std;
    let normalized = (50.0 + z * 15.0).clamp(0.0, 100.0);
    (0.7 * raw + 0.3 * normalized).clamp(0.0, 100.0)
}

pub(crate) fn round_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}
