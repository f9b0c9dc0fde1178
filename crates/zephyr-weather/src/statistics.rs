//! Descriptive statistics and robust anomaly detection over temperature samples.
//!
//! Every function is total: an empty slice yields `0.0` (or no anomalies).
//! Callers tell "no data" apart by checking the record count first.

/// Φ⁻¹(3/4), scales the MAD to be comparable to a standard deviation.
pub const MAD_SCALE: f64 = 0.6745;
/// Modified z-score above which a sample is suspicious.
pub const Z_THRESHOLD: f64 = 4.5;
/// Outliers must also be at least this many degrees away from the median.
pub const MIN_DEVIATION: f64 = 8.0;
const MAD_EPSILON: f64 = 1e-10;

/// A flagged sample and its position in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anomaly {
    pub index: usize,
    pub value: f64,
}

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation (divides by N).
pub fn std_dev(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let mean = mean(samples);
    let variance = samples
        .iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>()
        / samples.len() as f64;

    variance.sqrt()
}

pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sorted = sorted(samples);
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value. On a multi-modal sample the largest mode wins.
pub fn mode(samples: &[f64]) -> f64 {
    let sorted = sorted(samples);

    let mut best = 0.0;
    let mut best_count = 0;

    // Runs of equal values are contiguous once sorted. Ascending order plus
    // `>=` hands ties to the larger value.
    for run in sorted.chunk_by(|a, b| a == b) {
        if run.len() >= best_count {
            best = run[0];
            best_count = run.len();
        }
    }

    best
}

/// Robust (MAD-based) z-score outlier detection.
///
/// A sample is flagged when its modified z-score `0.6745 * (x - median) / MAD`
/// exceeds [`Z_THRESHOLD`] in magnitude *and* it lies at least
/// [`MIN_DEVIATION`] degrees from the median. The absolute floor keeps tight
/// clusters, where the MAD is tiny, from flagging ordinary daily swings.
///
/// Assumes the samples are roughly normal, which holds for daily temperatures
/// over a short window. Returns an empty vector when the MAD is degenerate.
pub fn robust_z_score(samples: &[f64]) -> Vec<Anomaly> {
    let med = median(samples);
    let deviations: Vec<f64> = samples.iter().map(|x| (x - med).abs()).collect();

    let mad = median(&deviations);
    if mad < MAD_EPSILON {
        return Vec::new();
    }

    samples
        .iter()
        .enumerate()
        .filter(|&(_, &value)| {
            let z = MAD_SCALE * (value - med) / mad;
            z.abs() > Z_THRESHOLD && (value - med).abs() >= MIN_DEVIATION
        })
        .map(|(index, &value)| Anomaly { index, value })
        .collect()
}

fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut copy = samples.to_vec();
    copy.sort_by(f64::total_cmp);
    copy
}
