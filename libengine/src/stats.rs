use crate::series::SeriesSlot;

/// Aggregate statistics over the current window contents.
///
/// Derived on every update and never stored. The selection rules mirror the
/// dashboard this replaces and are pinned by tests: median and p90 pick the
/// floor-index element of the ascending sort without interpolation, std_dev
/// is the population deviation, and total_errors is the plain sum of the
/// replicated per-sample error rates (so it is not bounded by 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySummary {
    pub average: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    pub std_dev: f64,
    pub p90: f64,
    pub total_requests: usize,
    pub total_errors: f64,
    pub latest: f64,
    /// Change between the two most recent samples, in percent. `None` when
    /// fewer than two samples exist or the previous sample was zero.
    pub delta_percent: Option<f64>,
}

impl LatencySummary {
    /// `None` when no usable samples exist — callers must distinguish
    /// "no data yet" from a window of all-zero latencies.
    ///
    /// Non-finite latency entries are dropped before computing, so a padded
    /// or otherwise polluted view degrades instead of poisoning every
    /// aggregate with NaN.
    pub fn compute(latencies: &[f64], error_rates: &[f64]) -> Option<Self> {
        let valid: Vec<f64> = latencies.iter().copied().filter(|l| l.is_finite()).collect();
        if valid.is_empty() {
            return None;
        }

        let n = valid.len();
        let average = valid.iter().sum::<f64>() / n as f64;

        let mut sorted = valid.clone();
        sorted.sort_by(f64::total_cmp);
        let median = sorted[n / 2];
        let p90 = sorted[(n as f64 * 0.9).floor() as usize];
        let min = sorted[0];
        let max = sorted[n - 1];

        let std_dev =
            (valid.iter().map(|x| (x - average).powi(2)).sum::<f64>() / n as f64).sqrt();

        let total_errors = error_rates.iter().copied().filter(|e| e.is_finite()).sum();

        let latest = valid[n - 1];
        let delta_percent = if n < 2 {
            None
        } else {
            let previous = valid[n - 2];
            if previous == 0.0 {
                None
            } else {
                Some((latest - previous) / previous * 100.0)
            }
        };

        Some(LatencySummary {
            average,
            median,
            max,
            min,
            std_dev,
            p90,
            total_requests: n,
            total_errors,
            latest,
            delta_percent,
        })
    }

    /// Defensive entry point for the padded display view: unfilled slots are
    /// dropped before computing.
    pub fn compute_padded(slots: &[SeriesSlot]) -> Option<Self> {
        let latencies: Vec<f64> = slots.iter().filter_map(|s| s.latency).collect();
        let error_rates: Vec<f64> = slots.iter().filter_map(|s| s.error_rate).collect();
        Self::compute(&latencies, &error_rates)
    }
}
