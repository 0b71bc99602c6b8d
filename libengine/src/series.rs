use serde::Serialize;

/// One chart slot. Position-indexed, not time-indexed: slots stay padded
/// with `None` until the window fills them and never reorder as it slides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSlot {
    pub latency: Option<f64>,
    pub error_rate: Option<f64>,
}

/// Display view for the chart: exactly `capacity` slots, slot `i` filled
/// from history index `i` when present. Pure function of its inputs.
pub fn assemble(latencies: &[f64], error_rates: &[f64], capacity: usize) -> Vec<SeriesSlot> {
    (0..capacity)
        .map(|i| SeriesSlot {
            latency: latencies.get(i).copied(),
            error_rate: error_rates.get(i).copied(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_pads_unfilled_slots_with_none() {
        let series = assemble(&[0.5, 1.0], &[0.0, 0.1], 4);

        assert_eq!(4, series.len());
        assert_eq!(Some(0.5), series[0].latency);
        assert_eq!(Some(0.1), series[1].error_rate);
        assert_eq!(SeriesSlot { latency: None, error_rate: None }, series[2]);
        assert_eq!(SeriesSlot { latency: None, error_rate: None }, series[3]);
    }

    #[test]
    fn it_has_exactly_capacity_slots_once_full() {
        let latencies = vec![0.1; 8];
        let error_rates = vec![0.2; 8];
        let series = assemble(&latencies, &error_rates, 8);

        assert_eq!(8, series.len());
        assert!(series.iter().all(|slot| slot.latency.is_some()));
    }

    #[test]
    fn it_assembles_a_fixed_length_series() {
        let series = assemble(&[0.5], &[0.25], 3);
        insta::assert_debug_snapshot!(series);
    }
}
