use libprotocol::SampleBatch;

/// Capacity-bounded sliding window over the most recent samples.
///
/// Two parallel histories, most-recent-last: one latency entry per completed
/// request, and the owning batch's error rate replicated once per entry.
/// The histories never diverge in length, and trimming always drops from the
/// front so the newest `capacity` entries survive.
#[derive(Debug, Clone)]
pub struct StreamingWindow {
    capacity: usize,
    latencies: Vec<f64>,
    error_rates: Vec<f64>,
}

impl StreamingWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity >= 1, "capacity is enforced at the input boundary");
        Self {
            capacity,
            latencies: Vec::new(),
            error_rates: Vec::new(),
        }
    }

    /// Appends a whole batch, then trims the oldest entries so at most
    /// `capacity` remain. An empty batch is a no-op.
    pub fn append(&mut self, batch: &SampleBatch) {
        if batch.is_empty() {
            return;
        }

        self.latencies.extend_from_slice(&batch.latencies);
        self.error_rates
            .extend(std::iter::repeat(batch.error_rate).take(batch.len()));

        if self.latencies.len() > self.capacity {
            let overflow = self.latencies.len() - self.capacity;
            self.latencies.drain(..overflow);
            self.error_rates.drain(..overflow);
        }
    }

    pub fn reset(&mut self) {
        self.latencies.clear();
        self.error_rates.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.latencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latencies.is_empty()
    }

    pub fn latencies(&self) -> &[f64] {
        &self.latencies
    }

    pub fn error_rates(&self) -> &[f64] {
        &self.error_rates
    }
}
