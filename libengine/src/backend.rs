use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

use libprotocol::{LoadTestRequest, ProtocolError, SampleBatch};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("load test request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("load test response malformed: {0}")]
    Decode(#[from] ProtocolError),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// One poll against the load-generating service: hand over (url, qps), get
/// back the batch of latencies it just completed plus the burst error rate.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch(&self, url: &str, qps: u32) -> Result<SampleBatch, BackendError>;
}

/// Real backend speaking the `POST /loadtest` contract.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch(&self, url: &str, qps: u32) -> Result<SampleBatch, BackendError> {
        let body = LoadTestRequest { url: url.to_string(), qps };
        let response = self
            .client
            .post(format!("{}/loadtest", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        Ok(libprotocol::parse_batch(&text)?)
    }
}

/// Deterministic stand-in: latencies are derived from a digest of a stable
/// key, so the same seed, url and poll index always produce the same burst.
pub struct MockBackend {
    seed: String,
    error_rate: f64,
    polls: AtomicU64,
}

impl MockBackend {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            error_rate: 0.0,
            polls: AtomicU64::new(0),
        }
    }

    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch(&self, url: &str, qps: u32) -> Result<SampleBatch, BackendError> {
        let poll = self.polls.fetch_add(1, Ordering::Relaxed);
        let mut latencies = Vec::with_capacity(qps as usize);
        for i in 0..qps {
            let stable_key = format!("{url}-{}-{poll}-{i}", self.seed);
            let digest = Sha256::digest(stable_key.as_bytes());
            let first8: [u8; 8] = digest[0..8].try_into().expect("digest has 32 bytes");
            let n = u64::from_be_bytes(first8);
            latencies.push((n % 1_000) as f64 / 1_000.0);
        }
        Ok(SampleBatch { latencies, error_rate: self.error_rate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_mock_batches_are_deterministic_per_poll() {
        let a = MockBackend::new("1000");
        let b = MockBackend::new("1000");

        let batch_a = a.fetch("http://localhost/ok", 5).await.unwrap();
        let batch_b = b.fetch("http://localhost/ok", 5).await.unwrap();

        assert_eq!(batch_a, batch_b);
        assert_eq!(5, batch_a.len());
        assert!(batch_a.latencies.iter().all(|l| (0.0..1.0).contains(l)));
    }

    #[tokio::test]
    async fn it_mock_bursts_differ_between_polls() {
        let backend = MockBackend::new("7");

        let first = backend.fetch("http://localhost/ok", 4).await.unwrap();
        let second = backend.fetch("http://localhost/ok", 4).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn it_mock_carries_the_configured_error_rate() {
        let backend = MockBackend::new("7").with_error_rate(0.25);

        let batch = backend.fetch("http://localhost/flaky", 2).await.unwrap();

        assert_eq!(0.25, batch.error_rate);
    }
}
