use serde::{Deserialize, Serialize};

/// Body of `POST /loadtest`: the target to hit and how many requests per
/// second the backend should fire at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadTestRequest {
    pub url: String,
    pub qps: u32,
}

/// One completed burst as reported by the backend: a latency per finished
/// request plus a single error rate covering the whole burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBatch {
    pub latencies: Vec<f64>,
    pub error_rate: f64,
}

impl SampleBatch {
    pub fn len(&self) -> usize {
        self.latencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_decodes_a_batch_from_the_wire_field_names() {
        let body = r#"{"latencies": [0.12, 0.34], "error_rate": 0.5}"#;
        let batch: SampleBatch = serde_json::from_str(body).unwrap();

        assert_eq!(vec![0.12, 0.34], batch.latencies);
        assert_eq!(0.5, batch.error_rate);
        assert_eq!(2, batch.len());
    }

    #[test]
    fn it_encodes_a_request_with_the_wire_field_names() {
        let request = LoadTestRequest { url: "http://localhost/ok".to_string(), qps: 3 };
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!("http://localhost/ok", body["url"]);
        assert_eq!(3, body["qps"]);
    }

    #[test]
    fn it_an_empty_batch_reads_as_empty() {
        let batch = SampleBatch { latencies: vec![], error_rate: 0.9 };

        assert!(batch.is_empty());
        assert_eq!(0, batch.len());
    }
}
