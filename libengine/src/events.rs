use tokio::sync::mpsc::UnboundedSender;

/// Session lifecycle and failure notifications. Poll failures are surfaced
/// here so callers and tests can observe them without scraping log output.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SessionStarted { generation: u64, capacity: usize },
    BatchAppended { generation: u64, samples: usize, error_rate: f64 },
    FetchFailed { generation: u64, reason: String },
    StaleBatchDiscarded { generation: u64 },
    SessionStopped,
}

#[derive(Clone)]
pub struct EventSink<E> {
    tx: Option<UnboundedSender<E>>,
}

impl<E> EventSink<E> {
    /// No-op sink
    pub fn noop() -> Self {
        Self { tx: None }
    }

    /// Real sink
    pub fn new(tx: UnboundedSender<E>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Best-effort send: a dropped receiver never fails the session.
    #[inline]
    pub fn send(&self, ev: E) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(ev);
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }
}
