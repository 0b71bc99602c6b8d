use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::events::{Event, EventSink};
use crate::series::{assemble, SeriesSlot};
use crate::stats::LatencySummary;
use crate::window::StreamingWindow;

/// Fixed polling cadence of the dashboard, independent of qps.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// The window keeps `qps * WINDOW_SECONDS` most recent samples.
pub const WINDOW_SECONDS: usize = 20;

struct WindowState {
    generation: u64,
    window: StreamingWindow,
}

struct Shared {
    state: Mutex<WindowState>,
    busy: AtomicBool,
    revision: watch::Sender<u64>,
}

/// One dashboard test session: owns the window, the poll timer and the
/// session generation.
///
/// At most one timer is alive at any time. A new `start` cancels the old
/// timer, bumps the generation and replaces the window wholesale; a poll
/// still in flight from the previous cycle finds its generation superseded
/// and is discarded instead of landing in the new window.
pub struct TestSession {
    backend: Arc<dyn Backend>,
    sink: EventSink<Event>,
    poll_interval: Duration,
    shared: Arc<Shared>,
    timer: Option<JoinHandle<()>>,
}

impl TestSession {
    pub fn new(backend: Arc<dyn Backend>, sink: EventSink<Event>) -> Self {
        Self::with_poll_interval(backend, sink, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        backend: Arc<dyn Backend>,
        sink: EventSink<Event>,
        poll_interval: Duration,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            backend,
            sink,
            poll_interval,
            shared: Arc::new(Shared {
                state: Mutex::new(WindowState {
                    generation: 0,
                    window: StreamingWindow::with_capacity(1),
                }),
                busy: AtomicBool::new(false),
                revision,
            }),
            timer: None,
        }
    }

    /// Starts (or restarts) a test cycle against `url`.
    ///
    /// Returns once the first poll has completed — the submit handshake; the
    /// session reads as busy until then. The repeating timer is scheduled
    /// afterwards and each tick fires a detached poll: cadence is fixed, not
    /// gated on completion, so overlapping polls append in completion order.
    pub async fn start(&mut self, url: &str, qps: u32) {
        self.cancel_timer();
        self.shared.busy.store(true, Ordering::SeqCst);

        let capacity = qps as usize * WINDOW_SECONDS;
        let generation = {
            let mut state = self.shared.state.lock().expect("window lock poisoned");
            state.generation += 1;
            state.window = StreamingWindow::with_capacity(capacity);
            state.generation
        };
        self.sink.send(Event::SessionStarted { generation, capacity });
        self.shared.revision.send_modify(|rev| *rev += 1);

        poll_once(
            self.backend.clone(),
            self.shared.clone(),
            self.sink.clone(),
            url.to_string(),
            qps,
            generation,
        )
        .await;
        self.shared.busy.store(false, Ordering::SeqCst);

        let backend = self.backend.clone();
        let shared = self.shared.clone();
        let sink = self.sink.clone();
        let url = url.to_string();
        let poll_interval = self.poll_interval;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // an interval fires immediately; the handshake already covered that slot
            ticker.tick().await;
            loop {
                ticker.tick().await;
                tokio::spawn(poll_once(
                    backend.clone(),
                    shared.clone(),
                    sink.clone(),
                    url.clone(),
                    qps,
                    generation,
                ));
            }
        }));
    }

    /// Cancels the active timer. Safe to call when idle.
    pub fn stop(&mut self) {
        if self.cancel_timer() {
            debug!("session stopped");
            self.sink.send(Event::SessionStopped);
        }
    }

    /// Stop plus a fresh empty window. The generation is bumped so a poll
    /// still in flight cannot land in the cleared window.
    pub fn reset(&mut self) {
        self.stop();
        {
            let mut state = self.shared.state.lock().expect("window lock poisoned");
            state.generation += 1;
            state.window.reset();
        }
        self.shared.revision.send_modify(|rev| *rev += 1);
    }

    /// Busy between submit and the completion of the handshake fetch.
    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::SeqCst)
    }

    /// Revision counter bumped on every append and reset; the rendering
    /// layer re-reads snapshot and series when it changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    pub fn snapshot(&self) -> Option<LatencySummary> {
        let state = self.shared.state.lock().expect("window lock poisoned");
        LatencySummary::compute(state.window.latencies(), state.window.error_rates())
    }

    pub fn series(&self) -> Vec<SeriesSlot> {
        let state = self.shared.state.lock().expect("window lock poisoned");
        assemble(
            state.window.latencies(),
            state.window.error_rates(),
            state.window.capacity(),
        )
    }

    /// (filled, capacity) of the current window.
    pub fn window_fill(&self) -> (usize, usize) {
        let state = self.shared.state.lock().expect("window lock poisoned");
        (state.window.len(), state.window.capacity())
    }

    fn cancel_timer(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for TestSession {
    // teardown must cancel the timer on every exit path
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn poll_once(
    backend: Arc<dyn Backend>,
    shared: Arc<Shared>,
    sink: EventSink<Event>,
    url: String,
    qps: u32,
    generation: u64,
) {
    match backend.fetch(&url, qps).await {
        Ok(batch) => {
            let samples = batch.len();
            {
                let mut state = shared.state.lock().expect("window lock poisoned");
                // generation check and append happen under one lock, so a
                // concurrent restart cannot interleave between them
                if state.generation != generation {
                    drop(state);
                    debug!(generation, "discarding batch from a superseded cycle");
                    sink.send(Event::StaleBatchDiscarded { generation });
                    return;
                }
                state.window.append(&batch);
            }
            sink.send(Event::BatchAppended {
                generation,
                samples,
                error_rate: batch.error_rate,
            });
            shared.revision.send_modify(|rev| *rev += 1);
        }
        Err(err) => {
            // a failed poll never halts the cycle; the next tick is the retry
            warn!(error = %err, url = %url, "poll failed");
            sink.send(Event::FetchFailed { generation, reason: err.to_string() });
        }
    }
}
