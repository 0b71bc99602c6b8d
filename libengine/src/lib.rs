pub mod backend;
pub mod events;
pub mod series;
pub mod session;
pub mod stats;
pub mod window;

pub use crate::backend::{Backend, BackendError, HttpBackend, MockBackend};
pub use crate::events::{Event, EventSink};
pub use crate::series::{assemble, SeriesSlot};
pub use crate::session::{TestSession, DEFAULT_POLL_INTERVAL, WINDOW_SECONDS};
pub use crate::stats::LatencySummary;
pub use crate::window::StreamingWindow;
