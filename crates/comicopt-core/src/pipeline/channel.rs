//! Bounded channel for handing batch events to the foreground.

use tokio::sync::mpsc;

use crate::config::PipelineConfig;

/// Create a bounded channel pair with the configured buffer size.
///
/// When the buffer is full the worker blocks, so a slow consumer throttles
/// the batch instead of queueing events without limit.
pub fn bounded_channel<T>(config: &PipelineConfig) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(config.event_buffer.max(1))
}

/// Sending half used from the blocking worker thread.
///
/// A dropped receiver is not an error: the batch keeps running and its
/// events are discarded.
pub struct EventSender<T> {
    tx: mpsc::Sender<T>,
    closed: bool,
}

impl<T> EventSender<T> {
    pub fn new(tx: mpsc::Sender<T>) -> Self {
        Self { tx, closed: false }
    }

    /// Send an event, blocking while the buffer is full.
    ///
    /// Must not be called from inside an async context.
    pub fn send(&mut self, event: T) {
        if self.closed {
            return;
        }
        if self.tx.blocking_send(event).is_err() {
            tracing::debug!("Event receiver closed, dropping further events");
            self.closed = true;
        }
    }
}
