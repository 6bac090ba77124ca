//! Graceful stop for the listener.
//!
//! `main` owns one `Shutdown`; the server holds a receiver and stops
//! accepting connections when it fires. In-flight requests, including any
//! running lifecycle script, are allowed to finish or hit their own timeout.

use tokio::sync::broadcast;

/// One-shot stop signal fanned out to every subscriber.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Returns how many receivers were listening; zero
    /// means the server had already stopped.
    pub fn trigger(&self) -> usize {
        let listeners = self.tx.send(()).unwrap_or(0);
        tracing::debug!(listeners, "Shutdown triggered");
        listeners
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
