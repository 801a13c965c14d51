//! Tokio runtime that owns the network side of a watch session.
//!
//! The UI thread stays synchronous: it drains [`StreamEvent`]s with
//! [`TelemetryRuntime::try_next_event`] and hands fire-and-forget requests
//! to [`TelemetryRuntime::spawn_request`].

use std::future::Future;

use tokio::sync::{broadcast, mpsc};
use url::Url;

use super::stream::{stream_task, StreamEvent};
use crate::error::Result;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct TelemetryRuntime {
    events_rx: mpsc::Receiver<StreamEvent>,
    // Handed to the stream task on connect, so the channel closes when it stops
    events_tx: Option<mpsc::Sender<StreamEvent>>,
    shutdown_tx: broadcast::Sender<()>,
    runtime: tokio::runtime::Runtime,
}

impl TelemetryRuntime {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("telemetry-worker")
            .build()?;

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        Ok(Self {
            events_rx,
            events_tx: Some(events_tx),
            shutdown_tx,
            runtime,
        })
    }

    /// Start reading telemetry from `url` in the background.
    ///
    /// Only one stream per runtime; later calls are ignored.
    pub fn connect(&mut self, url: Url) {
        let Some(events_tx) = self.events_tx.take() else {
            log::warn!("Telemetry stream already started, ignoring {}", url);
            return;
        };
        log::info!("Streaming telemetry from {}", url);
        self.runtime
            .spawn(stream_task(url, events_tx, self.shutdown_tx.subscribe()));
    }

    /// Ask the stream task to stop; `next_event` returns `None` once it has.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Sender that stops the stream from another thread (e.g. a Ctrl+C handler).
    pub fn stop_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Next stream event, if one is already queued.
    pub fn try_next_event(&mut self) -> Option<StreamEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Wait for the next stream event; `None` once the stream has stopped
    /// or was never started.
    pub fn next_event(&mut self) -> Option<StreamEvent> {
        if self.events_tx.is_some() {
            return None;
        }
        self.runtime.block_on(self.events_rx.recv())
    }

    /// Run a request to completion on the runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Run a request without waiting; failures are logged and dropped.
    pub fn spawn_request<F>(&self, what: &'static str, future: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.runtime.spawn(async move {
            if let Err(e) = future.await {
                log::warn!("{} failed: {}", what, e);
            }
        });
    }

    pub fn shutdown(self) {
        log::debug!("Shutting down telemetry runtime");
        let _ = self.shutdown_tx.send(());
        self.runtime
            .shutdown_timeout(std::time::Duration::from_millis(500));
    }
}
