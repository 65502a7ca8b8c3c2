//! Change listener
//!
//! Drains an [`EventSource`] on a background task. Every raw event is decoded
//! and delivered on its own short-lived task, so a full notification queue
//! only holds up the events waiting to be sent, never the receive loop.
//! Delivery order is therefore not preserved.

mod source;

pub use source::{ChannelFeeder, ChannelSource, EventSource, PgEventSource};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use portal_db_common::{DecodeCounts, DecodeStats, Decoded, EVENTS_CHANNEL, Notification, decode};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::DriverConfig;
use crate::error::PersistenceError;

/// Capacity of the notification queue handed to consumers
pub const NOTIFICATION_BUFFER: usize = 32;

#[derive(Debug, Clone)]
pub struct ListenerOptions {
    pub channel: String,
    pub reconnect_delay: Duration,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            channel: EVENTS_CHANNEL.to_string(),
            reconnect_delay: Duration::from_secs(1),
        }
    }
}

impl From<&DriverConfig> for ListenerOptions {
    fn from(config: &DriverConfig) -> Self {
        Self {
            channel: config.listen_channel.clone(),
            reconnect_delay: config.reconnect_delay(),
        }
    }
}

/// Live counters of the listener
#[derive(Debug, Default)]
pub struct ListenerMetrics {
    received: AtomicU64,
    nil_events: AtomicU64,
    delivered: AtomicU64,
    source_errors: AtomicU64,
    decode: DecodeStats,
}

/// Point-in-time copy of [`ListenerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerCounts {
    /// Non-nil raw events taken from the source
    pub received: u64,
    pub nil_events: u64,
    /// Notifications accepted by the queue
    pub delivered: u64,
    pub source_errors: u64,
    pub decode: DecodeCounts,
}

impl ListenerMetrics {
    pub fn snapshot(&self) -> ListenerCounts {
        ListenerCounts {
            received: self.received.load(Ordering::Relaxed),
            nil_events: self.nil_events.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            source_errors: self.source_errors.load(Ordering::Relaxed),
            decode: self.decode.snapshot(),
        }
    }
}

/// Handle to a running listener
///
/// Dropping the handle signals the loop to stop without waiting for it.
pub struct ChangeListener {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    metrics: Arc<ListenerMetrics>,
}

impl ChangeListener {
    /// Subscribe `source` to the configured channel and start draining it
    /// into `sink`
    ///
    /// A subscription failure is returned before any task is spawned.
    pub async fn start<E: EventSource>(
        mut source: E,
        options: ListenerOptions,
        sink: mpsc::Sender<Notification>,
    ) -> Result<Self, PersistenceError> {
        source.listen(&options.channel).await?;
        info!(channel = %options.channel, "Listening for change notifications");

        let metrics = Arc::new(ListenerMetrics::default());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(
            source,
            sink,
            metrics.clone(),
            shutdown_rx,
            options.reconnect_delay,
        ));

        Ok(Self {
            shutdown,
            task: Some(task),
            metrics,
        })
    }

    pub fn metrics(&self) -> Arc<ListenerMetrics> {
        self.metrics.clone()
    }

    /// Stop receiving, cancel pending deliveries and wait for the loop to
    /// exit. The notification queue closes once this returns.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            error!(error = %e, "Change listener task failed");
        }
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn run<E: EventSource>(
    mut source: E,
    sink: mpsc::Sender<Notification>,
    metrics: Arc<ListenerMetrics>,
    mut shutdown: watch::Receiver<bool>,
    reconnect_delay: Duration,
) {
    let mut deliveries = JoinSet::new();

    loop {
        let event = tokio::select! {
            _ = shutdown.wait_for(|stop| *stop) => break,
            event = source.recv() => event,
        };

        match event {
            Ok(Some(payload)) => {
                metrics.received.fetch_add(1, Ordering::Relaxed);
                deliveries.spawn(deliver(payload, sink.clone(), metrics.clone()));
            }
            Ok(None) => {
                metrics.nil_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(PersistenceError::SourceClosed) => {
                info!("Change notification source closed");
                break;
            }
            Err(e) => {
                metrics.source_errors.fetch_add(1, Ordering::Relaxed);
                error!(error = %e, "Failed to receive change notification");
                tokio::select! {
                    _ = shutdown.wait_for(|stop| *stop) => break,
                    _ = tokio::time::sleep(reconnect_delay) => {}
                }
            }
        }

        while deliveries.try_join_next().is_some() {}
    }

    let stopped = *shutdown.borrow();
    if stopped {
        deliveries.shutdown().await;
    } else {
        // Source closed: let queued deliveries finish unless asked to stop
        let stop_requested = tokio::select! {
            stop = shutdown.wait_for(|stop| *stop) => stop.is_ok(),
            _ = drain(&mut deliveries) => false,
        };
        if stop_requested {
            deliveries.shutdown().await;
        }
    }
    debug!("Change listener stopped");
}

async fn drain(deliveries: &mut JoinSet<()>) {
    while deliveries.join_next().await.is_some() {}
}

async fn deliver(payload: Vec<u8>, sink: mpsc::Sender<Notification>, metrics: Arc<ListenerMetrics>) {
    let outcome = decode(&payload);
    metrics.decode.record(&outcome);

    match &outcome {
        Decoded::Notification(n) => {
            debug!(table = %n.table, action = %n.action, "Decoded change notification");
        }
        Decoded::Malformed { notification, reason } => {
            warn!(
                table = %notification.table,
                reason = %reason,
                "Malformed change notification data, delivering empty payload"
            );
        }
        Decoded::UnknownTable(table) => {
            warn!(table = %table, "Dropped change notification for unknown table");
        }
        Decoded::InvalidEnvelope(reason) => {
            warn!(reason = %reason, "Dropped unparseable change notification");
        }
    }

    if let Some(notification) = outcome.into_notification() {
        if sink.send(notification).await.is_ok() {
            metrics.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            debug!("Notification queue closed, dropping notification");
        }
    }
}
