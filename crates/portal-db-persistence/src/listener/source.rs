//! Event sources feeding the change listener

use async_trait::async_trait;
use sea_orm::sqlx::postgres::PgListener;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};
use tokio::sync::mpsc;

use crate::error::PersistenceError;

/// A subscription to the store's publish/subscribe channel
#[async_trait]
pub trait EventSource: Send + 'static {
    /// Subscribe to `channel`; called once before the first `recv`
    async fn listen(&mut self, channel: &str) -> Result<(), PersistenceError>;

    /// Wait for the next raw event
    ///
    /// `Ok(None)` is a nil event, e.g. the connection was re-established.
    /// [`PersistenceError::SourceClosed`] ends the subscription for good; any
    /// other error is transient.
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, PersistenceError>;
}

/// `LISTEN`/`NOTIFY` subscription on a PostgreSQL connection
///
/// The listener owns a dedicated connection from the pool and re-subscribes
/// on its own after the connection is lost.
pub struct PgEventSource {
    listener: PgListener,
}

impl PgEventSource {
    pub async fn connect(db: &DatabaseConnection) -> Result<Self, PersistenceError> {
        if db.get_database_backend() != DatabaseBackend::Postgres {
            return Err(PersistenceError::Source(
                "change notifications require a PostgreSQL connection".to_string(),
            ));
        }
        let listener = PgListener::connect_with(db.get_postgres_connection_pool()).await?;
        Ok(Self { listener })
    }
}

#[async_trait]
impl EventSource for PgEventSource {
    async fn listen(&mut self, channel: &str) -> Result<(), PersistenceError> {
        self.listener.listen(channel).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, PersistenceError> {
        let notification = self.listener.try_recv().await?;
        Ok(notification.map(|n| n.payload().as_bytes().to_vec()))
    }
}

#[derive(Debug)]
enum FeedItem {
    Payload(Vec<u8>),
    Nil,
    Failure(String),
}

/// In-process event source driven by a [`ChannelFeeder`]
///
/// The source closes once every feeder has been dropped.
pub struct ChannelSource {
    events: mpsc::UnboundedReceiver<FeedItem>,
    listen_error: Option<String>,
    channel: Option<String>,
}

/// Sending half of a [`ChannelSource`]
#[derive(Clone)]
pub struct ChannelFeeder {
    events: mpsc::UnboundedSender<FeedItem>,
}

impl ChannelSource {
    pub fn new() -> (Self, ChannelFeeder) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            events: rx,
            listen_error: None,
            channel: None,
        };
        (source, ChannelFeeder { events: tx })
    }

    /// A source whose subscription attempt fails with `message`
    pub fn failing(message: impl Into<String>) -> (Self, ChannelFeeder) {
        let (mut source, feeder) = Self::new();
        source.listen_error = Some(message.into());
        (source, feeder)
    }

    /// Channel subscribed to, once `listen` succeeded
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }
}

impl ChannelFeeder {
    /// Publish a raw payload; returns `false` once the source is gone
    pub fn send(&self, payload: impl Into<Vec<u8>>) -> bool {
        self.events.send(FeedItem::Payload(payload.into())).is_ok()
    }

    pub fn send_nil(&self) -> bool {
        self.events.send(FeedItem::Nil).is_ok()
    }

    /// Make the next `recv` fail with a transient error
    pub fn fail(&self, message: impl Into<String>) -> bool {
        self.events.send(FeedItem::Failure(message.into())).is_ok()
    }
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn listen(&mut self, channel: &str) -> Result<(), PersistenceError> {
        if let Some(message) = self.listen_error.take() {
            return Err(PersistenceError::Source(message));
        }
        self.channel = Some(channel.to_string());
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, PersistenceError> {
        match self.events.recv().await {
            Some(FeedItem::Payload(payload)) => Ok(Some(payload)),
            Some(FeedItem::Nil) => Ok(None),
            Some(FeedItem::Failure(message)) => Err(PersistenceError::Source(message)),
            None => Err(PersistenceError::SourceClosed),
        }
    }
}
