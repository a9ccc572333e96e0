//! Notification sources.
//!
//! [`ChangeSourceFactory`] is the seam between the watcher and the
//! database: it opens one [`ChangeSource`] per collection and looks rows up
//! for update events. [`PgChangeFeed`] is the Postgres implementation.

use async_trait::async_trait;
use serde_json::Value;
use solesync_db::repositories::DocumentRepo;
use solesync_db::DbPool;
use sqlx::postgres::PgListener;

use crate::collection::Collection;
use crate::error::ChangeFeedError;
use crate::notification::RawNotification;

/// A live stream of notifications for one collection.
#[async_trait]
pub trait ChangeSource: Send {
    /// Wait for the next notification. `Ok(None)` means the stream closed.
    async fn next(&mut self) -> Result<Option<RawNotification>, ChangeFeedError>;
}

/// Opens change sources and resolves current documents.
#[async_trait]
pub trait ChangeSourceFactory: Send + Sync {
    async fn connect(
        &self,
        collection: &Collection,
    ) -> Result<Box<dyn ChangeSource>, ChangeFeedError>;

    /// Current row for `key` as JSON, or `None` if it no longer exists.
    async fn lookup(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<Option<Value>, ChangeFeedError>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// `LISTEN` on a single `<table>_changes` channel.
pub struct PgChangeSource {
    listener: PgListener,
}

impl PgChangeSource {
    pub async fn connect(pool: &DbPool, collection: &Collection) -> Result<Self, sqlx::Error> {
        let mut listener = PgListener::connect_with(pool).await?;
        listener.listen(&collection.channel()).await?;
        Ok(Self { listener })
    }
}

#[async_trait]
impl ChangeSource for PgChangeSource {
    async fn next(&mut self) -> Result<Option<RawNotification>, ChangeFeedError> {
        // `try_recv` reports a dropped connection as `None` instead of
        // silently reconnecting, so the watcher can apply its backoff.
        let notification = self.listener.try_recv().await?;
        Ok(notification.map(|n| RawNotification::new(n.channel(), n.payload())))
    }
}

/// [`ChangeSourceFactory`] over a Postgres pool.
#[derive(Clone)]
pub struct PgChangeFeed {
    pool: DbPool,
}

impl PgChangeFeed {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChangeSourceFactory for PgChangeFeed {
    async fn connect(
        &self,
        collection: &Collection,
    ) -> Result<Box<dyn ChangeSource>, ChangeFeedError> {
        let source = PgChangeSource::connect(&self.pool, collection).await?;
        Ok(Box::new(source))
    }

    async fn lookup(
        &self,
        collection: &Collection,
        key: &str,
    ) -> Result<Option<Value>, ChangeFeedError> {
        let document =
            DocumentRepo::fetch_json(&self.pool, collection.table, collection.key_column, key)
                .await?;
        Ok(document)
    }
}
