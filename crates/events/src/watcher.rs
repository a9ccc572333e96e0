//! Change feed watcher with exponential-backoff restarts.
//!
//! One task per collection: connect, stream notifications onto the bus,
//! and on error or close wait and reconnect. Events written while a
//! listener is down are not replayed.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::bus::{EventBus, FeedEvent};
use crate::collection::{Collection, WATCHED_COLLECTIONS};
use crate::error::ChangeFeedError;
use crate::notification::{build_change, decode_payload, RawNotification};
use crate::source::{ChangeSource, ChangeSourceFactory};

// ---------------------------------------------------------------------------
// Backoff
// ---------------------------------------------------------------------------

/// Tunable parameters for the restart backoff.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay before the first restart after a healthy connection.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay, clamped to [`BackoffConfig::max_delay`].
pub fn next_delay(current: Duration, config: &BackoffConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

// ---------------------------------------------------------------------------
// Watcher
// ---------------------------------------------------------------------------

/// Keeps a change listener alive for every watched collection.
pub struct ChangeFeedWatcher {
    factory: Arc<dyn ChangeSourceFactory>,
    bus: Arc<EventBus>,
    backoff: BackoffConfig,
    collections: Vec<Collection>,
}

impl ChangeFeedWatcher {
    pub fn new(
        factory: Arc<dyn ChangeSourceFactory>,
        bus: Arc<EventBus>,
        backoff: BackoffConfig,
    ) -> Self {
        Self {
            factory,
            bus,
            backoff,
            collections: WATCHED_COLLECTIONS.to_vec(),
        }
    }

    /// Restrict the watcher to a subset of collections.
    pub fn with_collections(mut self, collections: Vec<Collection>) -> Self {
        self.collections = collections;
        self
    }

    /// Run until `cancel` fires. Each collection restarts independently.
    pub async fn run(self, cancel: CancellationToken) {
        let mut tasks = JoinSet::new();
        for collection in self.collections {
            tasks.spawn(watch_collection(
                Arc::clone(&self.factory),
                Arc::clone(&self.bus),
                self.backoff.clone(),
                collection,
                cancel.clone(),
            ));
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Change feed task panicked");
            }
        }
        tracing::info!("Change feed watcher stopped");
    }
}

async fn watch_collection(
    factory: Arc<dyn ChangeSourceFactory>,
    bus: Arc<EventBus>,
    backoff: BackoffConfig,
    collection: Collection,
    cancel: CancellationToken,
) {
    let mut delay = backoff.initial_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let connected = tokio::select! {
            _ = cancel.cancelled() => return,
            result = factory.connect(&collection) => result,
        };

        match connected {
            Ok(source) => {
                tracing::info!(table = collection.table, attempt, "Watching for changes");
                delay = backoff.initial_delay;
                attempt = 0;
                match stream(&*factory, &bus, collection, source, &cancel).await {
                    StreamEnd::Cancelled => return,
                    StreamEnd::Closed => {
                        tracing::warn!(table = collection.table, "Change stream closed");
                    }
                    StreamEnd::Failed(e) => {
                        tracing::warn!(table = collection.table, error = %e, "Change stream error");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    table = collection.table,
                    error = %e,
                    "Change stream connect attempt {attempt} failed",
                );
            }
        }

        tracing::info!(
            table = collection.table,
            delay_ms = delay.as_millis() as u64,
            "Restarting change stream",
        );
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = next_delay(delay, &backoff);
    }
}

enum StreamEnd {
    Cancelled,
    Closed,
    Failed(ChangeFeedError),
}

async fn stream(
    factory: &dyn ChangeSourceFactory,
    bus: &EventBus,
    collection: Collection,
    mut source: Box<dyn ChangeSource>,
    cancel: &CancellationToken,
) -> StreamEnd {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => return StreamEnd::Cancelled,
            next = source.next() => next,
        };

        let raw = match next {
            Ok(Some(raw)) => raw,
            Ok(None) => return StreamEnd::Closed,
            Err(e) => return StreamEnd::Failed(e),
        };

        match to_feed_event(factory, collection, &raw).await {
            Ok(event) => {
                tracing::debug!(
                    table = collection.table,
                    op = event.change.operation_type.as_str(),
                    key = %event.change.document_key.id,
                    "Change received",
                );
                bus.publish(event);
            }
            Err(e) => {
                tracing::warn!(
                    table = collection.table,
                    error = %e,
                    "Dropping change notification",
                );
            }
        }
    }
}

/// A notification must arrive on the channel of the collection it is
/// watched for.
async fn to_feed_event(
    factory: &dyn ChangeSourceFactory,
    watched: Collection,
    raw: &RawNotification,
) -> Result<FeedEvent, ChangeFeedError> {
    let collection = Collection::by_channel(&raw.channel)
        .filter(|found| *found == watched)
        .ok_or_else(|| ChangeFeedError::UnknownChannel(raw.channel.clone()))?;
    let payload = decode_payload(raw)?;
    let document = if payload.needs_lookup() {
        factory.lookup(&collection, &payload.key).await?
    } else {
        None
    };
    Ok(FeedEvent::new(collection, build_change(payload, document)))
}
