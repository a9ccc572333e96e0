//! SoleSync change feed.
//!
//! Database writes on watched tables are observed and re-published on an
//! in-process bus for the realtime relay:
//!
//! - [`Collection`] describes a watched table and how its events are named
//!   and scoped.
//! - [`ChangeSource`] / [`ChangeSourceFactory`] abstract the notification
//!   stream; [`PgChangeFeed`] implements them over Postgres `LISTEN/NOTIFY`.
//! - [`ChangeFeedWatcher`] keeps one listener per collection alive with
//!   capped exponential backoff and publishes [`FeedEvent`]s on the
//!   [`EventBus`].

pub mod bus;
pub mod collection;
pub mod error;
pub mod notification;
pub mod source;
pub mod watcher;

pub use bus::{EventBus, FeedEvent};
pub use collection::{Collection, WATCHED_COLLECTIONS};
pub use error::ChangeFeedError;
pub use source::{ChangeSource, ChangeSourceFactory, PgChangeFeed, PgChangeSource};
pub use watcher::{next_delay, BackoffConfig, ChangeFeedWatcher};
