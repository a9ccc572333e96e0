//! Client-side library for the SoleSync mobile app.
//!
//! - [`api::SoleSyncApi`] wraps the REST endpoints.
//! - [`socket::RealtimeClient`] subscribes to the change feed over
//!   WebSocket and reconnects with capped backoff.
//! - [`reconcile`] merges change events into local state.
//! - [`storage`], [`session`] and [`read_tracker`] hold device-local state.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod read_tracker;
pub mod reconcile;
pub mod session;
pub mod socket;
pub mod storage;

pub use api::SoleSyncApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use socket::{RealtimeClient, RealtimeHandle};
