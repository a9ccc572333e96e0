//! Delivery of change feed events to WebSocket clients.

mod relay;

pub use relay::{encode_frame, RealtimeRelay};
