//! SoleSync domain core.
//!
//! Pure domain logic with zero internal dependencies: booking rules,
//! tracking stages, generated identifiers, and the realtime wire types
//! shared by the server and the client library.

pub mod appointment;
pub mod error;
pub mod ids;
pub mod realtime;
pub mod tracking;
pub mod types;
pub mod unavailability;
