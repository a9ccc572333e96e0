//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! table row and, where the API writes the table, a create DTO.

pub mod announcement;
pub mod appointment;
pub mod branch;
pub mod customer;
pub mod dates;
pub mod line_item;
pub mod promo;
pub mod service;
pub mod unavailability;
