//! Promo model.

use serde::Serialize;
use solesync_core::types::Timestamp;
use sqlx::FromRow;

/// A promo joined with its (optional) branch name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Promo {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub date: Timestamp,
    pub branch_id: Option<String>,
    pub branch_name: Option<String>,
}
