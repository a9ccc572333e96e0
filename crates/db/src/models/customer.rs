//! Customer model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use solesync_core::types::Timestamp;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub cust_id: String,
    pub cust_name: String,
    pub cust_bdate: Option<NaiveDate>,
    pub cust_address: Option<String>,
    pub cust_contact: Option<String>,
    pub cust_email: Option<String>,
    pub total_services: i32,
    pub total_expenditure: f64,
    pub credibility: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a customer. The id is generated on insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomer {
    #[validate(length(min = 1, message = "cust_name is required"))]
    pub cust_name: String,
    pub cust_bdate: Option<NaiveDate>,
    pub cust_address: Option<String>,
    pub cust_contact: Option<String>,
    #[validate(email(message = "cust_email is not a valid email address"))]
    pub cust_email: Option<String>,
}
