//! Repository for the `customers` table.

use chrono::NaiveDate;
use solesync_core::ids::customer_code;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer};

const COLUMNS: &str = "cust_id, cust_name, cust_bdate, cust_address, cust_contact, cust_email, \
                       total_services, total_expenditure, credibility, created_at, updated_at";

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer with a generated `CUST-00-NNNN` id.
    ///
    /// Counters start at zero and credibility at the column default.
    pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let number: i64 = sqlx::query_scalar("SELECT nextval('customer_code_seq')")
            .fetch_one(pool)
            .await?;
        let query = format!(
            "INSERT INTO customers (cust_id, cust_name, cust_bdate, cust_address, cust_contact, cust_email)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(customer_code(number))
            .bind(input.cust_name.trim())
            .bind(input.cust_bdate)
            .bind(&input.cust_address)
            .bind(&input.cust_contact)
            .bind(&input.cust_email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, cust_id: &str) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE cust_id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(cust_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE lower(cust_email) = lower($1)");
        sqlx::query_as::<_, Customer>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Login lookup. Name comparison ignores case and surrounding whitespace.
    pub async fn find_by_name_and_birthdate(
        pool: &PgPool,
        name: &str,
        birthdate: NaiveDate,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers
             WHERE lower(cust_name) = lower($1) AND cust_bdate = $2
             ORDER BY created_at
             LIMIT 1"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(name.trim())
            .bind(birthdate)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers ORDER BY cust_id");
        sqlx::query_as::<_, Customer>(&query).fetch_all(pool).await
    }

    /// Overwrite a customer's credibility score. Returns `true` if a row changed.
    pub async fn set_credibility(
        pool: &PgPool,
        cust_id: &str,
        credibility: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE customers SET credibility = $2, updated_at = NOW() WHERE cust_id = $1",
        )
        .bind(cust_id)
        .bind(credibility)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
