//! Repository for the `appointments` table.
//!
//! The eligibility queries here back the booking rules in
//! [`solesync_core::appointment`].

use chrono::{NaiveDate, NaiveTime};
use solesync_core::appointment::AppointmentStatus;
use solesync_core::ids::appointment_code;
use sqlx::PgPool;

use crate::models::appointment::{Appointment, CreateAppointment};

const COLUMNS: &str = "appointment_id, cust_id, branch_id, date_for_inquiry, time_start, time_end, \
                       status, created_at, updated_at";

/// Provides CRUD and eligibility queries for appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment with a generated `APPT-N` id.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let number: i64 = sqlx::query_scalar("SELECT nextval('appointment_code_seq')")
            .fetch_one(pool)
            .await?;
        let query = format!(
            "INSERT INTO appointments (appointment_id, cust_id, branch_id, date_for_inquiry, time_start, time_end, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(appointment_code(number))
            .bind(&input.cust_id)
            .bind(&input.branch_id)
            .bind(input.date_for_inquiry)
            .bind(input.time_start)
            .bind(input.time_end)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        appointment_id: &str,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE appointment_id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(appointment_id)
            .fetch_optional(pool)
            .await
    }

    /// Every non-canceled appointment of a customer, oldest first.
    pub async fn list_active_for_customer(
        pool: &PgPool,
        cust_id: &str,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE cust_id = $1 AND status <> 'Canceled'
             ORDER BY date_for_inquiry, time_start"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(cust_id)
            .fetch_all(pool)
            .await
    }

    /// Number of non-canceled appointments in a branch/date/start-time slot.
    pub async fn count_in_slot(
        pool: &PgPool,
        branch_id: &str,
        date: NaiveDate,
        time_start: NaiveTime,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments
             WHERE branch_id = $1 AND date_for_inquiry = $2 AND time_start = $3
               AND status <> 'Canceled'",
        )
        .bind(branch_id)
        .bind(date)
        .bind(time_start)
        .fetch_one(pool)
        .await
    }

    /// Earliest non-canceled appointment dated `today` or later.
    pub async fn find_upcoming_for_customer(
        pool: &PgPool,
        cust_id: &str,
        today: NaiveDate,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE cust_id = $1 AND date_for_inquiry >= $2 AND status <> 'Canceled'
             ORDER BY date_for_inquiry, time_start
             LIMIT 1"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(cust_id)
            .bind(today)
            .fetch_optional(pool)
            .await
    }

    /// Delete every Pending appointment of a customer. Returns the count deleted.
    pub async fn delete_pending_for_customer(
        pool: &PgPool,
        cust_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM appointments WHERE cust_id = $1 AND status = 'Pending'")
                .bind(cust_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete an appointment by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, appointment_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE appointment_id = $1")
            .bind(appointment_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an appointment Canceled, returning the updated row.
    pub async fn cancel(
        pool: &PgPool,
        appointment_id: &str,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET status = $2, updated_at = NOW()
             WHERE appointment_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(appointment_id)
            .bind(AppointmentStatus::Canceled.as_str())
            .fetch_optional(pool)
            .await
    }

    /// A Canceled appointment of this customer in the exact same slot.
    pub async fn find_canceled_in_slot(
        pool: &PgPool,
        cust_id: &str,
        branch_id: &str,
        date: NaiveDate,
        time_start: NaiveTime,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE cust_id = $1 AND branch_id = $2 AND date_for_inquiry = $3
               AND time_start = $4 AND status = 'Canceled'
             ORDER BY updated_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(cust_id)
            .bind(branch_id)
            .bind(date)
            .bind(time_start)
            .fetch_optional(pool)
            .await
    }
}
