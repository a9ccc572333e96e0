//! Repository for the `unavailability` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::unavailability::Unavailability;

const COLUMNS: &str =
    "unavailability_id, branch_id, date_unavailable, type, time_start, time_end, note";

pub struct UnavailabilityRepo;

impl UnavailabilityRepo {
    /// Unavailability windows of a branch on one date.
    pub async fn list_for_branch_on(
        pool: &PgPool,
        branch_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Unavailability>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM unavailability
             WHERE branch_id = $1 AND date_unavailable = $2
             ORDER BY time_start NULLS FIRST"
        );
        sqlx::query_as::<_, Unavailability>(&query)
            .bind(branch_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }
}
