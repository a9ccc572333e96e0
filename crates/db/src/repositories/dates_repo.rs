//! Repository for the `dates` milestone table.

use sqlx::PgPool;

use crate::models::dates::DatesRecord;

const COLUMNS: &str = "line_item_id, cust_id, acknowledged_at, to_hub_at, in_process_at, \
                       returning_at, ready_at, updated_at";

pub struct DatesRepo;

impl DatesRepo {
    pub async fn find_by_line_item(
        pool: &PgPool,
        line_item_id: &str,
    ) -> Result<Option<DatesRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dates WHERE line_item_id = $1");
        sqlx::query_as::<_, DatesRecord>(&query)
            .bind(line_item_id)
            .fetch_optional(pool)
            .await
    }
}
