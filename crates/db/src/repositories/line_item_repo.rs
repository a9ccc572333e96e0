//! Repository for the `line_items` table.

use sqlx::PgPool;

use crate::models::line_item::LineItem;

const COLUMNS: &str = "line_item_id, transaction_id, cust_id, branch_id, shoes, services, images, \
                       current_status, current_location, due_date, is_rush, latest_update";

pub struct LineItemRepo;

impl LineItemRepo {
    /// A customer's line items, most recently updated first.
    pub async fn list_for_customer(
        pool: &PgPool,
        cust_id: &str,
    ) -> Result<Vec<LineItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM line_items WHERE cust_id = $1 ORDER BY latest_update DESC"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(cust_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        line_item_id: &str,
    ) -> Result<Option<LineItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM line_items WHERE line_item_id = $1");
        sqlx::query_as::<_, LineItem>(&query)
            .bind(line_item_id)
            .fetch_optional(pool)
            .await
    }
}
