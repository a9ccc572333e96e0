//! Generic row-as-JSON lookup used by the change feed.

use serde_json::Value;
use sqlx::PgPool;

/// Fetches whole rows as JSON documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Current state of one row as a JSON object, or `None` if it is gone.
    ///
    /// `table` and `key_column` are interpolated into the statement and must
    /// come from a fixed descriptor, never from user input.
    pub async fn fetch_json(
        pool: &PgPool,
        table: &str,
        key_column: &str,
        key: &str,
    ) -> Result<Option<Value>, sqlx::Error> {
        let query = format!("SELECT to_jsonb(t) FROM {table} t WHERE t.{key_column} = $1");
        sqlx::query_scalar::<_, Value>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }
}
