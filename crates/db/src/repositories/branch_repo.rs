//! Repository for the `branches` table.

use sqlx::PgPool;

use crate::models::branch::Branch;

const COLUMNS: &str = "branch_id, branch_name, branch_type, location, created_at";

pub struct BranchRepo;

impl BranchRepo {
    /// All branches of the given type, ordered by name.
    pub async fn list_by_type(
        pool: &PgPool,
        branch_type: &str,
    ) -> Result<Vec<Branch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM branches WHERE branch_type = $1 ORDER BY branch_name"
        );
        sqlx::query_as::<_, Branch>(&query)
            .bind(branch_type)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, branch_id: &str) -> Result<Option<Branch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM branches WHERE branch_id = $1");
        sqlx::query_as::<_, Branch>(&query)
            .bind(branch_id)
            .fetch_optional(pool)
            .await
    }
}
