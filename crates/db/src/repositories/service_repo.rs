//! Repository for the `services` catalog.

use sqlx::PgPool;

use crate::models::service::Service;

const COLUMNS: &str = "service_id, service_name, service_base_price, service_duration, created_at";

pub struct ServiceRepo;

impl ServiceRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        service_id: &str,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE service_id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(service_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services ORDER BY service_name");
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }
}
