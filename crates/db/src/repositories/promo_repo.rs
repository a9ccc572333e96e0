//! Repository for the `promos` table.

use sqlx::PgPool;

use crate::models::promo::Promo;

pub struct PromoRepo;

impl PromoRepo {
    /// All promos, newest first, with the branch name joined in.
    pub async fn list_with_branch(pool: &PgPool) -> Result<Vec<Promo>, sqlx::Error> {
        sqlx::query_as::<_, Promo>(
            "SELECT p.promo_id AS id, p.title, p.description, p.duration,
                    p.promo_date AS date, p.branch_id, b.branch_name
             FROM promos p
             LEFT JOIN branches b ON b.branch_id = p.branch_id
             ORDER BY p.promo_date DESC",
        )
        .fetch_all(pool)
        .await
    }
}
