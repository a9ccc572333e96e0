//! Repository for the `announcements` table.

use sqlx::PgPool;

use crate::models::announcement::Announcement;

pub struct AnnouncementRepo;

impl AnnouncementRepo {
    /// All announcements, newest first, with the branch name joined in.
    pub async fn list_with_branch(pool: &PgPool) -> Result<Vec<Announcement>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            "SELECT a.announcement_id AS id, a.title, a.description,
                    a.announcement_date AS date, a.branch_id, b.branch_name
             FROM announcements a
             LEFT JOIN branches b ON b.branch_id = a.branch_id
             ORDER BY a.announcement_date DESC",
        )
        .fetch_all(pool)
        .await
    }
}
