use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Todo record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub completed_at: Option<OffsetDateTime>,
    pub archived_at: Option<OffsetDateTime>, // soft delete marker
}
