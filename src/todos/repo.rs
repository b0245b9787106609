use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::todos::repo_types::Todo;

// Every mutation below is keyed on (id, user_id). A todo owned by someone else
// is indistinguishable from a missing one: zero rows affected, no error.

impl Todo {
    /// Live (non-archived) todos of `user_id`, oldest first.
    pub async fn list_active(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Todo>> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, user_id, description, created_at, completed_at, archived_at
            FROM todos
            WHERE user_id = $1 AND archived_at IS NULL
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list todos")?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, user_id: Uuid, description: &str) -> anyhow::Result<Todo> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, user_id, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, description, created_at, completed_at, archived_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(description)
        .fetch_one(db)
        .await
        .context("insert todo")?;
        Ok(todo)
    }

    pub async fn update_description(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        description: &str,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET description = $1
            WHERE id = $2 AND user_id = $3 AND archived_at IS NULL
            "#,
        )
        .bind(description)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("update todo description")?;
        Ok(result.rows_affected())
    }

    /// Stamps `completed_at` with the current time, overwriting any earlier value.
    pub async fn complete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET completed_at = now()
            WHERE id = $1 AND user_id = $2 AND archived_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("complete todo")?;
        Ok(result.rows_affected())
    }

    /// Soft delete. The first archival time is kept on repeat calls.
    pub async fn archive(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET archived_at = now()
            WHERE id = $1 AND user_id = $2 AND archived_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("archive todo")?;
        Ok(result.rows_affected())
    }
}
