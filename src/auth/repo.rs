use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{Session, User};

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    /// Create a new user with an already hashed password.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .context("insert user")?;
        Ok(user)
    }
}

impl Session {
    /// Open a new active session for `user_id`.
    pub async fn create(db: &PgPool, user_id: Uuid) -> anyhow::Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id)
            VALUES ($1, $2)
            RETURNING id, user_id, created_at, archived_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("insert session")?;
        Ok(session)
    }

    /// Owner of the session `id`, provided it has not been archived.
    pub async fn resolve_user(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Uuid>> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id
            FROM sessions
            WHERE id = $1 AND archived_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("resolve session")?;
        Ok(user_id)
    }

    /// Archive an active session. Returns whether a row changed.
    pub async fn archive(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET archived_at = now()
            WHERE id = $1 AND user_id = $2 AND archived_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("archive session")?;
        Ok(result.rows_affected() > 0)
    }
}
