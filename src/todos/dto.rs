use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{error::AppError, todos::repo_types::Todo};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<OffsetDateTime>,
}

impl From<Todo> for TodoItem {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            description: t.description,
            created_at: t.created_at,
            completed_at: t.completed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddTodoRequest {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub description: String,
}

/// Body of complete/delete. The id is optional; the path names the todo.
#[derive(Debug, Deserialize)]
pub struct TodoRef {
    #[serde(default)]
    pub id: Option<Uuid>,
}

/// The path id is authoritative; a body id may only repeat it.
pub fn ensure_same_id(path_id: Uuid, body_id: Option<Uuid>) -> Result<(), AppError> {
    match body_id {
        Some(id) if id != path_id => Err(AppError::BadRequest(format!(
            "body id {id} does not match path id {path_id}"
        ))),
        _ => Ok(()),
    }
}
