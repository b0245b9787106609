use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppError,
    state::AppState,
    todos::{
        dto::{ensure_same_id, AddTodoRequest, TodoItem, TodoRef, UpdateTodoRequest},
        repo_types::Todo,
    },
};

// update/complete/delete answer 201 like creation does; existing clients rely on it.

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todo", get(list_todos).post(add_todo))
        .route("/todo/:id", put(update_todo).delete(delete_todo))
        .route("/todo/:id/complete", put(complete_todo))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<TodoItem>>, AppError> {
    let todos = Todo::list_active(&state.db, user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "list todos failed");
        e
    })?;
    Ok(Json(todos.into_iter().map(TodoItem::from).collect()))
}

#[instrument(skip(state, body))]
pub async fn add_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<AddTodoRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = body.map_err(|e| {
        warn!(error = %e, "malformed todo body");
        e
    })?;

    let todo = Todo::create(&state.db, user_id, &payload.description)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "create todo failed");
            e
        })?;

    info!(%user_id, todo_id = %todo.id, "todo created");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, path, body))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let Json(payload) = body?;
    ensure_same_id(id, payload.id)?;

    let affected = Todo::update_description(&state.db, user_id, id, &payload.description)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, todo_id = %id, "update todo failed");
            e
        })?;

    debug!(%user_id, todo_id = %id, affected, "todo description updated");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, path, body))]
pub async fn complete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<TodoRef>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let Json(payload) = body?;
    ensure_same_id(id, payload.id)?;

    let affected = Todo::complete(&state.db, user_id, id).await.map_err(|e| {
        error!(error = %e, %user_id, todo_id = %id, "complete todo failed");
        e
    })?;

    debug!(%user_id, todo_id = %id, affected, "todo completed");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, path, body))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<TodoRef>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let Json(payload) = body?;
    ensure_same_id(id, payload.id)?;

    let affected = Todo::archive(&state.db, user_id, id).await.map_err(|e| {
        error!(error = %e, %user_id, todo_id = %id, "archive todo failed");
        e
    })?;

    debug!(%user_id, todo_id = %id, affected, "todo archived");
    Ok(StatusCode::CREATED)
}
