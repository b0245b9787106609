use crate::state::AppState;
use axum::Router;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod password;
mod repo;
pub mod repo_types;

pub use extractors::{AuthUser, CurrentSession};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
