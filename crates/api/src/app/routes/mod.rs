use axum::Router;

pub mod items;
pub mod records;
pub mod system;
pub mod todos;

/// Router for the resource endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .nest("/todos", todos::router())
}
