use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{get, put},
    Router,
};

use recordkeep_todos::TodoPatch;

use crate::app::dto::{CreateTodoRequest, TodoStatusQuery, UpdateTodoRequest};
use crate::app::errors::ApiError;
use crate::app::extract::{JsonBody, QueryParams};
use crate::app::routes::records;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/:id", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/check/:id", put(update_todo_status))
}

pub async fn list_todos(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    records::list(services.todos.as_ref()).await
}

pub async fn get_todo(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    records::get(services.todos.as_ref(), &id).await
}

pub async fn create_todo(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<CreateTodoRequest>,
) -> Result<Response, ApiError> {
    records::create(services.todos.as_ref(), body.into_draft()).await
}

pub async fn update_todo(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<JsonBody<UpdateTodoRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let patch = body.map(|JsonBody(body)| body.into_patch());
    records::update(services.todos.as_ref(), &id, patch).await
}

/// Set `completed` from the query string, or flip the stored value when absent.
///
/// Unknown ids are reported before a non-boolean (or empty) `completed` is.
pub async fn update_todo_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<QueryParams<TodoStatusQuery>, ApiError>,
) -> Result<Response, ApiError> {
    let patch = query.and_then(|QueryParams(query)| {
        Ok(TodoPatch::with_status(query.requested()?))
    });
    records::update(services.todos.as_ref(), &id, patch).await
}

pub async fn delete_todo(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    records::delete(services.todos.as_ref(), &id).await
}
