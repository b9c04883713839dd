use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::get,
    Router,
};

use crate::app::dto::{CreateItemRequest, UpdateItemRequest};
use crate::app::errors::ApiError;
use crate::app::extract::JsonBody;
use crate::app::routes::records;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    records::list(services.items.as_ref()).await
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    records::get(services.items.as_ref(), &id).await
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<CreateItemRequest>,
) -> Result<Response, ApiError> {
    records::create(services.items.as_ref(), body.into_draft()).await
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<JsonBody<UpdateItemRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let patch = body.map(|JsonBody(body)| body.into_patch());
    records::update(services.items.as_ref(), &id, patch).await
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    records::delete(services.items.as_ref(), &id).await
}
