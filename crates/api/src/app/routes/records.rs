//! Resource operations shared by every single-table entity.
//!
//! The per-resource route files decode requests into drafts/patches and
//! delegate here; status codes and error bodies are decided in one place.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use recordkeep_core::{DomainResult, Record, RecordId};
use recordkeep_infra::RecordStore;

use crate::app::errors::ApiError;

/// Path ids that are not integers can never match a row.
fn parse_id<R: Record>(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(R::ENTITY))
}

async fn find<R: Record>(store: &dyn RecordStore<R>, raw_id: &str) -> Result<R, ApiError> {
    let id = parse_id::<R>(raw_id)?;
    store.get(id).await?.ok_or(ApiError::NotFound(R::ENTITY))
}

pub async fn list<R: Record>(store: &dyn RecordStore<R>) -> Result<Response, ApiError> {
    let records = store.list().await?;
    Ok((StatusCode::OK, Json(records)).into_response())
}

pub async fn get<R: Record>(store: &dyn RecordStore<R>, raw_id: &str) -> Result<Response, ApiError> {
    let record = find(store, raw_id).await?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

pub async fn create<R: Record>(
    store: &dyn RecordStore<R>,
    draft: DomainResult<R::Draft>,
) -> Result<Response, ApiError> {
    let draft = draft.map_err(|e| {
        tracing::warn!(entity = R::ENTITY, error = %e, "rejected create");
        ApiError::from(e)
    })?;

    let record = store.insert(draft).await?;
    tracing::info!(entity = R::ENTITY, id = %record.id(), "record created");
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// Apply a patch to one record in a single store write.
///
/// `patch` carries any request-decoding failure. An unknown id is reported as
/// 404 before that failure is, so clients learn about missing records first.
pub async fn update<R: Record>(
    store: &dyn RecordStore<R>,
    raw_id: &str,
    patch: Result<R::Patch, ApiError>,
) -> Result<Response, ApiError> {
    let id = parse_id::<R>(raw_id)?;
    let patch = match patch {
        Ok(patch) => patch,
        Err(err) => {
            find(store, raw_id).await?;
            tracing::warn!(entity = R::ENTITY, %id, error = %err, "rejected update");
            return Err(err);
        }
    };

    // `None` also covers a delete that landed after the request arrived.
    let record = store.update(id, patch).await?.ok_or(ApiError::NotFound(R::ENTITY))?;
    tracing::info!(entity = R::ENTITY, %id, "record updated");
    Ok((StatusCode::OK, Json(record)).into_response())
}

pub async fn delete<R: Record>(store: &dyn RecordStore<R>, raw_id: &str) -> Result<Response, ApiError> {
    let id = parse_id::<R>(raw_id)?;
    if !store.delete(id).await? {
        return Err(ApiError::NotFound(R::ENTITY));
    }

    tracing::info!(entity = R::ENTITY, %id, "record deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::async_trait;
    use axum::body::to_bytes;
    use recordkeep_infra::{InMemoryRecordStore, StoreResult};
    use recordkeep_items::{Item, ItemPatch, NewItem};
    use serde_json::Value;

    /// Deletes the row just before the write lands, like a concurrent
    /// `DELETE` arriving between request decoding and the update.
    struct DeletedMidUpdate(InMemoryRecordStore<Item>);

    #[async_trait]
    impl RecordStore<Item> for DeletedMidUpdate {
        async fn list(&self) -> StoreResult<Vec<Item>> {
            self.0.list().await
        }

        async fn get(&self, id: RecordId) -> StoreResult<Option<Item>> {
            self.0.get(id).await
        }

        async fn insert(&self, draft: NewItem) -> StoreResult<Item> {
            self.0.insert(draft).await
        }

        async fn update(&self, id: RecordId, patch: ItemPatch) -> StoreResult<Option<Item>> {
            self.0.delete(id).await?;
            self.0.update(id, patch).await
        }

        async fn delete(&self, id: RecordId) -> StoreResult<bool> {
            self.0.delete(id).await
        }
    }

    async fn seeded() -> (InMemoryRecordStore<Item>, Item) {
        let store = InMemoryRecordStore::new();
        let item = store
            .insert(NewItem::new(Some("Widget".into())).unwrap())
            .await
            .unwrap();
        (store, item)
    }

    async fn error_body(err: ApiError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn update_racing_a_delete_returns_404() {
        let (inner, item) = seeded().await;
        let store = DeletedMidUpdate(inner);

        let err = update::<Item>(&store, &item.id.to_string(), Ok(ItemPatch::new(Some("late".into()))))
            .await
            .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Item not found");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_body_on_unknown_id_reports_404() {
        let (store, _) = seeded().await;
        let err = update::<Item>(&store, "999", Err(ApiError::InvalidBody("EOF".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Item")));
    }

    #[tokio::test]
    async fn bad_body_on_existing_id_reports_the_body_error() {
        let (store, item) = seeded().await;
        let err = update::<Item>(
            &store,
            &item.id.to_string(),
            Err(ApiError::InvalidBody("EOF".into())),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
        assert_eq!(store.get(item.id).await.unwrap(), Some(item));
    }
}
