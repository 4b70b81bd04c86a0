//! HTTP/JSON transport
//!
//! Grounded on `examples/original_source/api/internal/transport/http/{service,server}.go`:
//! the same four routes and the same JSON field names, rebuilt on `axum`
//! rather than `gorilla/mux` + hand-rolled `encoding/json`. Unlike the
//! original (which always writes 200 and puts the error string in the
//! body), this maps `EmptyRotations`/`NotFound` to 4xx and cancellation to
//! 499, the way a modern Rust HTTP service is expected to.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};
use banner_core::{BannerId, Error, GroupId, SlotId};
use banner_engine::RotationService;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Builds the router exposing `RotationService` over HTTP/JSON.
pub fn router(service: Arc<RotationService>) -> Router {
    Router::new()
        .route("/banner/add", post(add_banner))
        .route("/banner/set-transition", post(set_transition))
        .route("/banner/select", post(select_banner))
        .route("/banner/remove/:id", delete(remove_banner))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_cancelled() {
            StatusCode::from_u16(499).expect("499 is a valid status code")
        } else if self.0.is_client_visible() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        tracing::error!(error = %self.0, %status, "request failed");
        (status, self.0.to_string()).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct AddRequest {
    #[serde(rename = "bannerId")]
    banner_id: BannerId,
    #[serde(rename = "slotId")]
    slot_id: SlotId,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize)]
struct RotationResponse {
    id: u64,
    #[serde(rename = "bannerId")]
    banner_id: BannerId,
    #[serde(rename = "slotId")]
    slot_id: SlotId,
    description: String,
    #[serde(rename = "createAt")]
    create_at: chrono::DateTime<chrono::Utc>,
}

impl From<banner_core::Rotation> for RotationResponse {
    fn from(rotation: banner_core::Rotation) -> Self {
        Self {
            id: rotation.id,
            banner_id: rotation.banner_id,
            slot_id: rotation.slot_id,
            description: rotation.description,
            create_at: rotation.created_at,
        }
    }
}

async fn add_banner(
    State(service): State<Arc<RotationService>>,
    Json(request): Json<AddRequest>,
) -> Result<Json<RotationResponse>, ApiError> {
    let cancel = CancellationToken::new();
    let rotation = service
        .add(
            request.banner_id,
            request.slot_id,
            request.description,
            &cancel,
        )
        .await?;

    tracing::info!(banner_id = rotation.banner_id, slot_id = rotation.slot_id, "banner added to rotation");
    Ok(Json(rotation.into()))
}

#[derive(Debug, Deserialize)]
struct SetTransitionRequest {
    #[serde(rename = "bannerId")]
    banner_id: BannerId,
    #[serde(rename = "groupId")]
    group_id: GroupId,
}

async fn set_transition(
    State(service): State<Arc<RotationService>>,
    Json(request): Json<SetTransitionRequest>,
) -> Result<&'static str, ApiError> {
    let cancel = CancellationToken::new();
    let rotation = service
        .find_rotation_by_banner_id(request.banner_id, &cancel)
        .await?;
    service
        .set_transition(&rotation, request.group_id, &cancel)
        .await?;

    tracing::info!(
        banner_id = request.banner_id,
        group_id = request.group_id,
        "set the transition on the banner"
    );
    Ok("ok")
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    #[serde(rename = "slotId")]
    slot_id: SlotId,
    #[serde(rename = "groupId")]
    group_id: GroupId,
}

async fn select_banner(
    State(service): State<Arc<RotationService>>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<BannerId>, ApiError> {
    let cancel = CancellationToken::new();
    let (banner_id, _event) = service
        .select_banner(request.slot_id, request.group_id, &cancel)
        .await?;

    tracing::info!(
        slot_id = request.slot_id,
        group_id = request.group_id,
        banner_id,
        "selected the banner to view"
    );
    Ok(Json(banner_id))
}

async fn remove_banner(
    State(service): State<Arc<RotationService>>,
    Path(id): Path<BannerId>,
) -> Result<&'static str, ApiError> {
    let cancel = CancellationToken::new();
    service.remove(id, &cancel).await?;

    tracing::info!(banner_id = id, "the banner has been removed from rotation");
    Ok("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode as Status};
    use banner_engine::NullSink;
    use banner_storage::{InMemoryRotationStore, InMemoryStatsStore};
    use tower::ServiceExt;

    fn app() -> Router {
        let service = Arc::new(RotationService::new(
            Arc::new(InMemoryRotationStore::new()),
            Arc::new(InMemoryStatsStore::new()),
            Arc::new(NullSink),
        ));
        router(service)
    }

    #[tokio::test]
    async fn add_then_select_round_trips_through_json() {
        let app = app();

        let add_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/banner/add")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"bannerId":1,"slotId":1,"description":"x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(add_response.status(), Status::OK);

        let select_response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/banner/select")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"slotId":1,"groupId":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(select_response.status(), Status::OK);
    }

    #[tokio::test]
    async fn select_on_empty_slot_is_a_client_error() {
        let app = app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/banner/select")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"slotId":99,"groupId":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), Status::BAD_REQUEST);
    }

    #[tokio::test]
    async fn remove_on_an_absent_banner_is_a_client_error() {
        let app = app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/banner/remove/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), Status::BAD_REQUEST);
    }
}
