//! The `Rotation` gRPC service implementation
//!
//! Each RPC allocates a fresh per-request cancellation token (tonic cancels
//! the future itself on client disconnect; the token exists so the store
//! layer's own fail-fast check has something to observe mid-call) and maps
//! [`banner_core::Error`] onto a `tonic::Status` (`NOT_FOUND`, `CANCELLED`,
//! `INTERNAL`).

use std::sync::Arc;

use banner_core::Error;
use banner_engine::RotationService;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};

use crate::pb::rotation_server::{Rotation, RotationServer};
use crate::pb::{Banner, RotationRequest, RotationResponse, Select, Transition};

/// Implements the four RPCs defined in `rotation.proto` over a shared
/// [`RotationService`].
pub struct RotationGrpcService {
    service: Arc<RotationService>,
}

impl RotationGrpcService {
    /// Wraps an already-constructed `RotationService`.
    pub fn new(service: Arc<RotationService>) -> Self {
        Self { service }
    }
}

/// Wraps `service` in the tonic-generated server type ready to be handed to
/// [`tonic::transport::Server::add_service`].
pub fn into_service(service: Arc<RotationService>) -> RotationServer<RotationGrpcService> {
    RotationServer::new(RotationGrpcService::new(service))
}

fn to_status(err: Error) -> Status {
    if err.is_cancelled() {
        Status::cancelled(err.to_string())
    } else if err.is_client_visible() {
        Status::not_found(err.to_string())
    } else {
        Status::internal(err.to_string())
    }
}

#[tonic::async_trait]
impl Rotation for RotationGrpcService {
    async fn add_banner(
        &self,
        request: Request<RotationRequest>,
    ) -> Result<Response<RotationResponse>, Status> {
        let req = request.into_inner();
        let cancel = CancellationToken::new();

        let rotation = self
            .service
            .add(req.banner_id, req.slot_id, req.description, &cancel)
            .await
            .map_err(to_status)?;

        Ok(Response::new(RotationResponse {
            id: rotation.id,
            banner_id: rotation.banner_id,
            slot_id: rotation.slot_id,
            description: rotation.description,
            create_at: Some(prost_types::Timestamp {
                seconds: rotation.created_at.timestamp(),
                nanos: rotation.created_at.timestamp_subsec_nanos() as i32,
            }),
        }))
    }

    async fn set_transition(
        &self,
        request: Request<Transition>,
    ) -> Result<Response<crate::pb::Status>, Status> {
        let req = request.into_inner();
        let cancel = CancellationToken::new();

        let rotation = self
            .service
            .find_rotation_by_banner_id(req.banner_id, &cancel)
            .await
            .map_err(to_status)?;
        self.service
            .set_transition(&rotation, req.group_id, &cancel)
            .await
            .map_err(to_status)?;

        Ok(Response::new(crate::pb::Status {
            status: "ok".to_string(),
        }))
    }

    async fn select_banner(
        &self,
        request: Request<Select>,
    ) -> Result<Response<Banner>, Status> {
        let req = request.into_inner();
        let cancel = CancellationToken::new();

        let (banner_id, _event) = self
            .service
            .select_banner(req.slot_id, req.group_id, &cancel)
            .await
            .map_err(to_status)?;

        Ok(Response::new(Banner { id: banner_id }))
    }

    async fn remove_banner(
        &self,
        request: Request<Banner>,
    ) -> Result<Response<crate::pb::Status>, Status> {
        let req = request.into_inner();
        let cancel = CancellationToken::new();

        self.service
            .remove(req.id, &cancel)
            .await
            .map_err(to_status)?;

        Ok(Response::new(crate::pb::Status {
            status: "ok".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banner_engine::NullSink;
    use banner_storage::{InMemoryRotationStore, InMemoryStatsStore};

    fn grpc_service() -> RotationGrpcService {
        RotationGrpcService::new(Arc::new(RotationService::new(
            Arc::new(InMemoryRotationStore::new()),
            Arc::new(InMemoryStatsStore::new()),
            Arc::new(NullSink),
        )))
    }

    #[tokio::test]
    async fn add_then_select_banner_round_trips() {
        let service = grpc_service();

        let added = service
            .add_banner(Request::new(RotationRequest {
                banner_id: 1,
                slot_id: 1,
                description: String::new(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(added.banner_id, 1);

        let selected = service
            .select_banner(Request::new(Select {
                slot_id: 1,
                group_id: 1,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(selected.id, 1);
    }

    #[tokio::test]
    async fn select_banner_on_an_empty_slot_is_not_found() {
        let service = grpc_service();

        let status = service
            .select_banner(Request::new(Select {
                slot_id: 99,
                group_id: 1,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn set_transition_records_a_click() {
        let service = grpc_service();
        service
            .add_banner(Request::new(RotationRequest {
                banner_id: 13,
                slot_id: 5,
                description: String::new(),
            }))
            .await
            .unwrap();

        let status = service
            .set_transition(Request::new(Transition {
                banner_id: 13,
                group_id: 8,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(status.status, "ok");
    }
}
