//! gRPC transport
//!
//! Grounded on `examples/original_source/api/internal/transport/grpc/server.go`:
//! the same four RPCs over the same message shapes, rebuilt on `tonic`
//! rather than `google.golang.org/grpc`. `reflection.Register(gs)` becomes
//! `tonic_reflection`'s server, registered the same way at startup.

pub mod pb {
    #![allow(clippy::all)]
    tonic::include_proto!("banner.rotation.v1");

    /// Encoded `FileDescriptorSet` consumed by `tonic_reflection`, mirroring
    /// the original's `reflection.Register(gs)`.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("rotation_descriptor");
}

mod server;

pub use server::{into_service, RotationGrpcService};
