//! Remote contract of the StooKV service.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       proto.KVService                        │
//! ├──────────────────┬──────────────────┬────────────────────────┤
//! │ GetService       │ SetKeyService    │ SetSecretKeyService    │
//! │ DeleteKeyService │ GetServiceByNamespaceAndProfile           │
//! └──────────────────┴───────────────────────────────────────────┘
//! ```
//!
//! - [`proto`] - Wire messages
//! - [`grpc`] - tonic implementation of [`KvBackend`]

pub mod grpc;
pub mod proto;

use std::future::Future;
use std::time::Duration;
use tonic::Status;

pub use grpc::GrpcBackend;
pub use proto::{
    DataResponse, DeleteKeyRequest, GetByNamespaceAndProfileRequest, GetRequest, MapResponse,
    SetKeyRequest,
};

/// Fully-qualified gRPC service name.
pub const SERVICE_NAME: &str = "proto.KVService";

/// The five unary operations exposed by a StooKV server.
///
/// Each method issues exactly one remote call. `timeout` is the caller's
/// deadline; implementations forward it to the server where the transport
/// supports it. Errors are returned as the server or transport produced
/// them.
pub trait KvBackend: Send + Sync {
    /// Read one key.
    fn get(
        &self,
        request: GetRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<DataResponse, Status>> + Send;

    /// Write one key in plain form.
    fn set_key(
        &self,
        request: SetKeyRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<DataResponse, Status>> + Send;

    /// Write one key; the server stores the value encrypted.
    fn set_secret_key(
        &self,
        request: SetKeyRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<DataResponse, Status>> + Send;

    /// Remove one key.
    fn delete_key(
        &self,
        request: DeleteKeyRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<DataResponse, Status>> + Send;

    /// Read every key in a namespace/profile.
    fn get_by_namespace_and_profile(
        &self,
        request: GetByNamespaceAndProfileRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<MapResponse, Status>> + Send;
}
