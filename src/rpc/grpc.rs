//! gRPC client stub for `proto.KVService`.
//!
//! Thin wrapper over `tonic::client::Grpc` using prost encoding. The
//! underlying [`Channel`] multiplexes concurrent calls, so the stub is
//! cloned per call rather than locked.

use super::proto::{
    DataResponse, DeleteKeyRequest, GetByNamespaceAndProfileRequest, GetRequest, MapResponse,
    SetKeyRequest,
};
use super::KvBackend;
use prost::Message;
use std::future::Future;
use std::time::Duration;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::Status;

/// Method paths, `/<service>/<method>`.
pub mod paths {
    pub const GET: &str = "/proto.KVService/GetService";
    pub const SET_KEY: &str = "/proto.KVService/SetKeyService";
    pub const SET_SECRET_KEY: &str = "/proto.KVService/SetSecretKeyService";
    pub const DELETE_KEY: &str = "/proto.KVService/DeleteKeyService";
    pub const GET_BY_NAMESPACE_AND_PROFILE: &str =
        "/proto.KVService/GetServiceByNamespaceAndProfile";
}

/// [`KvBackend`] backed by a tonic channel.
#[derive(Debug, Clone)]
pub struct GrpcBackend {
    inner: Grpc<Channel>,
}

impl GrpcBackend {
    /// Bind the stub to an open channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    fn unary<Req, Resp>(
        &self,
        path: &'static str,
        request: Req,
        timeout: Duration,
    ) -> impl Future<Output = Result<Resp, Status>> + Send + 'static
    where
        Req: Message + Send + Sync + 'static,
        Resp: Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.inner.clone();

        async move {
            grpc.ready()
                .await
                .map_err(|e| Status::unknown(format!("Service was not ready: {}", e)))?;

            let mut request = tonic::Request::new(request);
            request.set_timeout(timeout);

            let codec = ProstCodec::<Req, Resp>::default();
            grpc.unary(request, PathAndQuery::from_static(path), codec)
                .await
                .map(tonic::Response::into_inner)
        }
    }
}

impl KvBackend for GrpcBackend {
    fn get(
        &self,
        request: GetRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<DataResponse, Status>> + Send {
        self.unary(paths::GET, request, timeout)
    }

    fn set_key(
        &self,
        request: SetKeyRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<DataResponse, Status>> + Send {
        self.unary(paths::SET_KEY, request, timeout)
    }

    fn set_secret_key(
        &self,
        request: SetKeyRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<DataResponse, Status>> + Send {
        self.unary(paths::SET_SECRET_KEY, request, timeout)
    }

    fn delete_key(
        &self,
        request: DeleteKeyRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<DataResponse, Status>> + Send {
        self.unary(paths::DELETE_KEY, request, timeout)
    }

    fn get_by_namespace_and_profile(
        &self,
        request: GetByNamespaceAndProfileRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<MapResponse, Status>> + Send {
        self.unary(paths::GET_BY_NAMESPACE_AND_PROFILE, request, timeout)
    }
}
