//! Scoped StooKV client.
//!
//! [`StooClient`] owns one channel for its whole lifetime. Every operation
//! runs exactly one remote call under a fresh deadline of
//! [`ClientConfig::call_timeout`] and returns whatever the call produced.
//! Nothing is retried and scope arguments are passed through unvalidated;
//! only the `*_default` operations check anything locally, namely that a
//! default scope is configured.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use stoo::{ClientConfig, StooClient};
//!
//! # async fn run() -> stoo::StooResult<()> {
//! let config = ClientConfig::builder("localhost:50051", Duration::from_secs(20))
//!     .default_namespace("my-app")
//!     .default_profile("prod")
//!     .build()?;
//!
//! let client = StooClient::connect(config).await?;
//! client.set_default("database.username", "root").await?;
//! let username = client.get_default("database.username").await?;
//! assert_eq!(username, "root");
//! # Ok(())
//! # }
//! ```

use crate::core::config::ClientConfig;
use crate::core::error::{StooError, StooResult};
use crate::net::channel::open_channel;
use crate::rpc::{
    DeleteKeyRequest, GetByNamespaceAndProfileRequest, GetRequest, GrpcBackend, KvBackend,
    SetKeyRequest,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tonic::Status;

/// Client bound to one StooKV endpoint.
///
/// Cloning is cheap and clones share the underlying connection, which
/// multiplexes concurrent calls.
#[derive(Debug, Clone)]
pub struct StooClient<B = GrpcBackend> {
    config: Arc<ClientConfig>,
    backend: B,
}

impl StooClient<GrpcBackend> {
    /// Resolve transport security, open the channel, and bind the stub.
    ///
    /// Fails on any setup error; no client is returned in that case.
    pub async fn connect(config: ClientConfig) -> StooResult<Self> {
        let security = config.transport_security()?;
        let channel = open_channel(&config, &security).await?;
        Ok(Self::with_backend(config, GrpcBackend::new(channel)))
    }
}

impl<B: KvBackend> StooClient<B> {
    /// Bind a client to an arbitrary backend.
    pub fn with_backend(config: ClientConfig, backend: B) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Release the connection.
    ///
    /// Equivalent to dropping the client; other clones keep the shared
    /// channel alive until they are dropped too.
    pub fn close(self) {
        tracing::debug!(endpoint = %self.config.endpoint(), "closing StooKV client");
    }

    /// Get the value stored under `key` in `namespace`/`profile`.
    pub async fn get(&self, namespace: &str, profile: &str, key: &str) -> StooResult<String> {
        tracing::debug!(namespace, profile, key, "get");
        let request = GetRequest {
            namespace: namespace.to_string(),
            profile: profile.to_string(),
            key: key.to_string(),
        };
        let response = self
            .bounded("get", self.backend.get(request, self.config.call_timeout()))
            .await?;
        Ok(response.data)
    }

    /// Set `key` to `value` in `namespace`/`profile`.
    pub async fn set(
        &self,
        namespace: &str,
        profile: &str,
        key: &str,
        value: &str,
    ) -> StooResult<String> {
        tracing::debug!(namespace, profile, key, "set");
        let request = set_request(namespace, profile, key, value);
        let response = self
            .bounded("set", self.backend.set_key(request, self.config.call_timeout()))
            .await?;
        Ok(response.data)
    }

    /// Set `key` to `value` in `namespace`/`profile`; the server stores it
    /// encrypted.
    pub async fn set_secret(
        &self,
        namespace: &str,
        profile: &str,
        key: &str,
        value: &str,
    ) -> StooResult<String> {
        tracing::debug!(namespace, profile, key, "set_secret");
        let request = set_request(namespace, profile, key, value);
        let response = self
            .bounded(
                "set_secret",
                self.backend
                    .set_secret_key(request, self.config.call_timeout()),
            )
            .await?;
        Ok(response.data)
    }

    /// Remove `key` from `namespace`/`profile`.
    pub async fn delete(&self, namespace: &str, profile: &str, key: &str) -> StooResult<String> {
        tracing::debug!(namespace, profile, key, "delete");
        let request = DeleteKeyRequest {
            namespace: namespace.to_string(),
            profile: profile.to_string(),
            key: key.to_string(),
        };
        let response = self
            .bounded(
                "delete",
                self.backend.delete_key(request, self.config.call_timeout()),
            )
            .await?;
        Ok(response.data)
    }

    /// Get every key/value pair in `namespace`/`profile`.
    pub async fn get_all_in_scope(
        &self,
        namespace: &str,
        profile: &str,
    ) -> StooResult<HashMap<String, String>> {
        tracing::debug!(namespace, profile, "get_all_in_scope");
        let request = GetByNamespaceAndProfileRequest {
            namespace: namespace.to_string(),
            profile: profile.to_string(),
        };
        let response = self
            .bounded(
                "get_all_in_scope",
                self.backend
                    .get_by_namespace_and_profile(request, self.config.call_timeout()),
            )
            .await?;
        Ok(response.data)
    }

    /// [`get`](Self::get) in the default scope.
    pub async fn get_default(&self, key: &str) -> StooResult<String> {
        let (namespace, profile) = self.default_scope()?;
        self.get(namespace, profile, key).await
    }

    /// [`set`](Self::set) in the default scope.
    pub async fn set_default(&self, key: &str, value: &str) -> StooResult<String> {
        let (namespace, profile) = self.default_scope()?;
        self.set(namespace, profile, key, value).await
    }

    /// [`set_secret`](Self::set_secret) in the default scope.
    pub async fn set_secret_default(&self, key: &str, value: &str) -> StooResult<String> {
        let (namespace, profile) = self.default_scope()?;
        self.set_secret(namespace, profile, key, value).await
    }

    /// [`delete`](Self::delete) in the default scope.
    pub async fn delete_default(&self, key: &str) -> StooResult<String> {
        let (namespace, profile) = self.default_scope()?;
        self.delete(namespace, profile, key).await
    }

    /// [`get_all_in_scope`](Self::get_all_in_scope) in the default scope.
    pub async fn get_all_default(&self) -> StooResult<HashMap<String, String>> {
        let (namespace, profile) = self.default_scope()?;
        self.get_all_in_scope(namespace, profile).await
    }

    fn default_scope(&self) -> StooResult<(&str, &str)> {
        self.config
            .default_scope()
            .ok_or(StooError::DefaultScopeNotConfigured)
    }

    /// Await `call` under the configured deadline. The call is dropped,
    /// and with it any in-flight request, once the deadline passes.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, Status>>,
    ) -> StooResult<T> {
        let timeout = self.config.call_timeout();
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result.map_err(StooError::from),
            Err(_) => Err(StooError::Rpc(Status::deadline_exceeded(format!(
                "{} did not complete within {:?}",
                operation, timeout
            )))),
        }
    }
}

fn set_request(namespace: &str, profile: &str, key: &str, value: &str) -> SetKeyRequest {
    SetKeyRequest {
        namespace: namespace.to_string(),
        profile: profile.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    }
}
