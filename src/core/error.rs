//! Error types for the StooKV client.
//!
//! Errors fall into three groups:
//! - setup errors, raised while building a configuration or opening the
//!   channel; a client is never handed back after one of these
//! - the default-scope error, raised before any remote call when a
//!   `*_default` operation is used without a configured scope
//! - per-call errors, the remote [`tonic::Status`] returned verbatim

use std::path::PathBuf;
use thiserror::Error;

/// Message carried by [`StooError::DefaultScopeNotConfigured`].
///
/// This is a stable string constant; callers may match on it.
pub const DEFAULT_SCOPE_NOT_CONFIGURED: &str =
    "default namespace and profile must be set to use this method";

/// Errors produced by the StooKV client.
#[derive(Debug, Error)]
pub enum StooError {
    /// Configuration failed validation (empty endpoint, unparseable file, ...).
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// CA certificate could not be read or contained no usable certificate.
    #[error("failed to load CA certificate {}: {message}", path.display())]
    CaCertificate { path: PathBuf, message: String },

    /// TLS client configuration could not be assembled.
    #[error("tls setup failed: {message}")]
    Tls { message: String },

    /// Channel to the store could not be established.
    #[error("failed to establish connection to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    /// A `*_default` operation was called without both defaults set.
    #[error("{}", DEFAULT_SCOPE_NOT_CONFIGURED)]
    DefaultScopeNotConfigured,

    /// Remote call failed: transport error, deadline exceeded, or a status
    /// returned by the store.
    #[error(transparent)]
    Rpc(#[from] tonic::Status),
}

impl StooError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a CaCertificate error.
    pub fn ca_certificate(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CaCertificate {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a Tls error.
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls {
            message: message.into(),
        }
    }

    /// Create a Connect error.
    pub fn connect(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connect {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Check if this error was raised while constructing a client.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::CaCertificate { .. }
                | Self::Tls { .. }
                | Self::Connect { .. }
        )
    }

    /// The remote status, if this is a per-call error.
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            Self::Rpc(status) => Some(status),
            _ => None,
        }
    }
}

/// Result type using StooError.
pub type StooResult<T> = Result<T, StooError>;
