//! Networking layer.
//!
//! - [`tls`] - Transport security decision and rustls configuration
//! - [`channel`] - gRPC channel establishment (plaintext and TLS connectors)

pub mod channel;
pub mod tls;
