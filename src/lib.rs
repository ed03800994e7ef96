//! Stoo - scoped key-value client for StooKV.
//!
//! StooKV stores string values under a `(namespace, profile, key)` triple.
//! A namespace is typically an application, a profile an environment such
//! as `prod`. This crate provides the client side: configuration, transport
//! security, and a scoped client over gRPC.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          StooClient                             │
//! │   get │ set │ set_secret │ delete │ get_all_in_scope │ *_default │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │ one call, one deadline
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     KvBackend (GrpcBackend)                     │
//! │                 proto.KVService unary methods                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        tonic Channel                            │
//! │          plaintext │ TLS (unverified) │ TLS (private CA)        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - [`core::config`] - Configuration builder, file loading, defaults
//! - [`core::error`] - Error taxonomy
//! - [`net::tls`] - Transport security decision and rustls setup
//! - [`net::channel`] - Channel establishment
//! - [`rpc`] - Wire messages, the [`KvBackend`] seam, and the gRPC stub
//! - [`client`] - [`StooClient`]
//! - [`cli`] - Command-line front end
//!
//! # Key Invariants
//!
//! - A finalized [`ClientConfig`] never changes; derive a new one with
//!   [`ClientConfig::to_builder`]
//! - Construction either yields a ready client or an error, never both
//! - Every operation is a single remote call bounded by the call timeout
//! - `*_default` operations fail locally, without a remote call, unless
//!   both default namespace and default profile are set

// Core infrastructure
pub mod core;

// Networking
pub mod net;

// Remote contract
pub mod rpc;

// Scoped client
pub mod client;

// CLI
pub mod cli;

// Re-exports for convenience
pub use self::core::config::{ClientConfig, ClientConfigBuilder, TlsOptions, DEFAULT_TIMEOUT};
pub use self::core::error::{StooError, StooResult};
pub use self::core::{config, error};
pub use client::StooClient;
pub use net::tls::TransportSecurity;
pub use rpc::{GrpcBackend, KvBackend};
