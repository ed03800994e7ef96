//! Command-line interface.
//!
//! Thin front end over [`StooClient`](crate::StooClient) for scripting and
//! smoke-testing a StooKV deployment.

pub mod commands;

use crate::core::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Stoo - read and write StooKV namespaces from the shell.
#[derive(Parser, Debug)]
#[command(name = "stoo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (TOML).
    #[arg(short, long, global = true, env = "STOO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings; each overrides the config file.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// StooKV endpoint, e.g. localhost:50051.
    #[arg(long, global = true, env = "STOO_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Per-call timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Connect over TLS.
    #[arg(long, global = true)]
    pub tls: bool,

    /// Skip server certificate verification (implies --tls).
    #[arg(long, global = true)]
    pub insecure_skip_verify: bool,

    /// CA certificate used to verify the server.
    #[arg(long, global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Hostname expected in the server certificate.
    #[arg(long, global = true)]
    pub server_name: Option<String>,

    /// Default namespace.
    #[arg(long, global = true, env = "STOO_DEFAULT_NAMESPACE")]
    pub default_namespace: Option<String>,

    /// Default profile.
    #[arg(long, global = true, env = "STOO_DEFAULT_PROFILE")]
    pub default_profile: Option<String>,
}

impl ConnectionArgs {
    /// Convert to config-file overrides.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoint: self.endpoint.clone(),
            timeout_ms: self.timeout_ms,
            use_tls: self.tls || self.insecure_skip_verify,
            skip_verification: self.insecure_skip_verify,
            ca_cert_path: self.ca_cert.clone(),
            server_name_override: self.server_name.clone(),
            default_namespace: self.default_namespace.clone(),
            default_profile: self.default_profile.clone(),
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a key.
    Get(commands::GetArgs),
    /// Write a key.
    Set(commands::SetArgs),
    /// Write a key that the server stores encrypted.
    SetSecret(commands::SetArgs),
    /// Remove a key.
    Delete(commands::DeleteArgs),
    /// List every key in a namespace/profile.
    GetAll(commands::GetAllArgs),
}

/// Initialize the tracing subscriber if the telemetry feature is enabled.
#[cfg(feature = "telemetry")]
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_log_level: Option<&str>) {}
