//! Client configuration.
//!
//! A [`ClientConfig`] is assembled through [`ClientConfigBuilder`] and is
//! read-only once built. It can also be loaded from a TOML file, in which
//! case the file contents are fed through the same builder so every
//! invariant holds regardless of where the values came from:
//!
//! - `endpoint` is non-empty and parses as a URI with a host
//! - `call_timeout` is strictly positive (zero is replaced by [`DEFAULT_TIMEOUT`])
//! - TLS options are only consulted when `use_tls` is set

use crate::core::error::{StooError, StooResult};
use crate::net::tls::TransportSecurity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tonic::codegen::http::Uri;

/// Per-call timeout used when none (or zero) is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoint of a StooKV instance running locally with default settings.
pub const DEFAULT_ENDPOINT: &str = "localhost:50051";

/// Data used during the TLS handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsOptions {
    /// Skip server certificate and hostname verification. Test/dev only.
    #[serde(default)]
    pub skip_verification: bool,

    /// CA certificate used to verify the server. Required unless
    /// `skip_verification` is set.
    #[serde(default)]
    pub ca_cert_path: Option<PathBuf>,

    /// Hostname checked against the server certificate and sent as SNI.
    /// Defaults to the endpoint host.
    #[serde(default)]
    pub server_name_override: Option<String>,
}

impl TlsOptions {
    /// Verify the server against the CA certificate at `ca_cert_path`.
    pub fn verified(ca_cert_path: impl Into<PathBuf>) -> Self {
        Self {
            skip_verification: false,
            ca_cert_path: Some(ca_cert_path.into()),
            server_name_override: None,
        }
    }

    /// Encrypt without verifying the server certificate.
    pub fn insecure() -> Self {
        Self {
            skip_verification: true,
            ca_cert_path: None,
            server_name_override: None,
        }
    }

    /// Set the hostname used for certificate verification.
    pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name_override = Some(server_name.into());
        self
    }
}

/// Resolved, immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    endpoint: String,
    use_tls: bool,
    tls: Option<TlsOptions>,
    call_timeout: Duration,
    default_namespace: Option<String>,
    default_profile: Option<String>,
    connect_lazily: bool,
}

impl ClientConfig {
    /// Start building a configuration for `endpoint`.
    ///
    /// A zero `timeout` means [`DEFAULT_TIMEOUT`].
    pub fn builder(endpoint: impl Into<String>, timeout: Duration) -> ClientConfigBuilder {
        ClientConfigBuilder::new(endpoint, timeout)
    }

    /// Configuration for a local, plaintext StooKV on the default port.
    pub fn local() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            use_tls: false,
            tls: None,
            call_timeout: DEFAULT_TIMEOUT,
            default_namespace: None,
            default_profile: None,
            connect_lazily: false,
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> StooResult<Self> {
        ConfigFile::from_file(path)?.into_config()
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> StooResult<Self> {
        ConfigFile::from_toml(content)?.into_config()
    }

    /// A builder seeded with this configuration, for deriving a new one.
    pub fn to_builder(&self) -> ClientConfigBuilder {
        ClientConfigBuilder {
            endpoint: self.endpoint.clone(),
            use_tls: self.use_tls,
            tls: self.tls.clone(),
            call_timeout: self.call_timeout,
            default_namespace: self.default_namespace.clone(),
            default_profile: self.default_profile.clone(),
            connect_lazily: self.connect_lazily,
        }
    }

    /// Target address as given by the caller.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the channel is TLS-secured.
    pub fn use_tls(&self) -> bool {
        self.use_tls
    }

    /// TLS handshake options, if any were supplied.
    pub fn tls(&self) -> Option<&TlsOptions> {
        self.tls.as_ref()
    }

    /// Deadline applied to every remote call.
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    pub fn default_profile(&self) -> Option<&str> {
        self.default_profile.as_deref()
    }

    /// Whether the handshake is deferred until the first call.
    pub fn connect_lazily(&self) -> bool {
        self.connect_lazily
    }

    /// The `(namespace, profile)` pair used by the `*_default` operations,
    /// present only when both halves are set.
    pub fn default_scope(&self) -> Option<(&str, &str)> {
        match (self.default_namespace(), self.default_profile()) {
            (Some(namespace), Some(profile)) => Some((namespace, profile)),
            _ => None,
        }
    }

    /// Endpoint as a URI; a bare `host:port` gets an `http://` scheme.
    pub fn uri(&self) -> StooResult<Uri> {
        parse_endpoint(&self.endpoint)
    }

    /// Host component of the endpoint, without IPv6 brackets.
    pub fn host(&self) -> StooResult<String> {
        let uri = self.uri()?;
        let host = uri
            .host()
            .ok_or_else(|| StooError::invalid_config(format!("endpoint has no host: {}", self.endpoint)))?;
        Ok(host.trim_start_matches('[').trim_end_matches(']').to_string())
    }

    /// Resolve which transport credentials the client will use.
    pub fn transport_security(&self) -> StooResult<TransportSecurity> {
        TransportSecurity::resolve(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::local()
    }
}

/// Staged builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    endpoint: String,
    use_tls: bool,
    tls: Option<TlsOptions>,
    call_timeout: Duration,
    default_namespace: Option<String>,
    default_profile: Option<String>,
    connect_lazily: bool,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            use_tls: false,
            tls: None,
            call_timeout: timeout,
            default_namespace: None,
            default_profile: None,
            connect_lazily: false,
        }
    }

    /// Select TLS or plaintext transport. An endpoint without a port
    /// dials 443 over TLS and 80 in plaintext.
    pub fn use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Set TLS options. `None` leaves previously set options in place.
    pub fn tls(mut self, tls: impl Into<Option<TlsOptions>>) -> Self {
        if let Some(tls) = tls.into() {
            self.tls = Some(tls);
        }
        self
    }

    /// Set the namespace used by the `*_default` operations.
    pub fn default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = non_empty(namespace.into());
        self
    }

    /// Set the profile used by the `*_default` operations.
    pub fn default_profile(mut self, profile: impl Into<String>) -> Self {
        self.default_profile = non_empty(profile.into());
        self
    }

    /// Defer the TCP/TLS handshake until the first call.
    pub fn connect_lazily(mut self, lazily: bool) -> Self {
        self.connect_lazily = lazily;
        self
    }

    /// Validate and finalize the configuration.
    pub fn build(self) -> StooResult<ClientConfig> {
        let endpoint = self.endpoint.trim().to_string();
        if endpoint.is_empty() {
            return Err(StooError::invalid_config("endpoint must be defined"));
        }
        parse_endpoint(&endpoint)?;

        let call_timeout = if self.call_timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.call_timeout
        };

        Ok(ClientConfig {
            endpoint,
            use_tls: self.use_tls,
            tls: self.tls,
            call_timeout,
            default_namespace: self.default_namespace,
            default_profile: self.default_profile,
            connect_lazily: self.connect_lazily,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_endpoint(endpoint: &str) -> StooResult<Uri> {
    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };
    let uri: Uri = candidate
        .parse()
        .map_err(|e| StooError::invalid_config(format!("invalid endpoint {}: {}", endpoint, e)))?;
    if uri.host().map_or(true, str::is_empty) {
        return Err(StooError::invalid_config(format!(
            "endpoint has no host: {}",
            endpoint
        )));
    }
    Ok(uri)
}

// ============================================================================
// File configuration
// ============================================================================

/// On-disk configuration layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// StooKV address, e.g. "stookv.example.com:50051".
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-call timeout in milliseconds; 0 selects the default.
    #[serde(default)]
    pub timeout_ms: u64,

    /// Enable TLS.
    #[serde(default)]
    pub use_tls: bool,

    /// TLS handshake options.
    #[serde(default)]
    pub tls: Option<TlsOptions>,

    /// Default namespace.
    #[serde(default)]
    pub default_namespace: Option<String>,

    /// Default profile.
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Defer connecting until the first call.
    #[serde(default)]
    pub connect_lazily: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: 0,
            use_tls: false,
            tls: None,
            default_namespace: None,
            default_profile: None,
            connect_lazily: false,
        }
    }
}

impl ConfigFile {
    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> StooResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StooError::invalid_config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a TOML string.
    pub fn from_toml(content: &str) -> StooResult<Self> {
        toml::from_str(content)
            .map_err(|e| StooError::invalid_config(format!("failed to parse config: {}", e)))
    }

    /// Apply CLI overrides.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref endpoint) = overrides.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if overrides.use_tls {
            self.use_tls = true;
        }
        if overrides.skip_verification
            || overrides.ca_cert_path.is_some()
            || overrides.server_name_override.is_some()
        {
            let tls = self.tls.get_or_insert_with(TlsOptions::default);
            if overrides.skip_verification {
                tls.skip_verification = true;
            }
            if let Some(ref path) = overrides.ca_cert_path {
                tls.ca_cert_path = Some(path.clone());
            }
            if let Some(ref name) = overrides.server_name_override {
                tls.server_name_override = Some(name.clone());
            }
        }
        if let Some(ref namespace) = overrides.default_namespace {
            self.default_namespace = Some(namespace.clone());
        }
        if let Some(ref profile) = overrides.default_profile {
            self.default_profile = Some(profile.clone());
        }
    }

    /// Run the file contents through [`ClientConfigBuilder`].
    pub fn into_config(self) -> StooResult<ClientConfig> {
        let mut builder = ClientConfig::builder(self.endpoint, Duration::from_millis(self.timeout_ms))
            .use_tls(self.use_tls)
            .tls(self.tls)
            .connect_lazily(self.connect_lazily);
        if let Some(namespace) = self.default_namespace {
            builder = builder.default_namespace(namespace);
        }
        if let Some(profile) = self.default_profile {
            builder = builder.default_profile(profile);
        }
        builder.build()
    }
}

/// CLI override options that can be applied to a [`ConfigFile`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    /// Force TLS on; plaintext can only be selected by the file or default.
    pub use_tls: bool,
    pub skip_verification: bool,
    pub ca_cert_path: Option<PathBuf>,
    pub server_name_override: Option<String>,
    pub default_namespace: Option<String>,
    pub default_profile: Option<String>,
}
