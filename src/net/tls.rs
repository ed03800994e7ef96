//! Transport security resolution.
//!
//! The client decides once, at construction, which credentials the
//! channel uses:
//!
//! ```text
//! ┌──────────────┐  no   ┌───────────────┐
//! │   use_tls?   │──────▶│   Plaintext   │
//! └──────┬───────┘       └───────────────┘
//!        │ yes
//! ┌──────▼───────┐  yes  ┌───────────────┐
//! │ skip verify? │──────▶│ TlsUnverified │  (no certificate checks)
//! └──────┬───────┘       └───────────────┘
//!        │ no
//! ┌──────▼───────┐       ┌───────────────┐
//! │ load CA file │──────▶│  TlsVerified  │  (roots + server name)
//! └──────────────┘       └───────────────┘
//! ```
//!
//! TLS options are ignored entirely when `use_tls` is off.

use crate::core::config::ClientConfig;
use crate::core::error::{StooError, StooResult};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::crypto::{self, CryptoProvider};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{self, DigitallySignedStruct, RootCertStore, SignatureScheme};

/// ALPN identifier for HTTP/2, which gRPC requires.
pub const ALPN_H2: &[u8] = b"h2";

/// CA certificates trusted when verifying the server.
#[derive(Debug, Clone)]
pub struct TrustStore {
    roots: RootCertStore,
    path: PathBuf,
}

impl TrustStore {
    /// Load a trust store from a PEM bundle.
    ///
    /// Fails if the file cannot be read, a PEM block is malformed, a
    /// certificate is not a usable trust anchor, or the file holds no
    /// certificate at all.
    pub fn load(path: &Path) -> StooResult<Self> {
        let file = File::open(path).map_err(|e| StooError::ca_certificate(path, e.to_string()))?;
        let mut reader = BufReader::new(file);

        let mut roots = RootCertStore::empty();
        for cert in rustls_pemfile::certs(&mut reader) {
            let cert = cert.map_err(|e| StooError::ca_certificate(path, e.to_string()))?;
            roots
                .add(cert)
                .map_err(|e| StooError::ca_certificate(path, e.to_string()))?;
        }

        if roots.is_empty() {
            return Err(StooError::ca_certificate(path, "no certificates found"));
        }

        Ok(Self {
            roots,
            path: path.to_path_buf(),
        })
    }

    /// Number of trust anchors loaded.
    pub fn cert_count(&self) -> usize {
        self.roots.len()
    }

    /// File the anchors were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Credentials the channel is opened with.
#[derive(Debug, Clone)]
pub enum TransportSecurity {
    /// Unencrypted HTTP/2.
    Plaintext,
    /// TLS without certificate or hostname verification.
    TlsUnverified { server_name: ServerName<'static> },
    /// TLS verified against a private CA.
    TlsVerified {
        trust_store: TrustStore,
        server_name: ServerName<'static>,
    },
}

impl TransportSecurity {
    /// Derive the transport decision from a configuration.
    pub fn resolve(config: &ClientConfig) -> StooResult<Self> {
        if !config.use_tls() {
            return Ok(Self::Plaintext);
        }

        let tls = config.tls().cloned().unwrap_or_default();
        let name = match tls.server_name_override.filter(|name| !name.is_empty()) {
            Some(name) => name,
            None => config.host()?,
        };
        let server_name = ServerName::try_from(name.clone())
            .map_err(|e| StooError::tls(format!("invalid server name {}: {}", name, e)))?;

        if tls.skip_verification {
            return Ok(Self::TlsUnverified { server_name });
        }

        let ca_cert_path = tls.ca_cert_path.ok_or_else(|| {
            StooError::invalid_config("tls.ca_cert_path is required unless skip_verification is set")
        })?;
        let trust_store = TrustStore::load(&ca_cert_path)?;

        Ok(Self::TlsVerified {
            trust_store,
            server_name,
        })
    }

    /// Short label used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::TlsUnverified { .. } => "tls-unverified",
            Self::TlsVerified { .. } => "tls",
        }
    }

    pub fn is_tls(&self) -> bool {
        !matches!(self, Self::Plaintext)
    }

    /// Name presented as SNI and checked against the certificate.
    pub fn server_name(&self) -> Option<&ServerName<'static>> {
        match self {
            Self::Plaintext => None,
            Self::TlsUnverified { server_name } | Self::TlsVerified { server_name, .. } => {
                Some(server_name)
            }
        }
    }

    /// Build the rustls client configuration, or `None` for plaintext.
    pub fn client_config(&self) -> StooResult<Option<Arc<rustls::ClientConfig>>> {
        let provider = Arc::new(crypto::ring::default_provider());
        let builder = match self {
            Self::Plaintext => return Ok(None),
            _ => rustls::ClientConfig::builder_with_provider(provider.clone())
                .with_safe_default_protocol_versions()
                .map_err(|e| StooError::tls(e.to_string()))?,
        };

        let mut config = match self {
            Self::TlsVerified { trust_store, .. } => builder
                .with_root_certificates(trust_store.roots.clone())
                .with_no_client_auth(),
            _ => builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoServerVerification::new(provider)))
                .with_no_client_auth(),
        };
        config.alpn_protocols = vec![ALPN_H2.to_vec()];

        Ok(Some(Arc::new(config)))
    }
}

/// Accepts any server certificate. Signatures are still checked so the
/// handshake itself stays well-formed.
#[derive(Debug)]
struct NoServerVerification {
    provider: Arc<CryptoProvider>,
}

impl NoServerVerification {
    fn new(provider: Arc<CryptoProvider>) -> Self {
        Self { provider }
    }
}

impl ServerCertVerifier for NoServerVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
