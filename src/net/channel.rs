//! Channel establishment.
//!
//! Plaintext channels use tonic's built-in HTTP connector. TLS channels go
//! through [`TlsConnector`], which dials TCP and runs the rustls handshake
//! with the configuration produced by [`TransportSecurity`].

use crate::core::config::ClientConfig;
use crate::core::error::{StooError, StooResult};
use crate::net::tls::TransportSecurity;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::ClientConfig as RustlsClientConfig;
use tonic::codegen::http::Uri;
use tonic::transport::{Channel, Endpoint};
use tower::Service;

/// Default port when a TLS endpoint omits one.
const DEFAULT_TLS_PORT: u16 = 443;

/// Open the channel described by `config` using `security`.
///
/// Unless `connect_lazily` is set, the TCP (and TLS) handshake completes
/// before this returns, bounded by the configured call timeout.
///
/// An endpoint without a port dials 80 in plaintext and 443 over TLS.
pub async fn open_channel(
    config: &ClientConfig,
    security: &TransportSecurity,
) -> StooResult<Channel> {
    let endpoint = Endpoint::from(config.uri()?)
        .connect_timeout(config.call_timeout())
        .tcp_nodelay(true);

    tracing::info!(
        endpoint = %config.endpoint(),
        security = security.name(),
        lazily = config.connect_lazily(),
        "opening channel to StooKV"
    );
    if matches!(security, TransportSecurity::TlsUnverified { .. }) {
        tracing::warn!(
            endpoint = %config.endpoint(),
            "server certificate verification is disabled"
        );
    }

    let connector = match (security.client_config()?, security.server_name()) {
        (Some(tls), Some(server_name)) => Some(TlsConnector::new(tls, server_name.clone())),
        _ => None,
    };

    if config.connect_lazily() {
        return Ok(match connector {
            Some(connector) => endpoint.connect_with_connector_lazy(connector),
            None => endpoint.connect_lazy(),
        });
    }

    let connect = async {
        match connector {
            Some(connector) => endpoint.connect_with_connector(connector).await,
            None => endpoint.connect().await,
        }
    };

    match tokio::time::timeout(config.call_timeout(), connect).await {
        Ok(Ok(channel)) => Ok(channel),
        Ok(Err(e)) => Err(StooError::connect(config.endpoint(), describe(&e))),
        Err(_) => Err(StooError::connect(
            config.endpoint(),
            format!("timed out after {:?}", config.call_timeout()),
        )),
    }
}

/// Render an error together with its source chain. Causes whose text the
/// message already carries are skipped.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Host and port a TLS connection dials for `uri`.
fn dial_target(uri: &Uri) -> io::Result<(String, u16)> {
    let host = uri
        .host()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("endpoint has no host: {}", uri),
            )
        })?;
    Ok((host, uri.port_u16().unwrap_or(DEFAULT_TLS_PORT)))
}

/// Connector that wraps each TCP connection in a rustls client session.
#[derive(Clone)]
pub struct TlsConnector {
    inner: tokio_rustls::TlsConnector,
    server_name: ServerName<'static>,
}

impl TlsConnector {
    /// Create a connector presenting `server_name` during the handshake.
    pub fn new(config: Arc<RustlsClientConfig>, server_name: ServerName<'static>) -> Self {
        Self {
            inner: tokio_rustls::TlsConnector::from(config),
            server_name,
        }
    }
}

impl Service<Uri> for TlsConnector {
    type Response = TokioIo<TlsStream<TcpStream>>;
    type Error = io::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let connector = self.inner.clone();
        let server_name = self.server_name.clone();

        Box::pin(async move {
            let (host, port) = dial_target(&uri)?;

            let tcp = TcpStream::connect((host.as_str(), port)).await?;
            tcp.set_nodelay(true)?;
            let stream = connector.connect(server_name, tcp).await?;
            tracing::debug!(%host, port, "tls handshake complete");

            Ok(TokioIo::new(stream))
        })
    }
}
