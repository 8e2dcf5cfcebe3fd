use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Extensions, Request};
use http_body_util::{BodyExt, Empty, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioIo};
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::OnceCell;
use url::Url;

use crate::config::EcConfig;
use crate::credential::Credentials;
use crate::endpoints::Endpoint;
use crate::error::EcError;
use crate::sign::current_timestamp_millis;
use crate::types::{Envelope, Method, headers};

type HttpClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Signed dispatcher for the EC open platform.
///
/// Every call signs a fresh timestamp, sends the parameters JSON-encoded in
/// the body and hands back the raw response text. The platform's `errCode`
/// convention is left to the caller.
///
/// Cloning is cheap and clones share the underlying connection pool, so one
/// instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct EcClient {
    http_client: HttpClient,
    base_url: Url,
    credentials: Credentials,
    timeout: Option<Duration>,
    error_for_status: bool,
    /// Request extensions carrying the exact spelling of the platform headers.
    header_case: Arc<OnceCell<Extensions>>,
}

impl EcClient {
    /// Build a client. Credentials are never validated here; only an
    /// unusable base URL or transport setup fails.
    pub fn new(config: EcConfig) -> Result<Self, EcError> {
        let base_url = parse_base_url(&config.base_url)?;

        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
            .map_err(|e| EcError::Transport(format!("TLS setup failed: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();
        let http_client = Client::builder(TokioExecutor::new())
            .http1_title_case_headers(true)
            .http1_preserve_header_case(true)
            .build(connector);

        Ok(Self {
            http_client,
            base_url,
            credentials: config.credentials,
            timeout: config.timeout,
            error_for_status: config.error_for_status,
            header_case: Arc::new(OnceCell::new()),
        })
    }

    /// Build a client against the production endpoint.
    pub fn with_credentials(
        corp_id: impl AsRef<str>,
        app_id: impl AsRef<str>,
        app_secret: impl AsRef<str>,
    ) -> Result<Self, EcError> {
        Self::new(EcConfig::new(corp_id, app_id, app_secret))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue one signed request and return the raw response body.
    ///
    /// `params` is JSON-encoded as the body for GET as well as POST.
    pub async fn call<P: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: &P,
    ) -> Result<String, EcError> {
        let envelope = Envelope::build(
            &self.credentials,
            method,
            path,
            params,
            current_timestamp_millis(),
        )?;
        self.dispatch(envelope).await
    }

    /// [`call`](Self::call) with the method and path of a catalog entry.
    pub async fn call_endpoint<P: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        params: &P,
    ) -> Result<String, EcError> {
        self.call(endpoint.method(), endpoint.path(), params).await
    }

    /// Append an envelope path to the base URL segment by segment.
    fn resolve(&self, path: &str) -> Result<Url, EcError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EcError::InvalidUrl(format!("{}: cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    /// Send a prepared envelope.
    async fn dispatch(&self, envelope: Envelope) -> Result<String, EcError> {
        let url = self.resolve(&envelope.path)?;
        let header_case = self.header_case.get_or_try_init(learn_header_case).await?;

        tracing::debug!(
            method = %envelope.method,
            path = %envelope.path,
            timestamp = envelope.timestamp,
            "Dispatching signed request"
        );

        let mut builder = Request::builder()
            .method(http::Method::from(envelope.method))
            .uri(url.as_str());
        for (name, value) in &envelope.headers {
            builder = builder.header(*name, value.as_str());
        }
        let mut request = builder.body(Full::new(Bytes::from(envelope.body)))?;
        *request.extensions_mut() = header_case.clone();

        let exchange = self.exchange(request);
        let outcome = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, exchange)
                .await
                .unwrap_or_else(|_| {
                    Err(EcError::Timeout(format!("no response within {:?}", timeout)))
                }),
            None => exchange.await,
        };
        let (status, body) = outcome.inspect_err(|err| {
            tracing::warn!(path = %envelope.path, "Request failed: {}", err);
        })?;

        if self.error_for_status && !status.is_success() {
            tracing::warn!(path = %envelope.path, status = status.as_u16(), "Non-success status");
            return Err(EcError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Send the request and read the whole response body.
    async fn exchange(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<(http::StatusCode, String), EcError> {
        let response = self.http_client.request(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/// Parse the API root, making sure relative joins stay under it.
fn parse_base_url(raw: &str) -> Result<Url, EcError> {
    let raw = raw.trim();
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&normalized).map_err(|e| EcError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(EcError::InvalidUrl(format!("{}: cannot be a base URL", raw)));
    }
    Ok(url)
}

/// Byte offset just past the blank line ending an HTTP/1 head.
fn head_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

/// Record how the platform header names are spelled.
///
/// hyper lowercases header names and only writes an original spelling back
/// out when the request carries a case map in its extensions. That map is
/// only produced by parsing a message, so one canned response listing the
/// platform headers is replayed over an in-memory pipe and the extensions of
/// the parsed response are kept for every later request.
async fn learn_header_case() -> Result<Extensions, EcError> {
    let mut canned = String::from("HTTP/1.1 204 No Content\r\n");
    for name in [
        headers::CONTENT_TYPE,
        headers::CORP_ID,
        headers::SIGN,
        headers::TIMESTAMP,
    ] {
        canned.push_str(name);
        canned.push_str(": x\r\n");
    }
    canned.push_str("\r\n");

    let (client_io, mut server_io) = tokio::io::duplex(4096);
    let (mut sender, connection) = hyper::client::conn::http1::Builder::new()
        .preserve_header_case(true)
        .handshake::<_, Empty<Bytes>>(TokioIo::new(client_io))
        .await?;
    let driver = tokio::spawn(connection);

    // Reply only after the request arrives: an idle client connection
    // rejects unsolicited bytes
    let replay = async move {
        let mut received = Vec::new();
        let mut buf = [0u8; 512];
        while head_end(&received).is_none() {
            let n = server_io.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        server_io.write_all(canned.as_bytes()).await?;
        Ok::<_, std::io::Error>(server_io)
    };
    let request = async {
        sender.ready().await?;
        sender.send_request(Request::new(Empty::new())).await
    };
    let (replayed, response) = tokio::join!(replay, request);
    driver.abort();

    let _server_io = replayed?;
    let (parts, _body) = response?.into_parts();
    Ok(parts.extensions)
}
