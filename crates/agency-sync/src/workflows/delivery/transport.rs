use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::fmt::Debug;
use tokio::runtime::Runtime;

/// Authenticated POST to an agency endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub username: String,
    pub password: String,
    pub body: Vec<u8>,
}

/// Whatever came back over the wire, regardless of status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid header '{0}'")]
    InvalidHeader(String),
    #[error("http runtime unavailable: {0}")]
    Runtime(String),
    #[error("transport failure: {0}")]
    Other(String),
}

/// Synchronous HTTP gateway so the batch pipeline never touches async details.
pub trait HttpTransport: Debug {
    fn post(
        &self,
        request: &OutboundRequest,
        proxy: Option<&str>,
    ) -> Result<TransportResponse, TransportError>;

    fn get_text(&self, url: &str) -> Result<String, TransportError>;
}

/// reqwest-backed gateway driving its own single-threaded runtime.
pub struct ReqwestTransport {
    runtime: Runtime,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| TransportError::Runtime(err.to_string()))?;
        Ok(Self { runtime })
    }

    /// Certificate verification is disabled for every client.
    fn client(proxy: Option<&str>) -> Result<Client, TransportError> {
        let mut builder = Client::builder().danger_accept_invalid_certs(true);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url(proxy))?);
        }
        Ok(builder.build()?)
    }
}

impl Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

impl HttpTransport for ReqwestTransport {
    fn post(
        &self,
        request: &OutboundRequest,
        proxy: Option<&str>,
    ) -> Result<TransportResponse, TransportError> {
        let client = Self::client(proxy)?;
        let headers = header_map(&request.headers)?;

        self.runtime.block_on(async {
            let response = client
                .post(&request.url)
                .headers(headers)
                .basic_auth(&request.username, Some(&request.password))
                .body(request.body.clone())
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();
            Ok::<_, TransportError>(TransportResponse { status, body })
        })
    }

    fn get_text(&self, url: &str) -> Result<String, TransportError> {
        let client = Self::client(None)?;
        self.runtime.block_on(async {
            let response = client.get(url).send().await?;
            Ok::<_, TransportError>(response.text().await?)
        })
    }
}

/// Bare `host:port` candidates are plain HTTP proxies.
pub(crate) fn proxy_url(candidate: &str) -> String {
    if candidate.contains("://") {
        candidate.to_string()
    } else {
        format!("http://{candidate}")
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
