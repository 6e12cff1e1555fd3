//! Outbound delivery through the run's proxy route.

mod proxy;
mod transport;

pub use proxy::{parse_discovery_document, ProxyMode, ProxyRoute, DISCOVERY_MARKER};
pub use transport::{
    HttpTransport, OutboundRequest, ReqwestTransport, TransportError, TransportResponse,
};

use crate::config::{ConfigError, GeneralSettings};

/// Outcome of the first attempt that produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub status: u16,
    /// `None` when the response carried no content.
    pub body: Option<Vec<u8>>,
    /// Proxy that carried the request, `None` for a direct connection.
    pub proxy: Option<String>,
}

#[derive(Debug)]
pub struct Delivery {
    transport: Box<dyn HttpTransport>,
    route: ProxyRoute,
}

impl Delivery {
    pub fn new(transport: Box<dyn HttpTransport>, route: ProxyRoute) -> Self {
        Self { transport, route }
    }

    /// Resolves the proxy route once and keeps it for every send of the run.
    pub fn for_mode(
        transport: Box<dyn HttpTransport>,
        mode: ProxyMode,
        settings: &GeneralSettings,
    ) -> Result<Self, ConfigError> {
        let route = ProxyRoute::resolve(mode, settings, transport.as_ref())?;
        tracing::info!(%mode, ?route, "proxy route resolved");
        Ok(Self::new(transport, route))
    }

    pub fn route(&self) -> &ProxyRoute {
        &self.route
    }

    /// Walks the route until a response arrives. HTTP status does not trigger fallback.
    pub fn deliver(&self, request: &OutboundRequest) -> Option<DeliveryResult> {
        tracing::debug!(url = %request.url, "posting to agency");
        match &self.route {
            ProxyRoute::Direct => {
                let result = self.attempt(request, None);
                if result.is_none() {
                    tracing::warn!(url = %request.url, "direct request did not complete");
                }
                result
            }
            ProxyRoute::Candidates(candidates) => candidates
                .iter()
                .find_map(|candidate| self.attempt(request, Some(candidate.as_str()))),
        }
    }

    /// Returns the response body of the first successful attempt, if it has one.
    pub fn send(&self, request: &OutboundRequest) -> Option<Vec<u8>> {
        match self.deliver(request) {
            Some(DeliveryResult {
                body: Some(body), ..
            }) => Some(body),
            Some(DeliveryResult { status, .. }) => {
                tracing::warn!(status, "response received but its content is empty");
                None
            }
            None => {
                tracing::warn!(url = %request.url, "request failed, no response obtained");
                None
            }
        }
    }

    fn attempt(&self, request: &OutboundRequest, proxy: Option<&str>) -> Option<DeliveryResult> {
        tracing::debug!(?proxy, "sending request");
        match self.transport.post(request, proxy) {
            Ok(response) => {
                tracing::info!(status = response.status, ?proxy, "post request completed");
                Some(DeliveryResult {
                    status: response.status,
                    body: (!response.body.is_empty()).then_some(response.body),
                    proxy: proxy.map(str::to_string),
                })
            }
            Err(err) => {
                tracing::error!(?proxy, error = %err, "post request failed");
                None
            }
        }
    }
}
