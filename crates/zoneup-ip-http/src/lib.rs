// # HTTP IP Resolver
//
// `IpResolver` implementation that asks a public echo service
// (ipify by default) which address this host appears from.
//
// Each call is one fresh round trip: the engine's short-circuit on an
// unchanged address is the caching layer, so the resolver must not
// add its own.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

use zoneup_core::traits::IpResolver;
use zoneup_core::{Error, Result};

/// Default echo endpoint; returns the caller's IP as a plain-text body
pub const DEFAULT_ENDPOINT: &str = "https://api.ipify.org";

/// HTTP timeout for resolver requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP resolver
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    url: String,
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver against the given echo endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Interpret the response body as an IP address literal
fn parse_ip_body(body: &str) -> Result<IpAddr> {
    let trimmed = body.trim();
    trimmed.parse().map_err(|_| {
        Error::validation(format!(
            "echo service response is not an IP address literal: {trimmed:?}"
        ))
    })
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("GET {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("read response body: {e}")))?;

        let ip = parse_ip_body(&body)?;
        tracing::debug!(%ip, url = %self.url, "public address resolved");
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
