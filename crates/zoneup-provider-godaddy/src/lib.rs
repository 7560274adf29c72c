// # GoDaddy DNS Provider
//
// `DnsProvider` implementation against the GoDaddy management API v1.
//
// ## Responsibility split
//
// This is a stateless, single-shot API client:
//
// - one HTTP request per trait call, 30 second timeout
// - failures classified into the shared error taxonomy and returned;
//   skip-vs-abort decisions belong to the engine, retry scheduling to
//   the timer
// - no caching, no background tasks, no retry or backoff here
//
// ## Security
//
// The auth header embeds the API key and secret and must never reach
// the logs. The Debug implementation redacts it.
//
// ## API Reference
//
// - List domains:  GET `/v1/domains`
// - List records:  GET `/v1/domains/{domain}/records/{type}`
// - Replace record: PUT `/v1/domains/{domain}/records/{type}/{name}`
//   with body `[{"data": "...", "ttl": ...}]`
// - Auth header: `Authorization: sso-key {key}:{secret}`

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use zoneup_core::config::{Credentials, RecordSpec};
use zoneup_core::traits::{dedup_by_name, DnsProvider, DomainSummary};
use zoneup_core::{Error, Result};

/// GoDaddy management API base URL
const GODADDY_API_BASE: &str = "https://api.godaddy.com/v1";

/// HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// GoDaddy DNS provider client
pub struct GoDaddyProvider {
    /// Prebuilt `sso-key` header value. Never log this.
    auth_header: String,

    /// API base URL; only tests point this elsewhere
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the credential material
impl fmt::Debug for GoDaddyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoDaddyProvider")
            .field("auth_header", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoDaddyProvider {
    /// Create a provider client for the given credentials.
    ///
    /// Fails fast on credentials that could never authenticate
    /// (empty or whitespace-containing halves), so a misconfigured
    /// daemon stops at startup instead of on its first sweep.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        credentials.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::network(format!("build HTTP client: {e}")))?;

        Ok(Self {
            auth_header: sso_key_header(credentials),
            base_url: GODADDY_API_BASE.to_string(),
            client,
        })
    }

    /// Override the API base URL. Test hook for pointing the client
    /// at a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .map_err(|e| Error::network(format!("GET {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(classify_response(response).await);
        }
        Ok(response)
    }
}

/// Auth header value: a pure function of the two secrets.
fn sso_key_header(credentials: &Credentials) -> String {
    format!("sso-key {}:{}", credentials.key, credentials.secret)
}

/// Map a non-success response onto the shared error taxonomy,
/// keeping the body for logs.
async fn classify_response(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error response".to_string());
    classify(status, body)
}

fn classify(status: u16, body: String) -> Error {
    match status {
        401 | 403 => Error::auth(format!(
            "status {status}: check the API key and secret in your config"
        )),
        404 => Error::not_found(body),
        400..=499 => Error::validation(format!("status {status}: {body}")),
        _ => Error::upstream(status, body),
    }
}

/// PUT body for a record replace. The provider swaps the full record
/// set for `(type, name)` with this array in one operation.
fn record_payload(data: IpAddr, ttl: u32) -> serde_json::Value {
    serde_json::json!([{ "data": data.to_string(), "ttl": ttl }])
}

#[derive(Debug, Deserialize)]
struct DomainEntry {
    domain: String,
}

#[derive(Debug, Deserialize)]
struct RecordEntry {
    name: String,
    #[serde(rename = "type")]
    record_type: String,
}

#[async_trait]
impl DnsProvider for GoDaddyProvider {
    async fn list_domains(&self) -> Result<Vec<DomainSummary>> {
        let url = format!("{}/domains", self.base_url);
        let entries: Vec<DomainEntry> = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| Error::validation(format!("malformed domain listing: {e}")))?;

        tracing::debug!(domains = entries.len(), "domain listing fetched");
        Ok(entries
            .into_iter()
            .map(|e| DomainSummary { name: e.domain })
            .collect())
    }

    async fn list_records(&self, domain: &str, record_type: &str) -> Result<Vec<RecordSpec>> {
        let url = format!("{}/domains/{}/records/{}", self.base_url, domain, record_type);
        let entries: Vec<RecordEntry> = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| Error::validation(format!("malformed record listing: {e}")))?;

        tracing::debug!(
            domain,
            record_type,
            records = entries.len(),
            "record listing fetched"
        );

        // One wire entry per data value; callers want one per name
        Ok(dedup_by_name(
            entries
                .into_iter()
                .map(|e| RecordSpec {
                    name: e.name,
                    record_type: e.record_type,
                })
                .collect(),
        ))
    }

    async fn upsert_record(
        &self,
        domain: &str,
        record: &RecordSpec,
        data: IpAddr,
        ttl: u32,
    ) -> Result<()> {
        let url = format!(
            "{}/domains/{}/records/{}/{}",
            self.base_url, domain, record.record_type, record.name
        );

        let response = self
            .client
            .put(&url)
            .header(AUTHORIZATION, &self.auth_header)
            .json(&record_payload(data, ttl))
            .send()
            .await
            .map_err(|e| Error::network(format!("PUT {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(classify_response(response).await);
        }

        tracing::debug!(
            domain,
            record = %record.name,
            %data,
            ttl,
            "record replaced"
        );
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "godaddy"
    }
}
