//! HTTPS Transport for DNS queries: DNS-over-HTTPS (RFC 8484)
//!
//! Sends DNS queries as HTTP GET requests. The wire-format query is
//! base64url-encoded without padding into the `dns` query parameter and the
//! response body is the raw DNS wire format response.
//!
//! Requires the `dns-over-https` feature flag.
//!
//! Wire format (HTTP):
//! ```text
//! GET /dns-query?dns=AAABAAABAAAAAAAAB2V4YW1wbGUDY29tAAABAAE HTTP/2
//! Accept: application/dns-message
//! X-Forwarded-For: <client>
//! X-Real-IP: <client>
//! ```

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hostsdns_domain::DomainError;
use reqwest::{StatusCode, Url};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// Expected content type for DNS-over-HTTPS responses (RFC 8484 §4.2.1)
const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// DNS-over-HTTPS transport (RFC 8484)
pub struct HttpsTransport {
    url: Url,
    client: reqwest::Client,
}

impl HttpsTransport {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let url = Url::parse(url)
            .map_err(|e| DomainError::InvalidUpstream(format!("{}: {}", url, e)))?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| {
                DomainError::InvalidUpstream(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Configured URL with its query replaced by `dns=<base64url(message)>`.
    pub fn request_url(&self, message_bytes: &[u8]) -> Url {
        let mut url = self.url.clone();
        url.set_query(Some(&format!("dns={}", URL_SAFE_NO_PAD.encode(message_bytes))));
        url
    }

    fn request_error(&self, e: reqwest::Error) -> DomainError {
        if e.is_timeout() {
            DomainError::TransportTimeout {
                server: self.url.to_string(),
            }
        } else {
            DomainError::UpstreamTransport {
                server: self.url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        client_ip: IpAddr,
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let url = self.request_url(message_bytes);
        let client = client_ip.to_canonical().to_string();

        debug!(
            url = %self.url,
            message_len = message_bytes.len(),
            client = %client,
            "Sending DoH query"
        );

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header("Accept", DNS_MESSAGE_CONTENT_TYPE)
            .header("User-Agent", "")
            .header("X-Forwarded-Proto", "https")
            .header("X-Forwarded-For", client.as_str())
            .header("X-Real-IP", client.as_str())
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();

        let response_bytes = response.bytes().await.map_err(|e| self.request_error(e))?;

        if status != StatusCode::OK {
            return Err(DomainError::UpstreamStatus {
                server: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(
            url = %self.url,
            response_len = response_bytes.len(),
            "DoH response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes.to_vec(),
            protocol_used: "HTTPS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "HTTPS"
    }
}
