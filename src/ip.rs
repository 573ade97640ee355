use std::net::Ipv4Addr;

use crate::api::cloudflare::HTTP_TIMEOUT;
use crate::error::{Error, Result};

/// Looks up the caller's public IPv4 address from a plain-text echo service.
pub struct IpResolver {
    client: reqwest::Client,
    url: String,
}

impl IpResolver {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }

    pub async fn public_ip(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("IP lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "IP lookup returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read IP lookup response: {}", e)))?;

        parse_ipv4(&body)
    }
}

fn parse_ipv4(body: &str) -> Result<Ipv4Addr> {
    let trimmed = body.trim();
    trimmed
        .parse()
        .map_err(|_| Error::InvalidAddress(trimmed.to_string()))
}
