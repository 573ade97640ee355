use std::net::Ipv4Addr;

use log::{debug, error, info};

use crate::api::{CloudflareClient, DnsApiClient, RecordType};
use crate::config::Config;
use crate::error::Result;
use crate::ip::IpResolver;
use crate::reconcile::{reconcile, Action};
use crate::zone::locate_zone;

/// What a single update run observed and changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub public_ip: Ipv4Addr,
    pub zone_id: String,
    pub kept: Option<String>,
    pub deleted: Vec<String>,
    pub created: Option<String>,
}

pub struct CloudflareDdns<C> {
    client: C,
    resolver: IpResolver,
    zone_name: String,
    dns_name: String,
}

impl CloudflareDdns<CloudflareClient> {
    pub fn from_config(config: &Config) -> Self {
        let client = CloudflareClient::with_base_url(&config.api_url, config.api_token.clone());
        Self::new(
            client,
            IpResolver::new(&config.ip_url),
            &config.zone_name,
            &config.dns_name,
        )
    }
}

impl<C: DnsApiClient> CloudflareDdns<C> {
    pub fn new(client: C, resolver: IpResolver, zone_name: &str, dns_name: &str) -> Self {
        Self {
            client,
            resolver,
            zone_name: zone_name.to_string(),
            dns_name: dns_name.to_string(),
        }
    }

    #[cfg(test)]
    pub fn client_ref(&self) -> &C {
        &self.client
    }

    /// Resolve the public IP and converge the A records for `dns_name` on it.
    pub async fn run(&self) -> Result<UpdateOutcome> {
        let public_ip = self.resolver.public_ip().await.map_err(|e| {
            error!("Failed to get public ip: {}", e);
            e
        })?;
        info!("Got public ip: {}", public_ip);

        self.update(public_ip).await
    }

    pub async fn update(&self, public_ip: Ipv4Addr) -> Result<UpdateOutcome> {
        let token = self.client.verify_token().await.map_err(|e| {
            error!("Failed to verify, token likely invalid: {}", e);
            e
        })?;
        debug!("Token {} is {}", token.id, token.status);
        info!("Api verified");

        let zones = self.client.list_zones().await?;
        let zone_id = locate_zone(&zones, &self.zone_name).map_err(|e| {
            error!("{}", e);
            e
        })?;
        info!("Found zone_name {}: {}", self.zone_name, zone_id);

        let records = self
            .client
            .list_records(&zone_id, &self.dns_name, RecordType::A)
            .await?;
        for record in &records {
            debug!(
                "Existing {} record {} for {}: {} (ttl={}, proxied={})",
                record.r#type, record.id, record.name, record.content, record.ttl, record.proxied
            );
        }

        let plan = reconcile(&self.dns_name, &public_ip.to_string(), &records);
        debug!(
            "Plan: keep {:?}, delete {}, create {}",
            plan.kept(),
            plan.deletions().count(),
            plan.creation().is_some()
        );
        if plan.is_noop() {
            debug!("Record already up to date");
        }

        let mut outcome = UpdateOutcome {
            public_ip,
            zone_id,
            kept: None,
            deleted: Vec::new(),
            created: None,
        };

        for action in plan.actions {
            match action {
                Action::Keep(id) => {
                    info!("Found matching record: {}", id);
                    outcome.kept = Some(id);
                }
                Action::Delete(id) => {
                    info!("Deleting unwanted record: {}", id);
                    self.client
                        .delete_record(&outcome.zone_id, &id)
                        .await
                        .map_err(|e| {
                            error!("Failed to delete record {}: {}", id, e);
                            e
                        })?;
                    outcome.deleted.push(id);
                }
                Action::Create(request) => {
                    info!("No valid record, creating new one");
                    let record = self
                        .client
                        .create_record(&outcome.zone_id, &request)
                        .await
                        .map_err(|e| {
                            error!("Failed to create record for {}: {}", request.name, e);
                            e
                        })?;
                    info!("Created new record: {}", record.id);
                    outcome.created = Some(record.id);
                }
            }
        }

        if outcome.kept.is_some() {
            info!("Matching record exists, no need for new one");
        }
        info!("Complete");
        Ok(outcome)
    }
}
