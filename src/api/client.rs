use super::models::*;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DnsApiClient {
    /// Fails with `Error::Auth` unless the token is valid and active.
    async fn verify_token(&self) -> Result<TokenStatus>;
    async fn list_zones(&self) -> Result<Vec<Zone>>;
    /// Records in `zone_id` matching `name` and `record_type`, in provider order.
    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsRecord>>;
    async fn create_record(&self, zone_id: &str, record: &CreateRecordRequest)
        -> Result<DnsRecord>;
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;
}
