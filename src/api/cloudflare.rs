use std::fmt;
use std::time::Duration;

use super::{client::DnsApiClient, models::*};
use crate::error::{Error, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const ZONES_PER_PAGE: u32 = 50;
const RECORDS_PER_PAGE: u32 = 100;

pub struct CloudflareClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

#[async_trait]
impl DnsApiClient for CloudflareClient {
    async fn verify_token(&self) -> Result<TokenStatus> {
        let response = self
            .request(Method::GET, "/user/tokens/verify")
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(Error::auth(format!(
                "token rejected with status {}",
                response.status()
            )));
        }

        let parsed: ApiResponse<TokenStatus> = Self::read_envelope(response, "verify token").await?;
        if !parsed.success {
            return Err(Error::auth(parsed.error_summary()));
        }

        let status = parsed
            .result
            .ok_or_else(|| Error::Decode("token verification returned no result".to_string()))?;
        if !status.is_active() {
            return Err(Error::auth(format!("token status is {}", status.status)));
        }

        Ok(status)
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.list_paged("/zones", &[], ZONES_PER_PAGE, "list zones")
            .await
    }

    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsRecord>> {
        self.list_paged(
            &format!("/zones/{}/dns_records", zone_id),
            &[("name", name), ("type", record_type.as_str())],
            RECORDS_PER_PAGE,
            "list records",
        )
        .await
    }

    async fn create_record(
        &self,
        zone_id: &str,
        record: &CreateRecordRequest,
    ) -> Result<DnsRecord> {
        let request = self
            .request(Method::POST, &format!("/zones/{}/dns_records", zone_id))
            .json(record);

        Self::send(request, "create record").await
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let request = self.request(
            Method::DELETE,
            &format!("/zones/{}/dns_records/{}", zone_id, record_id),
        );

        let deleted: DeletedRecord = Self::send(request, "delete record").await?;
        debug!("Provider confirmed deletion of {}", deleted.id);
        Ok(())
    }
}

impl CloudflareClient {
    pub fn with_base_url(base_url: impl Into<String>, api_token: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder, context: &str) -> Result<T> {
        let response = request.send().await?;
        let parsed: ApiResponse<T> = Self::read_envelope(response, context).await?;

        if !parsed.success {
            return Err(Error::api(format!("{}: {}", context, parsed.error_summary())));
        }

        parsed
            .result
            .ok_or_else(|| Error::Decode(format!("{}: response has no result", context)))
    }

    /// Reads the standard `{ success, errors, result }` envelope, turning
    /// non-success statuses into `Error::Network`.
    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<ApiResponse<T>> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
                Ok(envelope) => envelope.error_summary(),
                Err(_) => text,
            };
            return Err(Error::network(format!(
                "{} failed with status {}: {}",
                context, status, detail
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::Decode(format!("{}: {}. Response: {}", context, e, text))
        })
    }

    async fn list_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        per_page: u32,
        context: &str,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let request = self
                .request(Method::GET, path)
                .query(params)
                .query(&[("page", page), ("per_page", per_page)]);

            let response = request.send().await?;
            let parsed: ApiResponse<Vec<T>> = Self::read_envelope(response, context).await?;
            if !parsed.success {
                return Err(Error::api(format!("{}: {}", context, parsed.error_summary())));
            }

            let total_pages = parsed.result_info.as_ref().map_or(1, |info| info.total_pages);
            items.extend(parsed.result.unwrap_or_default());

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        debug!("{}: {} item(s) over {} page(s)", context, items.len(), page);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn envelope(result: serde_json::Value) -> serde_json::Value {
        json!({ "result": result, "success": true, "errors": [], "messages": [] })
    }

    fn paged(result: serde_json::Value, page: u32, total_pages: u32) -> serde_json::Value {
        json!({
            "result": result,
            "success": true,
            "errors": [],
            "messages": [],
            "result_info": { "page": page, "per_page": 50, "count": 1, "total_count": 2, "total_pages": total_pages }
        })
    }

    async fn client_for(server: &MockServer) -> CloudflareClient {
        CloudflareClient::with_base_url(server.uri(), "test-token".to_string())
    }

    #[tokio::test]
    async fn test_verify_token_active() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/tokens/verify"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(json!({ "id": "tok1", "status": "active" }))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let status = client_for(&server).await.verify_token().await.unwrap();
        assert_eq!(status.id, "tok1");
    }

    #[tokio::test]
    async fn test_verify_token_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/tokens/verify"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "result": null,
                "success": false,
                "errors": [{ "code": 1000, "message": "Invalid API Token" }],
                "messages": []
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.verify_token().await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn test_verify_token_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/tokens/verify"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(json!({ "id": "tok1", "status": "disabled" }))),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.verify_token().await.unwrap_err();
        assert!(matches!(err, Error::Auth(ref msg) if msg.contains("disabled")));
    }

    #[tokio::test]
    async fn test_list_zones_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paged(
                json!([{ "id": "1", "name": "a.com" }]),
                1,
                2,
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paged(
                json!([{ "id": "2", "name": "b.com" }]),
                2,
                2,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let zones = client_for(&server).await.list_zones().await.unwrap();
        let names: Vec<&str> = zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["a.com", "b.com"]);
    }

    #[tokio::test]
    async fn test_list_records_filters_by_name_and_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones/z1/dns_records"))
            .and(query_param("name", "home.example.com"))
            .and(query_param("type", "A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paged(
                json!([
                    { "id": "r1", "name": "home.example.com", "type": "A", "content": "9.9.9.9", "ttl": 300 },
                    { "id": "r2", "name": "home.example.com", "type": "A", "content": "1.2.3.4", "ttl": 1, "proxied": true }
                ]),
                1,
                1,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server)
            .await
            .list_records("z1", "home.example.com", RecordType::A)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "r1");
        assert!(records[1].proxied);
    }

    #[tokio::test]
    async fn test_create_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones/z1/dns_records"))
            .and(body_json(json!({
                "type": "A",
                "name": "home.example.com",
                "content": "1.2.3.4",
                "ttl": 300
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "id": "new1",
                "name": "home.example.com",
                "type": "A",
                "content": "1.2.3.4",
                "ttl": 300
            }))))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server)
            .await
            .create_record(
                "z1",
                &CreateRecordRequest::a_record("home.example.com", "1.2.3.4"),
            )
            .await
            .unwrap();
        assert_eq!(created.id, "new1");
    }

    #[tokio::test]
    async fn test_delete_record() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/zones/z1/dns_records/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "id": "r1" }))))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .await
            .delete_record("z1", "r1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/zones/z1/dns_records/r1"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .delete_record("z1", "r1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(ref msg) if msg.contains("502")));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones/z1/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": null,
                "success": false,
                "errors": [{ "code": 81057, "message": "Record already exists." }],
                "messages": []
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .create_record("z1", &CreateRecordRequest::a_record("a.com", "1.2.3.4"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(ref msg) if msg.contains("81057")));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = CloudflareClient::with_base_url("https://api.cloudflare.com/client/v4", "secret".to_string());
        assert!(!format!("{:?}", client).contains("secret"));
    }
}
