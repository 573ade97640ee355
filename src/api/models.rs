use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// TTL in seconds for records created by the updater
pub const DEFAULT_TTL: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    TXT,
    Other,
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::AAAA,
            "CNAME" => RecordType::CNAME,
            "TXT" => RecordType::TXT,
            _ => RecordType::Other,
        }
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::TXT => "TXT",
            RecordType::Other => "OTHER",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    pub r#type: RecordType,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRecordRequest {
    pub r#type: RecordType,
    pub name: String,
    pub content: String,
    pub ttl: u32,
}

impl CreateRecordRequest {
    pub fn a_record(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            r#type: RecordType::A,
            name: name.into(),
            content: content.into(),
            ttl: DEFAULT_TTL,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenStatus {
    pub id: String,
    pub status: String,
}

impl TokenStatus {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Deserialize)]
pub struct DeletedRecord {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug, Deserialize)]
pub struct ResultInfo {
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "no error details".to_string();
        }
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}
