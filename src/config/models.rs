use std::fmt;
use validator::Validate;

use crate::error::{Error, Result};

pub const TOKEN_VAR: &str = "CLOUDFLARE_TOKEN";
pub const ZONE_NAME_VAR: &str = "CLOUDFLARE_ZONE_NAME";
pub const DNS_NAME_VAR: &str = "CLOUDFLARE_DNS_NAME";
pub const DEBUG_VAR: &str = "CLOUDFLARE_DEBUG";
pub const API_URL_VAR: &str = "CLOUDFLARE_API_URL";
pub const IP_URL_VAR: &str = "DDNS_IP_URL";

pub const DEFAULT_API_URL: &str = "https://api.cloudflare.com/client/v4";
// ipify has strong backing and guarantees a stable plain-text response
pub const DEFAULT_IP_URL: &str = "https://api.ipify.org/";

#[derive(Validate)]
pub struct Config {
    #[validate(length(min = 1, message = "API token cannot be empty"))]
    pub api_token: String,

    #[validate(length(min = 1, message = "Zone name cannot be empty"))]
    pub zone_name: String,

    #[validate(length(min = 1, message = "DNS name cannot be empty"))]
    pub dns_name: String,

    pub debug: bool,

    #[validate(length(min = 1, message = "API URL cannot be empty"))]
    pub api_url: String,

    #[validate(length(min = 1, message = "IP lookup URL cannot be empty"))]
    pub ip_url: String,
}

// Keeps the token out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<REDACTED>")
            .field("zone_name", &self.zone_name)
            .field("dns_name", &self.dns_name)
            .field("debug", &self.debug)
            .field("api_url", &self.api_url)
            .field("ip_url", &self.ip_url)
            .finish()
    }
}

impl Config {
    /// Build the config from the process arguments and environment.
    pub fn from_env() -> Result<Self> {
        Self::load(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Either all three positional arguments (token, zone name, DNS name) or
    /// none of them, in which case the `CLOUDFLARE_*` variables are required.
    /// `args` excludes the program name.
    pub fn load<I, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let args: Vec<String> = args.into_iter().collect();

        let (api_token, zone_name, dns_name) = match <[String; 3]>::try_from(args) {
            Ok([token, zone, name]) => (token, zone, name),
            Err(args) if args.is_empty() => (
                required(&env, TOKEN_VAR)?,
                required(&env, ZONE_NAME_VAR)?,
                required(&env, DNS_NAME_VAR)?,
            ),
            Err(args) => {
                return Err(Error::config(format!(
                    "Supply either all CLI args (token, zone_name, dns_name) or all env vars, got {} args",
                    args.len()
                )))
            }
        };

        let config = Self {
            api_token,
            zone_name,
            dns_name,
            debug: env(DEBUG_VAR).map_or(true, |v| parse_flag(&v)),
            api_url: env(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            ip_url: env(IP_URL_VAR).unwrap_or_else(|| DEFAULT_IP_URL.to_string()),
        };

        config
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;

        Ok(config)
    }
}

fn required<F>(env: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key).ok_or_else(|| Error::config(format!("Missing environment variable {}", key)))
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
