mod api;
mod config;
mod ddns;
mod error;
mod ip;
mod logging;
mod reconcile;
mod zone;


use anyhow::Result;
use config::Config;
use ddns::CloudflareDdns;

#[tokio::main]
async fn main() -> Result<()> {
    // Arguments are checked before logging or any network call
    let config = Config::from_env()?;
    logging::init(config.debug);

    // Single pass, no retries
    let ddns = CloudflareDdns::from_config(&config);
    ddns.run().await?;
    Ok(())
}
