mod logging;
mod server;

use anyhow::Context;
use bundler_engine::{BundleService, ServiceConfig};
use service_logging::service_info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::initialize();

    let config = ServiceConfig::load();
    let port: u16 = match std::env::var("PORT") {
        Ok(value) => value.parse().context("PORT must be a port number")?,
        Err(_) => 8080,
    };

    service_info!(
        "starting bundler on port {port} (auth required: {})",
        config.require_auth
    );

    let service = BundleService::new(config);
    server::run(service, port).await;
    Ok(())
}
