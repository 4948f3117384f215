use anyhow::Context;
use chub::domain::config::ApiConfig;
use chub::kernel::config::load_config;
use chub_logger::Logger;
use chub_server::Server;

const CONFIG_FILE: &str = "server";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig = load_config(Some(CONFIG_FILE)).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder(env!("CARGO_PKG_NAME"))
        .config(&cfg.logging)?
        .init()
        .context("Failed to initialize logging")?;

    Server::builder().config(cfg).build().await?.run().await
}
