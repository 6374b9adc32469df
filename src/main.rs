use anyhow::{Error, Result};
use studio_intake::{api::run_api_server, config::Config, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;

    init_tracing();

    run_api_server(config).await
}
