use revocation_check::{
    adapters::HttpListFetcher, config::Config, domain::revocation::RevocationChecker,
    server::Server, telemetry,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Loaded configuration: {:?}", config);

    let fetcher = HttpListFetcher::new(&config.service.name, &config.fetch)?;
    let checker = RevocationChecker::new(fetcher);

    let server = Server::new(checker, &config)?;
    server.run().await
}
