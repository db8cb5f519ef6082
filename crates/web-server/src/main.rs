use tracing_subscriber::EnvFilter;

// Entry point for `cargo run -p web-server`. Loads settings and hands off to
// `run_server`; the `fx-journal serve` command does the same with file logging.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config(None)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    web_server::run_server(config).await
}
