use clap::Parser;
use taller_carga::cli::{self, Cli, DEFAULT_LOG_FILTER};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    FmtSubscriber::builder().with_env_filter(filter).init();

    let stats = cli::run(Cli::parse()).await?;
    println!("{stats}");

    Ok(())
}
