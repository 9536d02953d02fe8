use clap::Parser;
use leadlist_api::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = leadlist_api::cli::run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
