use anyhow::Result;
use clap::Parser;
use tracing::error;

use novapay::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout carries only the dashboard
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    if let Err(e) = cli::run(args).await {
        error!("NovaPay exited with error: {}", e);
        return Err(anyhow::anyhow!("{}", e));
    }

    Ok(())
}
