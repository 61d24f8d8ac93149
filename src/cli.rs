use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use url::Url;

use crate::balance::{BalancePoller, DisplayState, PollerSettings};
use crate::config::{self, models::NovaPayConfig, ConfigError};
use crate::dashboard::DashboardView;
use crate::error::NovaPayError;
use crate::ledger::SolanaRpcLedger;
use crate::metrics::start_metrics_server;
use crate::session::{short_key, SessionChannel};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "NovaPay - live Solana wallet balance dashboard",
    long_about = "NovaPay shows the live native balance of a connected Solana wallet. \
                  The balance is read from a public JSON-RPC endpoint every 15 seconds \
                  and is never cached, persisted or used to move funds."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Override the JSON-RPC endpoint from the configuration
    #[arg(long, value_name = "URL", global = true)]
    pub rpc_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow a wallet session and show its live balance (default behavior)
    Watch {
        /// Account to connect on startup
        #[arg(short, long)]
        account: Option<String>,

        /// Print display states as JSON instead of the dashboard
        #[arg(long)]
        json: bool,
    },
    /// Fetch the balance of an account once
    Balance {
        /// Account to look up
        #[arg(short, long)]
        account: String,

        /// Print the reading as JSON
        #[arg(long)]
        json: bool,
    },
}

/// A line typed into the `watch` prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Connect(String),
    Disconnect,
    Refresh,
    Quit,
    Empty,
    Unrecognized(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();

        match (words.next(), words.next(), words.next()) {
            (None, _, _) => Self::Empty,
            (Some("quit" | "exit"), None, _) => Self::Quit,
            (Some("disconnect"), None, _) => Self::Disconnect,
            (Some("refresh"), None, _) => Self::Refresh,
            (Some("connect"), Some(account), None) => Self::Connect(account.to_string()),
            (Some(account), None, _) => Self::Connect(account.to_string()),
            _ => Self::Unrecognized(line.trim().to_string()),
        }
    }
}

/// Loads the configuration and applies command line overrides
pub fn resolve_config(cli: &Cli) -> Result<NovaPayConfig, NovaPayError> {
    let mut config = config::load_or_default(cli.config.as_deref())?;

    if let Some(rpc_url) = &cli.rpc_url {
        let parsed = Url::parse(rpc_url).map_err(|e| {
            ConfigError::Other(format!("Invalid --rpc-url '{}': {}", rpc_url, e))
        })?;
        config.network.rpc_url = parsed.to_string();
    }

    Ok(config)
}

pub async fn run(cli: Cli) -> Result<(), NovaPayError> {
    let config = resolve_config(&cli)?;
    info!(
        "Network: {} ({})",
        config.network.name, config.network.rpc_url
    );

    if config.metrics.enabled {
        start_metrics_server(config.metrics.port).await?;
    }

    let ledger = Arc::new(SolanaRpcLedger::new(&config.network)?);
    let poller = BalancePoller::new(
        ledger,
        PollerSettings::from_config(&config.poller, &config.network),
    );

    match cli.command {
        Some(Commands::Balance { account, json }) => {
            print_balance(&poller, &config, &account, json).await
        }
        Some(Commands::Watch { account, json }) => watch(&poller, &config, account, json).await,
        None => watch(&poller, &config, None, false).await,
    }
}

async fn print_balance(
    poller: &BalancePoller,
    config: &NovaPayConfig,
    account: &str,
    json: bool,
) -> Result<(), NovaPayError> {
    let reading = poller.fetch_once(account).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        println!(
            "{}: {} {}",
            short_key(account),
            reading.format(config.poller.display_decimals),
            config.poller.token_symbol
        );
    }

    Ok(())
}

async fn watch(
    poller: &BalancePoller,
    config: &NovaPayConfig,
    account: Option<String>,
    json: bool,
) -> Result<(), NovaPayError> {
    let session = SessionChannel::new();
    let follower = poller.follow(&session);
    if let Some(account) = account {
        session.connect(account);
    }

    let view = DashboardView::from_config(config);
    let mut display = poller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Commands: <account> | connect <account> | disconnect | refresh | quit");
    print_display(&view, &display.borrow_and_update().clone(), json)?;

    loop {
        tokio::select! {
            changed = display.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = display.borrow_and_update().clone();
                print_display(&view, &state, json)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match SessionCommand::parse(&line) {
                    SessionCommand::Connect(account) => session.connect(account),
                    SessionCommand::Disconnect => session.disconnect(),
                    SessionCommand::Refresh => {
                        if let Err(e) = poller.refresh().await {
                            warn!("Refresh failed: {}", e);
                        }
                    }
                    SessionCommand::Quit => break,
                    SessionCommand::Empty => {}
                    SessionCommand::Unrecognized(line) => {
                        eprintln!("Unrecognized command: {}", line);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    follower.abort();
    poller.stop();
    Ok(())
}

fn print_display(view: &DashboardView, state: &DisplayState, json: bool) -> Result<(), NovaPayError> {
    if json {
        println!("{}", serde_json::to_string(state)?);
    } else {
        println!("{}\n", view.render(state));
    }
    Ok(())
}
