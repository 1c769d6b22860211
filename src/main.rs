//! `mint-client`: command line front end for the commit-reveal mint.
//!
//! ```text
//! client.toml ─▶ ClientConfig ─▶ Session::load / Session::connect
//!                                   │
//!      status / tokens / explore ◀──┤ reads
//!      commit / mint            ◀──┤ phase-gated actions
//!      watch                    ◀──┘ StatePoller + deployment watcher
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde::Serialize;

use reveal_mint_client::config::loader::load_config;
use reveal_mint_client::config::watcher::DeploymentWatcher;
use reveal_mint_client::config::{ClientConfig, DocumentSource};
use reveal_mint_client::game::{Snapshot, StatePoller};
use reveal_mint_client::lifecycle::signals::spawn_ctrl_c_handler;
use reveal_mint_client::observability::{logging, metrics};
use reveal_mint_client::{Session, Shutdown};

#[derive(Parser)]
#[command(name = "mint-client")]
#[command(about = "Client for the commit-reveal NFT mint", long_about = None)]
struct Cli {
    /// Client settings (TOML). Defaults apply when absent.
    #[arg(short, long, default_value = "client.toml")]
    config: PathBuf,

    /// Deployment document location, overriding the settings file.
    #[arg(short, long)]
    params: Option<String>,

    /// Connect the wallet even for read-only commands.
    #[arg(long)]
    connect: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show phase, height, account and owned tokens
    Status,
    /// Pay the current price to commit (COMMIT phase)
    Commit,
    /// Mint the committed NFT (MINT phase)
    Mint,
    /// List token ids owned by an address (default: connected account)
    Tokens {
        #[arg(long)]
        address: Option<Address>,
    },
    /// List every token with its metadata
    Explore,
    /// List UserCommit events
    Commits,
    /// List UserMint events
    Mints,
    /// Show metadata for one token
    Metadata { token_id: u64 },
    /// Poll state until Ctrl-C, printing every change
    Watch,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        ClientConfig::default()
    };
    if let Some(params) = cli.params {
        config.deployment.params = params;
    }

    logging::init(&config.observability.log_level);
    tracing::info!(params = %config.deployment.params, "mint-client v0.1.0 starting");

    let needs_wallet = cli.connect
        || matches!(cli.command, Commands::Commit | Commands::Mint)
        || matches!(cli.command, Commands::Tokens { address: None });
    let session = if needs_wallet {
        Session::connect(config).await?
    } else {
        Session::load(config).await?
    };

    match cli.command {
        Commands::Status => {
            let snapshot = session.refresh().await?;
            if cli.json {
                print_json(&snapshot)?;
            } else {
                print_snapshot(&snapshot);
            }
        }
        Commands::Commit => {
            let receipt = session.commit().await?;
            if cli.json {
                print_json(&receipt)?;
            } else {
                println!("Committed in {} (block {:?}, gas {})", receipt.tx_hash, receipt.block_number, receipt.gas_used);
            }
        }
        Commands::Mint => {
            let receipt = session.mint().await?;
            if cli.json {
                print_json(&receipt)?;
            } else {
                println!("Minted in {} (block {:?}, gas {})", receipt.tx_hash, receipt.block_number, receipt.gas_used);
            }
        }
        Commands::Tokens { address } => {
            let views = session.owned_token_views(address).await?;
            if cli.json {
                print_json(&views)?;
            } else if views.is_empty() {
                println!("No tokens owned.");
            } else {
                for view in views {
                    println!("Token {}: {}", view.token_id, view.metadata.name);
                }
            }
        }
        Commands::Explore => {
            let views = session.explore().await?;
            if cli.json {
                print_json(&views)?;
            } else {
                for view in views {
                    println!("Token {}: {} ({})", view.token_id, view.metadata.name, view.metadata.image);
                }
            }
        }
        Commands::Commits => {
            let events = session.commit_events().await?;
            if cli.json {
                print_json(&events)?;
            } else if events.is_empty() {
                println!("No commitments yet.");
            } else {
                for event in events {
                    println!("Address: {}, Token Id: {}", event.user, event.token_id);
                }
            }
        }
        Commands::Mints => {
            let events = session.mint_events().await?;
            if cli.json {
                print_json(&events)?;
            } else if events.is_empty() {
                println!("No mints yet.");
            } else {
                for event in events {
                    println!("Address: {}, NFT ID: {}", event.user, event.nft_id);
                }
            }
        }
        Commands::Metadata { token_id } => {
            let metadata = session.token_metadata(token_id).await?;
            if cli.json {
                print_json(&metadata)?;
            } else {
                println!("Token ID: {}", token_id);
                println!("{}", metadata.name);
                println!("{}", metadata.description);
                println!("{}", metadata.image);
            }
        }
        Commands::Watch => watch(Arc::new(session), cli.json).await?,
    }

    Ok(())
}

async fn watch(session: Arc<Session>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = session.config().clone();

    if let Some(addr) = &config.observability.metrics_address {
        metrics::init_metrics(addr.parse()?);
    }

    let shutdown = Shutdown::new();
    spawn_ctrl_c_handler(shutdown.clone());

    let (poller, mut rx) = StatePoller::new(session.clone(), shutdown.subscribe());

    // Held for the lifetime of the loop; dropping it stops the watch
    let mut _watcher = None;
    let poller = match DocumentSource::parse(&config.deployment.params) {
        DocumentSource::File(path) if config.deployment.watch => {
            let (watcher, reloads) = DeploymentWatcher::new(&path);
            _watcher = Some(watcher.run()?);
            poller.with_reloads(reloads)
        }
        _ => poller,
    };
    let handle = tokio::spawn(poller.run());

    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if let Some(snapshot) = snapshot {
            if json {
                print_json(&snapshot)?;
            } else {
                print_snapshot(&snapshot);
            }
        }
    }

    handle.await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    println!("Phase: {}", snapshot.phase);
    println!("  {}", snapshot.phase.describe());
    if let Some(height) = snapshot.block_height {
        println!("Block height: {}", height);
    }
    match snapshot.account {
        Some(account) => println!("Account: {}", account),
        None => println!("Account: not connected"),
    }
    if !snapshot.owned_tokens.is_empty() {
        let ids: Vec<String> = snapshot.owned_tokens.iter().map(u64::to_string).collect();
        println!("Owned tokens: {}", ids.join(", "));
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
