//! Pharos testnet rewards bot.
//!
//! # Architecture Overview
//!
//! ```text
//!   private key ──▶ Wallet ──┐
//!                            ▼
//!   config ──▶ Orchestrator ─┬──▶ RewardsApi ──▶ REST rewards API
//!                            └──▶ TxBuilder ───▶ BlockchainClient ──▶ JSON-RPC node
//!                            ▲
//!   menu / subcommand ───────┘
//! ```
//!
//! Login failure ends the run; every other failed step is logged and the
//! menu continues.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pharos_bot::api::RewardsApi;
use pharos_bot::blockchain::{BlockchainClient, TxBuilder, TxSettings, Wallet};
use pharos_bot::cli::Menu;
use pharos_bot::config::loader::{load_or_default, private_key_from_env, PRIVATE_KEY_ENV_VAR};
use pharos_bot::observability::{logging, metrics};
use pharos_bot::orchestrator::{Orchestrator, OrchestratorSettings};

#[derive(Parser)]
#[command(name = "pharos-bot")]
#[command(about = "Daily check-in, faucet and on-chain tasks for the Pharos testnet", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Show accumulated points
    Points,
    /// Show native and wrapped balances
    Balances,
    /// Perform the daily check-in
    CheckIn,
    /// Claim the faucet if it is available
    Faucet,
    /// Self-transfers, each followed by task verification
    Transfers {
        #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
    /// Wrap/unwrap round trips
    Swaps {
        #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("pharos-bot v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let mut menu = Menu::stdin();
    let private_key = match private_key_from_env() {
        Some(key) => key,
        None => match menu.private_key().await? {
            Some(key) => key,
            None => {
                tracing::warn!(
                    env = PRIVATE_KEY_ENV_VAR,
                    "No private key provided. Exiting..."
                );
                return Ok(());
            }
        },
    };

    let wallet = Wallet::from_private_key(&private_key, config.blockchain.chain_id)?;
    drop(private_key);

    let chain = BlockchainClient::new(config.blockchain.clone()).await?;
    let tx = TxBuilder::new(chain, wallet, TxSettings::from(&config.blockchain));
    let api = RewardsApi::new(&config.api)?;
    let settings = OrchestratorSettings::from_config(&config)?;
    let orchestrator = Orchestrator::new(api, tx, settings);

    let mut session = match orchestrator.authenticate().await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Failed to login. Exiting...");
            return Err(e.into());
        }
    };
    orchestrator.fetch_points(&mut session).await;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => menu.run(&orchestrator, &mut session).await?,
        Commands::Points => {
            println!("{}", session.points);
        }
        Commands::Balances => match orchestrator.balances().await {
            Ok((native, wrapped)) => println!("PHRS: {}\nWPHRS: {}", native, wrapped),
            Err(e) => tracing::error!(error = %e, "Failed to get balances"),
        },
        Commands::CheckIn => {
            let _ = orchestrator.check_in_and_refresh(&mut session).await;
        }
        Commands::Faucet => {
            let _ = orchestrator.claim_faucet_and_refresh(&mut session).await;
        }
        Commands::Transfers { count } => {
            orchestrator.run_transfer_task_sequence(&session, count).await;
            orchestrator.fetch_points(&mut session).await;
        }
        Commands::Swaps { count } => {
            orchestrator.run_swap_sequence(count).await;
        }
    }

    tracing::info!("Done");
    Ok(())
}
