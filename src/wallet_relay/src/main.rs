//! wallet-relay — generate IC identities and relay canister calls through a
//! cycles wallet.
//!
//! Subcommands: gen-wallet, gen-batch, show, refresh-balances, balance, approve,
//! swap, add-liquidity, call.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use wallet_relay::_5_INFORMATIONAL::format_report;
use wallet_relay::infrastructure::constants::{ICP_DECIMALS, KONGSWAP_BACKEND_ID};
use wallet_relay::infrastructure::logging::init_tracing;
use wallet_relay::{
    AddLiquidityRequest, AgentConnector, ApproveRequest, CallRequest, Operator, RelayConfig, SwapRequest,
};

/// Relay IC canister calls through a cycles wallet.
#[derive(Parser, Debug)]
#[command(name = "wallet-relay", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// JSON config file; built-in defaults otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Replica or boundary node URL
    #[arg(long, global = true)]
    network: Option<String>,

    /// Cycles wallet canister paying for relayed calls
    #[arg(long, global = true)]
    wallet: Option<String>,

    /// Directory holding `<label>.pem` identities
    #[arg(long, global = true)]
    identity_dir: Option<PathBuf>,

    /// Account book file
    #[arg(long, global = true)]
    book: Option<PathBuf>,

    /// Skip the before/after balance snapshots
    #[arg(long, global = true)]
    no_balances: bool,

    /// -v for debug logs
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one identity.
    GenWallet,
    /// Generate N identities into a fresh account book.
    GenBatch {
        count: usize,
        /// Replace an existing account book
        #[arg(long)]
        force: bool,
    },
    /// Show the principal and account id of one identity.
    Show { label: String },
    /// Re-query every balance in the account book.
    RefreshBalances,
    /// Show the ICP balance of one identity.
    Balance { caller: String },
    /// ICRC-2 approve a spender.
    Approve {
        caller: String,
        amount: Decimal,
        #[arg(long, default_value = KONGSWAP_BACKEND_ID)]
        spender: String,
        /// Token ledger canister (ICP ledger by default)
        #[arg(long)]
        ledger: Option<String>,
        #[arg(long, default_value_t = ICP_DECIMALS)]
        decimals: u32,
    },
    /// Swap tokens on Kongswap.
    Swap {
        caller: String,
        pay_token: String,
        pay_amount: Decimal,
        receive_token: String,
        #[arg(long, default_value_t = ICP_DECIMALS)]
        pay_decimals: u32,
        #[arg(long, default_value_t = ICP_DECIMALS)]
        receive_decimals: u32,
        #[arg(long)]
        receive_amount: Option<Decimal>,
        /// Percent, 2.0 = 2%
        #[arg(long, default_value_t = 2.0)]
        max_slippage: f64,
        #[arg(long)]
        receive_address: Option<String>,
    },
    /// Add liquidity to a Kongswap pool.
    AddLiquidity {
        caller: String,
        token_0: String,
        amount_0: Decimal,
        token_1: String,
        amount_1: Decimal,
        #[arg(long, default_value_t = ICP_DECIMALS)]
        decimals_0: u32,
        #[arg(long, default_value_t = ICP_DECIMALS)]
        decimals_1: u32,
    },
    /// Call any canister method with an optional text argument.
    Call {
        caller: String,
        canister: String,
        method: String,
        #[arg(long)]
        arg: Option<String>,
    },
}

fn load_config(global: &GlobalArgs) -> anyhow::Result<RelayConfig> {
    let mut config = match &global.config {
        Some(path) => RelayConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => RelayConfig::default(),
    };

    if let Some(network) = &global.network {
        config.network_url = network.clone();
    }
    if let Some(wallet) = &global.wallet {
        config.wallet_canister = Some(wallet.clone());
    }
    if let Some(dir) = &global.identity_dir {
        config.identity_dir = dir.clone();
    }
    if let Some(book) = &global.book {
        config.account_book = book.clone();
    }
    if global.no_balances {
        config.log_balances = false;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let config = load_config(&cli.global)?;
    let connector = AgentConnector::new(config.network_url.clone()).with_timeout(config.call_timeout());
    let operator = Operator::new(connector, config);

    match cli.command {
        Commands::GenWallet => {
            let created = operator.generate_wallet()?;
            println!("principal: {}", created.principal);
            println!("account:   {}", created.account_id);
        }
        Commands::GenBatch { count, force } => {
            let records = operator.generate_batch(count, force)?;
            println!("{} wallets written to {}", records.len(), operator.config().account_book.display());
        }
        Commands::Show { label } => {
            let shown = operator.describe_wallet(&label)?;
            println!("principal: {}", shown.principal);
            println!("account:   {}", shown.account_id);
        }
        Commands::RefreshBalances => {
            let summary = operator.refresh_balances().await?;
            println!(
                "{} refreshed, {} failed, {} skipped",
                summary.refreshed,
                summary.failed.len(),
                summary.skipped
            );
            for (account_id, err) in &summary.failed {
                println!("  {}: {}", account_id, err);
            }
        }
        Commands::Balance { caller } => {
            let balance = operator.balance_of(&caller).await?;
            println!("{:.8} ICP", balance);
        }
        Commands::Approve { caller, amount, spender, ledger, decimals } => {
            let request = ApproveRequest { caller, spender, amount, ledger, decimals };
            let report = operator.approve(&request).await?;
            println!("{}", format_report(&report));
        }
        Commands::Swap {
            caller,
            pay_token,
            pay_amount,
            receive_token,
            pay_decimals,
            receive_decimals,
            receive_amount,
            max_slippage,
            receive_address,
        } => {
            let request = SwapRequest {
                caller,
                pay_token,
                pay_amount,
                pay_decimals,
                receive_token,
                receive_amount,
                receive_decimals,
                max_slippage,
                receive_address,
            };
            let report = operator.swap(&request).await?;
            println!("{}", format_report(&report));
        }
        Commands::AddLiquidity { caller, token_0, amount_0, token_1, amount_1, decimals_0, decimals_1 } => {
            let request = AddLiquidityRequest { caller, token_0, amount_0, decimals_0, token_1, amount_1, decimals_1 };
            let report = operator.add_liquidity(&request).await?;
            println!("{}", format_report(&report));
        }
        Commands::Call { caller, canister, method, arg } => {
            let request = CallRequest { caller, canister, method, arg };
            let report = operator.call(&request).await?;
            println!("{}", format_report(&report));
        }
    }

    Ok(())
}
