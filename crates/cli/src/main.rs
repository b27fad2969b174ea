//! Sub Accounts CLI - Evaluate sub account decisions against snapshot files.
//!
//! # Usage
//!
//! ```bash
//! # Show every decision for account 2 in a storefront request
//! subaccounts --snapshot accounts.yaml check 2
//!
//! # Show the addresses account 2 sees in the admin backend
//! subaccounts --snapshot accounts.yaml --env backend addresses 2
//!
//! # Force parent data display on, whatever the environment says
//! subaccounts --snapshot accounts.yaml --display-parent-account-data true check 2
//!
//! # List parent accounts and their sub accounts
//! subaccounts --snapshot accounts.yaml tree
//! ```
//!
//! # Commands
//!
//! - `check` - Print all decisions for an account as JSON
//! - `addresses` - Print the addresses an account sees as JSON
//! - `tree` - Print the parent/sub account hierarchy
//!
//! # Environment Variables
//!
//! - `SUBACCOUNTS_DISPLAY_PARENT_ACCOUNT_DATA` - Display flag, used when
//!   `--display-parent-account-data` is not given
//! - `RUST_LOG` - Log filter (default: `warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use subaccounts_core::{AccountId, RequestEnvironment};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "subaccounts")]
#[command(author, version, about = "Customer sub account policy tools")]
struct Cli {
    /// Snapshot file with accounts and addresses (.yaml, .yml or .json)
    #[arg(short, long, global = true, default_value = "accounts.yaml")]
    snapshot: PathBuf,

    /// Request environment to decide for (`storefront`, `backend`, `isolated`)
    #[arg(short, long, global = true, default_value_t = RequestEnvironment::Storefront)]
    env: RequestEnvironment,

    /// Override the display-parent-account-data flag
    #[arg(long, global = true)]
    display_parent_account_data: Option<bool>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every decision for an account
    Check {
        /// Account ID
        account: AccountId,
    },
    /// Print the addresses an account sees
    Addresses {
        /// Account ID
        account: AccountId,
    },
    /// Print parent accounts with their sub accounts
    Tree,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = Context::load(&cli.snapshot, cli.display_parent_account_data)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Check { account } => commands::check::run(&ctx, account, cli.env, &mut out),
        Commands::Addresses { account } => {
            commands::addresses::run(&ctx, account, cli.env, &mut out)
        }
        Commands::Tree => commands::tree::run(&ctx, &mut out),
    }
}
