//! Command implementations.
//!
//! Every command writes its result to the given writer so it can be tested
//! without touching stdout.

pub mod addresses;
pub mod check;
pub mod tree;

use std::path::Path;

use subaccounts_core::{Account, AccountId};
use subaccounts_policy::config::display_flag_from_env;
use subaccounts_policy::{
    AccountLinkagePolicy, ConfigError, DirectorySnapshot, InMemoryDirectory, LinkageConfig,
    SnapshotError,
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The snapshot could not be loaded.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The environment configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The requested account is not in the snapshot.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Output could not be encoded.
    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded directory plus the configuration to decide with.
pub struct Context {
    pub directory: InMemoryDirectory,
    pub config: LinkageConfig,
}

impl Context {
    /// Load the snapshot at `path` and settle the display flag.
    ///
    /// The flag comes from, in order: `cli_flag`, the environment, the
    /// snapshot file, and finally defaults to off.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the snapshot or the environment is invalid.
    pub fn load(path: &Path, cli_flag: Option<bool>) -> Result<Self, CommandError> {
        let snapshot = DirectorySnapshot::load(path)?;
        let env_flag = display_flag_from_env()?;
        let config = LinkageConfig::new(resolve_display_flag(
            cli_flag,
            env_flag,
            snapshot.display_parent_account_data,
        ));
        tracing::debug!(
            path = %path.display(),
            display_parent_account_data = config.display_parent_account_data,
            "Loaded context"
        );

        Ok(Self {
            directory: snapshot.into_directory()?,
            config,
        })
    }

    /// A policy over this context's directory.
    pub const fn policy(&self) -> AccountLinkagePolicy<&InMemoryDirectory> {
        AccountLinkagePolicy::new(&self.directory, self.config)
    }

    /// Look up an account.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::AccountNotFound` if the account is unknown.
    pub fn account(&self, id: AccountId) -> Result<&Account, CommandError> {
        self.directory
            .account(id)
            .ok_or(CommandError::AccountNotFound(id))
    }
}

/// Pick the first flag that is set, defaulting to off.
const fn resolve_display_flag(
    cli_flag: Option<bool>,
    env_flag: Option<bool>,
    snapshot_flag: Option<bool>,
) -> bool {
    match (cli_flag, env_flag, snapshot_flag) {
        (Some(flag), _, _) | (None, Some(flag), _) | (None, None, Some(flag)) => flag,
        (None, None, None) => false,
    }
}
