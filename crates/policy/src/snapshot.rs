//! Directory snapshots loaded from YAML or JSON files.
//!
//! ```yaml
//! display_parent_account_data: true
//! accounts:
//!   - id: 1
//!     name: Head office
//!     invoice_address: 10
//!   - id: 2
//!     name: Branch
//!     parent: 1
//! addresses:
//!   - id: 10
//!     owner: 1
//!     street: Hauptstr. 1
//!     postcode: "10115"
//!     city: Berlin
//!     country: DE
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use subaccounts_core::{Account, AccountId, Address, AddressId};
use thiserror::Error;

use crate::directory::{AccountDirectory, DirectoryError, InMemoryDirectory};

/// Errors that can occur when loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("Duplicate account id {0}")]
    DuplicateAccount(AccountId),

    #[error("Duplicate address id {0}")]
    DuplicateAddress(AddressId),

    #[error("Address {address} belongs to unknown account {owner}")]
    UnknownOwner { address: AddressId, owner: AccountId },

    #[error("Account {account} designates address {address}, which {reason}")]
    InvalidDesignatedAddress {
        account: AccountId,
        address: AddressId,
        reason: &'static str,
    },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Serialized form of an [`InMemoryDirectory`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectorySnapshot {
    /// Display flag stored alongside the data, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_parent_account_data: Option<bool>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl DirectorySnapshot {
    /// Load a snapshot, picking the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the file cannot be read, has an unknown
    /// extension, or does not parse.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let contents = std::fs::read_to_string(path)?;
        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&contents),
            "json" => Self::from_json(&contents),
            _ => Err(SnapshotError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse a YAML snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Yaml` if the document does not parse.
    pub fn from_yaml(contents: &str) -> Result<Self, SnapshotError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if the document does not parse.
    pub fn from_json(contents: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Build a directory, checking the snapshot for consistency.
    ///
    /// Parent links go through [`InMemoryDirectory::link_parent`], so
    /// self-links, unknown parents and cycles are rejected.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` for duplicate IDs, addresses owned by unknown
    /// accounts, designated addresses that are missing or owned by another
    /// account, and rejected parent links.
    pub fn into_directory(self) -> Result<InMemoryDirectory, SnapshotError> {
        let mut directory = InMemoryDirectory::new();
        let mut links = Vec::new();

        for mut account in self.accounts {
            if let Some(parent) = account.parent_account_id.take() {
                links.push((account.id, parent));
            }
            let id = account.id;
            if directory.insert_account(account).is_some() {
                return Err(SnapshotError::DuplicateAccount(id));
            }
        }

        let mut address_ids = HashSet::new();
        for address in self.addresses {
            let Some(id) = address.id else {
                return Err(DirectoryError::UnsavedAddress(address.owner).into());
            };
            if !address_ids.insert(id) {
                return Err(SnapshotError::DuplicateAddress(id));
            }
            if directory.account(address.owner).is_none() {
                return Err(SnapshotError::UnknownOwner {
                    address: id,
                    owner: address.owner,
                });
            }
            directory.insert_address(address)?;
        }

        let designated: Vec<(AccountId, AddressId)> = directory
            .accounts()
            .flat_map(|a| {
                [a.invoice_address_id, a.shipping_address_id]
                    .into_iter()
                    .flatten()
                    .map(move |address| (a.id, address))
            })
            .collect();
        for (account, address) in designated {
            check_designated(&directory, account, address)?;
        }

        for (child, parent) in links {
            directory.link_parent(child, parent)?;
        }

        tracing::info!(
            accounts = directory.account_count(),
            addresses = directory.address_count(),
            "Loaded directory snapshot"
        );
        Ok(directory)
    }
}

fn check_designated(
    directory: &InMemoryDirectory,
    account: AccountId,
    address: AddressId,
) -> Result<(), SnapshotError> {
    let reason = match directory.find_address(address) {
        None => "does not exist",
        Some(found) if found.owner != account => "belongs to another account",
        Some(_) => return Ok(()),
    };
    Err(SnapshotError::InvalidDesignatedAddress {
        account,
        address,
        reason,
    })
}
