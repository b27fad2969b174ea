//! Sub Accounts Policy - parent/sub account resolution and permissions.
//!
//! A sub account is a customer account linked to a parent account. When the
//! store enables it, a sub account in a storefront session sees its parent's
//! addresses wherever it has none of its own, and may not create addresses.
//! Sub accounts may never view prices or buy, whatever the configuration.
//!
//! # Modules
//!
//! - [`config`] - `LinkageConfig` and environment variable loading
//! - [`directory`] - `AccountDirectory` lookups and an in-memory implementation
//! - [`linkage`] - `AccountLinkagePolicy`, the decisions themselves
//! - [`snapshot`] - Loading a directory from YAML/JSON snapshot files
//!
//! # Example
//!
//! ```rust
//! use subaccounts_core::{Account, AccountId, RequestEnvironment};
//! use subaccounts_policy::{AccountLinkagePolicy, InMemoryDirectory, LinkageConfig};
//!
//! let mut directory = InMemoryDirectory::new();
//! directory.insert_account(Account::new(AccountId::new(1), "Head office"));
//! directory.insert_account(Account::new(AccountId::new(2), "Branch"));
//! directory.link_parent(AccountId::new(2), AccountId::new(1)).unwrap();
//!
//! let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
//! let branch = directory.account(AccountId::new(2)).unwrap();
//!
//! assert!(policy.is_sub_account(branch));
//! assert!(!policy.can_buy(Some(branch)));
//! assert!(policy.should_display_parent_account_data(branch, RequestEnvironment::Storefront));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod directory;
pub mod linkage;
pub mod snapshot;

pub use config::{ConfigError, LinkageConfig};
pub use directory::{AccountDirectory, DirectoryError, InMemoryDirectory};
pub use linkage::{AccountDecisions, AccountLinkagePolicy, ResolvedAddresses};
pub use snapshot::{DirectorySnapshot, SnapshotError};
