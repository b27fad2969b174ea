//! Integration tests for customer sub accounts.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p subaccounts-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `scenarios` - End-to-end decisions over the `company.yaml` fixture
//! - `properties` - Rules that must hold for every account and environment
//! - `snapshots` - Loading of fixture files, including rejected ones
//!
//! Fixtures live in `fixtures/` next to this crate's manifest.

use std::path::PathBuf;

use subaccounts_core::{Account, AccountId, RequestEnvironment};
use subaccounts_policy::{DirectorySnapshot, InMemoryDirectory, SnapshotError};

/// Every request environment.
pub const ENVIRONMENTS: [RequestEnvironment; 3] = [
    RequestEnvironment::Storefront,
    RequestEnvironment::Backend,
    RequestEnvironment::Isolated,
];

/// Path of a file in `fixtures/`.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Load a fixture into a directory.
///
/// # Errors
///
/// Returns `SnapshotError` if the fixture is missing or inconsistent.
pub fn load_fixture(name: &str) -> Result<InMemoryDirectory, SnapshotError> {
    DirectorySnapshot::load(&fixture_path(name))?.into_directory()
}

/// Fetch an account that the fixture is known to contain.
///
/// # Panics
///
/// Panics if the account is missing.
#[must_use]
#[allow(clippy::expect_used)]
pub fn account(directory: &InMemoryDirectory, id: i32) -> Account {
    directory
        .account(AccountId::new(id))
        .cloned()
        .expect("fixture account missing")
}
