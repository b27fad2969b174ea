//! Account and address lookups.
//!
//! The policy never owns account data. It asks an [`AccountDirectory`] for
//! the handful of relations it needs: forward parent resolution, reverse
//! sub account lookup, and an account's addresses.
//!
//! [`InMemoryDirectory`] backs the CLI and the tests. Hosts with a real
//! persistence layer implement the trait over their own repositories.

use std::collections::{BTreeMap, HashSet};

use subaccounts_core::{Account, AccountId, Address, AddressId, AddressKind};
use thiserror::Error;

/// Errors raised while maintaining an [`InMemoryDirectory`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The referenced account is not in the directory.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// An account was linked to itself.
    #[error("account {0} cannot be its own parent")]
    SelfParent(AccountId),

    /// An address without an ID was offered for storage.
    #[error("address for account {0} has not been saved")]
    UnsavedAddress(AccountId),

    /// Linking would make an account its own ancestor.
    #[error("linking account {child} to parent {parent} would create a cycle")]
    Cycle {
        /// The account being linked.
        child: AccountId,
        /// The requested parent.
        parent: AccountId,
    },
}

/// Read access to accounts and addresses.
///
/// Lookups that find nothing return `None` or an empty list, never an error.
pub trait AccountDirectory {
    /// Look up an account by ID.
    fn find_account(&self, id: AccountId) -> Option<Account>;

    /// All accounts whose parent is `parent`.
    fn sub_accounts_of(&self, parent: AccountId) -> Vec<Account>;

    /// Whether any account has `parent` as its parent.
    fn has_sub_accounts(&self, parent: AccountId) -> bool {
        !self.sub_accounts_of(parent).is_empty()
    }

    /// All addresses owned by `owner`.
    fn addresses_of(&self, owner: AccountId) -> Vec<Address>;

    /// Look up an address by ID.
    fn find_address(&self, id: AddressId) -> Option<Address>;

    /// The account's designated invoice or shipping address.
    fn designated_address_of(&self, account: &Account, kind: AddressKind) -> Option<Address> {
        let id = match kind {
            AddressKind::Invoice => account.invoice_address_id,
            AddressKind::Shipping => account.shipping_address_id,
        }?;
        self.find_address(id)
    }

    /// The account's designated invoice address.
    fn invoice_address_of(&self, account: &Account) -> Option<Address> {
        self.designated_address_of(account, AddressKind::Invoice)
    }

    /// The account's designated shipping address.
    fn shipping_address_of(&self, account: &Account) -> Option<Address> {
        self.designated_address_of(account, AddressKind::Shipping)
    }
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for &T {
    fn find_account(&self, id: AccountId) -> Option<Account> {
        (**self).find_account(id)
    }

    fn sub_accounts_of(&self, parent: AccountId) -> Vec<Account> {
        (**self).sub_accounts_of(parent)
    }

    fn has_sub_accounts(&self, parent: AccountId) -> bool {
        (**self).has_sub_accounts(parent)
    }

    fn addresses_of(&self, owner: AccountId) -> Vec<Address> {
        (**self).addresses_of(owner)
    }

    fn find_address(&self, id: AddressId) -> Option<Address> {
        (**self).find_address(id)
    }

    fn designated_address_of(&self, account: &Account, kind: AddressKind) -> Option<Address> {
        (**self).designated_address_of(account, kind)
    }
}

/// An [`AccountDirectory`] held entirely in memory.
///
/// Accounts and addresses are kept in ID order so listings are stable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    accounts: BTreeMap<AccountId, Account>,
    addresses: BTreeMap<AddressId, Address>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account. Returns the previous account with the
    /// same ID, if any.
    ///
    /// The account's parent link is stored as given. Use
    /// [`link_parent`](Self::link_parent) to have it checked.
    pub fn insert_account(&mut self, account: Account) -> Option<Account> {
        self.accounts.insert(account.id, account)
    }

    /// Insert or replace a persisted address. Returns the previous address
    /// with the same ID, if any.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::UnsavedAddress` if the address has no ID.
    pub fn insert_address(&mut self, address: Address) -> Result<Option<Address>, DirectoryError> {
        let id = address
            .id
            .ok_or(DirectoryError::UnsavedAddress(address.owner))?;
        Ok(self.addresses.insert(id, address))
    }

    /// Borrow an account without cloning it.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Iterate over all accounts in ID order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Number of accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of addresses.
    #[must_use]
    pub fn address_count(&self) -> usize {
        self.addresses.len()
    }

    /// Link `child` to `parent`.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError` if either account is unknown, if `child` and
    /// `parent` are the same account, or if `child` is already an ancestor of
    /// `parent`.
    pub fn link_parent(
        &mut self,
        child: AccountId,
        parent: AccountId,
    ) -> Result<(), DirectoryError> {
        if child == parent {
            return Err(DirectoryError::SelfParent(child));
        }
        if !self.accounts.contains_key(&parent) {
            return Err(DirectoryError::AccountNotFound(parent));
        }
        if !self.accounts.contains_key(&child) {
            return Err(DirectoryError::AccountNotFound(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(DirectoryError::Cycle { child, parent });
        }

        if let Some(account) = self.accounts.get_mut(&child) {
            account.parent_account_id = Some(parent);
        }
        tracing::debug!(%child, %parent, "Linked sub account");
        Ok(())
    }

    /// Whether `ancestor` appears on the parent chain starting at `account`
    /// (including `account` itself).
    fn is_ancestor(&self, ancestor: AccountId, account: AccountId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(account);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            // Stored links may already loop if they bypassed `link_parent`.
            if !seen.insert(id) {
                return false;
            }
            current = self.accounts.get(&id).and_then(|a| a.parent_account_id);
        }
        false
    }
}

impl AccountDirectory for InMemoryDirectory {
    fn find_account(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).cloned()
    }

    fn sub_accounts_of(&self, parent: AccountId) -> Vec<Account> {
        self.accounts
            .values()
            .filter(|a| a.parent_account_id == Some(parent))
            .cloned()
            .collect()
    }

    fn has_sub_accounts(&self, parent: AccountId) -> bool {
        self.accounts
            .values()
            .any(|a| a.parent_account_id == Some(parent))
    }

    fn addresses_of(&self, owner: AccountId) -> Vec<Address> {
        self.addresses
            .values()
            .filter(|a| a.owner == owner)
            .cloned()
            .collect()
    }

    fn find_address(&self, id: AddressId) -> Option<Address> {
        self.addresses.get(&id).cloned()
    }
}
