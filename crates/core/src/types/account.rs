//! Customer account type.

use serde::{Deserialize, Serialize};

use super::id::{AccountId, AddressId};

/// A customer account.
///
/// An account with a `parent_account_id` is a candidate sub account. Whether
/// it actually counts as one depends on the parent resolving to an existing
/// account, which only an `AccountDirectory` can answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Display name shown in listings.
    #[serde(default)]
    pub name: String,
    /// The parent account, if this account was linked to one.
    #[serde(default, rename = "parent", skip_serializing_if = "Option::is_none")]
    pub parent_account_id: Option<AccountId>,
    /// Designated invoice address.
    #[serde(default, rename = "invoice_address", skip_serializing_if = "Option::is_none")]
    pub invoice_address_id: Option<AddressId>,
    /// Designated shipping address.
    #[serde(default, rename = "shipping_address", skip_serializing_if = "Option::is_none")]
    pub shipping_address_id: Option<AddressId>,
}

impl Account {
    /// Create an account without parent or designated addresses.
    #[must_use]
    pub fn new(id: AccountId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_account_id: None,
            invoice_address_id: None,
            shipping_address_id: None,
        }
    }

    /// Set the parent account.
    #[must_use]
    pub const fn with_parent(mut self, parent: AccountId) -> Self {
        self.parent_account_id = Some(parent);
        self
    }

    /// Set the designated invoice address.
    #[must_use]
    pub const fn with_invoice_address(mut self, address: AddressId) -> Self {
        self.invoice_address_id = Some(address);
        self
    }

    /// Set the designated shipping address.
    #[must_use]
    pub const fn with_shipping_address(mut self, address: AddressId) -> Self {
        self.shipping_address_id = Some(address);
        self
    }
}
