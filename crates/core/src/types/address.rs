//! Postal address type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::{AccountId, AddressId};

/// Which designated address of an account is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Invoice,
    Shipping,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoice => write!(f, "invoice"),
            Self::Shipping => write!(f, "shipping"),
        }
    }
}

/// A billing/shipping address owned by exactly one account.
///
/// An address without an `id` has not been persisted and does not
/// [`exist`](Self::exists); hosts hand such blank records to the policy when
/// an account has no designated address yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Address {
    /// Persisted address ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    /// Owning account.
    pub owner: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub city: String,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default)]
    pub country: String,
}

impl Address {
    /// Create an unsaved, empty address for `owner`.
    #[must_use]
    pub const fn blank(owner: AccountId) -> Self {
        Self {
            id: None,
            owner,
            company: None,
            first_name: String::new(),
            last_name: String::new(),
            street: String::new(),
            postcode: String::new(),
            city: String::new(),
            country: String::new(),
        }
    }

    /// Whether the address has been persisted.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.id.is_some()
    }
}
