//! Core types for customer sub accounts.
//!
//! This module provides type-safe wrappers for the account domain.

pub mod account;
pub mod address;
pub mod environment;
pub mod id;

pub use account::Account;
pub use address::{Address, AddressKind};
pub use environment::{EnvironmentError, RequestEnvironment};
pub use id::*;
