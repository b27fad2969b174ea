//! Sub Accounts Core - Shared types library.
//!
//! This crate provides the domain types used across the sub account components:
//! - `policy` - Parent/sub account resolution and permission decisions
//! - `cli` - Command-line evaluation of the policy against snapshot files
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no lookups, no configuration.
//! Relations between accounts are stored as plain ids; resolving them is the
//! job of an `AccountDirectory` in the policy crate.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, accounts, addresses, and the request environment

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
