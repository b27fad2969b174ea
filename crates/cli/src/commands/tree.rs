//! `tree` - print the parent/sub account hierarchy.

use std::io::Write;

use subaccounts_core::Account;
use subaccounts_policy::{AccountLinkagePolicy, InMemoryDirectory};

use super::{CommandError, Context};

/// Write every top-level account followed by its sub accounts.
pub fn run(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    let policy = ctx.policy();

    for account in ctx.directory.accounts() {
        if policy.is_sub_account(account) {
            continue;
        }
        write_node(&policy, account, 0, out)?;
    }
    Ok(())
}

fn write_node(
    policy: &AccountLinkagePolicy<&InMemoryDirectory>,
    account: &Account,
    depth: usize,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let indent = "  ".repeat(depth);
    writeln!(out, "{indent}{} {}", account.id, account.name)?;

    // Links loaded through a snapshot are acyclic, so recursion ends.
    for sub in policy.sub_accounts(account) {
        write_node(policy, &sub, depth + 1, out)?;
    }
    Ok(())
}
