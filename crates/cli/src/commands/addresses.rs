//! `addresses` - print the addresses one account sees.

use std::io::Write;

use subaccounts_core::{AccountId, RequestEnvironment};

use super::{CommandError, Context};

/// Write the resolved address list, invoice and shipping address of
/// `account` in `env` as pretty JSON.
pub fn run(
    ctx: &Context,
    account: AccountId,
    env: RequestEnvironment,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let account = ctx.account(account)?;
    let resolved = ctx.policy().resolve_addresses(account, env);
    serde_json::to_writer_pretty(&mut *out, &resolved)?;
    writeln!(out)?;
    Ok(())
}
