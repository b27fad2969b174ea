//! `check` - print every decision for one account.

use std::io::Write;

use subaccounts_core::{AccountId, RequestEnvironment};

use super::{CommandError, Context};

/// Write the decisions for `account` in `env` as pretty JSON.
pub fn run(
    ctx: &Context,
    account: AccountId,
    env: RequestEnvironment,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let account = ctx.account(account)?;
    let decisions = ctx.policy().decisions(account, env);
    serde_json::to_writer_pretty(&mut *out, &decisions)?;
    writeln!(out)?;
    Ok(())
}
