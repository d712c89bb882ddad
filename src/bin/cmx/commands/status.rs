//! `cmx status` command

use anyhow::Result;

use cmx::ops::{format_report, status, Session};
use cmx::GlobalContext;

pub fn execute(ctx: &GlobalContext) -> Result<()> {
    let report = status(&Session::new(ctx))?;
    print!("{}", format_report(&report));
    Ok(())
}
