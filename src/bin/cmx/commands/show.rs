//! `cmx show` command

use anyhow::{Context, Result};

use crate::cli::ShowArgs;
use cmx::ops::{cache_entries, format_entry, Session};
use cmx::GlobalContext;

pub fn execute(args: ShowArgs, ctx: &GlobalContext) -> Result<()> {
    let session = Session::new(ctx);

    if !session.is_configured()? {
        ctx.shell().note(format!(
            "{} is not configured; run `cmx cmake` first",
            ctx.binary_dir().display()
        ));
        return Ok(());
    }

    let entries = cache_entries(&session, args.pattern.as_deref())?;

    if args.json {
        let json = serde_json::to_string_pretty(&entries)
            .context("failed to serialize cache entries")?;
        println!("{}", json);
        return Ok(());
    }

    for entry in &entries {
        println!("{}", format_entry(entry, args.types));
    }

    Ok(())
}
