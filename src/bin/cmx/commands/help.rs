//! `cmx help` command

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::{Cli, HelpArgs};
use cmx::core::fuzzy_match;
use cmx::ops::Session;
use cmx::util::errors::CmxError;
use cmx::GlobalContext;

/// Subcommand names in declaration order.
pub fn command_names() -> Vec<String> {
    Cli::command()
        .get_subcommands()
        .filter(|sub| !sub.is_hide_set())
        .map(|sub| sub.get_name().to_string())
        .collect()
}

/// Resolve a possibly abbreviated or misspelled command name.
pub fn resolve_command(query: &str) -> Option<String> {
    let names = command_names();
    fuzzy_match(&names, query).map(str::to_string)
}

pub fn execute(args: HelpArgs, ctx: &GlobalContext) -> Result<()> {
    if args.generators {
        return list_generators(ctx);
    }

    let mut cmd = Cli::command();
    cmd.build();

    let Some(query) = args.command else {
        cmd.print_help()?;
        return Ok(());
    };

    let name = resolve_command(&query).ok_or(CmxError::UnknownCommand { name: query })?;
    if let Some(sub) = cmd.find_subcommand_mut(&name) {
        sub.print_help()?;
    }

    Ok(())
}

fn list_generators(ctx: &GlobalContext) -> Result<()> {
    let session = Session::new(ctx);
    let catalog = session.catalog()?;

    for (i, generator) in catalog.generators().iter().enumerate() {
        let marker = if generator.is_default { "*" } else { " " };
        println!("{:>3}{} {}", i + 1, marker, generator.name);
        if !generator.sub_choices.is_empty() {
            println!("       [{}]", generator.sub_choices.join(", "));
        }
    }

    Ok(())
}
