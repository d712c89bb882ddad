//! `cmx clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use cmx::ops::{clean, CleanOptions, Session};
use cmx::GlobalContext;

pub fn execute(args: CleanArgs, ctx: &GlobalContext) -> Result<()> {
    let opts = CleanOptions { all: args.all };
    clean(&Session::new(ctx), &opts)
}
