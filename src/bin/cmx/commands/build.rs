//! `cmx build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use cmx::ops::{build, BuildOptions, Session};
use cmx::GlobalContext;

pub fn execute(args: BuildArgs, ctx: &GlobalContext) -> Result<()> {
    let opts = BuildOptions {
        intents: args.native.intents(),
        native_args: args.native.native,
        targets: args.targets,
        clean_first: args.clean_first,
    };

    let mut session = Session::new(ctx);
    build(&mut session, &opts)
}
