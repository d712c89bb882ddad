//! `cmx make` command

use anyhow::Result;

use crate::cli::MakeArgs;
use cmx::ops::{make, MakeOptions, Session};
use cmx::GlobalContext;

pub fn execute(args: MakeArgs, ctx: &GlobalContext) -> Result<()> {
    let mut intents = args.native.intents();
    intents.help = args.native_help;
    intents.version = args.native_version;

    let opts = MakeOptions {
        intents,
        native_args: args.native.native,
        targets: args.targets,
    };

    let mut session = Session::new(ctx);
    make(&mut session, &opts)
}
