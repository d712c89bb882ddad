//! `cmx cmake` command

use anyhow::Result;

use crate::cli::CmakeArgs;
use cmx::ops::{configure, ConfigureOptions, Session};
use cmx::GlobalContext;

pub fn execute(args: CmakeArgs, ctx: &GlobalContext) -> Result<()> {
    let opts = ConfigureOptions {
        generator: args.generator,
        defines: args.define,
        fresh: args.fresh,
        args: args.args,
    };

    let mut session = Session::new(ctx);
    configure(&mut session, &opts)
}
