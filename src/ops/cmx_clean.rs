//! Implementation of `cmx clean`.

use anyhow::Result;

use crate::builder::cmake::CMakeBuilder;
use crate::ops::session::Session;
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::shell::Status;

/// Options for `cmx clean`.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Remove the whole binary directory instead of building `clean`
    pub all: bool,
}

pub fn clean(session: &Session<'_>, opts: &CleanOptions) -> Result<()> {
    let ctx = session.ctx();
    let shell = ctx.shell();
    let binary_dir = ctx.binary_dir();

    if opts.all {
        if ctx.is_dry_run() {
            println!("remove {}", binary_dir.display());
            return Ok(());
        }
        if remove_dir_all_if_exists(binary_dir)? {
            shell.status(Status::Removed, binary_dir.display());
        } else {
            shell.note(format!("nothing to clean in {}", binary_dir.display()));
        }
        return Ok(());
    }

    if !session.is_configured()? {
        shell.note(format!(
            "nothing to clean, {} is not configured",
            binary_dir.display()
        ));
        return Ok(());
    }

    let cmd = CMakeBuilder::new(ctx.source_dir(), binary_dir)
        .build_type(ctx.build_type())
        .multi_config(session.is_multi_config()?)
        .clean_command();

    shell.status(Status::Cleaning, binary_dir.display());
    session.execute(&cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::context::{ContextOptions, GlobalContext};
    use crate::util::shell::{ColorChoice, Shell, Verbosity};
    use tempfile::TempDir;

    fn context(tmp: &TempDir, dry_run: bool) -> GlobalContext {
        GlobalContext::resolve(
            tmp.path().to_path_buf(),
            ContextOptions {
                dry_run,
                ..Default::default()
            },
            None,
            Shell::new(Verbosity::Quiet, ColorChoice::Never),
        )
    }

    #[test]
    fn test_clean_all_removes_binary_dir() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("build");
        std::fs::create_dir_all(bin.join("CMakeFiles")).unwrap();

        let ctx = context(&tmp, false);
        clean(&Session::new(&ctx), &CleanOptions { all: true }).unwrap();

        assert!(!bin.exists());
    }

    #[test]
    fn test_clean_all_dry_run_keeps_binary_dir() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("build");
        std::fs::create_dir_all(&bin).unwrap();

        let ctx = context(&tmp, true);
        clean(&Session::new(&ctx), &CleanOptions { all: true }).unwrap();

        assert!(bin.exists());
    }

    #[test]
    fn test_clean_unconfigured_is_noop() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, false);

        clean(&Session::new(&ctx), &CleanOptions::default()).unwrap();
    }
}
