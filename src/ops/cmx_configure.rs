//! Implementation of `cmx cmake` and the implicit configure step.

use anyhow::Result;

use crate::builder::cmake::CMakeBuilder;
use crate::ops::session::Session;
use crate::util::shell::Status;

/// Options for the configure step.
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// Generator as typed by the user; resolved through the catalog
    pub generator: Option<String>,

    /// `-D` definitions
    pub defines: Vec<String>,

    /// Pass `--fresh` to CMake
    pub fresh: bool,

    /// Extra arguments appended verbatim
    pub args: Vec<String>,
}

/// Run the configure step for the session's source and binary directories.
pub fn configure(session: &mut Session<'_>, opts: &ConfigureOptions) -> Result<()> {
    let ctx = session.ctx();

    let requested = opts
        .generator
        .as_deref()
        .or_else(|| ctx.generator());
    let generator = requested
        .map(|g| session.resolve_generator(g))
        .transpose()?;

    if let Some(generator) = &generator {
        if let Some(existing) = session.generator()? {
            if existing != generator {
                ctx.shell().warn(format!(
                    "{} was configured with `{}`, requested `{}`",
                    ctx.binary_dir().display(),
                    existing,
                    generator
                ));
            }
        }
    }

    let cmd = CMakeBuilder::new(ctx.source_dir(), ctx.binary_dir())
        .generator(generator)
        .build_type(ctx.build_type())
        .defines(opts.defines.iter().cloned())
        .fresh(opts.fresh)
        .args(opts.args.iter().cloned())
        .configure_command()?;

    tracing::info!("configuring {}", ctx.source_dir().display());
    let span = ctx
        .shell()
        .span(Status::Configuring, ctx.source_dir().display());
    session.execute(&cmd)?;
    if !ctx.is_dry_run() {
        span.finish();
    }

    session.invalidate();
    Ok(())
}

/// Configure first when the binary directory has no cache yet.
pub fn ensure_configured(session: &mut Session<'_>) -> Result<()> {
    if session.is_configured()? {
        tracing::debug!("{} is configured", session.ctx().binary_dir().display());
        return Ok(());
    }

    session.ctx().shell().note(format!(
        "{} is not configured yet",
        session.ctx().binary_dir().display()
    ));
    configure(session, &ConfigureOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::CACHE_FILE_NAME;
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
    fn test_ensure_configured_skips_configured_tree() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("build");
        std::fs::create_dir_all(&bin).unwrap();
        let cache = "CMAKE_GENERATOR:INTERNAL=Unix Makefiles\n";
        std::fs::write(bin.join(CACHE_FILE_NAME), cache).unwrap();

        // Not a dry run: a configure step here would run cmake on a
        // directory without CMakeLists.txt and fail.
        let ctx = context(&tmp, false);
        let mut session = Session::new(&ctx);

        ensure_configured(&mut session).unwrap();
        assert_eq!(session.generator().unwrap(), Some("Unix Makefiles"));
        assert_eq!(
            std::fs::read_to_string(bin.join(CACHE_FILE_NAME)).unwrap(),
            cache
        );
    }

    #[test]
    fn test_dry_run_configure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, true);
        let mut session = Session::new(&ctx);

        ensure_configured(&mut session).unwrap();
        assert!(!session.is_configured().unwrap());
        assert!(!tmp.path().join("build").exists());
    }

    #[test]
    fn test_configure_rejects_invalid_define() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, true);
        let mut session = Session::new(&ctx);

        let opts = ConfigureOptions {
            defines: vec!["=1".to_string()],
            ..Default::default()
        };
        assert!(configure(&mut session, &opts).is_err());
    }
}
