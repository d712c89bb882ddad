//! Implementation of `cmx build` and `cmx make`.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::cmake::{native_command, CMakeBuilder};
use crate::builder::intent::{native_flags, MakeIntents};
use crate::ops::cmx_configure::ensure_configured;
use crate::ops::session::Session;
use crate::util::process::tool_path;
use crate::util::shell::Status;

/// Options for `cmx build`.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Targets to build (all when empty)
    pub targets: Vec<String>,

    /// Builder-agnostic requests translated into native flags
    pub intents: MakeIntents,

    /// Build the `clean` target first
    pub clean_first: bool,

    /// Native arguments passed through after the translated ones
    pub native_args: Vec<String>,
}

/// Options for `cmx make`.
#[derive(Debug, Clone, Default)]
pub struct MakeOptions {
    pub targets: Vec<String>,
    pub intents: MakeIntents,
    pub native_args: Vec<String>,
}

/// Build through `cmake --build`.
pub fn build(session: &mut Session<'_>, opts: &BuildOptions) -> Result<()> {
    ensure_configured(session)?;

    let ctx = session.ctx();
    let intents = with_default_jobs(session, &opts.intents);
    let flags = native_flags(session.family()?, &intents, &opts.native_args);

    let cmd = CMakeBuilder::new(ctx.source_dir(), ctx.binary_dir())
        .build_type(ctx.build_type())
        .multi_config(session.is_multi_config()?)
        .targets(opts.targets.iter().cloned())
        .clean_first(opts.clean_first)
        .build_command(&flags);

    tracing::info!("building {}", ctx.binary_dir().display());
    let span = ctx.shell().span(Status::Building, describe_targets(&opts.targets));
    session.execute(&cmd)?;
    if !ctx.is_dry_run() {
        span.finish();
    }

    Ok(())
}

/// Run the native builder directly in the binary directory.
pub fn make(session: &mut Session<'_>, opts: &MakeOptions) -> Result<()> {
    ensure_configured(session)?;

    let ctx = session.ctx();
    let family = session.family()?;
    let program = make_program(session)?;

    let mut args = Vec::new();
    if session.is_multi_config()? {
        if let Some(family) = family {
            args.extend(family.configuration_flags(ctx.build_type()));
        }
    }
    let intents = with_default_jobs(session, &opts.intents);
    args.extend(native_flags(family, &intents, &opts.native_args));
    args.extend(opts.targets.iter().cloned());

    let cmd = native_command(&program, ctx.binary_dir(), &args);

    tracing::info!("running {} in {}", cmd.program_name(), ctx.binary_dir().display());
    ctx.shell().status(Status::Building, describe_targets(&opts.targets));
    session.execute(&cmd)
}

/// The native build program: the cache's `CMAKE_MAKE_PROGRAM`, else the
/// family's usual tool, else `make`.
pub fn make_program(session: &Session<'_>) -> Result<PathBuf> {
    if let Some(program) = session
        .snapshot()?
        .get("CMAKE_MAKE_PROGRAM")
        .filter(|p| !p.is_empty())
    {
        return Ok(PathBuf::from(program));
    }

    let name = session
        .family()?
        .map(|family| family.default_program())
        .unwrap_or("make");
    Ok(tool_path(name))
}

/// Fill in the configured job count when the user asked for none.
fn with_default_jobs(session: &Session<'_>, intents: &MakeIntents) -> MakeIntents {
    let mut intents = intents.clone();
    if intents.jobs.is_none() {
        if let Some(jobs) = session.ctx().config().build.jobs {
            intents.jobs = Some(Some(jobs.to_string()));
        }
    }
    intents
}

fn describe_targets(targets: &[String]) -> String {
    if targets.is_empty() {
        "all targets".to_string()
    } else {
        targets.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::family::BuilderFamily;
    use crate::core::cache::CACHE_FILE_NAME;
    use crate::util::context::{ContextOptions, GlobalContext};
    use crate::util::shell::{ColorChoice, Shell, Verbosity};
    use tempfile::TempDir;

    fn context_with_cache(tmp: &TempDir, cache: &str) -> GlobalContext {
        let bin = tmp.path().join("build");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(CACHE_FILE_NAME), cache).unwrap();
        GlobalContext::resolve(
            tmp.path().to_path_buf(),
            ContextOptions {
                dry_run: true,
                ..Default::default()
            },
            None,
            Shell::new(Verbosity::Quiet, ColorChoice::Never),
        )
    }

    #[test]
    fn test_make_program_from_cache() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_with_cache(
            &tmp,
            "CMAKE_GENERATOR:INTERNAL=Ninja\nCMAKE_MAKE_PROGRAM:FILEPATH=/opt/bin/ninja\n",
        );
        let session = Session::new(&ctx);

        assert_eq!(make_program(&session).unwrap(), PathBuf::from("/opt/bin/ninja"));
    }

    #[test]
    fn test_make_program_from_family() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_with_cache(&tmp, "CMAKE_GENERATOR:INTERNAL=Xcode\n");
        let session = Session::new(&ctx);

        let program = make_program(&session).unwrap();
        assert_eq!(
            program.file_name().and_then(|n| n.to_str()),
            Some(BuilderFamily::IdeBuild.default_program())
        );
    }

    #[test]
    fn test_default_jobs_from_config() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(".cmx")).unwrap();
        std::fs::write(tmp.path().join(".cmx/config.toml"), "[build]\njobs = 6\n").unwrap();
        let ctx = context_with_cache(&tmp, "CMAKE_GENERATOR:INTERNAL=Unix Makefiles\n");
        let session = Session::new(&ctx);

        let intents = with_default_jobs(&session, &MakeIntents::default());
        assert_eq!(intents.jobs, Some(Some("6".to_string())));

        // An explicit request wins.
        let explicit = MakeIntents {
            jobs: Some(None),
            ..Default::default()
        };
        assert_eq!(with_default_jobs(&session, &explicit).jobs, Some(None));
    }

    #[test]
    fn test_dry_run_build_and_make_succeed() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_with_cache(
            &tmp,
            "CMAKE_GENERATOR:INTERNAL=Unix Makefiles\nCMAKE_MAKE_PROGRAM:FILEPATH=/usr/bin/make\n",
        );
        let mut session = Session::new(&ctx);

        build(&mut session, &BuildOptions::default()).unwrap();
        make(&mut session, &MakeOptions::default()).unwrap();
    }

    #[test]
    fn test_describe_targets() {
        assert_eq!(describe_targets(&[]), "all targets");
        assert_eq!(
            describe_targets(&["app".to_string(), "tests".to_string()]),
            "app, tests"
        );
    }
}
