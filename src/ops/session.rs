//! Per-invocation state shared by the operations.
//!
//! The cache snapshot, the builder family derived from it and the generator
//! catalog are each computed at most once. A configure step run by cmx
//! itself calls [`Session::invalidate`] so the fresh cache is read.

use std::sync::OnceLock;

use anyhow::Result;

use crate::builder::cmake::help_text;
use crate::builder::family::{self, BuilderFamily};
use crate::core::cache::CacheSnapshot;
use crate::core::generator::GeneratorCatalog;
use crate::util::context::GlobalContext;
use crate::util::errors::is_interrupted;
use crate::util::process::ProcessBuilder;
use crate::util::shell::Status;

pub struct Session<'a> {
    ctx: &'a GlobalContext,
    snapshot: OnceLock<CacheSnapshot>,
    family: OnceLock<Option<BuilderFamily>>,
    catalog: OnceLock<GeneratorCatalog>,
}

impl<'a> Session<'a> {
    pub fn new(ctx: &'a GlobalContext) -> Self {
        Session {
            ctx,
            snapshot: OnceLock::new(),
            family: OnceLock::new(),
            catalog: OnceLock::new(),
        }
    }

    pub fn ctx(&self) -> &'a GlobalContext {
        self.ctx
    }

    /// The cache of the binary directory; empty when not configured.
    pub fn snapshot(&self) -> Result<&CacheSnapshot> {
        if let Some(snapshot) = self.snapshot.get() {
            return Ok(snapshot);
        }
        let snapshot = CacheSnapshot::read_dir(self.ctx.binary_dir())?;
        tracing::debug!("read {} cache entries", snapshot.len());
        Ok(self.snapshot.get_or_init(|| snapshot))
    }

    pub fn is_configured(&self) -> Result<bool> {
        Ok(!self.snapshot()?.is_empty())
    }

    /// Generator recorded in the cache.
    pub fn generator(&self) -> Result<Option<&str>> {
        Ok(self.snapshot()?.generator())
    }

    pub fn family(&self) -> Result<Option<BuilderFamily>> {
        if let Some(family) = self.family.get() {
            return Ok(*family);
        }
        let family = self.generator()?.and_then(BuilderFamily::classify);
        tracing::debug!("builder family: {:?}", family);
        Ok(*self.family.get_or_init(|| family))
    }

    /// Whether one binary directory holds every configuration.
    pub fn is_multi_config(&self) -> Result<bool> {
        if self.family()?.is_some_and(BuilderFamily::is_multi_config) {
            return Ok(true);
        }
        Ok(self.generator()?.is_some_and(family::is_multi_config))
    }

    /// Generators known to the installed CMake.
    pub fn catalog(&self) -> Result<&GeneratorCatalog> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }
        let text = {
            let _spinner = self.ctx.shell().spinner("Querying CMake generators");
            help_text()?
        };
        let catalog = GeneratorCatalog::parse(&text);
        tracing::debug!("found {} generators", catalog.len());
        Ok(self.catalog.get_or_init(|| catalog))
    }

    /// Resolve a user-typed generator name.
    ///
    /// When CMake cannot be queried the input is passed through and CMake
    /// reports the final error. Ctrl-C during the query is not swallowed.
    pub fn resolve_generator(&self, input: &str) -> Result<String> {
        match self.catalog() {
            Ok(catalog) => Ok(catalog.resolve(input)),
            Err(e) if is_interrupted(&e) => Err(e),
            Err(e) => {
                tracing::warn!("cannot list generators: {:#}", e);
                Ok(input.to_string())
            }
        }
    }

    /// Forget everything derived from the cache.
    pub fn invalidate(&mut self) {
        self.snapshot = OnceLock::new();
        self.family = OnceLock::new();
    }

    /// Run a command, or print it on a dry run.
    pub fn execute(&self, cmd: &ProcessBuilder) -> Result<()> {
        if self.ctx.is_dry_run() {
            println!("{}", cmd.display_command());
            return Ok(());
        }

        if self.ctx.shell().is_verbose() {
            self.ctx
                .shell()
                .status(Status::Running, cmd.display_command());
        }
        cmd.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::CACHE_FILE_NAME;
    use crate::util::context::ContextOptions;
    use crate::util::shell::{ColorChoice, Shell, Verbosity};
    use tempfile::TempDir;

    fn context(tmp: &TempDir) -> GlobalContext {
        GlobalContext::resolve(
            tmp.path().to_path_buf(),
            ContextOptions::default(),
            None,
            Shell::new(Verbosity::Quiet, ColorChoice::Never),
        )
    }

    fn write_cache(tmp: &TempDir, contents: &str) {
        let bin = tmp.path().join("build");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(CACHE_FILE_NAME), contents).unwrap();
    }

    #[test]
    fn test_unconfigured_session() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        let session = Session::new(&ctx);

        assert!(!session.is_configured().unwrap());
        assert_eq!(session.family().unwrap(), None);
        assert!(!session.is_multi_config().unwrap());
    }

    #[test]
    fn test_family_from_cache() {
        let tmp = TempDir::new().unwrap();
        write_cache(&tmp, "CMAKE_GENERATOR:INTERNAL=Unix Makefiles\n");
        let ctx = context(&tmp);
        let session = Session::new(&ctx);

        assert!(session.is_configured().unwrap());
        assert_eq!(session.family().unwrap(), Some(BuilderFamily::RecursiveMake));
        assert!(!session.is_multi_config().unwrap());
    }

    #[test]
    fn test_ninja_multi_config() {
        let tmp = TempDir::new().unwrap();
        write_cache(&tmp, "CMAKE_GENERATOR:INTERNAL=Ninja Multi-Config\n");
        let ctx = context(&tmp);
        let session = Session::new(&ctx);

        assert_eq!(session.family().unwrap(), Some(BuilderFamily::Ninja));
        assert!(session.is_multi_config().unwrap());
    }

    #[test]
    fn test_invalidate_rereads_cache() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        let mut session = Session::new(&ctx);

        assert_eq!(session.family().unwrap(), None);

        write_cache(&tmp, "CMAKE_GENERATOR:INTERNAL=Xcode\n");
        // Memoized until invalidated.
        assert_eq!(session.family().unwrap(), None);

        session.invalidate();
        assert_eq!(session.family().unwrap(), Some(BuilderFamily::IdeBuild));
        assert!(session.is_multi_config().unwrap());
    }
}
