//! Global context for cmx operations.
//!
//! Resolves, once per invocation, where the project lives, where it builds,
//! and which settings apply. Precedence for every setting is command line
//! (including `CMX_*` environment variables) over project config over
//! global config over built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::cache::{CacheSnapshot, CACHE_FILE_NAME};
use crate::util::config::{
    global_config_path, load_config, project_config_path, Config, DEFAULT_BINARY_DIR,
    DEFAULT_BUILD_TYPE,
};
use crate::util::shell::Shell;

/// Settings taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    pub source_dir: Option<PathBuf>,
    pub binary_dir: Option<PathBuf>,
    pub build_type: Option<String>,
    pub generator: Option<String>,
    pub dry_run: bool,
}

/// Global context containing configuration and paths.
#[derive(Debug)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Directory holding the top-level CMakeLists.txt
    source_dir: PathBuf,

    /// Directory holding CMakeCache.txt
    binary_dir: PathBuf,

    /// Selected build type
    build_type: String,

    /// Requested generator, unresolved
    generator: Option<String>,

    /// Merged config files
    config: Config,

    /// Print commands instead of running them
    dry_run: bool,

    shell: Shell,
}

impl GlobalContext {
    /// Create a context for the current directory, reading the user's
    /// global config.
    pub fn new(opts: ContextOptions, shell: Shell) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let global = global_config_path();
        Ok(Self::resolve(cwd, opts, global.as_deref(), shell))
    }

    /// Create a context rooted at `cwd` with an explicit global config path.
    pub fn resolve(
        cwd: PathBuf,
        opts: ContextOptions,
        global_config: Option<&Path>,
        shell: Shell,
    ) -> Self {
        let mut source_dir = opts.source_dir.as_deref().map(|p| absolute(&cwd, p));
        let mut binary_dir = opts.binary_dir.as_deref().map(|p| absolute(&cwd, p));

        // Running inside an already configured binary directory.
        if binary_dir.is_none() && cwd.join(CACHE_FILE_NAME).is_file() {
            tracing::debug!("using {} as the binary directory", cwd.display());
            if source_dir.is_none() {
                source_dir = home_directory_of(&cwd);
            }
            binary_dir = Some(cwd.clone());
        }

        let source_dir = source_dir.unwrap_or_else(|| cwd.clone());
        let config = load_config(global_config, &project_config_path(&source_dir));

        let binary_dir = binary_dir.unwrap_or_else(|| {
            let dir = config
                .build
                .binary_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY_DIR));
            absolute(&source_dir, &dir)
        });

        let build_type = opts
            .build_type
            .or_else(|| config.build.build_type.clone())
            .unwrap_or_else(|| DEFAULT_BUILD_TYPE.to_string());

        let generator = opts.generator.or_else(|| config.build.generator.clone());

        GlobalContext {
            cwd,
            source_dir,
            binary_dir,
            build_type,
            generator,
            config,
            dry_run: opts.dry_run,
            shell,
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn binary_dir(&self) -> &Path {
        &self.binary_dir
    }

    pub fn build_type(&self) -> &str {
        &self.build_type
    }

    pub fn generator(&self) -> Option<&str> {
        self.generator.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// The source directory recorded in a binary directory's cache.
fn home_directory_of(binary_dir: &Path) -> Option<PathBuf> {
    let snapshot = CacheSnapshot::read_dir(binary_dir).ok()?;
    snapshot
        .get("CMAKE_HOME_DIRECTORY")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}
