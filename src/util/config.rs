//! Configuration file support for cmx.
//!
//! cmx reads two configuration file locations:
//! - Global: `~/.cmx/config.toml` - User-wide defaults
//! - Project: `<source dir>/.cmx/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! and `CMX_*` environment variables take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Binary directory used when nothing else names one.
pub const DEFAULT_BINARY_DIR: &str = "build";

/// Build type used when nothing else names one.
pub const DEFAULT_BUILD_TYPE: &str = "Debug";

/// cmx configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configure and build settings
    pub build: BuildConfig,

    /// CTest settings
    pub test: TestConfig,
}

/// Configure/build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Binary directory, relative to the source directory
    pub binary_dir: Option<PathBuf>,

    /// Default build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    pub build_type: Option<String>,

    /// Generator requested on first configuration (fuzzy-matched)
    pub generator: Option<String>,

    /// Default number of parallel jobs for build and make
    pub jobs: Option<usize>,
}

/// Test-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Show output of failing tests
    pub output_on_failure: Option<bool>,

    /// Default number of tests run in parallel
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.binary_dir.is_some() {
            self.build.binary_dir = other.build.binary_dir;
        }
        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }

        if other.test.output_on_failure.is_some() {
            self.test.output_on_failure = other.test.output_on_failure;
        }
        if other.test.jobs.is_some() {
            self.test.jobs = other.test.jobs;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cmx/config.toml)
/// 2. Global config (~/.cmx/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global cmx config directory (~/.cmx).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cmx"))
}

/// Get the global config path (~/.cmx/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (<source dir>/.cmx/config.toml).
pub fn project_config_path(source_dir: &Path) -> PathBuf {
    source_dir.join(".cmx").join("config.toml")
}
