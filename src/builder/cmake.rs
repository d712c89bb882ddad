//! CMake and CTest command lines.
//!
//! Nothing here runs a build on its own. Each builder produces a
//! [`ProcessBuilder`] that the caller either executes or prints for a dry run.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::util::errors::CmxError;
use crate::util::process::{find_cmake, find_ctest, ProcessBuilder};

/// Shapes `cmake` invocations for one source/binary directory pair.
#[derive(Debug, Clone)]
pub struct CMakeBuilder {
    source_dir: PathBuf,
    binary_dir: PathBuf,
    generator: Option<String>,
    build_type: Option<String>,
    multi_config: bool,
    defines: Vec<String>,
    cmake_args: Vec<String>,
    targets: Vec<String>,
    fresh: bool,
    clean_first: bool,
}

impl CMakeBuilder {
    pub fn new(source_dir: impl Into<PathBuf>, binary_dir: impl Into<PathBuf>) -> Self {
        CMakeBuilder {
            source_dir: source_dir.into(),
            binary_dir: binary_dir.into(),
            generator: None,
            build_type: None,
            multi_config: false,
            defines: Vec::new(),
            cmake_args: Vec::new(),
            targets: Vec::new(),
            fresh: false,
            clean_first: false,
        }
    }

    /// Generator passed with `-G`, already resolved against the catalog.
    pub fn generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    pub fn build_type(mut self, build_type: impl Into<String>) -> Self {
        self.build_type = Some(build_type.into());
        self
    }

    /// Whether the binary directory holds several configurations, in which
    /// case the build type is selected with `--config` at build time.
    pub fn multi_config(mut self, multi_config: bool) -> Self {
        self.multi_config = multi_config;
        self
    }

    /// Add `-D` cache definitions (`VAR=VALUE` or `VAR:TYPE=VALUE`).
    pub fn defines(mut self, defines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.defines.extend(defines.into_iter().map(|s| s.into()));
        self
    }

    /// Add raw arguments appended to the configure command.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cmake_args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Specify targets to build.
    pub fn targets(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.targets.extend(targets.into_iter().map(|s| s.into()));
        self
    }

    pub fn fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    pub fn clean_first(mut self, clean_first: bool) -> Self {
        self.clean_first = clean_first;
        self
    }

    /// `cmake -S <src> -B <bin> [-G <gen>] [-DCMAKE_BUILD_TYPE=<type>] [-D...] [--fresh] [args]`
    pub fn configure_command(&self) -> Result<ProcessBuilder> {
        let mut cmd = ProcessBuilder::new(find_cmake())
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(&self.binary_dir);

        if let Some(generator) = &self.generator {
            cmd = cmd.arg("-G").arg(generator);
        }

        if let Some(build_type) = &self.build_type {
            cmd = cmd.arg(format!("-DCMAKE_BUILD_TYPE={}", build_type));
        }

        for define in &self.defines {
            validate_define(define)?;
            cmd = cmd.arg(format!("-D{}", define));
        }

        if self.fresh {
            cmd = cmd.arg("--fresh");
        }

        Ok(cmd.args(&self.cmake_args))
    }

    /// `cmake --build <bin> [--config <type>] [--target T...] [--clean-first] [-- flags]`
    pub fn build_command(&self, native_flags: &[String]) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(find_cmake())
            .arg("--build")
            .arg(&self.binary_dir);

        // Configuration (for multi-config generators like Visual Studio)
        if self.multi_config {
            if let Some(build_type) = &self.build_type {
                cmd = cmd.arg("--config").arg(build_type);
            }
        }

        if !self.targets.is_empty() {
            cmd = cmd.arg("--target").args(&self.targets);
        }

        if self.clean_first {
            cmd = cmd.arg("--clean-first");
        }

        if !native_flags.is_empty() {
            cmd = cmd.arg("--").args(native_flags);
        }

        cmd
    }

    /// `cmake --build <bin> [--config <type>] --target clean`
    pub fn clean_command(&self) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(find_cmake())
            .arg("--build")
            .arg(&self.binary_dir);

        if self.multi_config {
            if let Some(build_type) = &self.build_type {
                cmd = cmd.arg("--config").arg(build_type);
            }
        }

        cmd.arg("--target").arg("clean")
    }
}

/// Reject `-D` values CMake would misread.
pub fn validate_define(define: &str) -> Result<(), CmxError> {
    let valid = match define.split_once('=') {
        Some((lhs, _)) => {
            let name = lhs.split_once(':').map_or(lhs, |(name, _)| name);
            !name.trim().is_empty()
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(CmxError::InvalidDefine {
            define: define.to_string(),
        })
    }
}

/// Options for a `ctest` run.
#[derive(Debug, Clone, Default)]
pub struct CTestOptions {
    /// Build type selected with `-C` on multi-config builds
    pub configuration: Option<String>,
    pub jobs: Option<usize>,
    /// `-R`: only tests matching this regex
    pub include: Option<String>,
    /// `-E`: exclude tests matching this regex
    pub exclude: Option<String>,
    pub output_on_failure: bool,
    pub verbose: bool,
    pub args: Vec<String>,
}

/// `ctest` run from inside the binary directory.
pub fn ctest_command(binary_dir: &Path, opts: &CTestOptions) -> ProcessBuilder {
    let mut cmd = ProcessBuilder::new(find_ctest()).cwd(binary_dir);

    if let Some(configuration) = &opts.configuration {
        cmd = cmd.arg("-C").arg(configuration);
    }
    if let Some(jobs) = opts.jobs {
        cmd = cmd.arg("--parallel").arg(jobs.to_string());
    }
    if let Some(include) = &opts.include {
        cmd = cmd.arg("-R").arg(include);
    }
    if let Some(exclude) = &opts.exclude {
        cmd = cmd.arg("-E").arg(exclude);
    }
    if opts.output_on_failure {
        cmd = cmd.arg("--output-on-failure");
    }
    if opts.verbose {
        cmd = cmd.arg("-V");
    }

    cmd.args(&opts.args)
}

/// The native builder run directly inside the binary directory.
pub fn native_command(
    program: impl AsRef<Path>,
    binary_dir: &Path,
    args: &[String],
) -> ProcessBuilder {
    ProcessBuilder::new(program).cwd(binary_dir).args(args)
}

/// Capture `cmake --help`, the source of the generator catalog.
pub fn help_text() -> Result<String> {
    let output = ProcessBuilder::new(find_cmake()).arg("--help").exec()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("cmake --help failed:\n{}", stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Detect the installed CMake version.
pub fn detect_cmake_version() -> Result<semver::Version> {
    let output = ProcessBuilder::new(find_cmake())
        .arg("--version")
        .exec()
        .context("failed to run cmake --version")?;

    if !output.status.success() {
        bail!("cmake --version failed");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);

    parse_cmake_version(&stdout)
        .ok_or_else(|| anyhow::anyhow!("could not parse cmake version from output: {}", stdout))
}

/// Parse "cmake version 3.20.5" (with optional `-rc1` style suffixes).
pub fn parse_cmake_version(output: &str) -> Option<semver::Version> {
    let line = output
        .lines()
        .find_map(|line| line.trim().strip_prefix("cmake version "))?;

    let clean = line
        .trim()
        .split(|c: char| !c.is_ascii_digit() && c != '.')
        .next()
        .unwrap_or(line);

    if let Ok(v) = clean.parse() {
        return Some(v);
    }

    let mut parts = clean.split('.').map(|p| p.parse::<u64>().ok());
    let major = parts.next().flatten()?;
    let minor = parts.next().flatten().unwrap_or(0);
    let patch = parts.next().flatten().unwrap_or(0);

    Some(semver::Version::new(major, minor, patch))
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &ProcessBuilder) -> Vec<&str> {
        cmd.get_args().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_is_cmake_project() {
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();

        // Not a CMake project initially
        assert!(!is_cmake_project(tmp.path()));

        std::fs::write(
            tmp.path().join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.10)",
        )
        .unwrap();

        assert!(is_cmake_project(tmp.path()));
    }

    #[test]
    fn test_configure_command() {
        let cmd = CMakeBuilder::new("proj", "proj/build")
            .generator(Some("Unix Makefiles".to_string()))
            .build_type("Release")
            .defines(["FOO=1", "BAR:BOOL=ON"])
            .fresh(true)
            .args(["--log-level=DEBUG"])
            .configure_command()
            .unwrap();

        assert_eq!(
            args_of(&cmd),
            [
                "-S",
                "proj",
                "-B",
                "proj/build",
                "-G",
                "Unix Makefiles",
                "-DCMAKE_BUILD_TYPE=Release",
                "-DFOO=1",
                "-DBAR:BOOL=ON",
                "--fresh",
                "--log-level=DEBUG",
            ]
        );
    }

    #[test]
    fn test_configure_rejects_bad_define() {
        let err = CMakeBuilder::new(".", "build")
            .defines(["NOVALUE"])
            .configure_command()
            .unwrap_err();

        assert!(err.to_string().contains("NOVALUE"));
    }

    #[test]
    fn test_validate_define() {
        assert!(validate_define("A=").is_ok());
        assert!(validate_define("A:STRING=x=y").is_ok());
        assert!(validate_define("=1").is_err());
        assert!(validate_define(":BOOL=1").is_err());
        assert!(validate_define("A").is_err());
    }

    #[test]
    fn test_build_command_single_config() {
        let cmd = CMakeBuilder::new(".", "build")
            .build_type("Debug")
            .targets(["app", "lib"])
            .build_command(&[]);

        // No --config and no `--` separator.
        assert_eq!(args_of(&cmd), ["--build", "build", "--target", "app", "lib"]);
    }

    #[test]
    fn test_build_command_multi_config_with_native_flags() {
        let cmd = CMakeBuilder::new(".", "build")
            .build_type("Release")
            .multi_config(true)
            .clean_first(true)
            .build_command(&["-nologo".to_string(), "-verbosity:minimal".to_string()]);

        assert_eq!(
            args_of(&cmd),
            [
                "--build",
                "build",
                "--config",
                "Release",
                "--clean-first",
                "--",
                "-nologo",
                "-verbosity:minimal",
            ]
        );
    }

    #[test]
    fn test_clean_command() {
        let cmd = CMakeBuilder::new(".", "out").clean_command();
        assert_eq!(args_of(&cmd), ["--build", "out", "--target", "clean"]);
    }

    #[test]
    fn test_ctest_command() {
        let opts = CTestOptions {
            configuration: Some("Debug".to_string()),
            jobs: Some(4),
            include: Some("unit".to_string()),
            exclude: None,
            output_on_failure: true,
            verbose: false,
            args: vec!["--timeout".to_string(), "30".to_string()],
        };
        let cmd = ctest_command(Path::new("build"), &opts);

        assert_eq!(cmd.get_cwd(), Some(Path::new("build")));
        assert_eq!(
            args_of(&cmd),
            [
                "-C",
                "Debug",
                "--parallel",
                "4",
                "-R",
                "unit",
                "--output-on-failure",
                "--timeout",
                "30",
            ]
        );
    }

    #[test]
    fn test_native_command() {
        let cmd = native_command("/usr/bin/make", Path::new("build"), &["--jobs=4".to_string()]);
        assert_eq!(cmd.display_command(), "/usr/bin/make --jobs=4");
        assert_eq!(cmd.get_cwd(), Some(Path::new("build")));
    }

    #[test]
    fn test_parse_cmake_version() {
        let out = "cmake version 3.28.1\n\n\
                   CMake suite maintained and supported by Kitware (kitware.com/cmake).\n";
        assert_eq!(parse_cmake_version(out), Some(semver::Version::new(3, 28, 1)));

        assert_eq!(
            parse_cmake_version("cmake version 3.30.0-rc2\n"),
            Some(semver::Version::new(3, 30, 0))
        );
        assert_eq!(
            parse_cmake_version("cmake version 3.5\n"),
            Some(semver::Version::new(3, 5, 0))
        );
        assert_eq!(parse_cmake_version("ninja 1.11"), None);
    }
}
