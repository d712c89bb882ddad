//! Implementation of `cmx status` and `cmx show`.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;

use crate::builder::cmake::detect_cmake_version;
use crate::builder::family::BuilderFamily;
use crate::core::cache::CacheEntry;
use crate::ops::cmx_build::make_program;
use crate::ops::session::Session;
use crate::util::errors::is_interrupted;

/// Snapshot of the project's build state.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub source_dir: PathBuf,
    pub binary_dir: PathBuf,
    pub configured: bool,
    pub generator: Option<String>,
    pub family: Option<BuilderFamily>,
    pub multi_config: bool,
    pub build_type: String,
    pub make_program: Option<PathBuf>,
    /// CMake that wrote the cache
    pub cache_version: Option<semver::Version>,
    /// CMake found on PATH
    pub cmake_version: Option<semver::Version>,
}

/// Gather the status report.
pub fn status(session: &Session<'_>) -> Result<StatusReport> {
    let ctx = session.ctx();
    let snapshot = session.snapshot()?;
    let configured = !snapshot.is_empty();

    let build_type = snapshot
        .get("CMAKE_BUILD_TYPE")
        .filter(|t| !t.is_empty())
        .unwrap_or(ctx.build_type())
        .to_string();

    let make_program = if configured {
        Some(make_program(session)?)
    } else {
        None
    };

    let cmake_version = match detect_cmake_version() {
        Ok(version) => Some(version),
        Err(e) if is_interrupted(&e) => return Err(e),
        Err(e) => {
            tracing::debug!("cmake version unavailable: {:#}", e);
            None
        }
    };

    Ok(StatusReport {
        source_dir: ctx.source_dir().to_path_buf(),
        binary_dir: ctx.binary_dir().to_path_buf(),
        configured,
        generator: session.generator()?.map(str::to_string),
        family: session.family()?,
        multi_config: session.is_multi_config()?,
        build_type,
        make_program,
        cache_version: snapshot.cmake_version(),
        cmake_version,
    })
}

/// Format a status report for display.
pub fn format_report(report: &StatusReport) -> String {
    fn or_none<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| "(none)".to_string(), |v| v.to_string())
    }

    let mut out = String::new();
    let _ = writeln!(out, "source dir:    {}", report.source_dir.display());
    let _ = writeln!(out, "binary dir:    {}", report.binary_dir.display());
    let _ = writeln!(out, "configured:    {}", if report.configured { "yes" } else { "no" });
    let _ = writeln!(out, "generator:     {}", or_none(report.generator.as_deref()));
    let _ = writeln!(out, "builder:       {}", or_none(report.family));
    let _ = writeln!(out, "multi-config:  {}", if report.multi_config { "yes" } else { "no" });
    let _ = writeln!(out, "build type:    {}", report.build_type);
    let _ = writeln!(
        out,
        "make program:  {}",
        or_none(report.make_program.as_ref().map(|p| p.display()))
    );
    let _ = writeln!(out, "cache cmake:   {}", or_none(report.cache_version.as_ref()));
    let _ = writeln!(out, "cmake:         {}", or_none(report.cmake_version.as_ref()));
    out
}

/// Cache entries whose name contains `pattern` (case-insensitive).
pub fn cache_entries(session: &Session<'_>, pattern: Option<&str>) -> Result<Vec<CacheEntry>> {
    let pattern = pattern.map(str::to_lowercase);
    Ok(session
        .snapshot()?
        .iter()
        .filter(|entry| match &pattern {
            Some(p) => entry.name.to_lowercase().contains(p.as_str()),
            None => true,
        })
        .cloned()
        .collect())
}

/// `NAME=VALUE`, or `NAME:TYPE=VALUE` with types.
pub fn format_entry(entry: &CacheEntry, with_type: bool) -> String {
    match (&entry.value_type, with_type) {
        (Some(ty), true) => format!("{}:{}={}", entry.name, ty, entry.value),
        _ => format!("{}={}", entry.name, entry.value),
    }
}
