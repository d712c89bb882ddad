//! Reader for the persisted CMake configuration cache (`CMakeCache.txt`).
//!
//! Each meaningful line has the form `NAME[:TYPE]=VALUE`. Lines starting with
//! `#` or `//` are comments. The cache is read once per session and never
//! written back.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// File name CMake uses for its cache inside a binary directory.
pub const CACHE_FILE_NAME: &str = "CMakeCache.txt";

/// A single configuration fact from the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub name: String,
    /// Advisory type tag (`STRING`, `BOOL`, `INTERNAL`, ...)
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub value: String,
}

impl CacheEntry {
    /// Parse one cache line.
    ///
    /// Returns `None` for blank lines, comments, and lines without `=`.
    pub fn parse_line(line: &str) -> Option<CacheEntry> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            return None;
        }

        let (key, value) = line.split_once('=')?;
        let (name, value_type) = match key.split_once(':') {
            Some((name, ty)) => (name.trim(), Some(ty.trim().to_string())),
            None => (key.trim(), None),
        };

        Some(CacheEntry {
            name: name.to_string(),
            value_type,
            value: value.trim().to_string(),
        })
    }
}

/// Parsed contents of a cache file at one point in time.
///
/// An empty snapshot means "not configured yet"; callers cannot and should
/// not tell the two apart.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheSnapshot {
    /// Parse cache text.
    pub fn parse(contents: &str) -> Self {
        let mut entries = BTreeMap::new();

        for (lineno, line) in contents.lines().enumerate() {
            match CacheEntry::parse_line(line) {
                Some(entry) => {
                    entries.insert(entry.name.clone(), entry);
                }
                None => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty()
                        && !trimmed.starts_with('#')
                        && !trimmed.starts_with("//")
                    {
                        tracing::debug!(
                            "skipping malformed cache line {}: {}",
                            lineno + 1,
                            trimmed
                        );
                    }
                }
            }
        }

        CacheSnapshot { entries }
    }

    /// Read a cache file. A missing file yields an empty snapshot.
    pub fn read(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let snapshot = Self::parse(&contents);
                tracing::debug!(
                    "read {} cache entries from {}",
                    snapshot.len(),
                    path.display()
                );
                Ok(snapshot)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no cache at {}", path.display());
                Ok(Self::default())
            }
            Err(e) => {
                Err(e).with_context(|| format!("failed to read cache file: {}", path.display()))
            }
        }
    }

    /// Read the cache inside a binary directory.
    pub fn read_dir(binary_dir: &Path) -> Result<Self> {
        Self::read(&binary_dir.join(CACHE_FILE_NAME))
    }

    /// Look up a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.value.as_str())
    }

    /// Look up a full entry, type tag included.
    pub fn entry(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    /// The generator this build was configured with.
    pub fn generator(&self) -> Option<&str> {
        self.get("CMAKE_GENERATOR")
            .or_else(|| self.get("GENERATOR"))
            .filter(|g| !g.is_empty())
    }

    /// CMake version recorded when the cache was written.
    pub fn cmake_version(&self) -> Option<semver::Version> {
        let part = |name: &str| self.get(name).and_then(|v| v.parse::<u64>().ok());
        Some(semver::Version::new(
            part("CMAKE_CACHE_MAJOR_VERSION")?,
            part("CMAKE_CACHE_MINOR_VERSION")?,
            part("CMAKE_CACHE_PATCH_VERSION").unwrap_or(0),
        ))
    }
}
