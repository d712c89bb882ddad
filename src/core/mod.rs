//! Core data structures for cmx.
//!
//! This module contains the pieces everything else reads from:
//! - The persisted configuration cache (`CMakeCache.txt`)
//! - The generator catalog parsed from `cmake --help`
//! - The fuzzy matcher shared by generator and command-name lookup

pub mod cache;
pub mod fuzzy;
pub mod generator;

pub use cache::{CacheEntry, CacheSnapshot};
pub use fuzzy::fuzzy_match;
pub use generator::{GeneratorCatalog, GeneratorDescriptor};
