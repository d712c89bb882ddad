//! CMake generator catalog.
//!
//! Parsed from the `Generators` section of `cmake --help`:
//!
//! ```text
//! Generators
//!
//! The following generators are available on this platform (* marks default):
//!   Visual Studio 17 2022        = Generates Visual Studio 2022 project files.
//!                                  Use -A option to specify architecture.
//!   Visual Studio 14 2015 [arch] = Generates Visual Studio 2015 project files.
//!                                  Optional [arch] can be "Win64" or "ARM".
//! * Unix Makefiles               = Generates standard UNIX makefiles.
//!   CodeBlocks - Unix Makefiles
//!                                = Generates CodeBlocks project files.
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::core::fuzzy::fuzzy_match;

/// `name [bracket]` on the left side of an entry.
static BRACKETED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\[[^\]]*\]\s*$").expect("valid regex"));

/// A double-quoted token inside an entry.
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));

/// An ordinal selection such as `2` or `3 win64`.
static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*(\w*)$").expect("valid regex"));

/// One generator known to CMake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDescriptor {
    pub name: String,
    /// Optional qualifiers (platform or toolset) appended to the name
    pub sub_choices: Vec<String>,
    pub help: String,
    /// Marked with `*` by CMake
    pub is_default: bool,
}

impl GeneratorDescriptor {
    /// The name plus every `"<name> <choice>"` variant.
    pub fn expanded_names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.name.clone()).chain(
            self.sub_choices
                .iter()
                .map(move |choice| format!("{} {}", self.name, choice)),
        )
    }
}

/// Ordered list of generators, as CMake printed them.
#[derive(Debug, Clone, Default)]
pub struct GeneratorCatalog {
    generators: Vec<GeneratorDescriptor>,
}

/// An entry being accumulated across continuation lines.
struct PendingEntry {
    indent: usize,
    text: String,
    is_default: bool,
}

impl GeneratorCatalog {
    /// Build a catalog from already-parsed descriptors.
    pub fn new(generators: Vec<GeneratorDescriptor>) -> Self {
        GeneratorCatalog { generators }
    }

    /// Parse `cmake --help` output.
    pub fn parse(help_text: &str) -> Self {
        let mut pending: Vec<PendingEntry> = Vec::new();
        let mut in_block = false;

        for line in help_text.lines() {
            let trimmed = line.trim();

            if !in_block {
                in_block = trimmed.starts_with("Generators");
                continue;
            }

            if trimmed.is_empty() || trimmed.ends_with(':') {
                continue;
            }

            let indent = line
                .chars()
                .take_while(|c| c.is_whitespace() || *c == '*')
                .count();

            if let Some(current) = pending.last_mut() {
                let deeper = indent > current.indent;
                if deeper && (!trimmed.contains('=') || !current.text.contains('=')) {
                    current.text.push(' ');
                    current.text.push_str(trimmed);
                    continue;
                }
            }

            let is_default = trimmed.starts_with('*');
            let text = trimmed.trim_start_matches('*').trim_start().to_string();
            pending.push(PendingEntry {
                indent,
                text,
                is_default,
            });
        }

        let generators: Vec<_> = pending
            .into_iter()
            .filter_map(|entry| Self::parse_entry(&entry.text, entry.is_default))
            .collect();

        tracing::debug!("parsed {} generators from cmake --help", generators.len());

        GeneratorCatalog { generators }
    }

    fn parse_entry(text: &str, is_default: bool) -> Option<GeneratorDescriptor> {
        let (left, help) = text.split_once('=')?;
        let left = left.trim();

        let (name, sub_choices) = match BRACKETED_NAME.captures(left) {
            Some(caps) => {
                let mut choices: Vec<String> = Vec::new();
                for quoted in QUOTED.captures_iter(text) {
                    let choice = quoted[1].trim().to_string();
                    if !choice.is_empty() && !choices.contains(&choice) {
                        choices.push(choice);
                    }
                }
                (caps[1].trim().to_string(), choices)
            }
            None => (left.to_string(), Vec::new()),
        };

        if name.is_empty() {
            return None;
        }

        Some(GeneratorDescriptor {
            name,
            sub_choices,
            help: help.trim().to_string(),
            is_default,
        })
    }

    pub fn generators(&self) -> &[GeneratorDescriptor] {
        &self.generators
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Look up a generator by its 1-based position.
    pub fn by_ordinal(&self, ordinal: usize) -> Option<&GeneratorDescriptor> {
        ordinal.checked_sub(1).and_then(|i| self.generators.get(i))
    }

    /// The generator CMake marked as default, if any.
    pub fn default_generator(&self) -> Option<&GeneratorDescriptor> {
        self.generators.iter().find(|g| g.is_default)
    }

    /// Every generator name plus its `"<name> <choice>"` variants, in order.
    pub fn expanded_names(&self) -> Vec<String> {
        self.generators
            .iter()
            .flat_map(|g| g.expanded_names())
            .collect()
    }

    /// Resolve user input to a generator name.
    ///
    /// Never fails: input that matches nothing is returned unchanged so that
    /// CMake can report the real error.
    pub fn resolve(&self, input: &str) -> String {
        let expanded = self.expanded_names();

        if expanded.iter().any(|name| name == input) {
            return input.to_string();
        }

        if let Some(caps) = ORDINAL.captures(input) {
            let selected = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|n| self.by_ordinal(n));

            if let Some(generator) = selected {
                let word = &caps[2];
                if !word.is_empty() {
                    if let Some(choice) = fuzzy_match(&generator.sub_choices, word) {
                        return format!("{} {}", generator.name, choice);
                    }
                }
                return generator.name.clone();
            }
        }

        match fuzzy_match(&expanded, input) {
            Some(name) => {
                tracing::debug!("generator `{}` resolved to `{}`", input, name);
                name.to_string()
            }
            None => {
                tracing::debug!("generator `{}` matched nothing, passing through", input);
                input.to_string()
            }
        }
    }
}
