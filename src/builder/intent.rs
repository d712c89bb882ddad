//! Builder-agnostic build intents and their native translations.
//!
//! A [`MakeIntents`] value says what the user wants ("four jobs", "be
//! quiet"). Each [`BuilderFamily`] owns a rule table turning every
//! [`MakeArg`] into the flags its native tool understands.

use std::fmt;

use crate::builder::family::BuilderFamily;

/// An abstract request to the native build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MakeArg {
    Property,
    Jobs,
    Trace,
    Debug,
    Silent,
    Help,
    Version,
}

impl MakeArg {
    /// Translation order used when composing a command line.
    pub const ORDER: [MakeArg; 7] = [
        MakeArg::Property,
        MakeArg::Jobs,
        MakeArg::Trace,
        MakeArg::Debug,
        MakeArg::Silent,
        MakeArg::Help,
        MakeArg::Version,
    ];
}

impl fmt::Display for MakeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MakeArg::Property => "property",
            MakeArg::Jobs => "jobs",
            MakeArg::Trace => "trace",
            MakeArg::Debug => "debug",
            MakeArg::Silent => "silent",
            MakeArg::Help => "help",
            MakeArg::Version => "version",
        };
        f.write_str(name)
    }
}

/// How one intent becomes native flags.
#[derive(Debug, Clone, Copy)]
pub enum TranslationRule {
    /// Fixed tokens, the value is ignored
    Constant(&'static [&'static str]),
    /// Tokens computed from an optional value
    Computed(fn(Option<&str>) -> Vec<String>),
}

impl TranslationRule {
    pub fn apply(&self, value: Option<&str>) -> Vec<String> {
        match self {
            TranslationRule::Constant(tokens) => tokens.iter().map(|t| t.to_string()).collect(),
            TranslationRule::Computed(f) => f(value),
        }
    }
}

/// The flags one intent produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    pub arg: MakeArg,
    pub tokens: Vec<String>,
}

// Recursive make

fn make_property(value: Option<&str>) -> Vec<String> {
    value.map(str::to_string).into_iter().collect()
}

fn make_jobs(value: Option<&str>) -> Vec<String> {
    match value {
        Some(n) => vec![format!("--jobs={}", n)],
        None => vec!["--jobs".to_string()],
    }
}

fn make_debug(value: Option<&str>) -> Vec<String> {
    match value {
        Some(flags) => vec![format!("--debug={}", flags)],
        None => vec!["--debug".to_string()],
    }
}

// MSBuild

fn msbuild_property(value: Option<&str>) -> Vec<String> {
    value.map(|v| format!("-property:{}", v)).into_iter().collect()
}

fn msbuild_jobs(value: Option<&str>) -> Vec<String> {
    match value {
        Some(n) => vec![format!("-maxcpucount:{}", n)],
        None => vec!["-maxcpucount".to_string()],
    }
}

fn msbuild_debug(value: Option<&str>) -> Vec<String> {
    match value {
        None | Some("a") => vec![
            "-verbosity:diagnostic".to_string(),
            "-detailedsummary".to_string(),
        ],
        Some(_) => vec!["-verbosity:detailed".to_string()],
    }
}

// xcodebuild

fn xcode_jobs(value: Option<&str>) -> Vec<String> {
    match value {
        Some(n) => vec!["-jobs".to_string(), n.to_string()],
        None => vec!["-parallelizeTargets".to_string()],
    }
}

impl BuilderFamily {
    /// The translation rule for an intent, if this family has one.
    pub fn rule(self, arg: MakeArg) -> Option<TranslationRule> {
        use TranslationRule::{Computed, Constant};

        match (self, arg) {
            (BuilderFamily::RecursiveMake, MakeArg::Property) => Some(Computed(make_property)),
            (BuilderFamily::RecursiveMake, MakeArg::Jobs) => Some(Computed(make_jobs)),
            (BuilderFamily::RecursiveMake, MakeArg::Trace) => Some(Constant(&["--trace"])),
            (BuilderFamily::RecursiveMake, MakeArg::Debug) => Some(Computed(make_debug)),
            (BuilderFamily::RecursiveMake, MakeArg::Silent) => Some(Constant(&["--silent"])),
            (BuilderFamily::RecursiveMake, MakeArg::Help) => Some(Constant(&["--help"])),
            (BuilderFamily::RecursiveMake, MakeArg::Version) => Some(Constant(&["--version"])),

            (BuilderFamily::ProjectGenerator, MakeArg::Property) => {
                Some(Computed(msbuild_property))
            }
            (BuilderFamily::ProjectGenerator, MakeArg::Jobs) => Some(Computed(msbuild_jobs)),
            (BuilderFamily::ProjectGenerator, MakeArg::Trace) => {
                Some(Constant(&["-verbosity:normal"]))
            }
            (BuilderFamily::ProjectGenerator, MakeArg::Debug) => Some(Computed(msbuild_debug)),
            (BuilderFamily::ProjectGenerator, MakeArg::Silent) => {
                Some(Constant(&["-verbosity:quiet"]))
            }
            (BuilderFamily::ProjectGenerator, MakeArg::Help) => Some(Constant(&["-help"])),
            (BuilderFamily::ProjectGenerator, MakeArg::Version) => Some(Constant(&["-version"])),

            (BuilderFamily::IdeBuild, MakeArg::Jobs) => Some(Computed(xcode_jobs)),
            (BuilderFamily::IdeBuild, MakeArg::Debug) => Some(Constant(&["-verbose"])),
            (BuilderFamily::IdeBuild, MakeArg::Silent) => Some(Constant(&["-quiet"])),
            (BuilderFamily::IdeBuild, MakeArg::Help) => Some(Constant(&["-help"])),
            (BuilderFamily::IdeBuild, MakeArg::Version) => Some(Constant(&["-version"])),
            (BuilderFamily::IdeBuild, MakeArg::Property | MakeArg::Trace) => None,

            // Ninja is recognized but its flags pass through untouched
            (BuilderFamily::Ninja, _) => None,
        }
    }

    /// Translate one intent. Missing rules produce no flags.
    pub fn translate(self, arg: MakeArg, value: Option<&str>) -> Vec<String> {
        self.rule(arg)
            .map(|rule| rule.apply(value))
            .unwrap_or_default()
    }

    /// Family-specific fix-ups applied once all intents are translated.
    pub fn post_process(self, translated: Vec<Translated>) -> Vec<String> {
        for dropped in translated.iter().filter(|t| t.tokens.is_empty()) {
            tracing::debug!("{} has no flag for `{}`, dropped", self, dropped.arg);
        }

        match self {
            BuilderFamily::ProjectGenerator => {
                // Only standalone switches count; grouped tokens are emitted as-is
                let has_verbosity = translated
                    .iter()
                    .filter(|t| t.tokens.len() == 1)
                    .map(|t| t.tokens[0].as_str())
                    .filter(|token| token.starts_with('-'))
                    .any(|token| token.split(':').next() == Some("-verbosity"));

                let mut flags = vec!["-nologo".to_string()];
                if !has_verbosity {
                    flags.push("-verbosity:minimal".to_string());
                }
                flags.extend(translated.into_iter().flat_map(|t| t.tokens));
                flags
            }
            _ => translated.into_iter().flat_map(|t| t.tokens).collect(),
        }
    }
}

/// The intents parsed from user-facing options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MakeIntents {
    /// Properties, in the order given
    pub properties: Vec<String>,
    /// `Some(None)` asks for parallelism without a count
    pub jobs: Option<Option<String>>,
    pub trace: bool,
    /// `Some(None)` asks for debug output without specific flags
    pub debug: Option<Option<String>>,
    pub silent: bool,
    pub help: bool,
    pub version: bool,
}

impl MakeIntents {
    /// Flatten into `(intent, value)` pairs in translation order.
    pub fn requested(&self) -> Vec<(MakeArg, Option<&str>)> {
        let mut requested = Vec::new();

        for arg in MakeArg::ORDER {
            match arg {
                MakeArg::Property => {
                    for property in &self.properties {
                        requested.push((arg, Some(property.as_str())));
                    }
                }
                MakeArg::Jobs => {
                    if let Some(jobs) = &self.jobs {
                        requested.push((arg, jobs.as_deref()));
                    }
                }
                MakeArg::Debug => {
                    if let Some(debug) = &self.debug {
                        requested.push((arg, debug.as_deref()));
                    }
                }
                MakeArg::Trace if self.trace => requested.push((arg, None)),
                MakeArg::Silent if self.silent => requested.push((arg, None)),
                MakeArg::Help if self.help => requested.push((arg, None)),
                MakeArg::Version if self.version => requested.push((arg, None)),
                _ => {}
            }
        }

        requested
    }

    pub fn is_empty(&self) -> bool {
        self.requested().is_empty()
    }
}

/// Compose the native argument vector.
///
/// Intents are translated in [`MakeArg::ORDER`], post-processed by the family,
/// and followed by the user's pass-through tokens. Without a family only the
/// pass-through tokens remain.
pub fn native_flags(
    family: Option<BuilderFamily>,
    intents: &MakeIntents,
    passthrough: &[String],
) -> Vec<String> {
    let mut flags = match family {
        Some(family) => {
            let translated = intents
                .requested()
                .into_iter()
                .map(|(arg, value)| Translated {
                    arg,
                    tokens: family.translate(arg, value),
                })
                .collect();
            family.post_process(translated)
        }
        None => {
            if !intents.is_empty() {
                tracing::debug!("builder family unknown, dropping build intents");
            }
            Vec::new()
        }
    };

    flags.extend(passthrough.iter().cloned());
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs(n: Option<&str>) -> MakeIntents {
        MakeIntents {
            jobs: Some(n.map(str::to_string)),
            ..Default::default()
        }
    }

    #[test]
    fn test_make_jobs_and_silent() {
        let intents = MakeIntents {
            jobs: Some(Some("4".to_string())),
            silent: true,
            ..Default::default()
        };
        let flags = native_flags(Some(BuilderFamily::RecursiveMake), &intents, &[]);
        assert_eq!(flags, vec!["--jobs=4", "--silent"]);
    }

    #[test]
    fn test_make_rules_without_value() {
        let make = BuilderFamily::RecursiveMake;
        assert_eq!(make.translate(MakeArg::Jobs, None), vec!["--jobs"]);
        assert_eq!(make.translate(MakeArg::Debug, None), vec!["--debug"]);
        assert_eq!(make.translate(MakeArg::Debug, Some("bv")), vec!["--debug=bv"]);
        assert_eq!(make.translate(MakeArg::Trace, Some("ignored")), vec!["--trace"]);
        assert!(make.translate(MakeArg::Property, None).is_empty());
        assert_eq!(make.translate(MakeArg::Property, Some("CC=clang")), vec!["CC=clang"]);
    }

    #[test]
    fn test_msbuild_jobs_and_debug() {
        let intents = MakeIntents {
            jobs: Some(None),
            debug: Some(None),
            ..Default::default()
        };
        let flags = native_flags(Some(BuilderFamily::ProjectGenerator), &intents, &[]);
        assert_eq!(
            flags,
            vec![
                "-nologo",
                "-verbosity:minimal",
                "-maxcpucount",
                "-verbosity:diagnostic",
                "-detailedsummary",
            ]
        );
    }

    #[test]
    fn test_msbuild_debug_flags() {
        let msbuild = BuilderFamily::ProjectGenerator;
        assert_eq!(
            msbuild.translate(MakeArg::Debug, Some("a")),
            vec!["-verbosity:diagnostic", "-detailedsummary"]
        );
        assert_eq!(msbuild.translate(MakeArg::Debug, Some("v")), vec!["-verbosity:detailed"]);
    }

    #[test]
    fn test_msbuild_explicit_verbosity_suppresses_default() {
        let intents = MakeIntents {
            silent: true,
            ..Default::default()
        };
        let flags = native_flags(Some(BuilderFamily::ProjectGenerator), &intents, &[]);
        assert_eq!(flags, vec!["-nologo", "-verbosity:quiet"]);

        let intents = MakeIntents {
            trace: true,
            debug: Some(Some("x".to_string())),
            ..Default::default()
        };
        let flags = native_flags(Some(BuilderFamily::ProjectGenerator), &intents, &[]);
        assert_eq!(flags, vec!["-nologo", "-verbosity:normal", "-verbosity:detailed"]);
    }

    #[test]
    fn test_msbuild_nologo_always_first() {
        let flags =
            native_flags(Some(BuilderFamily::ProjectGenerator), &MakeIntents::default(), &[]);
        assert_eq!(flags, vec!["-nologo", "-verbosity:minimal"]);
    }

    #[test]
    fn test_msbuild_property() {
        let intents = MakeIntents {
            properties: vec!["Configuration=Release".to_string(), "Platform=x64".to_string()],
            ..Default::default()
        };
        let flags = native_flags(Some(BuilderFamily::ProjectGenerator), &intents, &[]);
        assert_eq!(
            flags,
            vec![
                "-nologo",
                "-verbosity:minimal",
                "-property:Configuration=Release",
                "-property:Platform=x64",
            ]
        );
    }

    #[test]
    fn test_xcode_jobs_two_tokens() {
        let flags = native_flags(Some(BuilderFamily::IdeBuild), &jobs(Some("8")), &[]);
        assert_eq!(flags, vec!["-jobs", "8"]);

        let flags = native_flags(Some(BuilderFamily::IdeBuild), &jobs(None), &[]);
        assert_eq!(flags, vec!["-parallelizeTargets"]);
    }

    #[test]
    fn test_xcode_has_no_property_or_trace() {
        let intents = MakeIntents {
            properties: vec!["A=1".to_string()],
            trace: true,
            silent: true,
            ..Default::default()
        };
        let flags = native_flags(Some(BuilderFamily::IdeBuild), &intents, &[]);
        assert_eq!(flags, vec!["-quiet"]);
    }

    #[test]
    fn test_ninja_passes_through() {
        let intents = MakeIntents {
            jobs: Some(Some("4".to_string())),
            trace: true,
            ..Default::default()
        };
        let passthrough = vec!["-k".to_string(), "0".to_string()];
        let flags = native_flags(Some(BuilderFamily::Ninja), &intents, &passthrough);
        assert_eq!(flags, vec!["-k", "0"]);
    }

    #[test]
    fn test_unknown_family_keeps_passthrough() {
        let passthrough = vec!["VERBOSE=1".to_string()];
        let flags = native_flags(None, &jobs(Some("2")), &passthrough);
        assert_eq!(flags, vec!["VERBOSE=1"]);
    }

    #[test]
    fn test_passthrough_after_post_processing() {
        let passthrough = vec!["-v:d".to_string()];
        let flags = native_flags(
            Some(BuilderFamily::ProjectGenerator),
            &MakeIntents::default(),
            &passthrough,
        );
        assert_eq!(flags, vec!["-nologo", "-verbosity:minimal", "-v:d"]);
    }

    #[test]
    fn test_requested_order_is_fixed() {
        let intents = MakeIntents {
            properties: vec!["A=1".to_string()],
            jobs: Some(Some("3".to_string())),
            trace: true,
            debug: Some(None),
            silent: true,
            help: true,
            version: true,
        };
        let order: Vec<_> = intents.requested().into_iter().map(|(arg, _)| arg).collect();
        assert_eq!(order, MakeArg::ORDER.to_vec());

        let flags = native_flags(Some(BuilderFamily::RecursiveMake), &intents, &[]);
        assert_eq!(
            flags,
            vec!["A=1", "--jobs=3", "--trace", "--debug", "--silent", "--help", "--version"]
        );
    }
}
