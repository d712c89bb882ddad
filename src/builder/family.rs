//! Native builder families.
//!
//! CMake generators fall into a handful of families that share a command-line
//! dialect. The family is derived from the generator recorded in the cache.

use std::fmt;

/// A family of native build tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderFamily {
    /// GNU make and friends (`Unix Makefiles`, `MinGW Makefiles`, ...)
    RecursiveMake,
    /// `Ninja` and `Ninja Multi-Config`
    Ninja,
    /// Visual Studio solutions driven by MSBuild
    ProjectGenerator,
    /// Xcode projects driven by `xcodebuild`
    IdeBuild,
}

impl BuilderFamily {
    /// Substrings checked in order; the first hit decides.
    const CLASSIFIERS: &'static [(&'static str, BuilderFamily)] = &[
        ("Makefile", BuilderFamily::RecursiveMake),
        ("Ninja", BuilderFamily::Ninja),
        ("Visual Studio", BuilderFamily::ProjectGenerator),
        ("Xcode", BuilderFamily::IdeBuild),
    ];

    /// Classify a generator name. Unknown generators yield `None`.
    pub fn classify(generator: &str) -> Option<BuilderFamily> {
        Self::CLASSIFIERS
            .iter()
            .find(|(needle, _)| generator.contains(needle))
            .map(|(_, family)| *family)
    }

    /// Whether the build configuration is picked at build time.
    pub fn is_multi_config(self) -> bool {
        matches!(self, BuilderFamily::ProjectGenerator | BuilderFamily::IdeBuild)
    }

    /// Program used when the cache does not name one.
    pub fn default_program(self) -> &'static str {
        match self {
            BuilderFamily::RecursiveMake => "make",
            BuilderFamily::Ninja => "ninja",
            BuilderFamily::ProjectGenerator => "msbuild",
            BuilderFamily::IdeBuild => "xcodebuild",
        }
    }

    /// Native arguments selecting a build configuration when the native tool
    /// is invoked directly.
    pub fn configuration_flags(self, build_type: &str) -> Vec<String> {
        match self {
            BuilderFamily::ProjectGenerator => {
                vec![format!("-property:Configuration={}", build_type)]
            }
            BuilderFamily::IdeBuild => vec!["-configuration".to_string(), build_type.to_string()],
            BuilderFamily::RecursiveMake | BuilderFamily::Ninja => Vec::new(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuilderFamily::RecursiveMake => "make",
            BuilderFamily::Ninja => "ninja",
            BuilderFamily::ProjectGenerator => "msbuild",
            BuilderFamily::IdeBuild => "xcode",
        }
    }
}

impl fmt::Display for BuilderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a configured generator selects its configuration at build time.
pub fn is_multi_config(generator: &str) -> bool {
    generator.contains("Multi-Config")
        || BuilderFamily::classify(generator).is_some_and(BuilderFamily::is_multi_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_generators() {
        assert_eq!(BuilderFamily::classify("Unix Makefiles"), Some(BuilderFamily::RecursiveMake));
        assert_eq!(BuilderFamily::classify("Ninja"), Some(BuilderFamily::Ninja));
        assert_eq!(
            BuilderFamily::classify("Visual Studio 17 2022"),
            Some(BuilderFamily::ProjectGenerator)
        );
        assert_eq!(BuilderFamily::classify("Xcode"), Some(BuilderFamily::IdeBuild));
    }

    #[test]
    fn test_classify_multi_config_ninja() {
        assert_eq!(BuilderFamily::classify("Ninja Multi-Config"), Some(BuilderFamily::Ninja));
    }

    #[test]
    fn test_classify_priority_order() {
        // Extra generators name two tools; the first classifier wins
        assert_eq!(
            BuilderFamily::classify("CodeBlocks - Unix Makefiles"),
            Some(BuilderFamily::RecursiveMake)
        );
        assert_eq!(
            BuilderFamily::classify("Ninja Makefiles for Visual Studio"),
            Some(BuilderFamily::RecursiveMake)
        );
        assert_eq!(
            BuilderFamily::classify("Sublime Text 2 - Ninja"),
            Some(BuilderFamily::Ninja)
        );
        assert_eq!(
            BuilderFamily::classify("Visual Studio with Xcode"),
            Some(BuilderFamily::ProjectGenerator)
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(BuilderFamily::classify("Green Hills MULTI"), None);
        assert_eq!(BuilderFamily::classify(""), None);
    }

    #[test]
    fn test_multi_config() {
        assert!(is_multi_config("Visual Studio 17 2022"));
        assert!(is_multi_config("Xcode"));
        assert!(is_multi_config("Ninja Multi-Config"));
        assert!(!is_multi_config("Ninja"));
        assert!(!is_multi_config("Unix Makefiles"));
        assert!(!is_multi_config("Green Hills MULTI"));
    }

    #[test]
    fn test_configuration_flags() {
        assert_eq!(
            BuilderFamily::ProjectGenerator.configuration_flags("Release"),
            vec!["-property:Configuration=Release"]
        );
        assert_eq!(
            BuilderFamily::IdeBuild.configuration_flags("Debug"),
            vec!["-configuration", "Debug"]
        );
        assert!(BuilderFamily::Ninja.configuration_flags("Debug").is_empty());
    }
}
