//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cmx::builder::intent::MakeIntents;
use cmx::ops::Lang;
use cmx::util::shell::ColorChoice;

/// cmx - one front-end for CMake, CTest and whatever builder they drive
#[derive(Parser)]
#[command(name = "cmx")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Use verbose output (echo every command before running it)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Project source directory (defaults to the current directory)
    #[arg(short = 'S', long, global = true, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Binary directory (defaults to `build` under the source directory)
    #[arg(short = 'B', long, global = true, value_name = "DIR", env = "CMX_BUILD_DIR")]
    pub build_dir: Option<PathBuf>,

    /// Build type: Debug, Release, RelWithDebInfo, MinSizeRel
    #[arg(long, global = true, value_name = "TYPE", env = "CMX_BUILD_TYPE")]
    pub build_type: Option<String>,

    /// Print the commands that would run instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new CMake project
    Init(InitArgs),

    /// Configure the binary directory
    Cmake(CmakeArgs),

    /// Build through `cmake --build`
    Build(BuildArgs),

    /// Run the native builder directly
    Make(MakeArgs),

    /// Build, then run tests with CTest
    Test(TestArgs),

    /// Remove build outputs
    Clean(CleanArgs),

    /// Show the state of the binary directory
    Status,

    /// Print CMake cache entries
    Show(ShowArgs),

    /// Print help for cmx, a command, or the available generators
    Help(HelpArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Create a library instead of an executable
    #[arg(long)]
    pub lib: bool,

    /// Source language: c or cxx
    #[arg(long, default_value = "cxx")]
    pub lang: Lang,

    /// Overwrite an existing CMakeLists.txt
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CmakeArgs {
    /// Generator name, number from `cmx help --generators`, or abbreviation
    #[arg(short = 'G', long, value_name = "GENERATOR", env = "CMX_GENERATOR")]
    pub generator: Option<String>,

    /// Create or update a cache entry (VAR=VALUE or VAR:TYPE=VALUE)
    #[arg(short = 'D', value_name = "VAR=VALUE")]
    pub define: Vec<String>,

    /// Discard the existing cache and configure from scratch
    #[arg(long)]
    pub fresh: bool,

    /// Extra arguments passed to cmake
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Builder-agnostic options translated for the native builder.
#[derive(Args, Debug, Clone, Default)]
pub struct NativeArgs {
    /// Run N jobs in parallel; without N, let the builder decide
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<Option<String>>,

    /// Show every command the builder runs
    #[arg(long)]
    pub trace: bool,

    /// Print debugging information, optionally with builder-specific FLAGS
    #[arg(long, value_name = "FLAGS", require_equals = true)]
    pub debug: Option<Option<String>>,

    /// Only print errors from the builder
    #[arg(short, long)]
    pub silent: bool,

    /// Builder property, e.g. `Platform=x64` for MSBuild (repeatable)
    #[arg(short, long = "property", value_name = "PROP")]
    pub properties: Vec<String>,

    /// Arguments passed to the native builder unchanged
    #[arg(last = true)]
    pub native: Vec<String>,
}

impl NativeArgs {
    pub fn intents(&self) -> MakeIntents {
        MakeIntents {
            properties: self.properties.clone(),
            jobs: self.jobs.clone(),
            trace: self.trace,
            debug: self.debug.clone(),
            silent: self.silent,
            help: false,
            version: false,
        }
    }
}

#[derive(Args)]
pub struct BuildArgs {
    /// Targets to build (defaults to all)
    pub targets: Vec<String>,

    #[command(flatten)]
    pub native: NativeArgs,

    /// Build the clean target first
    #[arg(long)]
    pub clean_first: bool,
}

#[derive(Args)]
pub struct MakeArgs {
    /// Targets to build (defaults to the builder's default)
    pub targets: Vec<String>,

    #[command(flatten)]
    pub native: NativeArgs,

    /// Show the native builder's own help
    #[arg(long)]
    pub native_help: bool,

    /// Show the native builder's version
    #[arg(long)]
    pub native_version: bool,
}

#[derive(Args)]
pub struct TestArgs {
    /// Run N tests in parallel
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Run only tests matching REGEX
    #[arg(short = 'R', long, value_name = "REGEX")]
    pub tests_regex: Option<String>,

    /// Skip tests matching REGEX
    #[arg(short = 'E', long, value_name = "REGEX")]
    pub exclude_regex: Option<String>,

    /// Print the output of failing tests
    #[arg(long)]
    pub output_on_failure: bool,

    /// Let ctest print every test's output
    #[arg(short = 'V', long)]
    pub ctest_verbose: bool,

    /// Do not build before testing
    #[arg(long)]
    pub no_build: bool,

    /// Extra arguments passed to ctest
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Remove the whole binary directory
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Only entries whose name contains PATTERN (case-insensitive)
    pub pattern: Option<String>,

    /// Include the type of each entry
    #[arg(long)]
    pub types: bool,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct HelpArgs {
    /// Command to describe; abbreviations are accepted
    pub command: Option<String>,

    /// List the generators known to the installed CMake
    #[arg(long, conflicts_with = "command")]
    pub generators: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
