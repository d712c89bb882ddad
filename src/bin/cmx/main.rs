//! cmx CLI - one front-end for CMake, CTest and the native builder

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use cmx::util::context::{ContextOptions, GlobalContext};
use cmx::util::errors::{exit_code, exit_code_for};
use cmx::util::interrupt;
use cmx::util::shell::Shell;

fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("internal error: {}", info);
        std::process::exit(exit_code::INTERNAL);
    }));

    // Usage errors exit with 2, `--help` and `--version` with 0.
    let cli = Cli::try_parse().unwrap_or_else(|e| e.exit());

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);
    init_logging(&cli, shell.use_color());

    if let Err(e) = interrupt::install() {
        tracing::warn!("could not install Ctrl-C handler: {}", e);
    }

    let code = match run(cli, shell) {
        // A tool that ignored Ctrl-C and exited cleanly still ends the run.
        Ok(()) if interrupt::is_interrupted() => exit_code::INTERRUPTED,
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(code);
}

fn init_logging(cli: &Cli, ansi: bool) {
    let default = if cli.verbose {
        "cmx=debug"
    } else if cli.quiet {
        "cmx=error"
    } else {
        "cmx=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli, shell: Shell) -> Result<()> {
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let generator = match &cli.command {
        Commands::Cmake(args) => args.generator.clone(),
        _ => None,
    };
    let opts = ContextOptions {
        source_dir: cli.source_dir,
        binary_dir: cli.build_dir,
        build_type: cli.build_type,
        generator,
        dry_run: cli.dry_run,
    };
    let ctx = GlobalContext::new(opts, shell)?;

    match cli.command {
        Commands::Init(args) => commands::init::execute(args, &ctx),
        Commands::Cmake(args) => commands::cmake::execute(args, &ctx),
        Commands::Build(args) => commands::build::execute(args, &ctx),
        Commands::Make(args) => commands::make::execute(args, &ctx),
        Commands::Test(args) => commands::test::execute(args, &ctx),
        Commands::Clean(args) => commands::clean::execute(args, &ctx),
        Commands::Status => commands::status::execute(&ctx),
        Commands::Show(args) => commands::show::execute(args, &ctx),
        Commands::Help(args) => commands::help::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
