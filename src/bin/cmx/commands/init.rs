//! `cmx init` command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::InitArgs;
use cmx::ops::{init_project, InitOptions};
use cmx::util::shell::Status;
use cmx::GlobalContext;

/// Determines the project name from the arguments or directory.
pub fn determine_project_name(name: &Option<String>, path: &Path) -> String {
    name.clone().unwrap_or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string()
    })
}

pub fn execute(args: InitArgs, ctx: &GlobalContext) -> Result<()> {
    let path = match args.path {
        Some(path) if path.is_absolute() => path,
        Some(path) => ctx.cwd().join(path),
        None => ctx.cwd().to_path_buf(),
    };

    // `.` and `..` have no usable file name of their own.
    let named_path: PathBuf = path.canonicalize().unwrap_or_else(|_| path.clone());
    let name = determine_project_name(&args.name, &named_path);

    let opts = InitOptions {
        name: name.clone(),
        lib: args.lib,
        lang: args.lang,
        force: args.force,
    };

    let files = init_project(&path, &opts)
        .with_context(|| format!("failed to initialize project in {}", path.display()))?;

    for file in &files {
        tracing::debug!("wrote {}", file.display());
    }

    let kind = if args.lib { "library" } else { "executable" };
    ctx.shell()
        .status(Status::Created, format!("{} `{}` project", kind, name));

    Ok(())
}
