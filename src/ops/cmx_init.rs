//! Implementation of `cmx init`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::builder::cmake::is_cmake_project;
use crate::util::config::DEFAULT_BINARY_DIR;
use crate::util::errors::CmxError;
use crate::util::fs::{ensure_dir, write_string};

/// Source language of a scaffolded project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    C,
    #[default]
    Cxx,
}

impl Lang {
    /// Language name in `project(... LANGUAGES ...)`.
    fn cmake_name(self) -> &'static str {
        match self {
            Lang::C => "C",
            Lang::Cxx => "CXX",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Lang::C => "c",
            Lang::Cxx => "cpp",
        }
    }

    fn standard(self) -> u32 {
        match self {
            Lang::C => 11,
            Lang::Cxx => 17,
        }
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" => Ok(Lang::C),
            "cxx" | "c++" | "cpp" => Ok(Lang::Cxx),
            _ => Err(format!("unknown language '{}'; expected 'c' or 'cxx'", s)),
        }
    }
}

/// Options for creating a new project.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Project name
    pub name: String,

    /// Create a library project
    pub lib: bool,

    pub lang: Lang,

    /// Overwrite an existing CMakeLists.txt
    pub force: bool,
}

/// Validate a project name for use as a CMake target.
pub fn validate_project_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("project name cannot be empty");
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err("project name must start with a letter");
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("project name contains invalid characters");
    }

    Ok(())
}

/// Scaffold a CMake project in `path`. Returns the files written.
pub fn init_project(path: &Path, opts: &InitOptions) -> Result<Vec<PathBuf>> {
    if let Err(msg) = validate_project_name(&opts.name) {
        bail!("invalid project name `{}`: {}", opts.name, msg);
    }

    if is_cmake_project(path) && !opts.force {
        return Err(CmxError::ProjectExists {
            path: path.join("CMakeLists.txt"),
        }
        .into());
    }

    ensure_dir(path)?;

    let ext = opts.lang.extension();
    let symbol = opts.name.replace('-', "_");
    let mut files = Vec::new();

    let mut write = |relative: String, contents: String| -> Result<()> {
        let file = path.join(relative);
        write_string(&file, &contents)?;
        files.push(file);
        Ok(())
    };

    write("CMakeLists.txt".to_string(), cmakelists(opts, &symbol))?;

    if opts.lib {
        write(format!("include/{}.h", symbol), header(&symbol))?;
        write(format!("src/{}.{}", symbol, ext), lib_source(&symbol))?;
        write(format!("tests/{}_test.{}", symbol, ext), lib_test(opts.lang, &symbol))?;
    } else {
        write(format!("src/main.{}", ext), main_source(opts.lang, &opts.name))?;
        write(format!("tests/{}_test.{}", symbol, ext), smoke_test())?;
    }

    write(".gitignore".to_string(), format!("/{}/\n", DEFAULT_BINARY_DIR))?;

    Ok(files)
}

fn cmakelists(opts: &InitOptions, symbol: &str) -> String {
    let lang = opts.lang.cmake_name();
    let ext = opts.lang.extension();
    let name = &opts.name;

    let mut out = format!(
        r#"cmake_minimum_required(VERSION 3.16)
project({name} LANGUAGES {lang})

set(CMAKE_{lang}_STANDARD {std})
set(CMAKE_{lang}_STANDARD_REQUIRED ON)

enable_testing()

"#,
        std = opts.lang.standard(),
    );

    if opts.lib {
        out.push_str(&format!(
            r#"add_library({name} src/{symbol}.{ext})
target_include_directories({name} PUBLIC include)

add_executable({name}_test tests/{symbol}_test.{ext})
target_link_libraries({name}_test PRIVATE {name})
"#
        ));
    } else {
        out.push_str(&format!(
            r#"add_executable({name} src/main.{ext})

add_executable({name}_test tests/{symbol}_test.{ext})
"#
        ));
    }

    out.push_str(&format!("add_test(NAME {name}_test COMMAND {name}_test)\n"));
    out
}

fn header(symbol: &str) -> String {
    let guard = symbol.to_uppercase();
    format!(
        r#"#ifndef {guard}_H
#define {guard}_H

#ifdef __cplusplus
extern "C" {{
#endif

int {symbol}_answer(void);

#ifdef __cplusplus
}}
#endif

#endif /* {guard}_H */
"#
    )
}

fn lib_source(symbol: &str) -> String {
    format!(
        r#"#include "{symbol}.h"

int {symbol}_answer(void) {{
    return 42;
}}
"#
    )
}

fn lib_test(lang: Lang, symbol: &str) -> String {
    let include = match lang {
        Lang::C => "#include <stdio.h>",
        Lang::Cxx => "#include <cstdio>",
    };
    format!(
        r#"{include}

#include "{symbol}.h"

int main(void) {{
    if ({symbol}_answer() != 42) {{
        printf("unexpected answer\n");
        return 1;
    }}
    return 0;
}}
"#
    )
}

fn main_source(lang: Lang, name: &str) -> String {
    match lang {
        Lang::C => format!(
            r#"#include <stdio.h>

int main(void) {{
    printf("Hello, {name}!\n");
    return 0;
}}
"#
        ),
        Lang::Cxx => format!(
            r#"#include <iostream>

int main() {{
    std::cout << "Hello, {name}!\n";
    return 0;
}}
"#
        ),
    }
}

fn smoke_test() -> String {
    "int main(void) {\n    return 0;\n}\n".to_string()
}
