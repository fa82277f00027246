use anyhow::Result;
use clap::Parser;
use compiler::compiler::{compile, CompileOption};
use compiler::tokenizer::DEFAULT_SOURCE_NAME;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::exit;

use cli::{absolute_path, report_error, FsLoader};

/// A simple CLI app for compiling delimiter templates to render-function source.
#[derive(Parser)]
#[command(version)]
struct Opts {
    /// The template file to compile. Stdin will be compiled if no file is provided.
    input_file_name: Option<PathBuf>,

    /// Data parameter name bound in the generated render function.
    #[arg(short, long, default_value = "data")]
    variable: String,

    /// Lift the data object's own properties into the render scope.
    #[arg(long)]
    scope_bind: bool,

    /// Append a decodable position-map trailer to the output.
    #[arg(long)]
    source_map: bool,

    /// Directory used to resolve `<%@ name %>` links.
    /// Defaults to the template file's directory, or the working directory
    /// when compiling stdin.
    #[arg(short, long)]
    root: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let (name, source, dir) = match &opts.input_file_name {
        Some(file_name) => {
            let path = absolute_path(file_name)?;
            let dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            (file_name.display().to_string(), fs::read_to_string(path)?, dir)
        }
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            (DEFAULT_SOURCE_NAME.to_owned(), source, PathBuf::from("."))
        }
    };

    let option = CompileOption {
        variable: opts.variable.clone(),
        scope_bind: opts.scope_bind,
        source_map: opts.source_map,
        source_name: name.clone(),
    };
    let mut loader = FsLoader::new(opts.root.clone().unwrap_or(dir));
    match compile(&source, &option, Some(&mut loader)) {
        Ok(generated) => println!("{}", generated),
        Err(err) => {
            report_error(&name, &source, &err);
            exit(1);
        }
    }

    Ok(())
}
