use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use compiler::compiler::TemplateLoader;
use compiler::error::CompilationError;
use path_clean::PathClean;

/// Resolves `<%@ name %>` links against a root directory.
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl TemplateLoader for FsLoader {
    fn load(&mut self, name: &str) -> Result<String, String> {
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|err| format!("{}: {}", path.display(), err))
    }
}

pub fn report_error(name: &str, source: &str, err: &CompilationError) {
    let mut files = SimpleFiles::new();
    let file = files.add(name, source);
    let diagnostic = Diagnostic::error().with_labels(vec![Label::primary(
        file,
        err.location.clone(),
    )
    .with_message(format!("{}", err))]);

    let writer = StandardStream::stderr(ColorChoice::Always);
    let config = term::Config::default();

    term::emit(&mut writer.lock(), &config, &files, &diagnostic)
        .expect("unable to generate codespan diagnostic");
}

pub fn absolute_path(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = path.as_ref();

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    }
    .clean();

    Ok(absolute_path)
}
