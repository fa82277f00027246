//! The front-to-back compile entry point.

use super::codegen::{self, CodeGenerateOption, DEFAULT_VARIABLE};
use super::codegen::source_map::mapping_trailer;
use super::error::CompilationError;
use super::parser::Parser;
use super::tokenizer::{TokenStream, DEFAULT_SOURCE_NAME};

pub use super::codegen::{GeneratedOutput, TemplateLoader};

pub struct CompileOption {
    /// name bound to the render function's single argument
    pub variable: String,
    /// expose the data object's own properties as local names;
    /// only valid together with the default variable name
    pub scope_bind: bool,
    /// append a decodable position-map trailer to the output
    pub source_map: bool,
    /// label for the top-level template in diagnostics and maps
    pub source_name: String,
}

impl Default for CompileOption {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.into(),
            scope_bind: false,
            source_map: false,
            source_name: DEFAULT_SOURCE_NAME.into(),
        }
    }
}

/// Compiles template text into render-function source. The loader is only
/// required when the template (or anything it links) contains `<%@ %>`
/// factors. Fails fast and whole: the first error aborts the compile.
pub fn compile(
    source: &str,
    option: &CompileOption,
    loader: Option<&mut dyn TemplateLoader>,
) -> Result<String, CompilationError> {
    let tokens = TokenStream::new(source, &option.source_name);
    let template = Parser::new().parse(tokens)?;
    let gen_option = CodeGenerateOption {
        variable: option.variable.clone(),
        scope_bind: option.scope_bind,
        source_map: option.source_map,
    };
    let mut output = codegen::generate(&template, &gen_option, loader)?;
    if option.source_map {
        output.source.push_str(&mapping_trailer(&output.mappings));
    }
    Ok(output.source)
}
