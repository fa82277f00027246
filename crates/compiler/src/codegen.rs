//! Source generation.
//!
//! The visitor walks the factor chain once, joining adjacent content and
//! expression factors into one accumulator-concatenation statement, breaking
//! the join at raw statements, injecting the `print` helper lazily, and
//! splicing linked sub-templates in place through the shared context.

pub mod source_map;

use self::source_map::{SourceMapMapper, SourceMapping};
use super::ast::{Factor, FactorsNode, TemplateNode};
use super::error::{CompilationError, CompilationErrorKind};
use super::parser::Parser;
use super::tokenizer::{Token, TokenStream};

pub const VAR_ESCAPE: &str = "__e";
pub const VAR_RUNTIME: &str = "__r";
pub const VAR_TMPL: &str = "__p";
pub const VAR_TMP: &str = "__t";

/// Identifiers the generated function declares for itself. The data
/// variable may not shadow any of them.
pub const RESERVED_VARIABLES: [&str; 4] = [VAR_ESCAPE, VAR_RUNTIME, VAR_TMPL, VAR_TMP];

pub const DEFAULT_VARIABLE: &str = "data";

const PRINT_HELPER: &str =
    "\nfunction print(){ for(let a of arguments) __p+=(a==undefined)?'':a };";

// Lifts the data object's own enumerable properties into function-scoped
// locals at render time. Narrower than dynamic scoping: first-level own
// properties only. Valid only with the default variable name, which lets the
// statement reuse the declared `__t` temporary.
const SCOPE_BIND_PROLOGUE: &str = "for(__t in data) \
     if(Object.prototype.hasOwnProperty.call(data,__t)) \
     eval(\"var \"+__t+\"=data[\"+JSON.stringify(__t)+\"]\");";

pub struct CodeGenerateOption {
    /// name bound to the render function's single argument
    pub variable: String,
    /// expose the data object's own properties as local names
    pub scope_bind: bool,
    /// collect generated-to-original position mappings
    pub source_map: bool,
}

impl Default for CodeGenerateOption {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.into(),
            scope_bind: false,
            source_map: false,
        }
    }
}

#[derive(Debug)]
pub struct GeneratedOutput {
    pub source: String,
    pub mappings: Vec<SourceMapping>,
}

/// Resolves a link name to raw sub-template text. Synchronous; a loader
/// observing the names and sources it serves is the caller's concern.
pub trait TemplateLoader {
    fn load(&mut self, name: &str) -> Result<String, String>;
}

impl<F> TemplateLoader for F
where
    F: FnMut(&str) -> Result<String, String>,
{
    fn load(&mut self, name: &str) -> Result<String, String> {
        self(name)
    }
}

/// Codegen state shared across the whole walk, linked sub-templates
/// included: the output buffer, the join flag, the one-shot print-helper
/// flag and the optional position mapper all cross link boundaries.
struct GenContext<'o> {
    source: String,
    in_concat: bool,
    print_injected: bool,
    mapper: Option<SourceMapMapper>,
    loader: Option<&'o mut dyn TemplateLoader>,
}

impl<'o> GenContext<'o> {
    fn append(&mut self, generated: &str, original: Option<&Token<'_>>) {
        if let Some(mapper) = self.mapper.as_mut() {
            let span = original.map(|t| (t.source_name, &t.location.start));
            mapper.on_append(generated, span);
        }
        self.source.push_str(generated);
    }

    /// Joins an expression into the accumulator statement, opening one if
    /// no concatenation is in progress.
    fn concat(&mut self, code: &str, original: &Token<'_>, need_mapping: bool) {
        let generated = if self.in_concat {
            format!("+{}", code)
        } else {
            self.in_concat = true;
            format!("{}+={}", VAR_TMPL, code)
        };
        let original = if need_mapping { Some(original) } else { None };
        self.append(&generated, original);
    }

    fn generate_factors(&mut self, factors: &FactorsNode<'_>) -> Result<(), CompilationError> {
        for factor in factors {
            self.generate_factor(factor)?;
        }
        Ok(())
    }

    fn generate_factor(&mut self, factor: &Factor<'_>) -> Result<(), CompilationError> {
        match factor {
            Factor::Content(token) => {
                // the lexeme was transcoded for string-literal embedding at scan time
                self.concat(&format!("\"{}\"", token.lexeme), token, false);
                Ok(())
            }
            Factor::Interpolate(token) => {
                self.concat(
                    &format!(
                        "(({} = {} ) == null ? '' : {})",
                        VAR_TMP, token.lexeme, VAR_TMP
                    ),
                    token,
                    true,
                );
                Ok(())
            }
            Factor::Escape(token) => {
                self.concat(&format!("{}( {} )", VAR_ESCAPE, token.lexeme), token, true);
                Ok(())
            }
            Factor::Evaluate(token) => {
                // a raw statement cannot be joined into an expression
                self.in_concat = false;
                if !self.print_injected {
                    self.append(PRINT_HELPER, None);
                    self.print_injected = true;
                }
                self.append("\n", None);
                self.append(&format!("{}\n", token.lexeme), Some(token));
                Ok(())
            }
            Factor::Link(token) => self.generate_link(token),
        }
    }

    fn generate_link(&mut self, token: &Token<'_>) -> Result<(), CompilationError> {
        let name = token.lexeme.trim().to_owned();
        let loader = match self.loader.as_mut() {
            Some(loader) => loader,
            None => {
                return Err(
                    CompilationError::new(CompilationErrorKind::MissingTemplateLoader)
                        .with_location(token.location.clone()),
                )
            }
        };
        let text = loader.load(&name).map_err(|cause| {
            CompilationError::new(CompilationErrorKind::TemplateLoadFailure)
                .with_location(token.location.clone())
                .with_additional_message(cause)
        })?;
        let template = Parser::new().parse(TokenStream::new(&text, &name))?;
        // splice in place: join state, print injection and the accumulator
        // continue seamlessly across the boundary
        self.generate_factors(&template.factors)
    }
}

fn assert_no_variable_conflict(variable: &str) -> Result<(), CompilationError> {
    if RESERVED_VARIABLES.contains(&variable) {
        return Err(
            CompilationError::new(CompilationErrorKind::ReservedVariableName)
                .with_additional_message(format!(
                    "{} (reserved: {})",
                    variable,
                    RESERVED_VARIABLES.join(",")
                )),
        );
    }
    Ok(())
}

/// Generates the full render-function source for a parsed template.
///
/// The output is a one-argument function taking the runtime-services handle
/// and returning the render function over the data argument. Deterministic:
/// the same template and option always produce byte-identical source.
pub fn generate(
    template: &TemplateNode<'_>,
    option: &CodeGenerateOption,
    loader: Option<&mut dyn TemplateLoader>,
) -> Result<GeneratedOutput, CompilationError> {
    assert_no_variable_conflict(&option.variable)?;
    if option.scope_bind && option.variable != DEFAULT_VARIABLE {
        return Err(CompilationError::new(
            CompilationErrorKind::ScopeBindRequiresDefaultVariable,
        ));
    }

    let mut head = format!("({})=>function({}){{\n", VAR_RUNTIME, option.variable);
    head.push_str(&format!(
        "let {},{} = \"\",{}={}.escape;\n",
        VAR_TMP, VAR_TMPL, VAR_ESCAPE, VAR_RUNTIME
    ));
    let mut line_offset = 3;
    if option.scope_bind {
        head.push_str(SCOPE_BIND_PROLOGUE);
        head.push('\n');
        line_offset += 1;
    }

    let mapper = if option.source_map {
        Some(SourceMapMapper::new(line_offset, 0))
    } else {
        None
    };
    let mut ctx = GenContext {
        source: head,
        in_concat: false,
        print_injected: false,
        mapper,
        loader,
    };
    ctx.generate_factors(&template.factors)?;
    ctx.source.push_str(&format!("\nreturn {}}}", VAR_TMPL));

    let mappings = match ctx.mapper {
        Some(mapper) => mapper.into_mappings(),
        None => vec![],
    };
    Ok(GeneratedOutput {
        source: ctx.source,
        mappings,
    })
}
