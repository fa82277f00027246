use super::SourceLocation;
use std::error::Error;
use std::fmt;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum CompilationErrorKind {
    // parse errors
    UnexpectedToken,

    // codegen configuration errors
    ReservedVariableName,
    ScopeBindRequiresDefaultVariable,

    // link resolution errors
    MissingTemplateLoader,
    TemplateLoadFailure,
}

#[derive(Debug)]
pub struct CompilationError {
    pub kind: CompilationErrorKind,
    pub additional_message: Option<String>,
    pub location: SourceLocation,
}

impl CompilationError {
    pub fn new(kind: CompilationErrorKind) -> Self {
        Self {
            kind,
            additional_message: None,
            location: Default::default(),
        }
    }
    pub fn with_location(mut self, loc: SourceLocation) -> Self {
        self.location = loc;
        self
    }
    pub fn with_additional_message(mut self, msg: String) -> Self {
        self.additional_message = Some(msg);
        self
    }

    fn msg(&self) -> &'static str {
        msg(&self.kind)
    }
}

#[cold]
#[inline(never)]
fn msg(kind: &CompilationErrorKind) -> &'static str {
    use CompilationErrorKind::*;
    match *kind {
        UnexpectedToken => "Unexpected token in template. ",
        ReservedVariableName => "The data variable name conflicts with a generated identifier: ",
        ScopeBindRequiresDefaultVariable => {
            "Scope binding is only available with the default data variable name."
        }
        MissingTemplateLoader => "A template link was found but no template loader is configured.",
        TemplateLoadFailure => "The template loader failed: ",
    }
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(additional) = &self.additional_message {
            write!(f, "{}{}", self.msg(), additional)
        } else {
            write!(f, "{}", self.msg())
        }
    }
}

impl Error for CompilationError {}
