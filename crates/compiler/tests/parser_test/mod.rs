use tmpl_compiler_core as compiler;

use compiler::ast::{Factor, TemplateNode};
use compiler::error::{CompilationError, CompilationErrorKind};
use compiler::parser::Parser;
use compiler::tokenizer::{TokenStream, DEFAULT_SOURCE_NAME};

fn base_parse(source: &str) -> TemplateNode<'_> {
    Parser::new()
        .parse(TokenStream::new(source, DEFAULT_SOURCE_NAME))
        .expect("template should parse")
}

fn parse_error(source: &str) -> CompilationError {
    Parser::new()
        .parse(TokenStream::new(source, DEFAULT_SOURCE_NAME))
        .expect_err("template should not parse")
}

#[test]
fn test_parse_empty_template() {
    let template = base_parse("");
    assert!(template.factors.is_empty());
}

#[test]
fn test_parse_factor_sequence() {
    let template = base_parse("hello,<%=data.msg%>");
    let factors: Vec<_> = template.factors.iter().collect();
    assert_eq!(factors.len(), 2);
    assert!(matches!(factors[0], Factor::Content(t) if t.lexeme == "hello,"));
    assert!(matches!(factors[1], Factor::Interpolate(t) if t.lexeme == "data.msg"));
}

#[test]
fn test_parse_every_factor_kind() {
    let template = base_parse("x<%=a%><%-b%><%c%><%@d%>");
    let factors: Vec<_> = template.factors.iter().collect();
    assert!(matches!(factors[0], Factor::Content(_)));
    assert!(matches!(factors[1], Factor::Interpolate(t) if t.lexeme == "a"));
    assert!(matches!(factors[2], Factor::Escape(t) if t.lexeme == "b"));
    assert!(matches!(factors[3], Factor::Evaluate(t) if t.lexeme == "c"));
    assert!(matches!(factors[4], Factor::Link(t) if t.lexeme == "d"));
}

#[test]
fn test_factors_keep_render_order() {
    let template = base_parse("a<%x%>b<%y%>c");
    let lexemes: Vec<_> = template
        .factors
        .iter()
        .map(|factor| match factor {
            Factor::Content(t)
            | Factor::Interpolate(t)
            | Factor::Escape(t)
            | Factor::Evaluate(t)
            | Factor::Link(t) => t.lexeme.as_ref(),
        })
        .collect();
    assert_eq!(lexemes, ["a", "x", "b", "y", "c"]);
}

#[test]
fn test_unclosed_delimiter_is_rejected() {
    let err = parse_error("<%= x");
    assert_eq!(err.kind, CompilationErrorKind::UnexpectedToken);
    // the offending token is the EOF after the dangling code fragment
    assert_eq!(err.location.start.line, 1);
    assert_eq!(err.location.start.column, 6);
    assert!(err.to_string().contains("EOF"), "{}", err);
}

#[test]
fn test_stray_delimiter_end_is_rejected() {
    let err = parse_error("a %> b");
    assert_eq!(err.kind, CompilationErrorKind::UnexpectedToken);
    assert!(err.to_string().contains("%>"), "{}", err);
}

#[test]
fn test_empty_delimiter_pair_is_rejected() {
    let err = parse_error("<%=%>");
    assert_eq!(err.kind, CompilationErrorKind::UnexpectedToken);
    assert_eq!(err.location.start.column, 4);
}
