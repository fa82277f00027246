use tmpl_compiler_core as compiler;

use compiler::tokenizer::{TokenKind, TokenSource, TokenStream, DEFAULT_SOURCE_NAME};

fn base_scan(source: &str) -> Vec<(TokenKind, String)> {
    let mut stream = TokenStream::new(source, DEFAULT_SOURCE_NAME);
    let mut tokens = vec![];
    loop {
        let token = stream.bump();
        let done = token.kind == TokenKind::Eof;
        tokens.push((token.kind, token.lexeme.into_owned()));
        if done {
            return tokens;
        }
    }
}

fn owned(tokens: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
    tokens.iter().map(|(k, s)| (*k, s.to_string())).collect()
}

#[test]
fn test_scan_all_factor_kinds() {
    use TokenKind::*;
    assert_eq!(
        base_scan("x<%=a%><%-b%><%c%><%@d%>y"),
        owned(&[
            (Content, "x"),
            (InterpolateStart, "<%="),
            (Content, "a"),
            (DelimiterEnd, "%>"),
            (EscapeStart, "<%-"),
            (Content, "b"),
            (DelimiterEnd, "%>"),
            (EvaluateStart, "<%"),
            (Content, "c"),
            (DelimiterEnd, "%>"),
            (LinkStart, "<%@"),
            (Content, "d"),
            (DelimiterEnd, "%>"),
            (Content, "y"),
            (Eof, ""),
        ])
    );
}

#[test]
fn test_scan_content_transcoding() {
    use TokenKind::*;
    // newline and double quote are escaped for string-literal embedding,
    // an escaped delimiter loses its backslash
    assert_eq!(
        base_scan("say \"hi\"\nand \\<%bye\\%>"),
        owned(&[(Content, "say \\\"hi\\\"\\nand <%bye%>"), (Eof, "")])
    );
}

#[test]
fn test_scan_code_fragment_verbatim() {
    use TokenKind::*;
    assert_eq!(
        base_scan("<% let s = \"a\" %>"),
        owned(&[
            (EvaluateStart, "<%"),
            (Content, " let s = \"a\" "),
            (DelimiterEnd, "%>"),
            (Eof, ""),
        ])
    );
}

#[test]
fn test_multi_line_spans() {
    let mut stream = TokenStream::new("ab\ncd<%=x\ny%>", DEFAULT_SOURCE_NAME);
    let content = stream.bump();
    assert_eq!(content.lexeme, "ab\\ncd");
    assert_eq!(
        (
            content.location.start.line,
            content.location.start.column,
            content.location.end.line,
            content.location.end.column
        ),
        (1, 1, 2, 2)
    );
    let start = stream.bump();
    assert_eq!(start.kind, TokenKind::InterpolateStart);
    assert_eq!(
        (start.location.start.line, start.location.start.column),
        (2, 3)
    );
    // the code fragment keeps its raw newline and spans both lines
    let code = stream.bump();
    assert_eq!(code.lexeme, "x\ny");
    assert_eq!(
        (
            code.location.start.line,
            code.location.start.column,
            code.location.end.line,
            code.location.end.column
        ),
        (2, 6, 3, 1)
    );
}

#[test]
fn test_offsets_convert_to_byte_ranges() {
    let mut stream = TokenStream::new("ab<%=x%>", DEFAULT_SOURCE_NAME);
    let content = stream.bump();
    let range: std::ops::Range<usize> = content.location.into();
    assert_eq!(range, 0..2);
    let start = stream.bump();
    let range: std::ops::Range<usize> = start.location.into();
    assert_eq!(range, 2..5);
}

#[test]
fn test_source_name_is_attached() {
    let mut stream = TokenStream::new("x", "view.tmpl");
    assert_eq!(stream.bump().source_name, "view.tmpl");
}
