//! Template tokenization.
//! Splits raw template text into content runs and delimiter tokens while
//! tracking 1-based line/column spans against the raw source cursor.

use super::{Name, Position, SourceLocation};
use std::borrow::Cow;
use std::fmt;

pub const DEFAULT_SOURCE_NAME: &str = "anonymous.tmpl";

/// Terminal category of a token. The start delimiters are distinguished by
/// the character following `<%`; everything between a start delimiter and
/// `%>` is one opaque Content run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    Content,
    /// `<%=`
    InterpolateStart,
    /// `<%-`
    EscapeStart,
    /// `<%`
    EvaluateStart,
    /// `<%@`
    LinkStart,
    /// `%>`
    DelimiterEnd,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Content => "Content",
            TokenKind::InterpolateStart => "<%=",
            TokenKind::EscapeStart => "<%-",
            TokenKind::EvaluateStart => "<%",
            TokenKind::LinkStart => "<%@",
            TokenKind::DelimiterEnd => "%>",
            TokenKind::Eof => "EOF",
        };
        f.write_str(s)
    }
}

/// Token is immutable once its location is set by the stream.
/// The lexeme borrows the source unless content transcoding changed it.
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub lexeme: Cow<'a, str>,
    pub kind: TokenKind,
    pub source_name: Name<'a>,
    pub location: SourceLocation,
}

/// The seam between lexer and parser. `peek` is idempotent, `bump` consumes.
pub trait TokenSource<'a> {
    fn peek(&mut self) -> &Token<'a>;
    fn bump(&mut self) -> Token<'a>;
}

pub struct TokenStream<'a> {
    /// remaining source text
    source: &'a str,
    source_name: Name<'a>,
    position: Position,
    /// content transcoding only applies outside `<% .. %>`
    outside_delimiter: bool,
    /// one-token buffer keeping peek and bump in agreement
    lookahead: Option<Token<'a>>,
}

// scanning methods
// NB: When storing self.source to a name, prefer using a ref.
// because Rust ownership can help us to prevent invalid state.
// e.g. `let src = self.source` causes a stale src after [`advance`].
impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str, source_name: Name<'a>) -> Self {
        Self {
            source,
            source_name,
            position: Position::default(),
            outside_delimiter: true,
            lookahead: None,
        }
    }

    fn create_token(&mut self) -> Token<'a> {
        let start = self.position.clone();
        let (lexeme, kind) = if self.source.is_empty() {
            (Cow::Borrowed(""), TokenKind::Eof)
        } else if self.source.starts_with("<%") {
            self.scan_delimiter_start()
        } else if self.source.starts_with("%>") {
            self.scan_delimiter_end()
        } else {
            self.scan_content()
        };
        // end column is inclusive of the last consumed character
        let end = Position {
            offset: self.position.offset,
            line: self.position.line,
            column: self.position.column - 1,
        };
        Token {
            lexeme,
            kind,
            source_name: self.source_name,
            location: SourceLocation { start, end },
        }
    }

    fn scan_delimiter_start(&mut self) -> (Cow<'a, str>, TokenKind) {
        debug_assert!(self.source.starts_with("<%"));
        self.advance(2);
        self.outside_delimiter = false;
        match self.source.chars().next() {
            Some('-') => {
                self.advance(1);
                (Cow::Borrowed("<%-"), TokenKind::EscapeStart)
            }
            Some('=') => {
                self.advance(1);
                (Cow::Borrowed("<%="), TokenKind::InterpolateStart)
            }
            Some('@') => {
                self.advance(1);
                (Cow::Borrowed("<%@"), TokenKind::LinkStart)
            }
            _ => (Cow::Borrowed("<%"), TokenKind::EvaluateStart),
        }
    }

    fn scan_delimiter_end(&mut self) -> (Cow<'a, str>, TokenKind) {
        debug_assert!(self.source.starts_with("%>"));
        self.advance(2);
        self.outside_delimiter = true;
        (Cow::Borrowed("%>"), TokenKind::DelimiterEnd)
    }

    /// Consumes a maximal run of characters up to the next delimiter or EOF.
    /// Outside a delimiter three transcodings apply, because the lexeme ends
    /// up inside a double-quoted string literal of the generated source:
    /// a newline becomes the 2-char `\n`, `"` becomes `\"`, and a backslash
    /// escaping `<%`/`%>` is dropped so the two characters pass through.
    /// Inside a delimiter the code fragment is copied verbatim.
    fn scan_content(&mut self) -> (Cow<'a, str>, TokenKind) {
        let rest = self.source;
        // bytes consumed from the raw source; spans track this cursor,
        // never the transcoded lexeme length
        let mut len = 0;
        let mut transcoded: Option<String> = None;
        loop {
            let r = &rest[len..];
            if r.is_empty() || r.starts_with("<%") || r.starts_with("%>") {
                break;
            }
            let c = match r.chars().next() {
                Some(c) => c,
                None => break,
            };
            if self.outside_delimiter && c == '\n' {
                transcoded
                    .get_or_insert_with(|| rest[..len].to_owned())
                    .push_str("\\n");
                len += 1;
            } else if self.outside_delimiter && c == '"' {
                transcoded
                    .get_or_insert_with(|| rest[..len].to_owned())
                    .push_str("\\\"");
                len += 1;
            } else if self.outside_delimiter
                && c == '\\'
                && (r[1..].starts_with("<%") || r[1..].starts_with("%>"))
            {
                transcoded
                    .get_or_insert_with(|| rest[..len].to_owned())
                    .push_str(&r[1..3]);
                len += 3;
            } else {
                if let Some(s) = transcoded.as_mut() {
                    s.push(c);
                }
                len += c.len_utf8();
            }
        }
        let raw = self.advance(len);
        let lexeme = match transcoded {
            Some(s) => Cow::Owned(s),
            None => Cow::Borrowed(raw),
        };
        (lexeme, TokenKind::Content)
    }

    /// move the stream's internal position forward and return the consumed &str
    /// line/column are also updated in the method
    /// NB: it only moves forward, not backward
    fn advance(&mut self, size: usize) -> &'a str {
        debug_assert!(size > 0, "tokenizer must move forward");
        let old_source = self.source;
        let pos = &mut self.position;
        for c in old_source[..size].chars() {
            if c == '\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos.offset += size;
        self.source = &old_source[size..];
        &old_source[..size]
    }

    fn fill(&mut self) {
        if self.lookahead.is_none() {
            let token = self.create_token();
            self.lookahead = Some(token);
        }
    }
}

impl<'a> TokenSource<'a> for TokenStream<'a> {
    fn peek(&mut self) -> &Token<'a> {
        self.fill();
        self.lookahead.as_ref().expect("lookahead is filled")
    }
    fn bump(&mut self) -> Token<'a> {
        self.fill();
        self.lookahead.take().expect("lookahead is filled")
    }
}
