//! Position mapping between generated source and template text.
//!
//! The mapper is a running accumulator fed one appended chunk at a time.
//! Generated lines are 1-based and start at the body's first line; generated
//! columns are 0-based and reset after a newline. Original positions come
//! from token spans and stay 1-based.

use crate::util::json::write_json_string;
use crate::Position;
use std::fmt::{self, Write};

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPosition {
    pub line: usize,
    pub column: usize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapping {
    pub source: String,
    pub original: MapPosition,
    pub generated: MapPosition,
}

pub struct SourceMapMapper {
    line: usize,
    column: usize,
    mappings: Vec<SourceMapping>,
}

impl SourceMapMapper {
    pub fn new(line_offset: usize, column_offset: usize) -> Self {
        Self {
            line: line_offset,
            column: column_offset,
            mappings: vec![],
        }
    }

    /// Advances the generated cursor over `generated`; when `original` names
    /// a template span start, one mapping is recorded at the cursor position
    /// *before* the chunk. Mappings keep emission order, no dedup, no sort.
    pub fn on_append(&mut self, generated: &str, original: Option<(&str, &Position)>) {
        if let Some((source, position)) = original {
            self.mappings.push(SourceMapping {
                source: source.to_owned(),
                original: MapPosition {
                    line: position.line,
                    column: position.column,
                },
                generated: MapPosition {
                    line: self.line,
                    column: self.column,
                },
            });
        }
        for chr in generated.chars() {
            if chr == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn into_mappings(self) -> Vec<SourceMapping> {
        self.mappings
    }
}

/// Renders the self-describing trailer appended to generated source when
/// position mapping is requested. One line, decodable with any JSON parser.
pub fn mapping_trailer(mappings: &[SourceMapping]) -> String {
    let mut out = String::new();
    write_trailer(&mut out, mappings).expect("writing to a string is infallible");
    out
}

fn write_trailer<W: Write>(w: &mut W, mappings: &[SourceMapping]) -> fmt::Result {
    w.write_str("\n//# templateMappings=[")?;
    for (index, mapping) in mappings.iter().enumerate() {
        if index > 0 {
            w.write_char(',')?;
        }
        w.write_str("{\"source\":")?;
        write_json_string(&mapping.source, &mut *w)?;
        write!(
            w,
            ",\"original\":{{\"line\":{},\"column\":{}}},\"generated\":{{\"line\":{},\"column\":{}}}}}",
            mapping.original.line,
            mapping.original.column,
            mapping.generated.line,
            mapping.generated.column
        )?;
    }
    w.write_char(']')
}
