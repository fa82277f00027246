//! Reference implementation of the runtime-services handle the generated
//! function expects as its first argument. Hosts may substitute their own
//! `{ escape }` value; this one matches what escape factors assume.

use phf::phf_map;
use std::borrow::Cow;

/// Used to map characters to HTML entities.
static HTML_ESCAPES: phf::Map<char, &'static str> = phf_map! {
    '&' => "&amp;",
    '<' => "&lt;",
    '>' => "&gt;",
    '"' => "&quot;",
    '\'' => "&#39;",
};

/// Converts the characters `&`, `<`, `>`, `"`, and `'` in `text` to their
/// corresponding HTML entities. Borrows the input back untouched when no
/// escapable character occurs.
pub fn escape(text: &str) -> Cow<'_, str> {
    match text.find(|c: char| HTML_ESCAPES.contains_key(&c)) {
        Some(first) => {
            let mut escaped = String::with_capacity(text.len() + 8);
            escaped.push_str(&text[..first]);
            for c in text[first..].chars() {
                match HTML_ESCAPES.get(&c) {
                    Some(entity) => escaped.push_str(entity),
                    None => escaped.push(c),
                }
            }
            Cow::Owned(escaped)
        }
        None => Cow::Borrowed(text),
    }
}
