//! Syntax tree for a parsed template. Ownership is strictly tree shaped:
//! nodes are built bottom-up during parsing and never mutated afterwards.

use super::tokenizer::Token;

/// One literal-or-delimited unit of template content.
/// Each delimited variant owns the opaque code-fragment token scanned
/// between its start delimiter and `%>`.
#[derive(Debug)]
pub enum Factor<'a> {
    Content(Token<'a>),
    Interpolate(Token<'a>),
    Escape(Token<'a>),
    Evaluate(Token<'a>),
    Link(Token<'a>),
}

/// An ordered, possibly-empty sequence of factors in render order,
/// kept as the `(factor, rest)` chain the grammar produces.
#[derive(Debug, Default)]
pub struct FactorsNode<'a> {
    head: Option<Box<(Factor<'a>, FactorsNode<'a>)>>,
}

impl<'a> FactorsNode<'a> {
    pub fn empty() -> Self {
        Self { head: None }
    }
    pub fn cons(factor: Factor<'a>, rest: FactorsNode<'a>) -> Self {
        Self {
            head: Some(Box::new((factor, rest))),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
    pub fn iter(&self) -> Factors<'_, 'a> {
        Factors { cursor: self }
    }
}

pub struct Factors<'n, 'a> {
    cursor: &'n FactorsNode<'a>,
}

impl<'n, 'a> Iterator for Factors<'n, 'a> {
    type Item = &'n Factor<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let (factor, rest) = self.cursor.head.as_deref()?;
        self.cursor = rest;
        Some(factor)
    }
}

impl<'n, 'a> IntoIterator for &'n FactorsNode<'a> {
    type Item = &'n Factor<'a>;
    type IntoIter = Factors<'n, 'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug)]
pub struct TemplateNode<'a> {
    pub factors: FactorsNode<'a>,
}
