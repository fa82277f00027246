//! LR driver for the template grammar. The table lives in [`grammar`];
//! this module only runs the shift/reduce loop and reports the first
//! token the table has no action for.
//!
//! [`grammar`]: super::grammar

use super::ast::TemplateNode;
use super::error::{CompilationError, CompilationErrorKind};
use super::grammar::{Action, Children, StackValue, Symbol, PARSING_TABLE};
use super::tokenizer::TokenSource;
use smallvec::{smallvec, SmallVec};

#[derive(Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse<'a, Ts>(&self, mut tokens: Ts) -> Result<TemplateNode<'a>, CompilationError>
    where
        Ts: TokenSource<'a>,
    {
        let mut states: SmallVec<[usize; 16]> = smallvec![0];
        let mut values: SmallVec<[StackValue<'a>; 16]> = SmallVec::new();
        loop {
            let state = *states.last().expect("state stack is never empty");
            let symbol = Symbol::T(tokens.peek().kind);
            match PARSING_TABLE.get(&(state, symbol)) {
                Some(Action::Shift(next)) => {
                    let next = *next;
                    values.push(StackValue::Token(tokens.bump()));
                    states.push(next);
                }
                Some(Action::Reduce(production)) => {
                    let len = production.rhs.len();
                    let children: Children<'a> = values.drain(values.len() - len..).collect();
                    states.truncate(states.len() - len);
                    let node = (production.action)(children);
                    let exposed = *states.last().expect("state stack is never empty");
                    match PARSING_TABLE.get(&(exposed, Symbol::N(production.lhs))) {
                        Some(Action::Goto(next)) => {
                            values.push(node);
                            states.push(*next);
                        }
                        _ => unreachable!("the table defines a goto after every reduce"),
                    }
                }
                Some(Action::Accept) => {
                    return match values.pop() {
                        Some(StackValue::Template(template)) => Ok(template),
                        _ => unreachable!("accept exposes the template node"),
                    };
                }
                Some(Action::Goto(_)) | None => {
                    let token = tokens.bump();
                    return Err(
                        CompilationError::new(CompilationErrorKind::UnexpectedToken)
                            .with_location(token.location)
                            .with_additional_message(format!(
                                "got {} `{}`",
                                token.kind, token.lexeme
                            )),
                    );
                }
            }
        }
    }
}
