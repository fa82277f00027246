//! The template grammar and its LR(1) parsing table.
//!
//! ```text
//!  0  S           -> template                (resolved by Accept)
//!  1  template    -> factors
//!  2  factors     -> factor factors
//!  3  factors     -> ε
//!  4  factor      -> CONTENT
//!  5  factor      -> interpolate
//!  6  factor      -> escape
//!  7  factor      -> evaluate
//!  8  factor      -> link
//!  9  link        -> <%@ CONTENT %>
//! 10  interpolate -> <%= CONTENT %>
//! 11  escape      -> <%- CONTENT %>
//! 12  evaluate    -> <%  CONTENT %>
//! ```
//!
//! The table is pure data, built once and shared read-only by every parse.

use super::ast::{Factor, FactorsNode, TemplateNode};
use super::tokenizer::{Token, TokenKind};
use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NonTerminal {
    Template,
    Factors,
    Factor,
    Link,
    Interpolate,
    Escape,
    Evaluate,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Symbol {
    T(TokenKind),
    N(NonTerminal),
}

/// A value on the parser's semantic stack: a shifted terminal or the node
/// a semantic action produced for a reduced nonterminal.
#[derive(Debug)]
pub enum StackValue<'a> {
    Token(Token<'a>),
    Factor(Factor<'a>),
    Factors(FactorsNode<'a>),
    Template(TemplateNode<'a>),
}

/// Popped right-hand-side values, in original left-to-right order.
pub type Children<'a> = SmallVec<[StackValue<'a>; 3]>;

pub type SemanticAction = for<'a> fn(Children<'a>) -> StackValue<'a>;

pub struct Production {
    pub id: usize,
    pub lhs: NonTerminal,
    pub rhs: &'static [Symbol],
    pub action: SemanticAction,
}

#[derive(Clone, Copy)]
pub enum Action {
    Shift(usize),
    Reduce(&'static Production),
    Goto(usize),
    Accept,
}

fn reduce_template<'a>(mut children: Children<'a>) -> StackValue<'a> {
    match children.pop() {
        Some(StackValue::Factors(factors)) => StackValue::Template(TemplateNode { factors }),
        _ => unreachable!("template reduces from factors"),
    }
}

fn reduce_factors<'a>(mut children: Children<'a>) -> StackValue<'a> {
    let rest = match children.pop() {
        Some(StackValue::Factors(rest)) => rest,
        _ => unreachable!("factors reduces from factor factors"),
    };
    let factor = match children.pop() {
        Some(StackValue::Factor(factor)) => factor,
        _ => unreachable!("factors reduces from factor factors"),
    };
    StackValue::Factors(FactorsNode::cons(factor, rest))
}

fn reduce_nil_factors<'a>(_: Children<'a>) -> StackValue<'a> {
    StackValue::Factors(FactorsNode::empty())
}

fn reduce_content_factor<'a>(mut children: Children<'a>) -> StackValue<'a> {
    match children.pop() {
        Some(StackValue::Token(token)) => StackValue::Factor(Factor::Content(token)),
        _ => unreachable!("content factor reduces from a terminal"),
    }
}

fn reduce_wrapped_factor<'a>(mut children: Children<'a>) -> StackValue<'a> {
    match children.pop() {
        Some(factor @ StackValue::Factor(_)) => factor,
        _ => unreachable!("wrapped factor reduces from a delimited nonterminal"),
    }
}

/// Extracts the code-fragment token out of `<start> CONTENT %>` children.
fn code_token(mut children: Children<'_>) -> Token<'_> {
    children.pop(); // %>
    match children.pop() {
        Some(StackValue::Token(token)) => token,
        _ => unreachable!("delimited production owns a content token"),
    }
}

fn reduce_interpolate<'a>(children: Children<'a>) -> StackValue<'a> {
    StackValue::Factor(Factor::Interpolate(code_token(children)))
}

fn reduce_escape<'a>(children: Children<'a>) -> StackValue<'a> {
    StackValue::Factor(Factor::Escape(code_token(children)))
}

fn reduce_evaluate<'a>(children: Children<'a>) -> StackValue<'a> {
    StackValue::Factor(Factor::Evaluate(code_token(children)))
}

fn reduce_link<'a>(children: Children<'a>) -> StackValue<'a> {
    StackValue::Factor(Factor::Link(code_token(children)))
}

const T_CONTENT: Symbol = Symbol::T(TokenKind::Content);
const T_IN_DS: Symbol = Symbol::T(TokenKind::InterpolateStart);
const T_ES_DS: Symbol = Symbol::T(TokenKind::EscapeStart);
const T_EV_DS: Symbol = Symbol::T(TokenKind::EvaluateStart);
const T_LN_DS: Symbol = Symbol::T(TokenKind::LinkStart);
const T_DE: Symbol = Symbol::T(TokenKind::DelimiterEnd);
const T_EOF: Symbol = Symbol::T(TokenKind::Eof);
const N_TEMPLATE: Symbol = Symbol::N(NonTerminal::Template);
const N_FACTORS: Symbol = Symbol::N(NonTerminal::Factors);
const N_FACTOR: Symbol = Symbol::N(NonTerminal::Factor);
const N_LINK: Symbol = Symbol::N(NonTerminal::Link);
const N_INTERPOLATE: Symbol = Symbol::N(NonTerminal::Interpolate);
const N_ESCAPE: Symbol = Symbol::N(NonTerminal::Escape);
const N_EVALUATE: Symbol = Symbol::N(NonTerminal::Evaluate);

/// Productions 1 through 12, indexed by `id - 1`.
pub static PRODUCTIONS: [Production; 12] = [
    Production {
        id: 1,
        lhs: NonTerminal::Template,
        rhs: &[N_FACTORS],
        action: reduce_template,
    },
    Production {
        id: 2,
        lhs: NonTerminal::Factors,
        rhs: &[N_FACTOR, N_FACTORS],
        action: reduce_factors,
    },
    Production {
        id: 3,
        lhs: NonTerminal::Factors,
        rhs: &[],
        action: reduce_nil_factors,
    },
    Production {
        id: 4,
        lhs: NonTerminal::Factor,
        rhs: &[T_CONTENT],
        action: reduce_content_factor,
    },
    Production {
        id: 5,
        lhs: NonTerminal::Factor,
        rhs: &[N_INTERPOLATE],
        action: reduce_wrapped_factor,
    },
    Production {
        id: 6,
        lhs: NonTerminal::Factor,
        rhs: &[N_ESCAPE],
        action: reduce_wrapped_factor,
    },
    Production {
        id: 7,
        lhs: NonTerminal::Factor,
        rhs: &[N_EVALUATE],
        action: reduce_wrapped_factor,
    },
    Production {
        id: 8,
        lhs: NonTerminal::Factor,
        rhs: &[N_LINK],
        action: reduce_wrapped_factor,
    },
    Production {
        id: 9,
        lhs: NonTerminal::Link,
        rhs: &[T_LN_DS, T_CONTENT, T_DE],
        action: reduce_link,
    },
    Production {
        id: 10,
        lhs: NonTerminal::Interpolate,
        rhs: &[T_IN_DS, T_CONTENT, T_DE],
        action: reduce_interpolate,
    },
    Production {
        id: 11,
        lhs: NonTerminal::Escape,
        rhs: &[T_ES_DS, T_CONTENT, T_DE],
        action: reduce_escape,
    },
    Production {
        id: 12,
        lhs: NonTerminal::Evaluate,
        rhs: &[T_EV_DS, T_CONTENT, T_DE],
        action: reduce_evaluate,
    },
];

fn p(id: usize) -> &'static Production {
    &PRODUCTIONS[id - 1]
}

lazy_static! {
    pub static ref PARSING_TABLE: FxHashMap<(usize, Symbol), Action> = build_table();
}

fn build_table() -> FxHashMap<(usize, Symbol), Action> {
    use Action::*;
    let mut table = FxHashMap::default();
    {
        let mut put = |state: usize, symbol: Symbol, action: Action| {
            let dup = table.insert((state, symbol), action);
            debug_assert!(dup.is_none(), "parsing table conflict");
        };
        // states 0 and 3 open a factor sequence
        for state in [0usize, 3] {
            put(state, N_FACTOR, Goto(3));
            put(state, T_EOF, Reduce(p(3)));
            put(state, T_CONTENT, Shift(4));
            put(state, N_INTERPOLATE, Goto(5));
            put(state, N_ESCAPE, Goto(6));
            put(state, N_EVALUATE, Goto(7));
            put(state, N_LINK, Goto(8));
            put(state, T_IN_DS, Shift(9));
            put(state, T_ES_DS, Shift(10));
            put(state, T_EV_DS, Shift(11));
            put(state, T_LN_DS, Shift(12));
        }
        put(0, N_TEMPLATE, Goto(1));
        put(0, N_FACTORS, Goto(2));
        put(3, N_FACTORS, Goto(13));
        put(1, T_EOF, Accept);
        put(2, T_EOF, Reduce(p(1)));
        put(13, T_EOF, Reduce(p(2)));
        // one shifted content token inside each delimiter pair
        put(9, T_CONTENT, Shift(14));
        put(10, T_CONTENT, Shift(15));
        put(11, T_CONTENT, Shift(16));
        put(12, T_CONTENT, Shift(17));
        put(14, T_DE, Shift(18));
        put(15, T_DE, Shift(19));
        put(16, T_DE, Shift(20));
        put(17, T_DE, Shift(21));
        // follow set of factor and of each delimited nonterminal
        let follow = [T_CONTENT, T_IN_DS, T_ES_DS, T_EV_DS, T_LN_DS, T_EOF];
        let reductions = [
            (4usize, 4usize),
            (5, 5),
            (6, 6),
            (7, 7),
            (8, 8),
            (18, 10),
            (19, 11),
            (20, 12),
            (21, 9),
        ];
        for (state, id) in reductions {
            for symbol in follow {
                put(state, symbol, Reduce(p(id)));
            }
        }
    }
    table
}
