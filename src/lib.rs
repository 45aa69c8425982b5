//! Token matching parser (tokematch) is a library to extract structure from noisy token
//! streams using a generalized LR (GLR*) parser with noise skipping.
//!
//! # Overview
//! Classic lexer-driven parsers reject their input at the first token no rule accepts.
//! That makes them a poor fit for utterances, chat messages and other natural-language-like
//! input where most of the stream is filler and only a fraction of the tokens carry the
//! structure the caller is after.
//! This library approaches the problem from the other end: a grammar is written over
//! *queries*, runtime predicates that decide whether an input token matches, and the
//! parser is free to skip tokens no live configuration can consume, preferring the parse
//! that skipped the least input.
//!
//! # Design
//!
//! The library is split into three layers which are composed leaves-first:
//!
//! * A grammar model: a [Rule] is a named production with an ordered body of [Query]
//!   values. Terminal queries ([TextQuery], [IntQuery], [FloatQuery], [EofQuery] or a
//!   user-defined [IQuery]) match one input token; a [ReferenceQuery] matches another
//!   production.
//! * A table builder ([build_parsing_table]) which runs a canonical LR(0) item-set
//!   construction over the rules and emits a [ParsingTable]: a goto map over productions
//!   plus one action map per distinct terminal query. Terminal queries are offered to a
//!   list of [IResolver] implementations which index them however they see fit (by exact
//!   text, lowercased text, numeric parseability, single-edit spelling variations and so
//!   on) so that an opaque input token can later be mapped back to its action map.
//! * A GLR* driver ([parse]) which feeds a token iterator through the table while
//!   maintaining a graph-structured stack of parser configurations, forking on conflicts,
//!   skipping unmatched tokens, and resolving local ambiguity in favour of the parse with
//!   the fewest skipped tokens.
//!
//! Unparseable input is not an error: [parse] simply returns an empty result list.
//! Errors are reserved for malformed grammars handed to the [RuleReader](text::RuleReader)
//! or the table builder.
//!
//! # Example
//!
//! ```
//! use tokematch::text::{build_text_parsing_table, parse_rules_from_string, tokenize};
//! use tokematch::{parse, ParseSettings};
//!
//! let rules = parse_rules_from_string(
//!     "
//!     ROOT = <EXPR>
//!     EXPR = {float} + {float}
//!     ",
//! )
//! .unwrap();
//!
//! let table = build_text_parsing_table(rules, Vec::new()).unwrap();
//!
//! // In a real application the tokens would come from a proper tokenizer.
//! let tokens = tokenize("this will be ignored 3.1415 and + this 4e-10", false);
//!
//! let results = parse(tokens, &table, &ParseSettings::default());
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].to_string(), "ROOT(EXPR(3.1415, +, 4e-10))");
//! ```
//!
//! # License
//! [tokematch](crate) is provided under the MIT or Apache-2.0 license.
mod error;
mod eof;
pub mod examples;
mod grammar;
mod impl_default;
mod parsing;
mod table;
pub mod text;

pub use eof::EofResolver;
pub use parsing::parse;
pub use table::build_parsing_table;

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hasher;
use std::rc::Rc;

/// A trait implemented by user-defined terminal queries.
///
/// The built-in query kinds cover exact text, numbers and the end-of-stream sentinel.
/// Anything else, such as part-of-speech tags or dictionary lookups, can be added
/// by implementing this trait and wrapping the value in [TerminalQuery::Custom], paired
/// with an [IResolver] that knows how to index the query and look input tokens up.
///
/// Queries are compared structurally during table construction so that identical queries
/// from different rules collapse into a single action map; `query_eq` and `query_hash`
/// must be consistent with each other.
pub trait IQuery: Debug + Display {
    fn as_any(&self) -> &dyn Any;
    fn query_eq(&self, other: &dyn IQuery) -> bool;
    fn query_hash(&self, state: &mut dyn Hasher);
}

/// An adapter between input tokens and the action maps of a [ParsingTable].
///
/// During table construction every terminal query is offered to every resolver through
/// [register](IResolver::register); the resolver decides whether to index it and under
/// what key. During parsing, [resolve](IResolver::resolve) maps an input token back to
/// the registered entry, optionally attaching [Meta] data (such as a parsed numeric
/// value) that ends up on the shifted [Symbol].
///
/// Registration must be idempotent: the builder offers the same query once per table
/// cell it participates in. `resolve` must be a pure function of the token and the
/// accumulated index; resolvers are never mutated once the table is built, which is
/// what makes a table freely shareable between parses.
pub trait IResolver<T> {
    fn register(&mut self, query: &TerminalQuery, entry: EntryId);
    fn resolve(&self, token: &T) -> Option<Resolution>;
}

/// A production rule: a name and an ordered body of queries.
///
/// The body must be non-empty; epsilon productions and left-recursion checks are the
/// grammar author's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub production: String,
    pub queries: Vec<Query>,
}

/// One element of a rule body: either a terminal query matching an input token, or a
/// reference to another production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Terminal(TerminalQuery),
    Reference(ReferenceQuery),
}

/// A terminal query: a predicate over one input token.
#[derive(Debug, Clone)]
pub enum TerminalQuery {
    Text(TextQuery),
    Int(IntQuery),
    Float(FloatQuery),
    Eof(EofQuery),
    Custom(Rc<dyn IQuery>),
}

/// A named back-reference to another production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceQuery {
    pub reference: String,
}

/// A terminal query matching one string token, case-sensitively or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextQuery {
    pub text: String,
    pub case_sensitive: bool,
}

/// A terminal query matching any token that parses as an integer.
///
/// The parsed value is attached to the shifted [Symbol] as [Meta::Int].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntQuery;

/// A terminal query matching any token that parses as a floating-point number.
///
/// The parsed value is attached to the shifted [Symbol] as [Meta::Float].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatQuery;

/// A terminal query matching exactly the end-of-stream sentinel token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EofQuery;

/// An input token of the text pipeline: either a plain string token or the
/// end-of-stream sentinel.
///
/// Appending [Token::Eof] to the input is optional, but it lets grammars terminate on an
/// explicit `{EOF}` query instead of relying on the stream simply running dry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Eof,
}

/// Metadata attached to a [Symbol] by the resolver that matched it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Meta {
    Int(i64),
    Float(f64),
}

/// A wrapper to indicate the index of a terminal query's action map inside the
/// [ParsingTable].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryId(usize);

/// A successful token lookup: the action map entry serving the token, plus optional
/// resolver-produced [Meta] data.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub entry: EntryId,
    pub meta: Option<Meta>,
}

/// A parsing table cell: shift the token and move to a state, or fold the top of the
/// stack by a rule.
#[derive(Debug, Clone)]
pub enum Action {
    Shift(usize),
    Reduce(Rc<Rule>),
}

/// A compiled grammar: the goto map, one action map per distinct terminal query, and the
/// resolvers that answer token lookups.
///
/// Built once by [build_parsing_table] and read-only thereafter; a table can be shared
/// freely between any number of parses.
pub struct ParsingTable<T> {
    goto: HashMap<usize, HashMap<String, usize>>,
    entries: Vec<HashMap<usize, Vec<Action>>>,
    entry_ids: HashMap<TerminalQuery, EntryId>,
    resolvers: Vec<Box<dyn IResolver<T>>>,
    state_count: usize,
}

impl<T> std::fmt::Debug for ParsingTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsingTable")
            .field("goto", &self.goto)
            .field("entries", &self.entries)
            .field("entry_ids", &self.entry_ids)
            .field("resolvers", &format!("<{} resolvers>", self.resolvers.len()))
            .field("state_count", &self.state_count)
            .finish()
    }
}

/// An input token absorbed by the parser, tagged with its stream position and the
/// resolver metadata it matched with.
#[derive(Debug, Clone)]
pub struct Symbol<T> {
    pub value: T,
    pub position: usize,
    pub meta: Option<Meta>,
}

/// An interior node of a parse tree: the rule that produced it and the symbols that
/// matched the rule's queries, in body order.
#[derive(Debug, Clone)]
pub struct ParseNode<T> {
    pub rule: Rc<Rule>,
    pub args: Vec<ParseArg<T>>,
}

/// One argument of a [ParseNode]: a shifted input [Symbol] or a nested reduction.
#[derive(Debug, Clone)]
pub enum ParseArg<T> {
    Symbol(Symbol<T>),
    Node(Rc<ParseNode<T>>),
}

/// Knobs of the GLR* driver: the beam limit (0 for unbounded), the production to harvest
/// parses for, and whether to dump the graph-structured stack after every phase.
#[derive(Debug, Clone)]
pub struct ParseSettings {
    pub beam_limit: usize,
    pub root_production: String,
    pub verbose: bool,
}

/// An error returned for a malformed grammar: an unreadable rule line or an empty rule
/// list handed to the table builder.
#[derive(Debug)]
pub struct GrammarError {
    what: String,
    message: String,
}
