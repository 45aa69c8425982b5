//! The end-of-stream sentinel and its query/resolver pair.
//!
//! Use of the sentinel is optional, but appending it to the input lets a grammar
//! terminate on an explicit `{EOF}` query instead of relying on the stream running dry.

use crate::{EntryId, EofQuery, IResolver, Resolution, TerminalQuery, Token};
use std::fmt::{Display, Formatter};

impl Token {
    /// Create a plain string token.
    pub fn text<S: Into<String>>(value: S) -> Self {
        Token::Text(value.into())
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    /// The token text, or [None] for the sentinel.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(value) => Some(value),
            Token::Eof => None,
        }
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::text(value)
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::Text(value)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Text(value) => write!(f, "{}", value),
            Token::Eof => write!(f, "{}", EofQuery::SYMBOL),
        }
    }
}

impl EofQuery {
    pub const SYMBOL: &'static str = "{EOF}";
}

impl Display for EofQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::SYMBOL)
    }
}

/// A resolver accepting only the end-of-stream sentinel.
pub struct EofResolver {
    entry: Option<EntryId>,
}

impl EofResolver {
    pub fn new() -> Self {
        Self { entry: None }
    }
}

impl IResolver<Token> for EofResolver {
    fn register(&mut self, query: &TerminalQuery, entry: EntryId) {
        if matches!(query, TerminalQuery::Eof(_)) {
            self.entry = Some(entry);
        }
    }

    fn resolve(&self, token: &Token) -> Option<Resolution> {
        match token {
            Token::Eof => self.entry.map(|entry| Resolution { entry, meta: None }),
            Token::Text(_) => None,
        }
    }
}
