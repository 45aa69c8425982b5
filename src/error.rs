use crate::GrammarError;
use std::fmt::{Display, Formatter};

impl GrammarError {
    pub fn new<W: Into<String>, M: Into<String>>(what: W, message: M) -> Self {
        Self {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}: {}", self.what, self.message)
    }
}

impl std::error::Error for GrammarError {}
