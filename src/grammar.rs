use crate::{Query, ReferenceQuery, Rule, TerminalQuery};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

impl Rule {
    /// Create a new rule. The body order is significant; it is matched left to right.
    pub fn new<P: Into<String>>(production: P, queries: Vec<Query>) -> Self {
        Self {
            production: production.into(),
            queries,
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} =", self.production)?;
        for query in &self.queries {
            write!(f, " {}", query)?;
        }
        Ok(())
    }
}

impl ReferenceQuery {
    pub fn new<R: Into<String>>(reference: R) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

impl Display for ReferenceQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.reference)
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::Terminal(terminal) => write!(f, "{}", terminal),
            Query::Reference(reference) => write!(f, "{}", reference),
        }
    }
}

impl Display for TerminalQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalQuery::Text(query) => write!(f, "{}", query),
            TerminalQuery::Int(query) => write!(f, "{}", query),
            TerminalQuery::Float(query) => write!(f, "{}", query),
            TerminalQuery::Eof(query) => write!(f, "{}", query),
            TerminalQuery::Custom(query) => write!(f, "{}", query),
        }
    }
}

impl PartialEq for TerminalQuery {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TerminalQuery::Text(a), TerminalQuery::Text(b)) => a == b,
            (TerminalQuery::Int(_), TerminalQuery::Int(_)) => true,
            (TerminalQuery::Float(_), TerminalQuery::Float(_)) => true,
            (TerminalQuery::Eof(_), TerminalQuery::Eof(_)) => true,
            (TerminalQuery::Custom(a), TerminalQuery::Custom(b)) => a.query_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl Eq for TerminalQuery {}

impl Hash for TerminalQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash a discriminant first so structurally empty variants stay distinct.
        match self {
            TerminalQuery::Text(query) => {
                0u8.hash(state);
                query.hash(state);
            }
            TerminalQuery::Int(_) => 1u8.hash(state),
            TerminalQuery::Float(_) => 2u8.hash(state),
            TerminalQuery::Eof(_) => 3u8.hash(state),
            TerminalQuery::Custom(query) => {
                4u8.hash(state);
                query.query_hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Query, ReferenceQuery, Rule, TerminalQuery, TextQuery};
    use std::collections::HashSet;

    #[test]
    fn identical_queries_collapse() {
        let mut queries = HashSet::new();
        queries.insert(TerminalQuery::Text(TextQuery::new("play")));
        queries.insert(TerminalQuery::Text(TextQuery::new("play")));
        queries.insert(TerminalQuery::Text(TextQuery::case_insensitive("play")));
        assert_eq!(queries.len(), 2);
    }

    #[test]
    fn rule_formatting() {
        let rule = Rule::new(
            "CMD",
            vec![
                Query::Terminal(TerminalQuery::Text(TextQuery::new("play"))),
                Query::Reference(ReferenceQuery::new("TRACK")),
                Query::Terminal(TerminalQuery::Eof(crate::EofQuery)),
            ],
        );
        assert_eq!(rule.to_string(), "CMD = play <TRACK> {EOF}");
    }
}
