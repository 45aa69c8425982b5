use crate::text::{
    build_text_parsing_table, tokenize, CaseInsensitiveTextResolver, ExactTextResolver,
    FloatResolver, IntResolver, LevenshteinTextResolver, PatternTokenizer,
};
use crate::{
    parse, EntryId, EofResolver, IQuery, IResolver, Meta, ParseSettings, Query, Resolution, Rule,
    TerminalQuery, TextQuery, Token,
};
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::hash::Hasher;

fn text_query(text: &str) -> TerminalQuery {
    TerminalQuery::Text(TextQuery::new(text))
}

#[test]
fn registration_is_idempotent() {
    let mut resolver = ExactTextResolver::new();
    resolver.register(&text_query("play"), EntryId(3));
    resolver.register(&text_query("play"), EntryId(3));

    let resolution = resolver.resolve(&Token::text("play")).unwrap();
    assert_eq!(resolution.entry, EntryId(3));
}

#[test]
fn exact_resolver_skips_case_insensitive_queries() {
    let mut resolver = ExactTextResolver::new();
    resolver.register(
        &TerminalQuery::Text(TextQuery::case_insensitive("play")),
        EntryId(0),
    );
    assert!(resolver.resolve(&Token::text("play")).is_none());
}

#[test]
fn case_insensitive_resolver() {
    let mut resolver = CaseInsensitiveTextResolver::new();
    resolver.register(
        &TerminalQuery::Text(TextQuery::case_insensitive("Hello")),
        EntryId(1),
    );
    assert!(resolver.resolve(&Token::text("HELLO")).is_some());
    assert!(resolver.resolve(&Token::text("hello")).is_some());
    assert!(resolver.resolve(&Token::text("world")).is_none());
}

#[test]
fn numeric_resolvers_attach_parsed_values() {
    let mut ints = IntResolver::new();
    ints.register(&TerminalQuery::Int(crate::IntQuery), EntryId(0));
    assert_eq!(
        ints.resolve(&Token::text("42")).unwrap().meta,
        Some(Meta::Int(42))
    );
    assert!(ints.resolve(&Token::text("3.5")).is_none());
    assert!(ints.resolve(&Token::text("forty")).is_none());
    assert!(ints.resolve(&Token::Eof).is_none());

    let mut floats = FloatResolver::new();
    floats.register(&TerminalQuery::Float(crate::FloatQuery), EntryId(0));
    assert_eq!(
        floats.resolve(&Token::text("4e-10")).unwrap().meta,
        Some(Meta::Float(4e-10))
    );
    // Integer-looking tokens parse as floats too.
    assert!(floats.resolve(&Token::text("3")).is_some());
    assert!(floats.resolve(&Token::text("+")).is_none());
}

#[test]
fn eof_resolver_accepts_only_the_sentinel() {
    let mut resolver = EofResolver::new();
    resolver.register(&TerminalQuery::Eof(crate::EofQuery), EntryId(0));
    assert!(resolver.resolve(&Token::Eof).is_some());
    // The sentinel is distinct from any text, including its own rendering.
    assert!(resolver.resolve(&Token::text("{EOF}")).is_none());
}

#[test]
fn levenshtein_resolver_accepts_single_edits() {
    let mut resolver = LevenshteinTextResolver::new(4);
    resolver.register(&text_query("parse"), EntryId(0));
    resolver.register(&text_query("go"), EntryId(1));

    for accepted in ["parse", "PARSE", "parze", "pars", "parsee", "parse,"] {
        assert!(
            resolver.resolve(&Token::text(accepted)).is_some(),
            "{} should resolve",
            accepted
        );
    }
    assert!(resolver.resolve(&Token::text("park")).is_none());
    // Below the length threshold nothing is indexed.
    assert!(resolver.resolve(&Token::text("go")).is_none());
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ColorQuery;

impl Display for ColorQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{color}}")
    }
}

impl IQuery for ColorQuery {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn query_eq(&self, other: &dyn IQuery) -> bool {
        other.as_any().downcast_ref::<ColorQuery>().is_some()
    }

    fn query_hash(&self, state: &mut dyn Hasher) {
        state.write(b"color");
    }
}

struct ColorResolver {
    entry: Option<EntryId>,
}

impl IResolver<Token> for ColorResolver {
    fn register(&mut self, query: &TerminalQuery, entry: EntryId) {
        if let TerminalQuery::Custom(query) = query {
            if query.as_any().downcast_ref::<ColorQuery>().is_some() {
                self.entry = Some(entry);
            }
        }
    }

    fn resolve(&self, token: &Token) -> Option<Resolution> {
        let text = token.as_text()?;
        if ["red", "green", "blue"].contains(&text) {
            self.entry.map(|entry| Resolution { entry, meta: None })
        } else {
            None
        }
    }
}

#[test]
fn custom_query_with_custom_resolver() {
    let rules = vec![Rule::new(
        "ROOT",
        vec![
            Query::Terminal(text_query("paint")),
            Query::Terminal(TerminalQuery::Custom(std::rc::Rc::new(ColorQuery))),
        ],
    )];
    let table =
        build_text_parsing_table(rules, vec![Box::new(ColorResolver { entry: None })]).unwrap();

    let results = parse(
        tokenize("please paint everything blue", false),
        &table,
        &ParseSettings::default(),
    );
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].to_string(), "ROOT(paint, blue)");
}

#[test]
fn whitespace_tokenizer() {
    let tokens = tokenize("a b  c", true);
    assert_eq!(
        tokens,
        vec![Token::text("a"), Token::text("b"), Token::text("c"), Token::Eof]
    );
}

#[test]
fn pattern_tokenizer_splits_punctuation() {
    let tokens = PatternTokenizer::default().tokenize("Hello, world 42", false);
    assert_eq!(
        tokens,
        vec![
            Token::text("Hello"),
            Token::text(","),
            Token::text("world"),
            Token::text("42"),
        ]
    );
}
