//! The text pipeline: string-token queries, the built-in resolver set, a BNF-flavoured
//! rule reader and a pair of small tokenizers.
//!
//! Everything here instantiates the generic core for [Token] input. Grammars over other
//! token types bring their own resolvers instead.

use crate::eof::EofResolver;
use crate::{
    build_parsing_table, EntryId, EofQuery, FloatQuery, GrammarError, IResolver, IntQuery, Meta,
    ParsingTable, Query, ReferenceQuery, Resolution, Rule, TerminalQuery, TextQuery, Token,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

impl TextQuery {
    /// Create a case-sensitive text query.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            case_sensitive: true,
        }
    }

    /// Create a text query matching regardless of letter case.
    pub fn case_insensitive<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            case_sensitive: false,
        }
    }
}

impl Display for TextQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl IntQuery {
    pub const SYMBOL: &'static str = "{int}";
}

impl Display for IntQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::SYMBOL)
    }
}

impl FloatQuery {
    pub const SYMBOL: &'static str = "{float}";
}

impl Display for FloatQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::SYMBOL)
    }
}

/// A resolver indexing case-sensitive [TextQuery] values by their exact text.
pub struct ExactTextResolver {
    index: HashMap<String, EntryId>,
}

impl ExactTextResolver {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }
}

impl IResolver<Token> for ExactTextResolver {
    fn register(&mut self, query: &TerminalQuery, entry: EntryId) {
        if let TerminalQuery::Text(query) = query {
            if query.case_sensitive {
                self.index.insert(query.text.clone(), entry);
            }
        }
    }

    fn resolve(&self, token: &Token) -> Option<Resolution> {
        let entry = *self.index.get(token.as_text()?)?;
        Some(Resolution { entry, meta: None })
    }
}

/// A resolver indexing case-insensitive [TextQuery] values by their lowercased text.
pub struct CaseInsensitiveTextResolver {
    index: HashMap<String, EntryId>,
}

impl CaseInsensitiveTextResolver {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }
}

impl IResolver<Token> for CaseInsensitiveTextResolver {
    fn register(&mut self, query: &TerminalQuery, entry: EntryId) {
        if let TerminalQuery::Text(query) = query {
            if !query.case_sensitive {
                self.index.insert(query.text.to_lowercase(), entry);
            }
        }
    }

    fn resolve(&self, token: &Token) -> Option<Resolution> {
        let entry = *self.index.get(&token.as_text()?.to_lowercase())?;
        Some(Resolution { entry, meta: None })
    }
}

/// A resolver serving [IntQuery] for any token that parses as an integer.
pub struct IntResolver {
    entry: Option<EntryId>,
}

impl IntResolver {
    pub fn new() -> Self {
        Self { entry: None }
    }
}

impl IResolver<Token> for IntResolver {
    fn register(&mut self, query: &TerminalQuery, entry: EntryId) {
        if matches!(query, TerminalQuery::Int(_)) {
            self.entry = Some(entry);
        }
    }

    fn resolve(&self, token: &Token) -> Option<Resolution> {
        let value: i64 = token.as_text()?.parse().ok()?;
        self.entry.map(|entry| Resolution {
            entry,
            meta: Some(Meta::Int(value)),
        })
    }
}

/// A resolver serving [FloatQuery] for any token that parses as a floating-point number.
pub struct FloatResolver {
    entry: Option<EntryId>,
}

impl FloatResolver {
    pub fn new() -> Self {
        Self { entry: None }
    }
}

impl IResolver<Token> for FloatResolver {
    fn register(&mut self, query: &TerminalQuery, entry: EntryId) {
        if matches!(query, TerminalQuery::Float(_)) {
            self.entry = Some(entry);
        }
    }

    fn resolve(&self, token: &Token) -> Option<Resolution> {
        let value: f64 = token.as_text()?.parse().ok()?;
        self.entry.map(|entry| Resolution {
            entry,
            meta: Some(Meta::Float(value)),
        })
    }
}

/// A typo-tolerant text resolver.
///
/// Every registered text of at least `min_len` characters is pre-expanded to all of its
/// single-edit (Levenshtein distance 1) variations over a configurable alphabet, so that
/// lookups stay a single hash probe per token. Matching is case-insensitive.
pub struct LevenshteinTextResolver {
    min_len: usize,
    alphabet: Vec<char>,
    index: HashMap<String, EntryId>,
}

const DEFAULT_LEVENSHTEIN_ALPHABET: &str = " abcdefghijklmnopqrstuvwxyz0123456789,./-=\\";

impl LevenshteinTextResolver {
    /// Create a resolver with the default latin-and-digits alphabet. Only texts of at
    /// least `min_len` characters are indexed; 4 is a reasonable default, below that the
    /// single-edit neighbourhoods of unrelated words start to overlap.
    pub fn new(min_len: usize) -> Self {
        Self::with_alphabet(min_len, DEFAULT_LEVENSHTEIN_ALPHABET)
    }

    /// Create a resolver expanding variations over the given alphabet.
    pub fn with_alphabet(min_len: usize, alphabet: &str) -> Self {
        Self {
            min_len,
            alphabet: alphabet.chars().collect(),
            index: HashMap::new(),
        }
    }
}

impl IResolver<Token> for LevenshteinTextResolver {
    fn register(&mut self, query: &TerminalQuery, entry: EntryId) {
        if let TerminalQuery::Text(query) = query {
            let text = query.text.to_lowercase();
            if text.chars().count() >= self.min_len {
                for variation in levenshtein1_variations(&text, &self.alphabet) {
                    self.index.insert(variation, entry);
                }
            }
        }
    }

    fn resolve(&self, token: &Token) -> Option<Resolution> {
        let entry = *self.index.get(&token.as_text()?.to_lowercase())?;
        Some(Resolution { entry, meta: None })
    }
}

/// All strings within Levenshtein distance 1 of `original`, including `original` itself.
fn levenshtein1_variations(original: &str, alphabet: &[char]) -> Vec<String> {
    let chars: Vec<char> = original.chars().collect();
    let mut variations = vec![original.to_string()];

    let rebuild = |prefix: &[char], ch: Option<char>, suffix: &[char]| -> String {
        let mut text: String = prefix.iter().collect();
        if let Some(ch) = ch {
            text.push(ch);
        }
        text.extend(suffix);
        text
    };

    for i in 0..chars.len() {
        // Deletion
        variations.push(rebuild(&chars[..i], None, &chars[i + 1..]));

        for &ch in alphabet {
            // Substitution
            variations.push(rebuild(&chars[..i], Some(ch), &chars[i + 1..]));
            // Insertion
            variations.push(rebuild(&chars[..i], Some(ch), &chars[i..]));
        }
    }

    // Insertion at the end
    for &ch in alphabet {
        variations.push(rebuild(&chars, Some(ch), &[]));
    }

    variations
}

/// A reader for BNF-flavoured textual grammars, one rule per line:
///
/// ```text
/// # comment
/// ROOT = <SENTENCE> {EOF}
/// SENTENCE = hello {int} | hello {float}
/// ```
///
/// `<NAME>` denotes a reference to another production; `{EOF}`, `{int}` and `{float}`
/// denote the corresponding built-in queries; any other token becomes a case-sensitive
/// [TextQuery]. All the separators are configurable through the public fields.
pub struct RuleReader {
    pub rule_sep: String,
    pub alternatives_sep: String,
    pub line_comment: String,
    pub reference_start: String,
    pub reference_end: String,
}

impl RuleReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all rules from a grammar string. Blank lines and comment lines are skipped;
    /// a line with pipe-separated alternatives yields one rule per alternative.
    pub fn read(&self, raw: &str) -> Result<Vec<Rule>, GrammarError> {
        let mut rules = Vec::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(&self.line_comment) {
                continue;
            }
            self.read_line(line, &mut rules)?;
        }
        Ok(rules)
    }

    fn read_line(&self, line: &str, rules: &mut Vec<Rule>) -> Result<(), GrammarError> {
        let sep = line.find(&self.rule_sep).ok_or_else(|| {
            GrammarError::new(line, format!("missing separator \"{}\"", self.rule_sep))
        })?;

        let production = line[..sep].trim();
        if production.is_empty() {
            return Err(GrammarError::new(line, "missing production"));
        }

        let body = &line[sep + self.rule_sep.len()..];
        if body.trim().is_empty() {
            return Err(GrammarError::new(line, "missing rule body"));
        }

        for alternative in body.split(self.alternatives_sep.as_str()) {
            let queries: Vec<Query> = alternative
                .split_whitespace()
                .map(|raw| self.read_query(raw))
                .collect();
            if queries.is_empty() {
                return Err(GrammarError::new(line, "empty alternative"));
            }
            rules.push(Rule::new(production, queries));
        }
        Ok(())
    }

    fn read_query(&self, raw: &str) -> Query {
        let delimiters = self.reference_start.len() + self.reference_end.len();
        if raw.len() >= delimiters
            && raw.starts_with(&self.reference_start)
            && raw.ends_with(&self.reference_end)
        {
            let name = &raw[self.reference_start.len()..raw.len() - self.reference_end.len()];
            Query::Reference(ReferenceQuery::new(name))
        } else if raw == EofQuery::SYMBOL {
            Query::Terminal(TerminalQuery::Eof(EofQuery))
        } else if raw == IntQuery::SYMBOL {
            Query::Terminal(TerminalQuery::Int(IntQuery))
        } else if raw == FloatQuery::SYMBOL {
            Query::Terminal(TerminalQuery::Float(FloatQuery))
        } else {
            Query::Terminal(TerminalQuery::Text(TextQuery::new(raw)))
        }
    }
}

/// Read rules from a grammar string with the default [RuleReader] syntax.
pub fn parse_rules_from_string(raw: &str) -> Result<Vec<Rule>, GrammarError> {
    RuleReader::new().read(raw)
}

/// Build a parsing table for [Token] input with the built-in resolver set: exact text,
/// case-insensitive text, integer, float and the EOF sentinel. Additional resolvers are
/// appended after the built-in ones, so exact text matches take precedence.
pub fn build_text_parsing_table(
    rules: Vec<Rule>,
    additional_resolvers: Vec<Box<dyn IResolver<Token>>>,
) -> Result<ParsingTable<Token>, GrammarError> {
    let mut resolvers: Vec<Box<dyn IResolver<Token>>> = vec![
        Box::new(ExactTextResolver::new()),
        Box::new(CaseInsensitiveTextResolver::new()),
        Box::new(IntResolver::new()),
        Box::new(FloatResolver::new()),
        Box::new(EofResolver::new()),
    ];
    resolvers.extend(additional_resolvers);
    build_parsing_table(rules, resolvers)
}

/// Split a string on whitespace into [Token]s, optionally appending the EOF sentinel.
pub fn tokenize(src: &str, add_eof: bool) -> Vec<Token> {
    let mut tokens: Vec<Token> = src.split_whitespace().map(Token::text).collect();
    if add_eof {
        tokens.push(Token::Eof);
    }
    tokens
}

pub(crate) static DEFAULT_TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\p{Alphabetic}+|[0-9]+|[:;"'!@#$%^&*()<>?,./\[\]{}\\|+=_-]"#)
        .expect("default token pattern is well formed")
});

/// A regex-driven tokenizer for running text.
///
/// Unlike [tokenize] it splits punctuation off the words it touches, which is what
/// sentence-level grammars usually want. The default pattern captures alphabetic runs,
/// digit runs and single punctuation marks, dropping everything else.
pub struct PatternTokenizer {
    pattern: Regex,
}

impl PatternTokenizer {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    pub fn tokenize(&self, src: &str, add_eof: bool) -> Vec<Token> {
        let mut tokens: Vec<Token> = self
            .pattern
            .find_iter(src)
            .map(|m| Token::text(m.as_str()))
            .collect();
        if add_eof {
            tokens.push(Token::Eof);
        }
        tokens
    }
}
