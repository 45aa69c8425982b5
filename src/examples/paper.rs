use crate::text::{build_text_parsing_table, parse_rules_from_string};
use crate::{ParsingTable, Rule, Token};

/// The natural-language grammar used in the GLR literature, over pre-tagged tokens
/// (`det`, `n`, `v`, `p`). Genuinely ambiguous: a prepositional phrase can attach to
/// either noun phrase, so a generalized parser is required.
pub fn paper_rules() -> Vec<Rule> {
    parse_rules_from_string(
        "
        ROOT = <S> {EOF}
        S = <NP> <VP>
        NP = det n | n | <NP> <PP>
        VP = v <NP>
        PP = p <NP>
        ",
    )
    .unwrap()
}

pub fn paper_table() -> ParsingTable<Token> {
    build_text_parsing_table(paper_rules(), Vec::new()).unwrap()
}
