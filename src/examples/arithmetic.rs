use crate::text::{build_text_parsing_table, parse_rules_from_string};
use crate::{ParsingTable, Rule, Token};

/// A two-operand float addition buried in arbitrary filler tokens:
///
/// ```text
/// ROOT = <EXPR>
/// EXPR = {float} + {float}
/// ```
pub fn arithmetic_rules() -> Vec<Rule> {
    parse_rules_from_string(
        "
        ROOT = <EXPR>
        EXPR = {float} + {float}
        ",
    )
    .unwrap()
}

pub fn arithmetic_table() -> ParsingTable<Token> {
    build_text_parsing_table(arithmetic_rules(), Vec::new()).unwrap()
}
