use crate::text::build_text_parsing_table;
use crate::{ParsingTable, Query, ReferenceQuery, Rule, TerminalQuery, TextQuery, Token};

fn word(text: &str) -> Query {
    Query::Terminal(TerminalQuery::Text(TextQuery::case_insensitive(text)))
}

fn reference(production: &str) -> Query {
    Query::Reference(ReferenceQuery::new(production))
}

/// A purchase-intent grammar over free-form utterances, built programmatically because
/// the rule reader only produces case-sensitive text queries:
///
/// ```text
/// ROOT = <INTENT>
/// INTENT = buy <VEHICLE> | buy <PROPERTY> | rent <PROPERTY>
/// VEHICLE = car | bike | truck
/// PROPERTY = house | flat | cottage
/// ```
///
/// Everything around the intent ("good morning, I would like to buy a car please") is
/// noise for the parser to skip.
pub fn intent_rules() -> Vec<Rule> {
    let mut rules = vec![
        Rule::new("ROOT", vec![reference("INTENT")]),
        Rule::new("INTENT", vec![word("buy"), reference("VEHICLE")]),
        Rule::new("INTENT", vec![word("buy"), reference("PROPERTY")]),
        Rule::new("INTENT", vec![word("rent"), reference("PROPERTY")]),
    ];
    for vehicle in ["car", "bike", "truck"] {
        rules.push(Rule::new("VEHICLE", vec![word(vehicle)]));
    }
    for property in ["house", "flat", "cottage"] {
        rules.push(Rule::new("PROPERTY", vec![word(property)]));
    }
    rules
}

pub fn intent_table() -> ParsingTable<Token> {
    build_text_parsing_table(intent_rules(), Vec::new()).unwrap()
}
