use crate::text::{parse_rules_from_string, RuleReader};
use crate::{Query, TerminalQuery};

#[test]
fn canonical_lines_round_trip() {
    let lines = ["ROOT = <S> {EOF}", "S = hello {int} <B>", "B = {float} world"];
    let rules = parse_rules_from_string(&lines.join("\n")).unwrap();

    assert_eq!(rules.len(), lines.len());
    for (rule, line) in rules.iter().zip(lines) {
        assert_eq!(rule.to_string(), line);
    }
}

#[test]
fn alternatives_split_into_rules() {
    let rules = parse_rules_from_string("P = a b | c d").unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].to_string(), "P = a b");
    assert_eq!(rules[1].to_string(), "P = c d");
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let rules = parse_rules_from_string(
        "
        # sentence structure
        S = <W> .

        W = word
        ",
    )
    .unwrap();
    assert_eq!(rules.len(), 2);
}

#[test]
fn body_literals_map_to_query_kinds() {
    let rules = parse_rules_from_string("P = {int} {float} {EOF} <Q> text").unwrap();
    let queries = &rules[0].queries;
    assert!(matches!(queries[0], Query::Terminal(TerminalQuery::Int(_))));
    assert!(matches!(queries[1], Query::Terminal(TerminalQuery::Float(_))));
    assert!(matches!(queries[2], Query::Terminal(TerminalQuery::Eof(_))));
    assert!(matches!(queries[3], Query::Reference(_)));
    match &queries[4] {
        Query::Terminal(TerminalQuery::Text(query)) => {
            assert_eq!(query.text, "text");
            assert!(query.case_sensitive);
        }
        other => panic!("expected a text query, got {}", other),
    }
}

#[test]
fn missing_separator_is_rejected() {
    let err = parse_rules_from_string("foo bar").unwrap_err();
    assert!(err.to_string().contains("missing separator"), "{}", err);
}

#[test]
fn missing_production_is_rejected() {
    let err = parse_rules_from_string("= foo").unwrap_err();
    assert!(err.to_string().contains("missing production"), "{}", err);
}

#[test]
fn missing_body_is_rejected() {
    let err = parse_rules_from_string("P =").unwrap_err();
    assert!(err.to_string().contains("missing rule body"), "{}", err);
}

#[test]
fn empty_alternative_is_rejected() {
    let err = parse_rules_from_string("P = a |").unwrap_err();
    assert!(err.to_string().contains("empty alternative"), "{}", err);
}

#[test]
fn custom_separators() {
    let reader = RuleReader {
        rule_sep: String::from(":="),
        alternatives_sep: String::from("/"),
        line_comment: String::from(";"),
        reference_start: String::from("["),
        reference_end: String::from("]"),
    };
    let rules = reader
        .read(
            "
            ; alternate syntax
            P := [Q] x / y
            ",
        )
        .unwrap();
    assert_eq!(rules.len(), 2);
    assert!(matches!(rules[0].queries[0], Query::Reference(ref r) if r.reference == "Q"));
    assert!(matches!(
        rules[1].queries[0],
        Query::Terminal(TerminalQuery::Text(_))
    ));
}
