use crate::examples::arithmetic::arithmetic_table;
use crate::examples::intents::intent_table;
use crate::examples::paper::paper_table;
use crate::text::{build_text_parsing_table, parse_rules_from_string, tokenize};
use crate::{parse, Meta, ParseNode, ParseSettings, Token};

/// Every node must carry exactly one argument per body query, recursively.
fn assert_well_formed(node: &ParseNode<Token>) {
    assert_eq!(node.len(), node.rule.queries.len(), "malformed {}", node);
    for arg in node.iter() {
        if let Some(child) = arg.as_node() {
            assert_well_formed(child);
        }
    }
}

#[test]
fn arithmetic_with_noise() {
    let table = arithmetic_table();
    let tokens = tokenize("this will be ignored 3.1415 and + this 4e-10", false);

    let results = parse(tokens, &table, &ParseSettings::default());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].to_string(), "ROOT(EXPR(3.1415, +, 4e-10))");
    assert_well_formed(&results[0]);

    let symbols = results[0].symbols();
    assert_eq!(symbols.len(), 3);
    assert_eq!(symbols[0].position, 4);
    assert_eq!(symbols[0].meta, Some(Meta::Float(3.1415)));
    assert_eq!(symbols[1].position, 6);
    assert_eq!(symbols[1].meta, None);
    assert_eq!(symbols[2].position, 8);
    assert_eq!(symbols[2].meta, Some(Meta::Float(4e-10)));
}

#[test]
fn paper_grammar() {
    let table = paper_table();
    let tokens = tokenize("det n v n det p n", true);

    let results = parse(tokens, &table, &ParseSettings::default());
    assert!(!results.is_empty(), "expected at least one parse");

    for tree in &results {
        assert_eq!(tree.rule.production, "ROOT");
        assert_well_formed(tree);

        let sentence = tree.find_node("S").expect("parse should contain a sentence");
        assert_eq!(sentence.len(), 2);
        assert_eq!(sentence[0].as_node().unwrap().rule.production, "NP");
        assert_eq!(sentence[1].as_node().unwrap().rule.production, "VP");
    }
}

#[test]
fn ambiguous_start_production() {
    let rules = parse_rules_from_string("A = x | x x").unwrap();
    let table = build_text_parsing_table(rules, Vec::new()).unwrap();

    let results = parse(tokenize("x x", false), &table, &ParseSettings::new().root("A"));
    assert!(
        results.iter().any(|tree| tree.to_string() == "A(x, x)"),
        "expected the two-token alternative among {:?}",
        results.iter().map(|t| t.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn pure_noise_skipping() {
    let rules = parse_rules_from_string("R = a b c").unwrap();
    let table = build_text_parsing_table(rules, Vec::new()).unwrap();

    let results = parse(tokenize("a q b z z c", false), &table, &ParseSettings::new().root("R"));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].to_string(), "R(a, b, c)");

    let positions: Vec<usize> = results[0].symbols().iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 2, 5]);
}

#[test]
fn empty_input() {
    let table = arithmetic_table();
    let results = parse(Vec::<Token>::new(), &table, &ParseSettings::default());
    assert!(results.is_empty());
}

#[test]
fn unreachable_root_yields_nothing() {
    let rules = parse_rules_from_string("R = a b c").unwrap();
    let table = build_text_parsing_table(rules, Vec::new()).unwrap();

    let truncated = parse(tokenize("a b", false), &table, &ParseSettings::new().root("R"));
    assert!(truncated.is_empty());

    let all_noise = parse(tokenize("q q q", false), &table, &ParseSettings::new().root("R"));
    assert!(all_noise.is_empty());
}

#[test]
fn intent_extraction() {
    let table = intent_table();
    let tokens = tokenize("good morning I would like to BUY a Car please", false);

    let results = parse(tokens, &table, &ParseSettings::default());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].to_string(), "ROOT(INTENT(BUY, VEHICLE(Car)))");
}

#[test]
fn grown_vocabulary_with_left_recursion() {
    let mut rules = parse_rules_from_string(
        "
        ROOT = <WORDS> {EOF}
        WORDS = <WORDS> <WORD>
        WORDS = <WORD>
        ",
    )
    .unwrap();
    for word in ["alpha", "beta"] {
        rules.extend(parse_rules_from_string(&format!("WORD = {}", word)).unwrap());
    }
    let table = build_text_parsing_table(rules, Vec::new()).unwrap();

    let results = parse(tokenize("alpha zzz beta", true), &table, &ParseSettings::default());
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].to_string(),
        "ROOT(WORDS(WORDS(WORD(alpha)), WORD(beta)), {EOF})"
    );
}

#[test]
fn tight_beam_keeps_parents_alive() {
    // A beam of one prunes the stack root out of the live set; reductions must still be
    // able to walk to it.
    let table = arithmetic_table();
    let tokens = tokenize("this will be ignored 3.1415 and + this 4e-10", false);

    let results = parse(tokens, &table, &ParseSettings::new().beam_limit(1));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].to_string(), "ROOT(EXPR(3.1415, +, 4e-10))");
}

#[test]
fn deterministic_results() {
    let tokens = tokenize("det n v n det p n", true);

    let mut renderings = Vec::new();
    for _ in 0..2 {
        let table = paper_table();
        let results = parse(tokens.clone(), &table, &ParseSettings::default());
        renderings.push(results.iter().map(|t| t.to_string()).collect::<Vec<_>>());
    }
    assert_eq!(renderings[0], renderings[1]);
}

#[test]
fn tree_printing() {
    let table = arithmetic_table();
    let tokens = tokenize("3.1415 + 4e-10", false);

    let results = parse(tokens, &table, &ParseSettings::new().verbose(true));
    assert_eq!(results.len(), 1);
    results[0].print().unwrap();
}
