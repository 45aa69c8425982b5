use crate::text::{PatternTokenizer, RuleReader, DEFAULT_TOKEN_PATTERN};
use crate::ParseSettings;

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            beam_limit: 100,
            root_production: String::from("ROOT"),
            verbose: false,
        }
    }
}

impl Default for RuleReader {
    fn default() -> Self {
        Self {
            rule_sep: String::from("="),
            alternatives_sep: String::from("|"),
            line_comment: String::from("#"),
            reference_start: String::from("<"),
            reference_end: String::from(">"),
        }
    }
}

impl Default for PatternTokenizer {
    fn default() -> Self {
        Self::new((*DEFAULT_TOKEN_PATTERN).clone())
    }
}
