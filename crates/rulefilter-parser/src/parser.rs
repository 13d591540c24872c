//! Filter grammar parser
//!
//! Grammar (informal):
//!
//! ```text
//! expr       := { group | term }
//! group      := ['!'] '(' { group | term } ')' [combinator]
//! term       := [field] [operator] ws? (quoted | bare-token) [combinator]
//! field      := identifier glued to the operator, e.g. `Country=DE`
//! operator   := one or two characters from { ~ = ! < > }
//! combinator := 'and' | 'or' (case-insensitive), defaults to 'or'
//! quoted     := '...' or "..." with the delimiter escaped by doubling
//! bare-token := any run of non-whitespace, non-paren characters
//! ```
//!
//! Operator inference: a missing operator defaults to Contains; a `*` or
//! `?` wildcard in the value promotes equality-shaped operators to
//! Like/NotLike. A `!` directly before `(` negates the whole group.

use crate::error::{ParseError, Result};
use crate::normalizer::normalize;
use rulefilter_core::{FilterGroup, FilterNode, FilterTerm, LogicalOperator, RuleOperator};

/// Filter string parser
pub struct FilterParser;

impl FilterParser {
    /// Parse a filter string into its root group.
    ///
    /// Unbalanced parentheses are repaired first; an empty input yields an
    /// empty root group (which compiles to the constant `true` predicate).
    pub fn parse(input: &str) -> Result<FilterGroup> {
        let normalized = normalize(input);
        let mut scanner = Scanner::new(&normalized);
        let root = scanner.parse_root()?;
        log::debug!("parsed filter with {} top-level node(s)", root.len());
        Ok(root)
    }

    /// Non-throwing variant of [`parse`](Self::parse)
    pub fn try_parse(input: &str) -> Option<FilterGroup> {
        Self::parse(input).ok()
    }
}

/// Character-cursor scanner over the normalized input
struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse_root(&mut self) -> Result<FilterGroup> {
        let mut root = FilterGroup::root();
        self.parse_children(&mut root, true)?;
        Ok(root)
    }

    /// Parse nodes into `group` until `)` (sub-group) or end of input
    fn parse_children(&mut self, group: &mut FilterGroup, top_level: bool) -> Result<()> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(()),
                Some(')') => {
                    if top_level {
                        // The normalizer guarantees every ')' matches an
                        // earlier '(' consumed by a sub-group.
                        return Err(ParseError::Syntax("unexpected ')'".to_string()));
                    }
                    return Ok(());
                }
                Some('!') if self.peek_at(1) == Some('(') => {
                    self.advance(); // '!'
                    self.advance(); // '('
                    let sub = self.parse_group(true)?;
                    group.push(sub);
                }
                Some('(') => {
                    self.advance();
                    let sub = self.parse_group(false)?;
                    group.push(sub);
                }
                Some(_) => {
                    let term = self.parse_term()?;
                    group.push(term);
                }
            }
        }
    }

    /// Parse a sub-group body after its '(' has been consumed
    fn parse_group(&mut self, negate: bool) -> Result<FilterGroup> {
        let mut sub = FilterGroup::sub_group();
        sub.negate = negate;
        self.parse_children(&mut sub, false)?;
        match self.peek() {
            Some(')') => {
                self.advance();
            }
            // Unreachable after normalization; kept as a structural check
            _ => return Err(ParseError::Syntax("unclosed group".to_string())),
        }
        sub.combinator = self.parse_combinator();
        Ok(sub)
    }

    fn parse_term(&mut self) -> Result<FilterTerm> {
        let field = self.parse_field_prefix();
        let raw_op = self.parse_operator_token();
        self.skip_whitespace();

        let value = match self.peek() {
            Some(delimiter @ ('\'' | '"')) => self.parse_quoted(delimiter)?,
            Some(c) if c != '(' && c != ')' => self.parse_bare_token(),
            _ => {
                let shown = if raw_op.is_empty() {
                    field.clone().unwrap_or_default()
                } else {
                    raw_op.clone()
                };
                return Err(ParseError::DanglingOperator(shown));
            }
        };

        let wildcard = value.contains('*') || value.contains('?');
        let operator = infer_operator(&raw_op, wildcard)?;

        let mut term = FilterTerm::new(operator, value);
        term.field = field;
        term.implicit_operator = raw_op.is_empty();
        term.combinator = self.parse_combinator();
        Ok(term)
    }

    /// An identifier glued to an operator character is a field prefix
    /// (`Country=DE`, `Orders.Total>100`); anything else leaves the cursor
    /// untouched.
    fn parse_field_prefix(&mut self) -> Option<String> {
        let start = self.pos;
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if !name.is_empty() && matches!(self.peek(), Some(c) if is_operator_char(c)) {
            Some(name)
        } else {
            self.pos = start;
            None
        }
    }

    /// Consume a one- or two-character operator token, longest match first
    fn parse_operator_token(&mut self) -> String {
        let first = match self.peek() {
            Some(c) if is_operator_char(c) => c,
            _ => return String::new(),
        };
        self.advance();
        if let Some(second) = self.peek() {
            let pair: String = [first, second].iter().collect();
            if matches!(pair.as_str(), "==" | "!=" | "!~" | "<=" | ">=" | "<>") {
                self.advance();
                return pair;
            }
        }
        first.to_string()
    }

    /// Single- or double-quoted value; the delimiter escapes by doubling
    fn parse_quoted(&mut self, delimiter: char) -> Result<String> {
        let offset = self.pos;
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::UnterminatedQuote { delimiter, offset }),
                Some(c) if c == delimiter => {
                    self.advance();
                    if self.peek() == Some(delimiter) {
                        // Doubled delimiter is a literal one
                        value.push(delimiter);
                        self.advance();
                    } else {
                        return Ok(value);
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn parse_bare_token(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '(' || c == ')' {
                break;
            }
            value.push(c);
            self.advance();
        }
        value
    }

    /// Consume a standalone `and`/`or` word if one follows; defaults to Or
    fn parse_combinator(&mut self) -> LogicalOperator {
        let start = self.pos;
        self.skip_whitespace();
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphabetic() {
                word.push(c.to_ascii_lowercase());
                self.advance();
            } else {
                break;
            }
        }
        let boundary = matches!(self.peek(), None | Some('(') | Some('!'))
            || matches!(self.peek(), Some(c) if c.is_whitespace());
        if boundary {
            match word.as_str() {
                "and" => return LogicalOperator::And,
                "or" => return LogicalOperator::Or,
                _ => {}
            }
        }
        self.pos = start;
        LogicalOperator::default()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '~' | '=' | '!' | '<' | '>')
}

/// Resolve the raw operator token to a [`RuleOperator`], taking the
/// wildcard presence of the value into account
fn infer_operator(raw: &str, wildcard: bool) -> Result<RuleOperator> {
    let op = match raw {
        "" | "~" => {
            if wildcard {
                RuleOperator::Like
            } else {
                RuleOperator::Contains
            }
        }
        "=" | "==" => {
            if wildcard {
                RuleOperator::Like
            } else {
                RuleOperator::IsEqualTo
            }
        }
        "!" | "!=" | "<>" => {
            if wildcard {
                RuleOperator::NotLike
            } else {
                RuleOperator::IsNotEqualTo
            }
        }
        "!~" => {
            if wildcard {
                RuleOperator::NotLike
            } else {
                RuleOperator::NotContains
            }
        }
        ">" => RuleOperator::GreaterThan,
        ">=" => RuleOperator::GreaterThanOrEqualTo,
        "<" => RuleOperator::LessThan,
        "<=" => RuleOperator::LessThanOrEqualTo,
        other => return Err(ParseError::Syntax(format!("unknown operator '{other}'"))),
    };
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_term(input: &str) -> FilterTerm {
        let group = FilterParser::parse(input).unwrap();
        assert_eq!(group.len(), 1, "expected one node for {input:?}");
        match &group.children[0] {
            FilterNode::Term(term) => term.clone(),
            other => panic!("expected a term, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_token_is_contains() {
        let term = single_term("gift");
        assert_eq!(term.operator, RuleOperator::Contains);
        assert_eq!(term.raw_value, "gift");
        assert!(term.implicit_operator);
        assert_eq!(term.field, None);
    }

    #[test]
    fn test_operator_inference_table() {
        // (raw token, value, expected operator)
        let cases = [
            ("", "abc", RuleOperator::Contains),
            ("", "a*c", RuleOperator::Like),
            ("~", "abc", RuleOperator::Contains),
            ("~", "a?c", RuleOperator::Like),
            ("=", "abc", RuleOperator::IsEqualTo),
            ("=", "a*c", RuleOperator::Like),
            ("==", "abc", RuleOperator::IsEqualTo),
            ("==", "a*c", RuleOperator::Like),
            ("!", "abc", RuleOperator::IsNotEqualTo),
            ("!", "a*c", RuleOperator::NotLike),
            ("!=", "abc", RuleOperator::IsNotEqualTo),
            ("!=", "a?c", RuleOperator::NotLike),
            ("<>", "abc", RuleOperator::IsNotEqualTo),
            ("<>", "a*c", RuleOperator::NotLike),
            ("!~", "abc", RuleOperator::NotContains),
            ("!~", "a*c", RuleOperator::NotLike),
            (">", "5", RuleOperator::GreaterThan),
            (">=", "5", RuleOperator::GreaterThanOrEqualTo),
            ("<", "5", RuleOperator::LessThan),
            ("<=", "5", RuleOperator::LessThanOrEqualTo),
        ];
        for (token, value, expected) in cases {
            let term = single_term(&format!("{token}{value}"));
            assert_eq!(term.operator, expected, "token {token:?} value {value:?}");
            assert_eq!(term.raw_value, value);
        }
    }

    #[test]
    fn test_field_prefixed_term() {
        let term = single_term("Country=DE");
        assert_eq!(term.field.as_deref(), Some("Country"));
        assert_eq!(term.operator, RuleOperator::IsEqualTo);
        assert_eq!(term.raw_value, "DE");
        assert!(!term.implicit_operator);
    }

    #[test]
    fn test_dotted_field_prefix() {
        let term = single_term("Orders.Total>=100");
        assert_eq!(term.field.as_deref(), Some("Orders.Total"));
        assert_eq!(term.operator, RuleOperator::GreaterThanOrEqualTo);
        assert_eq!(term.raw_value, "100");
    }

    #[test]
    fn test_combinators_attach_to_left_operand() {
        let group = FilterParser::parse("a and b or c").unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.children[0].combinator(), LogicalOperator::And);
        assert_eq!(group.children[1].combinator(), LogicalOperator::Or);
        // Trailing combinator of the last node is the Or default
        assert_eq!(group.children[2].combinator(), LogicalOperator::Or);
    }

    #[test]
    fn test_combinator_case_insensitive() {
        let group = FilterParser::parse("a AND b Or c").unwrap();
        assert_eq!(group.children[0].combinator(), LogicalOperator::And);
        assert_eq!(group.children[1].combinator(), LogicalOperator::Or);
    }

    #[test]
    fn test_missing_combinator_defaults_to_or() {
        let group = FilterParser::parse("gift card").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.children[0].combinator(), LogicalOperator::Or);
    }

    #[test]
    fn test_quoted_values() {
        let term = single_term("City=\"New York\"");
        assert_eq!(term.raw_value, "New York");

        let term = single_term("'gift card'");
        assert_eq!(term.raw_value, "gift card");
        assert_eq!(term.operator, RuleOperator::Contains);
    }

    #[test]
    fn test_quote_escaped_by_doubling() {
        let term = single_term(r#""say ""hi""""#);
        assert_eq!(term.raw_value, "say \"hi\"");

        let term = single_term("'it''s'");
        assert_eq!(term.raw_value, "it's");
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let result = FilterParser::parse("City=\"Berlin");
        assert!(matches!(
            result,
            Err(ParseError::UnterminatedQuote { delimiter: '"', .. })
        ));
    }

    #[test]
    fn test_dangling_operator_is_error() {
        assert!(matches!(
            FilterParser::parse("Country="),
            Err(ParseError::DanglingOperator(_))
        ));
        assert!(matches!(
            FilterParser::parse("a and >="),
            Err(ParseError::DanglingOperator(op)) if op == ">="
        ));
    }

    #[test]
    fn test_nested_groups() {
        let group = FilterParser::parse("(a or b) and c").unwrap();
        assert_eq!(group.len(), 2);
        match &group.children[0] {
            FilterNode::Group(sub) => {
                assert!(sub.is_sub_group);
                assert!(!sub.negate);
                assert_eq!(sub.len(), 2);
                assert_eq!(sub.combinator, LogicalOperator::And);
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_negated_group() {
        let group = FilterParser::parse("!(Country=DE and City=Berlin)").unwrap();
        assert_eq!(group.len(), 1);
        match &group.children[0] {
            FilterNode::Group(sub) => {
                assert!(sub.negate);
                assert_eq!(sub.len(), 2);
                assert_eq!(sub.children[0].combinator(), LogicalOperator::And);
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_bang_not_followed_by_paren_is_operator() {
        let term = single_term("!card");
        assert_eq!(term.operator, RuleOperator::IsNotEqualTo);
        assert_eq!(term.raw_value, "card");
    }

    #[test]
    fn test_unbalanced_parens_are_repaired_not_errors() {
        let group = FilterParser::parse("(a or b").unwrap();
        assert_eq!(group.len(), 2);

        let group = FilterParser::parse("a) and b").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.children[0].combinator(), LogicalOperator::And);
    }

    #[test]
    fn test_empty_input_is_empty_root() {
        let group = FilterParser::parse("").unwrap();
        assert!(group.is_empty());
        assert!(!group.is_sub_group);
    }

    #[test]
    fn test_try_parse_surface() {
        assert!(FilterParser::try_parse("a and b").is_some());
        assert!(FilterParser::try_parse("Country=").is_none());
    }

    #[test]
    fn test_display_round_trip() {
        for input in [
            "Country=DE and City=Berlin",
            "!(Country=DE and City=Berlin)",
            "gift or card",
            "Total>100 and Total<=500",
        ] {
            let group = FilterParser::parse(input).unwrap();
            let rendered = group.to_string();
            let reparsed = FilterParser::parse(&rendered).unwrap();
            assert_eq!(reparsed, group, "round trip failed for {input:?}");
        }
    }

    #[test]
    fn test_combinator_word_as_value() {
        // A lone combinator word at term position is just a bare token
        let term = single_term("or");
        assert_eq!(term.raw_value, "or");
        assert_eq!(term.operator, RuleOperator::Contains);
    }
}
